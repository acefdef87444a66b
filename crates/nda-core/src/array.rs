use std::ops::{Add, Div, Mul, Rem, Sub};
use std::sync::Arc;

use crate::backend::{DeviceBackend, DeviceBuffer};
use crate::context::Context;
use crate::dtype::DType;
use crate::error::{ArrayError, Result};
use crate::shape::Shape;

/// An N-dimensional array handle.
///
/// Binds one `Shape`, one `DType`, and one `Context` — captured at
/// construction and never mutated — to a backend-allocated buffer. The
/// buffer is shared: cloning the handle duplicates the reference, not the
/// allocation, and the backing memory is released when the last handle
/// drops. Only buffer contents may change after construction, via
/// `copy_from_cpu` or through an aliasing handle; arithmetic always
/// produces a new array.
#[derive(Debug, Clone)]
pub struct NDArray {
    shape: Shape,
    dtype: DType,
    context: Context,
    buffer: Arc<dyn DeviceBuffer>,
    backend: Arc<dyn DeviceBackend>,
}

impl NDArray {
    /// Allocate an empty array with undefined contents.
    ///
    /// Synthesizes the interchange descriptors from the three value types
    /// and requests a buffer sized shape × dtype on the device named by
    /// `context`. Allocation is eager.
    ///
    /// # Errors
    /// Propagates the backend's allocation failure unchanged (unsupported
    /// device, bad index, unsatisfiable shape/dtype, out of memory). A
    /// failed construction yields no handle.
    pub fn empty(
        shape: Shape,
        dtype: DType,
        context: Context,
        backend: Arc<dyn DeviceBackend>,
    ) -> Result<NDArray> {
        let buffer = backend.alloc_empty(shape.dims(), dtype.to_dlpack(), context.to_dlpack())?;
        Ok(NDArray {
            shape,
            dtype,
            context,
            buffer,
            backend,
        })
    }

    /// Returns a reference to the array's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the array's element type.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the array's device context.
    pub fn context(&self) -> Context {
        self.context
    }

    /// The true allocated size of the backing buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.buffer.byte_len()
    }

    /// Returns the backend this array was allocated by.
    pub fn backend(&self) -> Arc<dyn DeviceBackend> {
        Arc::clone(&self.backend)
    }

    /// True if `self` and `other` reference the same allocation.
    pub fn shares_buffer(&self, other: &NDArray) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }

    /// Copy `src.len()` bytes from host memory into the device buffer.
    ///
    /// The length is forwarded to the backend unchecked; the backend
    /// reports a nonzero status when it exceeds the allocated size or the
    /// transfer fails, which surfaces here as `ArrayError::Transfer`
    /// carrying that status verbatim. Mutates buffer contents in place;
    /// metadata is unaffected, and the write is visible through every
    /// handle sharing this buffer.
    pub fn copy_from_cpu(&self, src: &[u8]) -> Result<()> {
        match self.buffer.copy_from_host(src) {
            0 => Ok(()),
            status => Err(ArrayError::Transfer {
                op: "copy_from_cpu",
                status,
            }),
        }
    }

    /// Copy `dst.len()` bytes from the device buffer into host memory.
    ///
    /// Same status contract as `copy_from_cpu`. Never mutates the array,
    /// though a concurrent writer through an aliasing handle can affect
    /// the bytes read; callers synchronize shared buffers themselves.
    pub fn copy_to_cpu(&self, dst: &mut [u8]) -> Result<()> {
        match self.buffer.copy_to_host(dst) {
            0 => Ok(()),
            status => Err(ArrayError::Transfer {
                op: "copy_to_cpu",
                status,
            }),
        }
    }

    /// Elementwise addition via the backend's kernel provider.
    pub fn add(&self, other: &NDArray) -> Result<NDArray> {
        self.backend.add(self, other)
    }

    /// Elementwise subtraction via the backend's kernel provider.
    pub fn sub(&self, other: &NDArray) -> Result<NDArray> {
        self.backend.sub(self, other)
    }

    /// Elementwise multiplication via the backend's kernel provider.
    pub fn mul(&self, other: &NDArray) -> Result<NDArray> {
        self.backend.mul(self, other)
    }

    /// Elementwise division via the backend's kernel provider.
    pub fn div(&self, other: &NDArray) -> Result<NDArray> {
        self.backend.div(self, other)
    }

    /// Elementwise remainder via the backend's kernel provider.
    pub fn rem(&self, other: &NDArray) -> Result<NDArray> {
        self.backend.rem(self, other)
    }

    /// Elementwise exponentiation via the backend's kernel provider.
    pub fn pow(&self, other: &NDArray) -> Result<NDArray> {
        self.backend.pow(self, other)
    }
}

// Operator sugar over the kernel provider. Fallible, so the output is a
// Result rather than a panicking NDArray.

impl Add<&NDArray> for &NDArray {
    type Output = Result<NDArray>;

    fn add(self, rhs: &NDArray) -> Result<NDArray> {
        NDArray::add(self, rhs)
    }
}

impl Sub<&NDArray> for &NDArray {
    type Output = Result<NDArray>;

    fn sub(self, rhs: &NDArray) -> Result<NDArray> {
        NDArray::sub(self, rhs)
    }
}

impl Mul<&NDArray> for &NDArray {
    type Output = Result<NDArray>;

    fn mul(self, rhs: &NDArray) -> Result<NDArray> {
        NDArray::mul(self, rhs)
    }
}

impl Div<&NDArray> for &NDArray {
    type Output = Result<NDArray>;

    fn div(self, rhs: &NDArray) -> Result<NDArray> {
        NDArray::div(self, rhs)
    }
}

impl Rem<&NDArray> for &NDArray {
    type Output = Result<NDArray>;

    fn rem(self, rhs: &NDArray) -> Result<NDArray> {
        NDArray::rem(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ElementwiseKernels;
    use crate::dlpack::{DLDataType, DLDevice, DeviceKind};
    use std::sync::Mutex;

    /// Minimal host-memory backend for exercising the handle layer without
    /// a real device runtime. Provides no kernels.
    #[derive(Debug)]
    struct TestBuffer {
        bytes: Mutex<Vec<u8>>,
    }

    impl DeviceBuffer for TestBuffer {
        fn byte_len(&self) -> usize {
            match self.bytes.lock() {
                Ok(bytes) => bytes.len(),
                Err(_) => 0,
            }
        }

        fn copy_from_host(&self, src: &[u8]) -> i32 {
            let Ok(mut bytes) = self.bytes.lock() else {
                return 2;
            };
            if src.len() > bytes.len() {
                return 1;
            }
            bytes[..src.len()].copy_from_slice(src);
            0
        }

        fn copy_to_host(&self, dst: &mut [u8]) -> i32 {
            let Ok(bytes) = self.bytes.lock() else {
                return 2;
            };
            if dst.len() > bytes.len() {
                return 1;
            }
            dst.copy_from_slice(&bytes[..dst.len()]);
            0
        }
    }

    #[derive(Debug)]
    struct TestBackend;

    impl ElementwiseKernels for TestBackend {}

    impl DeviceBackend for TestBackend {
        fn name(&self) -> &str {
            "test"
        }

        fn alloc_empty(
            &self,
            dims: &[i64],
            dtype: DLDataType,
            device: DLDevice,
        ) -> Result<Arc<dyn DeviceBuffer>> {
            if device.device_type != DeviceKind::Cpu as i32 || device.device_id != 0 {
                return Err(ArrayError::Allocation {
                    device: format!("{}:{}", device.device_type, device.device_id),
                    reason: "unsupported device".to_string(),
                });
            }
            let mut len = dtype.element_bytes();
            for &d in dims {
                if d < 0 {
                    return Err(ArrayError::Allocation {
                        device: "test".to_string(),
                        reason: format!("negative dimension {}", d),
                    });
                }
                len *= d as usize;
            }
            Ok(Arc::new(TestBuffer {
                bytes: Mutex::new(vec![0; len]),
            }))
        }
    }

    fn backend() -> Arc<dyn DeviceBackend> {
        Arc::new(TestBackend)
    }

    #[test]
    fn test_metadata_round_trip() {
        let a = NDArray::empty(
            Shape::new(vec![2, 3]),
            DType::F32,
            Context::cpu(0),
            backend(),
        )
        .unwrap();
        assert_eq!(a.shape().dims(), &[2, 3]);
        assert_eq!(a.dtype(), DType::F32);
        assert_eq!(a.context(), Context::cpu(0));
        assert_eq!(a.byte_len(), 24);
    }

    #[test]
    fn test_scalar_allocation() {
        let a = NDArray::empty(Shape::scalar(), DType::I32, Context::cpu(0), backend()).unwrap();
        assert_eq!(a.byte_len(), 4);
    }

    #[test]
    fn test_alloc_failure_propagates() {
        let err = NDArray::empty(
            Shape::new(vec![2]),
            DType::F32,
            Context::cpu(7),
            backend(),
        )
        .unwrap_err();
        assert!(matches!(err, ArrayError::Allocation { .. }));
    }

    #[test]
    fn test_copy_round_trip() {
        let a = NDArray::empty(Shape::new(vec![4]), DType::U8, Context::cpu(0), backend()).unwrap();
        a.copy_from_cpu(&[1, 2, 3, 4]).unwrap();
        let mut out = [0u8; 4];
        a.copy_to_cpu(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn test_oversized_copy_reports_status() {
        let a = NDArray::empty(Shape::new(vec![2]), DType::U8, Context::cpu(0), backend()).unwrap();
        let err = a.copy_from_cpu(&[0u8; 3]).unwrap_err();
        assert_ne!(err.transfer_status().unwrap(), 0);

        let mut out = [0u8; 3];
        let err = a.copy_to_cpu(&mut out).unwrap_err();
        assert_ne!(err.transfer_status().unwrap(), 0);
    }

    #[test]
    fn test_cloned_handles_share_buffer() {
        let a = NDArray::empty(Shape::new(vec![2]), DType::U8, Context::cpu(0), backend()).unwrap();
        let b = a.clone();
        assert!(a.shares_buffer(&b));

        a.copy_from_cpu(&[7, 9]).unwrap();
        let mut out = [0u8; 2];
        b.copy_to_cpu(&mut out).unwrap();
        assert_eq!(out, [7, 9]);
    }

    #[test]
    fn test_arithmetic_defaults_to_unimplemented() {
        let a = NDArray::empty(Shape::new(vec![2]), DType::F32, Context::cpu(0), backend()).unwrap();
        let b = a.clone();
        assert!(matches!(
            a.add(&b),
            Err(ArrayError::Unimplemented { op: "add" })
        ));
        assert!(matches!(
            (&a % &b),
            Err(ArrayError::Unimplemented { op: "rem" })
        ));
        assert!(matches!(
            a.pow(&b),
            Err(ArrayError::Unimplemented { op: "pow" })
        ));
    }
}
