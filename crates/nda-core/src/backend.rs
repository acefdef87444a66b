use std::fmt::Debug;
use std::sync::Arc;

use crate::array::NDArray;
use crate::dlpack::{DLDataType, DLDevice};
use crate::error::{ArrayError, Result};

/// A backend-owned device allocation.
///
/// Buffers are handed out behind `Arc`, so one allocation may be referenced
/// by any number of array handles; the backing memory is released when the
/// last reference drops. Transfer methods take `&self` for that reason —
/// implementations provide their own interior mutability.
///
/// Transfer methods return a raw backend status code: zero for success,
/// nonzero for a backend-reported failure (size mismatch, device
/// unreachable, ...). The code is surfaced to callers verbatim.
pub trait DeviceBuffer: Send + Sync + Debug {
    /// The true allocated size of this buffer in bytes.
    fn byte_len(&self) -> usize;

    /// Copy `src.len()` bytes from host memory into the buffer.
    ///
    /// The length is not validated here; a request exceeding `byte_len()`
    /// must leave the buffer untouched and return a nonzero status.
    fn copy_from_host(&self, src: &[u8]) -> i32;

    /// Copy `dst.len()` bytes from the buffer into host memory.
    fn copy_to_host(&self, dst: &mut [u8]) -> i32;
}

/// Elementwise numeric kernels for a backend.
///
/// This is the arithmetic extension point: the handle layer declares the
/// signatures and the ownership contract (a fresh `NDArray` is returned,
/// neither operand is mutated) but implements no numeric loops itself.
/// Every operation defaults to an `Unimplemented` error so that a backend
/// may provide any subset. Operand compatibility checks (shape, dtype,
/// device) are the implementation's responsibility.
pub trait ElementwiseKernels {
    /// Elementwise addition.
    fn add(&self, _lhs: &NDArray, _rhs: &NDArray) -> Result<NDArray> {
        Err(ArrayError::Unimplemented { op: "add" })
    }

    /// Elementwise subtraction.
    fn sub(&self, _lhs: &NDArray, _rhs: &NDArray) -> Result<NDArray> {
        Err(ArrayError::Unimplemented { op: "sub" })
    }

    /// Elementwise multiplication.
    fn mul(&self, _lhs: &NDArray, _rhs: &NDArray) -> Result<NDArray> {
        Err(ArrayError::Unimplemented { op: "mul" })
    }

    /// Elementwise division.
    fn div(&self, _lhs: &NDArray, _rhs: &NDArray) -> Result<NDArray> {
        Err(ArrayError::Unimplemented { op: "div" })
    }

    /// Elementwise remainder.
    fn rem(&self, _lhs: &NDArray, _rhs: &NDArray) -> Result<NDArray> {
        Err(ArrayError::Unimplemented { op: "rem" })
    }

    /// Elementwise exponentiation (`lhs` raised to `rhs`).
    fn pow(&self, _lhs: &NDArray, _rhs: &NDArray) -> Result<NDArray> {
        Err(ArrayError::Unimplemented { op: "pow" })
    }
}

/// Trait for pluggable device backends (CPU, Metal, CUDA, etc.).
///
/// A backend owns allocation for the devices it serves and supplies the
/// elementwise kernels for arrays it allocated. All calls are synchronous
/// and may block while the backend performs allocation or transfer.
pub trait DeviceBackend: ElementwiseKernels + Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu", "metal").
    fn name(&self) -> &str;

    /// Allocate an empty buffer with undefined contents, sized from the
    /// dimension sequence and element type, on the given device.
    ///
    /// # Errors
    /// Fails when the device is unknown to this backend, the device index
    /// does not exist, the size cannot be computed (negative dimensions,
    /// overflow), or the device is out of memory. The backend's own failure
    /// reason is propagated unchanged.
    fn alloc_empty(
        &self,
        dims: &[i64],
        dtype: DLDataType,
        device: DLDevice,
    ) -> Result<Arc<dyn DeviceBuffer>>;
}
