//! `nda-cpu` - Reference host-memory backend for `nda-core` array handles.
//!
//! Allocates buffers in plain host memory and implements the elementwise
//! kernel extension points for `float32` and `float16` elements. Intended
//! as the reference implementation and as the allocation path for staging
//! data destined for accelerator backends.

pub mod kernels;

use std::sync::{Arc, Mutex};

use nda_core::backend::{DeviceBackend, DeviceBuffer};
use nda_core::dlpack::{DLDataType, DLDevice, DeviceKind};
use nda_core::error::{ArrayError, Result};

/// Transfer succeeded.
pub const STATUS_OK: i32 = 0;
/// Requested byte count exceeds the allocation.
pub const STATUS_SIZE_MISMATCH: i32 = 1;
/// The buffer lock was poisoned by a panicking writer.
pub const STATUS_POISONED: i32 = 2;

/// A host-memory allocation.
///
/// Contents sit behind a `Mutex` because one buffer may be referenced by
/// several handles; the lock keeps concurrent transfers memory-safe but
/// provides no ordering between them.
#[derive(Debug)]
pub struct HostBuffer {
    len: usize,
    bytes: Mutex<Vec<u8>>,
}

impl HostBuffer {
    fn with_len(len: usize) -> Self {
        HostBuffer {
            len,
            bytes: Mutex::new(vec![0; len]),
        }
    }
}

impl DeviceBuffer for HostBuffer {
    fn byte_len(&self) -> usize {
        self.len
    }

    fn copy_from_host(&self, src: &[u8]) -> i32 {
        if src.len() > self.len {
            return STATUS_SIZE_MISMATCH;
        }
        let Ok(mut bytes) = self.bytes.lock() else {
            return STATUS_POISONED;
        };
        bytes[..src.len()].copy_from_slice(src);
        STATUS_OK
    }

    fn copy_to_host(&self, dst: &mut [u8]) -> i32 {
        if dst.len() > self.len {
            return STATUS_SIZE_MISMATCH;
        }
        let Ok(bytes) = self.bytes.lock() else {
            return STATUS_POISONED;
        };
        dst.copy_from_slice(&bytes[..dst.len()]);
        STATUS_OK
    }
}

/// Pure-Rust host-memory backend.
///
/// Serves only `cpu:0`; any other device kind or index is rejected at
/// allocation time. Buffer size is the dimension product times the
/// element byte size, where the empty product is one (a scalar occupies
/// exactly one element).
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn buffer_len(dims: &[i64], dtype: DLDataType) -> std::result::Result<usize, String> {
    let mut len = dtype.element_bytes();
    for &d in dims {
        if d < 0 {
            return Err(format!("negative dimension {}", d));
        }
        len = len
            .checked_mul(d as usize)
            .ok_or_else(|| "buffer size overflows usize".to_string())?;
    }
    Ok(len)
}

impl DeviceBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn alloc_empty(
        &self,
        dims: &[i64],
        dtype: DLDataType,
        device: DLDevice,
    ) -> Result<Arc<dyn DeviceBuffer>> {
        let device_label = format!("{}:{}", device.device_type, device.device_id);
        if device.device_type != DeviceKind::Cpu as i32 {
            return Err(ArrayError::Allocation {
                device: device_label,
                reason: "device kind not served by the cpu backend".to_string(),
            });
        }
        if device.device_id != 0 {
            return Err(ArrayError::Allocation {
                device: device_label,
                reason: "no such cpu device index".to_string(),
            });
        }
        let len = buffer_len(dims, dtype).map_err(|reason| ArrayError::Allocation {
            device: device_label,
            reason,
        })?;
        tracing::debug!(bytes = len, ?dims, "allocated host buffer");
        Ok(Arc::new(HostBuffer::with_len(len)))
    }
}
