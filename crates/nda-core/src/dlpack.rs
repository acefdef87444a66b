//! DLPack-style interchange types exchanged with the device runtime.
//!
//! The numeric codes and struct layouts are fixed by the external ABI and
//! must match the DLPack header definitions exactly:
//! <https://github.com/dmlc/dlpack/blob/main/include/dlpack/dlpack.h>

use std::fmt;

/// Device type codes as defined by the external ABI.
///
/// This is a closed set; the discriminants are part of a versioned contract
/// and must not be renumbered.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Host CPU.
    Cpu = 1,
    /// CUDA GPU.
    Gpu = 2,
    /// Page-locked host memory accessible to the GPU.
    CpuPinned = 3,
    /// OpenCL device.
    OpenCl = 4,
    /// Metal device (Apple).
    Metal = 8,
    /// NVIDIA VPI.
    Vpi = 9,
    /// ROCm device (AMD).
    Rocm = 10,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Cpu => write!(f, "cpu"),
            DeviceKind::Gpu => write!(f, "gpu"),
            DeviceKind::CpuPinned => write!(f, "cpu_pinned"),
            DeviceKind::OpenCl => write!(f, "opencl"),
            DeviceKind::Metal => write!(f, "metal"),
            DeviceKind::Vpi => write!(f, "vpi"),
            DeviceKind::Rocm => write!(f, "rocm"),
        }
    }
}

/// Element type category codes as defined by the external ABI.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DTypeCode {
    /// Signed integer.
    Int = 0,
    /// Unsigned integer.
    UInt = 1,
    /// Floating point.
    Float = 2,
}

impl fmt::Display for DTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DTypeCode::Int => write!(f, "int"),
            DTypeCode::UInt => write!(f, "uint"),
            DTypeCode::Float => write!(f, "float"),
        }
    }
}

/// Device descriptor handed to the backend.
///
/// Corresponds to `DLDevice`: which kind of device, and which device of
/// that kind. The index is uninterpreted here; a request for a device that
/// does not exist surfaces as a backend allocation or transfer failure.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DLDevice {
    /// Device type code (a `DeviceKind` discriminant).
    pub device_type: i32,
    /// Which device of this type.
    pub device_id: i32,
}

/// Element type descriptor handed to the backend.
///
/// Corresponds to `DLDataType`: category code, bit width, and vector lane
/// count. Any bits/lanes combination is forwarded verbatim; meaningful
/// values are the caller's responsibility.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DLDataType {
    /// Type category code (a `DTypeCode` discriminant).
    pub code: u8,
    /// Bits per lane.
    pub bits: u8,
    /// Vector lanes per logical element.
    pub lanes: u16,
}

impl DLDataType {
    /// Size in bytes of one logical element, rounded up to whole bytes.
    pub fn element_bytes(&self) -> usize {
        (self.bits as usize * self.lanes as usize).div_ceil(8)
    }
}
