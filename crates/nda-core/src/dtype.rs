use crate::dlpack::{DLDataType, DTypeCode};
use std::fmt;

/// An element type descriptor: category, bit width, and vector lane count.
///
/// No range validation is performed; any bits/lanes combination is accepted
/// here and forwarded to the backend as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    code: DTypeCode,
    bits: u8,
    lanes: u16,
}

impl DType {
    /// 32-bit float, one lane.
    pub const F32: DType = DType::new(DTypeCode::Float, 32, 1);
    /// 16-bit float, one lane.
    pub const F16: DType = DType::new(DTypeCode::Float, 16, 1);
    /// 32-bit signed integer, one lane.
    pub const I32: DType = DType::new(DTypeCode::Int, 32, 1);
    /// 64-bit signed integer, one lane.
    pub const I64: DType = DType::new(DTypeCode::Int, 64, 1);
    /// 8-bit unsigned integer, one lane.
    pub const U8: DType = DType::new(DTypeCode::UInt, 8, 1);

    /// Create a new dtype from a category code, bit width, and lane count.
    pub const fn new(code: DTypeCode, bits: u8, lanes: u16) -> Self {
        DType { code, bits, lanes }
    }

    /// Returns the type category code.
    pub fn code(&self) -> DTypeCode {
        self.code
    }

    /// Returns the bits per lane.
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns the vector lane count.
    pub fn lanes(&self) -> u16 {
        self.lanes
    }

    /// Converts to the interchange representation handed to the backend,
    /// narrowing the category enum to its ABI code.
    pub fn to_dlpack(&self) -> DLDataType {
        DLDataType {
            code: self.code as u8,
            bits: self.bits,
            lanes: self.lanes,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lanes == 1 {
            write!(f, "{}{}", self.code, self.bits)
        } else {
            write!(f, "{}{}x{}", self.code, self.bits, self.lanes)
        }
    }
}
