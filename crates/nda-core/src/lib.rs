//! `nda-core` - N-dimensional array handles over a DLPack-style device runtime.
//!
//! This crate provides:
//! - An `NDArray` handle that binds shape, dtype, and device metadata to a
//!   shared, backend-allocated buffer
//! - `Shape`, `DType`, and `Context` value types describing an array
//! - The DLPack-style interchange structs exchanged with a backend
//! - `DeviceBackend` / `ElementwiseKernels` traits for pluggable backends

pub mod array;
pub mod backend;
pub mod context;
pub mod dlpack;
pub mod dtype;
pub mod error;
pub mod shape;

// Re-export primary types at the crate root for convenience.
pub use array::NDArray;
pub use backend::{DeviceBackend, DeviceBuffer, ElementwiseKernels};
pub use context::Context;
pub use dlpack::{DLDataType, DLDevice, DTypeCode, DeviceKind};
pub use dtype::DType;
pub use error::{ArrayError, Result};
pub use shape::Shape;
