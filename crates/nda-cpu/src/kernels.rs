//! Elementwise kernels for host-memory arrays.
//!
//! Supports one-lane `float32` natively and one-lane `float16` through the
//! `half` crate (computed in f32, stored back as f16). Everything runs on
//! top of the public transfer API: read both operands out, compute, write
//! the result into a freshly allocated array.

use half::f16;

use nda_core::backend::ElementwiseKernels;
use nda_core::dlpack::DTypeCode;
use nda_core::error::{ArrayError, Result};
use nda_core::NDArray;

use crate::CpuBackend;

impl ElementwiseKernels for CpuBackend {
    fn add(&self, lhs: &NDArray, rhs: &NDArray) -> Result<NDArray> {
        binary("add", lhs, rhs, |a, b| a + b)
    }

    fn sub(&self, lhs: &NDArray, rhs: &NDArray) -> Result<NDArray> {
        binary("sub", lhs, rhs, |a, b| a - b)
    }

    fn mul(&self, lhs: &NDArray, rhs: &NDArray) -> Result<NDArray> {
        binary("mul", lhs, rhs, |a, b| a * b)
    }

    fn div(&self, lhs: &NDArray, rhs: &NDArray) -> Result<NDArray> {
        binary("div", lhs, rhs, |a, b| a / b)
    }

    fn rem(&self, lhs: &NDArray, rhs: &NDArray) -> Result<NDArray> {
        binary("rem", lhs, rhs, |a, b| a % b)
    }

    fn pow(&self, lhs: &NDArray, rhs: &NDArray) -> Result<NDArray> {
        binary("pow", lhs, rhs, |a, b| a.powf(b))
    }
}

/// Operand compatibility checks shared by all kernels. Operands must agree
/// on shape, dtype, and context; broadcasting is not supported here.
fn check_operands(lhs: &NDArray, rhs: &NDArray) -> Result<()> {
    if lhs.shape() != rhs.shape() {
        return Err(ArrayError::ShapeMismatch {
            lhs: lhs.shape().dims().to_vec(),
            rhs: rhs.shape().dims().to_vec(),
        });
    }
    if lhs.dtype() != rhs.dtype() {
        return Err(ArrayError::DTypeMismatch {
            lhs: lhs.dtype().to_string(),
            rhs: rhs.dtype().to_string(),
        });
    }
    if lhs.context() != rhs.context() {
        return Err(ArrayError::ContextMismatch {
            lhs: lhs.context().to_string(),
            rhs: rhs.context().to_string(),
        });
    }
    Ok(())
}

fn binary(
    op: &'static str,
    lhs: &NDArray,
    rhs: &NDArray,
    f: impl Fn(f32, f32) -> f32,
) -> Result<NDArray> {
    check_operands(lhs, rhs)?;
    tracing::trace!(op, shape = %lhs.shape(), dtype = %lhs.dtype(), "dispatching kernel");

    let dtype = lhs.dtype();
    match (dtype.code(), dtype.bits(), dtype.lanes()) {
        (DTypeCode::Float, 32, 1) => binary_f32(lhs, rhs, f),
        (DTypeCode::Float, 16, 1) => binary_f16(lhs, rhs, f),
        _ => Err(ArrayError::UnsupportedDType {
            op,
            dtype: dtype.to_string(),
        }),
    }
}

fn read_bytes(array: &NDArray) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; array.byte_len()];
    array.copy_to_cpu(&mut bytes)?;
    Ok(bytes)
}

fn fresh_like(array: &NDArray) -> Result<NDArray> {
    NDArray::empty(
        array.shape().clone(),
        array.dtype(),
        array.context(),
        array.backend(),
    )
}

fn binary_f32(lhs: &NDArray, rhs: &NDArray, f: impl Fn(f32, f32) -> f32) -> Result<NDArray> {
    let a = read_bytes(lhs)?;
    let b = read_bytes(rhs)?;

    let out: Vec<u8> = a
        .chunks_exact(4)
        .zip(b.chunks_exact(4))
        .flat_map(|(x, y)| {
            let x = f32::from_ne_bytes([x[0], x[1], x[2], x[3]]);
            let y = f32::from_ne_bytes([y[0], y[1], y[2], y[3]]);
            f(x, y).to_ne_bytes()
        })
        .collect();

    let result = fresh_like(lhs)?;
    result.copy_from_cpu(&out)?;
    Ok(result)
}

fn binary_f16(lhs: &NDArray, rhs: &NDArray, f: impl Fn(f32, f32) -> f32) -> Result<NDArray> {
    let a = read_bytes(lhs)?;
    let b = read_bytes(rhs)?;

    let out: Vec<u8> = a
        .chunks_exact(2)
        .zip(b.chunks_exact(2))
        .flat_map(|(x, y)| {
            let x = f16::from_bits(u16::from_ne_bytes([x[0], x[1]]));
            let y = f16::from_bits(u16::from_ne_bytes([y[0], y[1]]));
            f16::from_f32(f(x.to_f32(), y.to_f32())).to_bits().to_ne_bytes()
        })
        .collect();

    let result = fresh_like(lhs)?;
    result.copy_from_cpu(&out)?;
    Ok(result)
}
