//! Scalar arithmetic operations.

use serde_json::Value;

use crate::error::OperationError;
use crate::module::{finite_number, number_arg, FnOperation, StaticModule};

/// Clamp a value to the `[min, max]` range.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation between `a` and `b` by factor `t`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Euclidean distance between two 2D points.
pub fn distance_2d(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
}

/// Round a value to `decimals` fractional digits.
pub fn round_to_precision(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ── operation glue ──────────────────────────────────────────────────

fn op_add(args: &[Value]) -> Result<Value, OperationError> {
    let a = number_arg("add", args, 0)?;
    let b = number_arg("add", args, 1)?;
    finite_number("add", a + b)
}

fn op_sub(args: &[Value]) -> Result<Value, OperationError> {
    let a = number_arg("sub", args, 0)?;
    let b = number_arg("sub", args, 1)?;
    finite_number("sub", a - b)
}

fn op_mul(args: &[Value]) -> Result<Value, OperationError> {
    let a = number_arg("mul", args, 0)?;
    let b = number_arg("mul", args, 1)?;
    finite_number("mul", a * b)
}

fn op_div(args: &[Value]) -> Result<Value, OperationError> {
    let a = number_arg("div", args, 0)?;
    let b = number_arg("div", args, 1)?;
    if b == 0.0 {
        return Err(OperationError::Failed {
            name: "div".to_string(),
            reason: "division by zero".to_string(),
        });
    }
    finite_number("div", a / b)
}

fn op_identity(args: &[Value]) -> Result<Value, OperationError> {
    args.first()
        .cloned()
        .ok_or_else(|| OperationError::InvalidArguments {
            name: "identity".to_string(),
            reason: "expected one argument".to_string(),
        })
}

fn op_clamp(args: &[Value]) -> Result<Value, OperationError> {
    let value = number_arg("clamp", args, 0)?;
    let min = number_arg("clamp", args, 1)?;
    let max = number_arg("clamp", args, 2)?;
    finite_number("clamp", clamp(value, min, max))
}

fn op_lerp(args: &[Value]) -> Result<Value, OperationError> {
    let a = number_arg("lerp", args, 0)?;
    let b = number_arg("lerp", args, 1)?;
    let t = number_arg("lerp", args, 2)?;
    finite_number("lerp", lerp(a, b, t))
}

fn op_distance_2d(args: &[Value]) -> Result<Value, OperationError> {
    let x1 = number_arg("distance2d", args, 0)?;
    let y1 = number_arg("distance2d", args, 1)?;
    let x2 = number_arg("distance2d", args, 2)?;
    let y2 = number_arg("distance2d", args, 3)?;
    finite_number("distance2d", distance_2d(x1, y1, x2, y2))
}

fn op_round_to_precision(args: &[Value]) -> Result<Value, OperationError> {
    let value = number_arg("round_to_precision", args, 0)?;
    let decimals = number_arg("round_to_precision", args, 1)?;
    if decimals < 0.0 || decimals.fract() != 0.0 {
        return Err(OperationError::InvalidArguments {
            name: "round_to_precision".to_string(),
            reason: "decimals must be a non-negative integer".to_string(),
        });
    }
    finite_number(
        "round_to_precision",
        round_to_precision(value, decimals as u32),
    )
}

/// Add the arithmetic operations to a module.
pub(crate) fn register(module: StaticModule) -> StaticModule {
    module
        .register(FnOperation::new("add", op_add))
        .register(FnOperation::new("sub", op_sub))
        .register(FnOperation::new("mul", op_mul))
        .register(FnOperation::new("div", op_div))
        .register(FnOperation::new("identity", op_identity))
        .register(FnOperation::new("clamp", op_clamp))
        .register(FnOperation::new("lerp", op_lerp))
        .register(FnOperation::new("distance2d", op_distance_2d))
        .register(FnOperation::new("round_to_precision", op_round_to_precision))
}
