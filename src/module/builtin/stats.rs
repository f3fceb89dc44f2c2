//! Aggregate statistics operations over numeric sequences.

use serde_json::Value;

use crate::error::OperationError;
use crate::module::{finite_number, numbers_arg, FnOperation, StaticModule};

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (n - 1 denominator). Zero for fewer than two samples.
pub fn variance(data: &[f64]) -> f64 {
    if data.len() < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter()
        .map(|value| {
            let diff = value - m;
            diff * diff
        })
        .sum::<f64>()
        / (data.len() - 1) as f64
}

/// Sample standard deviation.
pub fn standard_deviation(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Median value. Returns NaN for an empty slice.
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Dot product of two equal-length sequences.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

// ── operation glue ──────────────────────────────────────────────────
//
// JSON numbers cannot carry NaN, so the glue rejects empty input up front
// instead of forwarding the NaN the plain functions produce.

fn non_empty(operation: &str, data: Vec<f64>) -> Result<Vec<f64>, OperationError> {
    if data.is_empty() {
        return Err(OperationError::InvalidArguments {
            name: operation.to_string(),
            reason: "expected a non-empty array of numbers".to_string(),
        });
    }
    Ok(data)
}

fn op_sum(args: &[Value]) -> Result<Value, OperationError> {
    let data = numbers_arg("sum", args, 0)?;
    finite_number("sum", data.iter().sum())
}

fn op_mean(args: &[Value]) -> Result<Value, OperationError> {
    let data = non_empty("mean", numbers_arg("mean", args, 0)?)?;
    finite_number("mean", mean(&data))
}

fn op_median(args: &[Value]) -> Result<Value, OperationError> {
    let data = non_empty("median", numbers_arg("median", args, 0)?)?;
    finite_number("median", median(&data))
}

fn op_variance(args: &[Value]) -> Result<Value, OperationError> {
    let data = non_empty("variance", numbers_arg("variance", args, 0)?)?;
    finite_number("variance", variance(&data))
}

fn op_standard_deviation(args: &[Value]) -> Result<Value, OperationError> {
    let data = non_empty(
        "standard_deviation",
        numbers_arg("standard_deviation", args, 0)?,
    )?;
    finite_number("standard_deviation", standard_deviation(&data))
}

fn op_min(args: &[Value]) -> Result<Value, OperationError> {
    let data = non_empty("min", numbers_arg("min", args, 0)?)?;
    finite_number("min", data.iter().copied().fold(f64::INFINITY, f64::min))
}

fn op_max(args: &[Value]) -> Result<Value, OperationError> {
    let data = non_empty("max", numbers_arg("max", args, 0)?)?;
    finite_number(
        "max",
        data.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    )
}

fn op_dot(args: &[Value]) -> Result<Value, OperationError> {
    let a = numbers_arg("dot", args, 0)?;
    let b = numbers_arg("dot", args, 1)?;
    if a.len() != b.len() {
        return Err(OperationError::InvalidArguments {
            name: "dot".to_string(),
            reason: format!("sequence lengths differ ({} vs {})", a.len(), b.len()),
        });
    }
    finite_number("dot", dot(&a, &b))
}

/// Add the statistics operations to a module.
pub(crate) fn register(module: StaticModule) -> StaticModule {
    module
        .register(FnOperation::new("sum", op_sum))
        .register(FnOperation::new("mean", op_mean))
        .register(FnOperation::new("median", op_median))
        .register(FnOperation::new("variance", op_variance))
        .register(FnOperation::new("standard_deviation", op_standard_deviation))
        .register(FnOperation::new("min", op_min))
        .register(FnOperation::new("max", op_max))
        .register(FnOperation::new("dot", op_dot))
}
