// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Integer arithmetic methods.

use anyhow::{bail, Context};
use serde_json::json;

use crate::protocol::jsonrpc::handler::{Arguments, HandlerResult};
use crate::protocol::jsonrpc::registry::MethodRegistry;

/// `subtract(minuend, subtrahend)`
pub fn subtract(args: Arguments) -> HandlerResult {
    let minuend: i64 = args.param("minuend")?;
    let subtrahend: i64 = args.param("subtrahend")?;
    let difference = minuend
        .checked_sub(subtrahend)
        .context("integer overflow")?;
    Ok(json!(difference))
}

/// `divide(dividend, divisor)`, integer division.
pub fn divide(args: Arguments) -> HandlerResult {
    let dividend: i64 = args.param("dividend")?;
    let divisor: i64 = args.param("divisor")?;
    if divisor == 0 {
        bail!("division by zero");
    }
    let quotient = dividend.checked_div(divisor).context("integer overflow")?;
    Ok(json!(quotient))
}

/// Registers `subtract` and `divide`.
pub fn register_arithmetic_methods(registry: &mut MethodRegistry) {
    registry.register_fn("subtract", ["minuend", "subtrahend"], subtract);
    registry.register_fn("divide", ["dividend", "divisor"], divide);
}
