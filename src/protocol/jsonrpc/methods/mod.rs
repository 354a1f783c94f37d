// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Built-in demonstration methods served by the `lanai_rpc` binary.
//!
//! Applications embedding the library register their own methods instead.

pub mod arithmetic;
pub mod system;

// Re-exports
pub use arithmetic::register_arithmetic_methods;
pub use system::register_system_methods;
