//! Test modules for the Lanai RPC server.
//!
//! Unit tests live next to the code they cover; this module holds suites that
//! cut across modules plus shared fixtures:
//! - Configuration loading and layering
//! - Crate-level error conversions
//! - Registry/processor properties over generated method names


// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{jsonrpc_method_strategy, TestFixture};
