// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Setup helpers for populating a [`MethodRegistry`].

use crate::protocol::jsonrpc::methods::{register_arithmetic_methods, register_system_methods};
use crate::protocol::jsonrpc::registry::MethodRegistry;

/// Registers all built-in demonstration methods.
///
/// Should be called once, before the registry is handed to a server.
pub fn register_standard_methods(registry: &mut MethodRegistry) {
    register_arithmetic_methods(registry);
    register_system_methods(registry);
}

/// Creates a registry with every built-in method registered.
pub fn create_registry() -> MethodRegistry {
    let mut registry = MethodRegistry::new();
    register_standard_methods(&mut registry);
    registry
}
