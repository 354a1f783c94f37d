// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Method registry.
//!
//! Maps method names to their handler and declared parameter names. The
//! registry is filled before serving starts and then shared read-only
//! (behind an `Arc`) by every connection.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::handler::{Arguments, AsyncHandler, HandlerResult, MethodHandler, SyncHandler};

/// A registered method. Immutable once created.
#[derive(Clone)]
pub struct MethodEntry {
    handler: Arc<dyn MethodHandler>,
    param_names: Arc<[String]>,
    asynchronous: bool,
}

impl MethodEntry {
    /// The method's handler.
    pub fn handler(&self) -> &dyn MethodHandler {
        self.handler.as_ref()
    }

    /// Declared parameter names, in positional order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Shared handle to the declared names, used when binding arguments.
    pub(crate) fn shared_param_names(&self) -> Arc<[String]> {
        Arc::clone(&self.param_names)
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.param_names.len()
    }

    /// Whether invoking this method may yield a pending result.
    pub fn is_async(&self) -> bool {
        self.asynchronous
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("param_names", &self.param_names)
            .field("asynchronous", &self.asynchronous)
            .finish_non_exhaustive()
    }
}

/// Name to [`MethodEntry`] mapping.
#[derive(Default, Clone, Debug)]
pub struct MethodRegistry {
    methods: HashMap<String, MethodEntry>,
}

impl MethodRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under `name`, replacing any previous entry.
    ///
    /// The declared names are authoritative: they define both the arity and
    /// the key set accepted for named params. Nothing is checked against the
    /// handler itself.
    pub fn register<H, I, S>(&mut self, name: impl Into<String>, handler: H, param_names: I)
    where
        H: MethodHandler + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let entry = MethodEntry {
            asynchronous: handler.is_async(),
            handler: Arc::new(handler),
            param_names: param_names.into_iter().map(Into::into).collect(),
        };

        debug!(
            method = %name,
            params = ?entry.param_names,
            asynchronous = entry.asynchronous,
            "Registering method"
        );
        if self.methods.insert(name.clone(), entry).is_some() {
            warn!(method = %name, "Method was already registered, overwriting");
        }
    }

    /// Registers a synchronous closure.
    pub fn register_fn<F, I, S>(&mut self, name: impl Into<String>, param_names: I, func: F)
    where
        F: Fn(Arguments) -> HandlerResult + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(name, SyncHandler(func), param_names);
    }

    /// Registers a closure returning a future.
    pub fn register_async<F, Fut, I, S>(&mut self, name: impl Into<String>, param_names: I, func: F)
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(name, AsyncHandler(func), param_names);
    }

    /// Looks up a method by name.
    pub fn lookup(&self, name: &str) -> Option<&MethodEntry> {
        self.methods.get(name)
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered method names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
