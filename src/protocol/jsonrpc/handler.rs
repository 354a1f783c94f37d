// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Method handler abstraction.
//!
//! Application methods are opaque callables. A call either completes on the
//! spot ([`Invocation::Ready`]) or hands back a future ([`Invocation::Pending`])
//! that the request processor awaits before answering. Plain closures are
//! adapted with [`SyncHandler`] and [`AsyncHandler`].

use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use futures::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::ParamsMode;

/// Type alias for method handler results.
///
/// Any `Err` is reported to the client as a server error whose `data` is the
/// error's display chain.
pub type HandlerResult = anyhow::Result<Value>;

/// Outcome of invoking a handler.
pub enum Invocation {
    /// The handler finished synchronously
    Ready(HandlerResult),

    /// The handler returned a computation that must be awaited
    Pending(BoxFuture<'static, HandlerResult>),
}

impl Invocation {
    /// Returns true if this invocation still has to be awaited.
    pub fn is_pending(&self) -> bool {
        matches!(self, Invocation::Pending(_))
    }

    /// Resolves the invocation, awaiting it if pending.
    pub async fn resolve(self) -> HandlerResult {
        match self {
            Invocation::Ready(result) => result,
            Invocation::Pending(future) => future.await,
        }
    }
}

/// Trait for method handlers to implement.
pub trait MethodHandler: Send + Sync {
    /// Invokes the method with already-validated arguments.
    fn invoke(&self, args: Arguments) -> Invocation;

    /// Whether [`MethodHandler::invoke`] may return [`Invocation::Pending`].
    fn is_async(&self) -> bool {
        false
    }
}

/// Adapter for synchronous closures.
pub struct SyncHandler<F>(pub F);

impl<F> MethodHandler for SyncHandler<F>
where
    F: Fn(Arguments) -> HandlerResult + Send + Sync,
{
    fn invoke(&self, args: Arguments) -> Invocation {
        Invocation::Ready((self.0)(args))
    }
}

/// Adapter for closures returning a future.
pub struct AsyncHandler<F>(pub F);

impl<F, Fut> MethodHandler for AsyncHandler<F>
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn invoke(&self, args: Arguments) -> Invocation {
        Invocation::Pending((self.0)(args).boxed())
    }

    fn is_async(&self) -> bool {
        true
    }
}

/// Arguments bound to a method's declared parameter names.
///
/// Values can be read by declared position or by name no matter how the
/// client sent them, so a handler sees the same thing for
/// `"params": [42, 23]` and `"params": {"minuend": 42, "subtrahend": 23}`.
#[derive(Debug, Clone)]
pub struct Arguments {
    names: Arc<[String]>,
    params: ParamsMode,
}

impl Arguments {
    /// Binds supplied params to the declared names.
    ///
    /// Callers are expected to have checked arity and key set already.
    pub fn new(names: Arc<[String]>, params: ParamsMode) -> Self {
        Self { names, params }
    }

    /// Declared parameter names, in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The binding mode the client used.
    pub fn mode(&self) -> &ParamsMode {
        &self.params
    }

    /// Number of bound arguments.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns true when the method was called without arguments.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Argument at a declared position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match &self.params {
            ParamsMode::Absent => None,
            ParamsMode::Positional(values) => values.get(index),
            ParamsMode::Named(map) => self.names.get(index).and_then(|name| map.get(name)),
        }
    }

    /// Argument bound to a declared name.
    pub fn named(&self, name: &str) -> Option<&Value> {
        match &self.params {
            ParamsMode::Absent => None,
            ParamsMode::Named(map) => map.get(name),
            ParamsMode::Positional(values) => self
                .names
                .iter()
                .position(|declared| declared == name)
                .and_then(|index| values.get(index)),
        }
    }

    /// Deserializes the argument bound to `name`.
    ///
    /// Argument types are not checked by the protocol layer; a mismatch here
    /// surfaces as a handler failure.
    pub fn param<T: DeserializeOwned>(&self, name: &str) -> anyhow::Result<T> {
        let value = self
            .named(name)
            .ok_or_else(|| anyhow!("missing argument '{name}'"))?;
        serde_json::from_value(value.clone())
            .with_context(|| format!("argument '{name}' has the wrong type"))
    }

    /// Arguments in declared order.
    pub fn into_positional(self) -> Vec<Value> {
        match self.params {
            ParamsMode::Absent => Vec::new(),
            ParamsMode::Positional(values) => values,
            ParamsMode::Named(mut map) => self
                .names
                .iter()
                .filter_map(|name| map.remove(name))
                .collect(),
        }
    }
}
