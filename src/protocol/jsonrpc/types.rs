// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Types for the JSON-RPC 2.0 protocol.
//!
//! Request ids are kept as raw [`serde_json::Value`]s so they are echoed back
//! with their original JSON type. The distinction that matters is whether the
//! `id` member was present at all, hence `Option<Value>` everywhere.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version tag every request must carry.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC 2.0 request object, as a client would send it.
///
/// The server never deserializes into this type (validation walks the raw
/// JSON value so every failure point can be classified); it exists for
/// clients, tools and tests that need to produce well-formed lines.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// JSON-RPC protocol version, always "2.0"
    pub jsonrpc: String,

    /// Name of the method to be invoked
    pub method: String,

    /// Method parameters, positional (array) or named (object)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request identifier; `None` makes this a notification
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Request {
    /// Creates a new JSON-RPC 2.0 request.
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Creates a new JSON-RPC notification (no id).
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::new(method, params, None)
    }

    /// Returns true if this request is a notification (no id).
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Serializes the request as one line of JSON text (without the terminator).
    pub fn to_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A successful JSON-RPC 2.0 response: `{"jsonrpc","id","result"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// JSON-RPC protocol version, always "2.0"
    pub jsonrpc: String,

    /// Same identifier as the request this is responding to
    pub id: Value,

    /// The value returned by the method
    pub result: Value,
}

impl Response {
    /// Creates a new successful JSON-RPC 2.0 response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

/// How the `params` member of a request binds to the declared parameters.
///
/// Computed once per request; everything downstream switches on this value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamsMode {
    /// No `params` member (or `params: null`)
    Absent,

    /// Array params, bound by position
    Positional(Vec<Value>),

    /// Object params, bound by name
    Named(Map<String, Value>),
}

impl ParamsMode {
    /// Classifies a raw `params` member.
    ///
    /// Returns the offending value when it is neither an array nor an object.
    pub fn classify(params: Option<Value>) -> Result<Self, Value> {
        match params {
            None | Some(Value::Null) => Ok(ParamsMode::Absent),
            Some(Value::Array(values)) => Ok(ParamsMode::Positional(values)),
            Some(Value::Object(map)) => Ok(ParamsMode::Named(map)),
            Some(other) => Err(other),
        }
    }

    /// Number of supplied parameters.
    pub fn len(&self) -> usize {
        match self {
            ParamsMode::Absent => 0,
            ParamsMode::Positional(values) => values.len(),
            ParamsMode::Named(map) => map.len(),
        }
    }

    /// Returns true if no parameters were supplied.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for [`ParamsMode::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamsMode::Absent)
    }
}
