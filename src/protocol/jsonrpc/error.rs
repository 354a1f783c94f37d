// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error taxonomy for the JSON-RPC 2.0 request processor.
//!
//! The server reports exactly five kinds of protocol error, each with a fixed
//! code and message from the
//! [JSON-RPC 2.0 specification](https://www.jsonrpc.org/specification#error_object).
//! Two of them (parse errors and invalid requests) are fatal: once reported,
//! the connection is closed because message framing can no longer be trusted.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::types::JSONRPC_VERSION;

/// The closed set of protocol error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Parse error (-32700)
    /// Invalid JSON was received by the server.
    ParseError,

    /// Invalid Request (-32600)
    /// The JSON sent is not a valid Request object.
    InvalidRequest,

    /// Method not found (-32601)
    MethodNotFound,

    /// Invalid params (-32602)
    /// Arity or parameter names do not match the registered method.
    InvalidParams,

    /// Server error (-32000)
    /// The method handler failed.
    ServerError,
}

impl ErrorKind {
    /// Returns the reserved numeric code.
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::ParseError => -32700,
            ErrorKind::InvalidRequest => -32600,
            ErrorKind::MethodNotFound => -32601,
            ErrorKind::InvalidParams => -32602,
            ErrorKind::ServerError => -32000,
        }
    }

    /// Returns the default message sent in the envelope.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorKind::ParseError => "Parse error",
            ErrorKind::InvalidRequest => "Invalid request",
            ErrorKind::MethodNotFound => "Method not found",
            ErrorKind::InvalidParams => "Invalid params",
            ErrorKind::ServerError => "Server error",
        }
    }

    /// Whether the connection must be closed after reporting this kind.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ErrorKind::ParseError | ErrorKind::InvalidRequest)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.code())
    }
}

/// A classified protocol failure for one request line.
///
/// `id` is `Some` only when the request id had been read before the failure;
/// `Some(Value::Null)` means the client sent `"id": null` and it is echoed back.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    /// What went wrong
    pub kind: ErrorKind,

    /// Request id to echo, if known
    pub id: Option<Value>,

    /// Diagnostic payload for the `data` member
    pub data: Option<Value>,
}

impl RpcError {
    /// Creates an error of the given kind with no id and no data.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            id: None,
            data: None,
        }
    }

    /// Creates a parse error.
    pub fn parse_error() -> Self {
        Self::new(ErrorKind::ParseError)
    }

    /// Creates an invalid request error.
    pub fn invalid_request() -> Self {
        Self::new(ErrorKind::InvalidRequest)
    }

    /// Creates a method not found error.
    pub fn method_not_found() -> Self {
        Self::new(ErrorKind::MethodNotFound)
    }

    /// Creates an invalid params error.
    pub fn invalid_params() -> Self {
        Self::new(ErrorKind::InvalidParams)
    }

    /// Creates a server error.
    pub fn server_error() -> Self {
        Self::new(ErrorKind::ServerError)
    }

    /// Attaches the request id (which may itself be `null`).
    pub fn with_id(mut self, id: Option<Value>) -> Self {
        self.id = id;
        self
    }

    /// Attaches diagnostic data.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Numeric code of this error.
    pub fn code(&self) -> i32 {
        self.kind.code()
    }

    /// Whether the connection must be closed after this error is sent.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Builds the serializable envelope for this error.
    pub fn envelope(&self) -> ErrorEnvelope<'_> {
        ErrorEnvelope {
            jsonrpc: JSONRPC_VERSION,
            error: ErrorObject {
                code: self.kind.code(),
                message: self.kind.message(),
                data: self.data.as_ref(),
            },
            id: self.id.as_ref(),
        }
    }

    /// Renders the canonical error envelope as a single line of JSON text.
    pub fn render(&self) -> String {
        serde_json::to_string(&self.envelope()).unwrap_or_else(|_| {
            format!(
                r#"{{"jsonrpc":"2.0","error":{{"code":{},"message":"{}"}}}}"#,
                self.kind.code(),
                self.kind.message()
            )
        })
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(data) = &self.data {
            write!(f, ": {data}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

impl From<ErrorKind> for RpcError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// The `error` member of an error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorObject<'a> {
    /// The error code
    pub code: i32,

    /// A short description of the error
    pub message: &'a str,

    /// Additional information about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<&'a Value>,
}

/// Wire shape `{"jsonrpc","error","id"?}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    /// Always "2.0"
    pub jsonrpc: &'a str,

    /// The error object
    pub error: ErrorObject<'a>,

    /// Echoed request id, omitted when unknown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a Value>,
}

/// Specialized Result type for request processing.
pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(ErrorKind::ParseError, -32700, "Parse error", true; "parse error")]
    #[test_case(ErrorKind::InvalidRequest, -32600, "Invalid request", true; "invalid request")]
    #[test_case(ErrorKind::MethodNotFound, -32601, "Method not found", false; "method not found")]
    #[test_case(ErrorKind::InvalidParams, -32602, "Invalid params", false; "invalid params")]
    #[test_case(ErrorKind::ServerError, -32000, "Server error", false; "server error")]
    fn test_kind_table(kind: ErrorKind, code: i32, message: &str, fatal: bool) {
        assert_eq!(kind.code(), code);
        assert_eq!(kind.message(), message);
        assert_eq!(kind.is_fatal(), fatal);
    }

    #[test]
    fn test_render_without_id_or_data() {
        let rendered = RpcError::parse_error().render();
        assert_eq!(
            rendered,
            r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"}}"#
        );
    }

    #[test]
    fn test_render_with_id_and_data() {
        let rendered = RpcError::server_error()
            .with_id(Some(json!("abc")))
            .with_data("boom")
            .render();
        assert_eq!(
            rendered,
            r#"{"jsonrpc":"2.0","error":{"code":-32000,"message":"Server error","data":"boom"},"id":"abc"}"#
        );
    }

    #[test]
    fn test_render_keeps_null_id() {
        let rendered = RpcError::method_not_found()
            .with_id(Some(Value::Null))
            .render();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["id"], Value::Null);
        assert!(parsed.as_object().unwrap().contains_key("id"));
    }

    #[test]
    fn test_display_includes_data() {
        let err = RpcError::invalid_params().with_data("Method f takes 2 params");
        let text = err.to_string();
        assert!(text.contains("-32602"));
        assert!(text.contains("takes 2 params"));
    }
}
