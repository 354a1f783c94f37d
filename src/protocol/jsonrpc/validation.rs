// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Request validation for the JSON-RPC 2.0 processor.
//!
//! Turns one line of text into a call that is ready to dispatch, or into the
//! classified error for the first check that failed:
//!
//! 1. the line must be JSON (parse error, fatal)
//! 2. the value must be an object (invalid request, fatal)
//! 3. `jsonrpc` must be `"2.0"` (invalid request, fatal)
//! 4. `method` must name a registered method (method not found)
//! 5. `params` must be absent, an array or an object (invalid request, fatal)
//! 6. the params count must equal the declared arity (invalid params)
//! 7. named params must use exactly the declared names (invalid params)
//!
//! Failures are reported whether or not the request carried an `id`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::error::{Result, RpcError};
use super::registry::{MethodEntry, MethodRegistry};
use super::types::{ParamsMode, JSONRPC_VERSION};

/// A request that passed every protocol check.
#[derive(Debug)]
pub struct ValidatedCall<'r> {
    /// Request id; `None` for notifications
    pub id: Option<Value>,

    /// Method name
    pub method: String,

    /// Registry entry for the method
    pub entry: &'r MethodEntry,

    /// Supplied params, classified
    pub params: ParamsMode,
}

impl ValidatedCall<'_> {
    /// Returns true if no response should be sent on success.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Validates a JSON-RPC 2.0 request line against the registry.
pub fn validate_request<'r>(line: &str, registry: &'r MethodRegistry) -> Result<ValidatedCall<'r>> {
    let json: Value = serde_json::from_str(line).map_err(|e| {
        tracing::debug!(error = %e, "Request is not valid JSON");
        RpcError::parse_error()
    })?;

    let Value::Object(mut request) = json else {
        return Err(RpcError::invalid_request());
    };

    match request.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => {}
        _ => return Err(RpcError::invalid_request()),
    }

    let id = request.remove("id");

    let (method, entry) = match request.get("method") {
        Some(Value::String(name)) => match registry.lookup(name) {
            Some(entry) => (name.clone(), entry),
            None => return Err(RpcError::method_not_found().with_id(id)),
        },
        _ => return Err(RpcError::method_not_found().with_id(id)),
    };

    let params = match ParamsMode::classify(request.remove("params")) {
        Ok(params) => params,
        Err(_) => {
            return Err(RpcError::invalid_request()
                .with_id(id)
                .with_data("Params must be an array or object"))
        }
    };

    let arity = entry.arity();
    if params.len() != arity {
        return Err(RpcError::invalid_params()
            .with_id(id)
            .with_data(format!("Method {method} takes {arity} params")));
    }

    if let ParamsMode::Named(map) = &params {
        if !keys_match(map, entry.param_names()) {
            return Err(RpcError::invalid_params().with_id(id).with_data(format!(
                "Method {method} param names are: {}",
                entry.param_names().join(", ")
            )));
        }
    }

    Ok(ValidatedCall {
        id,
        method,
        entry,
        params,
    })
}

/// Order-insensitive equality between supplied keys and declared names.
fn keys_match(map: &Map<String, Value>, declared: &[String]) -> bool {
    let declared: HashSet<&str> = declared.iter().map(String::as_str).collect();
    map.len() == declared.len() && map.keys().all(|key| declared.contains(key.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::error::ErrorKind;
    use serde_json::json;

    fn registry() -> MethodRegistry {
        let mut registry = MethodRegistry::new();
        registry.register_fn("subtract", ["minuend", "subtrahend"], |_| Ok(json!(0)));
        registry.register_fn("ping", Vec::<&str>::new(), |_| Ok(json!("pong")));
        registry
    }

    fn kind_of(line: &str) -> ErrorKind {
        let registry = registry();
        validate_request(line, &registry).unwrap_err().kind
    }

    #[test]
    fn test_validate_named_request() {
        let registry = registry();
        let call = validate_request(
            r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"subtrahend": 23, "minuend": 42}, "id": 1}"#,
            &registry,
        )
        .unwrap();
        assert_eq!(call.method, "subtract");
        assert_eq!(call.id, Some(json!(1)));
        assert!(matches!(call.params, ParamsMode::Named(_)));
        assert!(!call.is_notification());
    }

    #[test]
    fn test_validate_notification_without_params() {
        let registry = registry();
        let call = validate_request(r#"{"jsonrpc": "2.0", "method": "ping"}"#, &registry).unwrap();
        assert!(call.is_notification());
        assert!(call.params.is_absent());
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(kind_of(r#"{"jsonrpc": "2.0", "method": "ping", "params": [1, 2,"#), ErrorKind::ParseError);
        assert_eq!(kind_of(""), ErrorKind::ParseError);
    }

    #[test]
    fn test_not_an_object() {
        assert_eq!(kind_of("42"), ErrorKind::InvalidRequest);
        assert_eq!(kind_of(r#"[{"jsonrpc": "2.0", "method": "ping"}]"#), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_version_checks_happen_before_id() {
        let registry = registry();
        let err = validate_request(r#"{"jsonrpc": "1.0", "method": "ping", "id": 7}"#, &registry)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert_eq!(err.id, None);

        assert_eq!(kind_of(r#"{"method": "ping", "id": 7}"#), ErrorKind::InvalidRequest);
        assert_eq!(kind_of(r#"{"jsonrpc": 2.0, "method": "ping", "id": 7}"#), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_unknown_or_missing_method() {
        let registry = registry();
        let err = validate_request(r#"{"jsonrpc": "2.0", "method": "nope", "id": "a"}"#, &registry)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MethodNotFound);
        assert_eq!(err.id, Some(json!("a")));

        assert_eq!(kind_of(r#"{"jsonrpc": "2.0", "id": 1}"#), ErrorKind::MethodNotFound);
        assert_eq!(kind_of(r#"{"jsonrpc": "2.0", "method": 5, "id": 1}"#), ErrorKind::MethodNotFound);
    }

    #[test]
    fn test_scalar_params_are_fatal() {
        let registry = registry();
        let err = validate_request(
            r#"{"jsonrpc": "2.0", "method": "subtract", "params": 5, "id": 1}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRequest);
        assert!(err.is_fatal());
        assert_eq!(err.data, Some(json!("Params must be an array or object")));
    }

    #[test]
    fn test_arity_mismatch() {
        let registry = registry();
        let err = validate_request(
            r#"{"jsonrpc": "2.0", "method": "subtract", "params": [1], "id": 1}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParams);
        assert_eq!(err.data, Some(json!("Method subtract takes 2 params")));

        assert_eq!(kind_of(r#"{"jsonrpc": "2.0", "method": "subtract", "id": 1}"#), ErrorKind::InvalidParams);
        assert_eq!(kind_of(r#"{"jsonrpc": "2.0", "method": "ping", "params": [1], "id": 1}"#), ErrorKind::InvalidParams);
    }

    #[test]
    fn test_named_key_mismatch() {
        let registry = registry();
        let err = validate_request(
            r#"{"jsonrpc": "2.0", "method": "subtract", "params": {"minuend": 1, "other": 2}, "id": 1}"#,
            &registry,
        )
        .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParams);
        assert_eq!(
            err.data,
            Some(json!("Method subtract param names are: minuend, subtrahend"))
        );
    }

    #[test]
    fn test_empty_containers_for_zero_arity() {
        let registry = registry();
        assert!(validate_request(r#"{"jsonrpc": "2.0", "method": "ping", "params": [], "id": 1}"#, &registry).is_ok());
        assert!(validate_request(r#"{"jsonrpc": "2.0", "method": "ping", "params": {}, "id": 1}"#, &registry).is_ok());
        assert!(validate_request(r#"{"jsonrpc": "2.0", "method": "ping", "params": null, "id": 1}"#, &registry).is_ok());
    }
}
