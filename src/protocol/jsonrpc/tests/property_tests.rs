// Copyright (c) 2025 Lanai RPC Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Property-based tests for the JSON-RPC 2.0 processor.
//! These tests check id echoing, binding-mode equivalence and error
//! classification over randomly generated requests.

use std::sync::Arc;

use futures::executor::block_on;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

use crate::protocol::jsonrpc::{ErrorKind, MethodRegistry, Request, RequestProcessor};

const PARAM_NAMES: [&str; 3] = ["alpha", "beta", "gamma"];

// Generate a valid ID (number, string, float or null)
fn id_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| json!(n)),
        any::<u64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9_-]{0,12}".prop_map(|s| json!(s)),
        Just(json!(2.5)),
        Just(Value::Null),
    ]
}

// Generate JSON number literals, including ones outside the 64-bit range
fn number_literal_strategy() -> impl Strategy<Value = String> {
    "-?(0|[1-9][0-9]{0,40})([.][0-9]{1,6})?([eE][+-]?[0-9]{1,2})?"
}

// Generate scalar argument values
fn arg_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(|s| json!(s)),
        any::<bool>().prop_map(|b| json!(b)),
    ]
}

// A method that returns its arguments in declared order
fn create_test_processor() -> RequestProcessor {
    let mut registry = MethodRegistry::new();
    registry.register_fn("collect", PARAM_NAMES, |args| Ok(Value::Array(args.into_positional())));
    registry.register_fn("nothing", Vec::<&str>::new(), |_| Ok(Value::Null));
    RequestProcessor::new(Arc::new(registry))
}

fn process(processor: &RequestProcessor, request: &Request) -> Result<Option<Value>, ErrorKind> {
    let line = request.to_line().unwrap();
    block_on(processor.process(&line))
        .map(|text| text.map(|t| serde_json::from_str(&t).unwrap()))
        .map_err(|e| e.kind)
}

proptest! {
    #[test]
    fn prop_id_is_echoed_verbatim(id in id_strategy()) {
        let processor = create_test_processor();
        let request = Request::new("nothing", None, Some(id.clone()));
        let response = process(&processor, &request).unwrap().unwrap();
        prop_assert_eq!(&response["id"], &id);
    }

    #[test]
    fn prop_numeric_id_text_is_preserved(raw in number_literal_strategy()) {
        let processor = create_test_processor();

        let line = format!(r#"{{"jsonrpc":"2.0","method":"nothing","id":{raw}}}"#);
        let text = block_on(processor.process(&line)).unwrap().unwrap();
        prop_assert_eq!(text, format!(r#"{{"jsonrpc":"2.0","id":{raw},"result":null}}"#));

        let line = format!(r#"{{"jsonrpc":"2.0","method":"missing","id":{raw}}}"#);
        let rendered = block_on(processor.process(&line)).unwrap_err().render();
        prop_assert!(rendered.ends_with(&format!(r#","id":{raw}}}"#)), "{}", rendered);
    }

    #[test]
    fn prop_error_id_is_echoed_verbatim(id in id_strategy()) {
        let processor = create_test_processor();
        let line = Request::new("missing", None, Some(id.clone())).to_line().unwrap();
        let err = block_on(processor.process(&line)).unwrap_err();
        let envelope: Value = serde_json::from_str(&err.render()).unwrap();
        prop_assert_eq!(&envelope["id"], &id);
        prop_assert_eq!(&envelope["error"]["code"], &json!(-32601));
    }

    #[test]
    fn prop_positional_and_named_agree(values in prop::collection::vec(arg_strategy(), 3)) {
        let processor = create_test_processor();
        let named: Map<String, Value> = PARAM_NAMES
            .iter()
            .map(|name| name.to_string())
            .zip(values.iter().cloned())
            .collect();

        let by_position = Request::new("collect", Some(Value::Array(values.clone())), Some(json!(1)));
        let by_name = Request::new("collect", Some(Value::Object(named)), Some(json!(1)));

        let first = process(&processor, &by_position).unwrap();
        let second = process(&processor, &by_name).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.unwrap()["result"].clone(), Value::Array(values));
    }

    #[test]
    fn prop_wrong_arity_is_invalid_params(count in 0usize..8, named in any::<bool>()) {
        prop_assume!(count != PARAM_NAMES.len());
        let processor = create_test_processor();
        let params = if named {
            Value::Object((0..count).map(|i| (format!("p{i}"), json!(i))).collect())
        } else {
            Value::Array((0..count).map(|i| json!(i)).collect())
        };
        let request = Request::new("collect", Some(params), Some(json!(1)));
        prop_assert_eq!(process(&processor, &request), Err(ErrorKind::InvalidParams));
    }

    #[test]
    fn prop_notifications_are_silent(values in prop::collection::vec(arg_strategy(), 3)) {
        let processor = create_test_processor();
        let request = Request::notification("collect", Some(Value::Array(values)));
        prop_assert_eq!(process(&processor, &request), Ok(None));
    }

    #[test]
    fn prop_garbage_is_parse_error(line in "[^\\[{\"0-9 tfn-]{1,40}") {
        let processor = create_test_processor();
        let err = block_on(processor.process(&line)).unwrap_err();
        prop_assert_eq!(err.kind, ErrorKind::ParseError);
        prop_assert!(err.is_fatal());
    }
}
