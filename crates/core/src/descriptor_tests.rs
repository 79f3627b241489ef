// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap()
}

#[parameterized(
    post = { "POST", Method::Post },
    put_lower = { "put", Method::Put },
    patch_mixed = { "Patch", Method::Patch },
    delete = { "DELETE", Method::Delete },
)]
fn method_parses(input: &str, expected: Method) {
    assert_eq!(input.parse::<Method>().unwrap(), expected);
}

#[parameterized(
    get = { "GET" },
    empty = { "" },
    head = { "HEAD" },
)]
fn method_rejects_non_mutations(input: &str) {
    let err = input.parse::<Method>().unwrap_err();
    assert!(matches!(err, Error::InvalidMethod(_)));
}

#[test]
fn method_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&Method::Patch).unwrap(), "\"PATCH\"");
    let parsed: Method = serde_json::from_str("\"DELETE\"").unwrap();
    assert_eq!(parsed, Method::Delete);
}

#[test]
fn descriptor_preserves_fields() {
    let payload = json!({"sku": "A-100", "from": "B-01-02", "to": "C-03-01", "qty": 4});
    let d = MutationDescriptor::new(Method::Post, "/inventory/move", payload.clone(), at())
        .unwrap();

    assert_eq!(d.method(), Method::Post);
    assert_eq!(d.target(), "/inventory/move");
    assert_eq!(d.payload(), &payload);
    assert_eq!(d.enqueued_at(), at());
    assert_eq!(d.to_string(), "POST /inventory/move");
}

#[test]
fn descriptor_rejects_blank_target() {
    let err = MutationDescriptor::new(Method::Put, "  ", Value::Null, at()).unwrap_err();
    assert!(matches!(err, Error::InvalidTarget(_)));
}

#[test]
fn identical_descriptors_are_equal_but_independent() {
    let a = MutationDescriptor::new(Method::Delete, "/bins/7", Value::Null, at()).unwrap();
    let b = MutationDescriptor::new(Method::Delete, "/bins/7", Value::Null, at()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn descriptor_json_shape() {
    let d = MutationDescriptor::new(Method::Post, "/gate/in", json!({"truck": "KA-01"}), at())
        .unwrap();
    let value = serde_json::to_value(&d).unwrap();
    assert_eq!(value["method"], "POST");
    assert_eq!(value["target"], "/gate/in");
    assert_eq!(value["payload"]["truck"], "KA-01");
    assert!(value["enqueued_at"].is_string());
}
