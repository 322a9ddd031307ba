// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The standard plugin: applies declared transformers and provides common string formats as
//! custom types.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::{
    descriptor::SchemaDescriptor,
    plugin::{Plugin, PrevalidationError, custom_type},
};

pub const STANDARD_PLUGIN_NAME: &str = "standard";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

pub fn plugin() -> Plugin {
    Plugin::new(STANDARD_PLUGIN_NAME, env!("CARGO_PKG_VERSION"))
        .with_description("Declared transformers and the uuid, datetime and email formats")
        .with_prevalidation(apply_transformers)
        .with_type(custom_type("uuid", "A hyphenated UUID string", |value| {
            let text = expect_text(value, "uuid")?;
            uuid::Uuid::parse_str(text)
                .map(|_| ())
                .map_err(|_| format!("'{text}' is not a valid uuid"))
        }))
        .with_type(custom_type(
            "datetime",
            "An RFC 3339 date-time string",
            |value| {
                let text = expect_text(value, "datetime")?;
                chrono::DateTime::parse_from_rfc3339(text)
                    .map(|_| ())
                    .map_err(|_| format!("'{text}' is not an RFC 3339 date-time"))
            },
        ))
        .with_type(custom_type("email", "An email address", |value| {
            let text = expect_text(value, "email")?;
            if EMAIL_PATTERN.is_match(text) {
                Ok(())
            } else {
                Err(format!("'{text}' is not a valid email address"))
            }
        }))
}

fn apply_transformers(
    value: Value,
    schema: &SchemaDescriptor,
    _path: &str,
) -> Result<Value, PrevalidationError> {
    schema
        .transformers
        .iter()
        .try_fold(value, |value, transformer| {
            transformer
                .apply(value)
                .map_err(|e| PrevalidationError::new(e.to_string()))
        })
}

fn expect_text<'a>(value: &'a Value, format: &str) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("Expected {format} as a string"))
}
