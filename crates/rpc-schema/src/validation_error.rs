// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::descriptor::value_type_name;

/// A single data-shape mismatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            expected: None,
            received: None,
            value: None,
        }
    }

    pub fn type_mismatch(path: &str, expected: impl Into<String>, value: &Value) -> Self {
        let expected = expected.into();
        let received = value_type_name(value);
        Self::new(path, format!("Expected {expected}, received {received}"))
            .with_expected(expected)
            .with_received(received)
            .with_value(value.clone())
    }

    pub fn missing_property(path: &str, expected: impl Into<String>) -> Self {
        Self::new(path, "Required property is missing")
            .with_expected(expected)
            .with_received("missing")
    }

    pub fn unknown_property(path: &str, value: &Value) -> Self {
        Self::new(path, "Unknown property")
            .with_received(value_type_name(value))
            .with_value(value.clone())
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_received(mut self, received: impl Into<String>) -> Self {
        self.received = Some(received.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// The same error re-rooted under `parent`.
    pub fn prefixed(mut self, parent: &str) -> Self {
        self.path = crate::path::prefix(parent, &self.path);
        self
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Outcome of checking a value, as exposed to plugins and callers that want a report rather
/// than the transformed value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Every error found in one validation pass, in discovery order. Never empty.
#[derive(Error, Debug, Clone, PartialEq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.0
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages = self
            .0
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

impl From<ValidationErrors> for ValidationResult {
    fn from(errors: ValidationErrors) -> Self {
        ValidationResult::from_errors(errors.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_path() {
        let errors = ValidationErrors(vec![
            ValidationError::missing_property("name", "string"),
            ValidationError::type_mismatch("", "object", &json!(1)),
        ]);

        assert_eq!(
            errors.to_string(),
            "name: Required property is missing; Expected object, received number"
        );
    }

    #[test]
    fn prefixing() {
        let error = ValidationError::new("[0]", "bad").prefixed("tags");
        assert_eq!(error.path, "tags[0]");
    }
}
