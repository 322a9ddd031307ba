// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Named conversion steps declared on a descriptor node.
//!
//! Transformers do nothing on their own: a prevalidation step (the standard plugin's) applies
//! them, in declaration order, before the node's structural check.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::{
    descriptor::{PrimitiveType, value_type_name},
    error::ConstructionError,
};

pub type TransformFn = Arc<dyn Fn(Value) -> Result<Value, String> + Send + Sync>;

#[derive(Clone)]
pub struct Transformer {
    name: String,
    input: PrimitiveType,
    output: PrimitiveType,
    convert: TransformFn,
}

#[derive(Error, Debug, PartialEq)]
#[error("Transformer '{transformer}' failed: {message}")]
pub struct TransformError {
    pub transformer: String,
    pub message: String,
}

impl Transformer {
    pub fn new(
        name: impl Into<String>,
        input: PrimitiveType,
        output: PrimitiveType,
        convert: impl Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            input,
            output,
            convert: Arc::new(convert),
        }
    }

    /// Parses text such as `"42"` or `" 2.5 "`. Integral text becomes an integer number.
    pub fn text_to_number() -> Self {
        Self::new(
            "text-to-number",
            PrimitiveType::String,
            PrimitiveType::Number,
            |value| {
                let text = value.as_str().unwrap_or_default().trim();
                if let Ok(n) = text.parse::<i64>() {
                    return Ok(Value::from(n));
                }
                text.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(Value::from)
                    .ok_or_else(|| format!("'{text}' is not a number"))
            },
        )
    }

    pub fn text_to_integer() -> Self {
        Self::new(
            "text-to-integer",
            PrimitiveType::String,
            PrimitiveType::Integer,
            |value| {
                let text = value.as_str().unwrap_or_default().trim();
                text.parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| format!("'{text}' is not an integer"))
            },
        )
    }

    pub fn text_to_boolean() -> Self {
        Self::new(
            "text-to-boolean",
            PrimitiveType::String,
            PrimitiveType::Boolean,
            |value| {
                let text = value.as_str().unwrap_or_default().trim();
                match text.to_lowercase().as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    _ => Err(format!("'{text}' is not a boolean")),
                }
            },
        )
    }

    pub fn number_to_text() -> Self {
        Self::new(
            "number-to-text",
            PrimitiveType::Number,
            PrimitiveType::String,
            |value| Ok(Value::String(value.to_string())),
        )
    }

    pub fn trim() -> Self {
        Self::new("trim", PrimitiveType::String, PrimitiveType::String, |value| {
            Ok(Value::String(
                value.as_str().unwrap_or_default().trim().to_string(),
            ))
        })
    }

    pub fn builtins() -> Vec<Transformer> {
        vec![
            Self::text_to_number(),
            Self::text_to_integer(),
            Self::text_to_boolean(),
            Self::number_to_text(),
            Self::trim(),
        ]
    }

    /// Resolve a built-in transformer by name, checking the declared type markers against it.
    pub fn from_name(
        name: &str,
        input: Option<PrimitiveType>,
        output: Option<PrimitiveType>,
    ) -> Result<Self, ConstructionError> {
        let transformer = Self::builtins()
            .into_iter()
            .find(|transformer| transformer.name == name)
            .ok_or_else(|| ConstructionError::UnknownTransformer(name.to_string()))?;

        let declared = (
            input.unwrap_or(transformer.input),
            output.unwrap_or(transformer.output),
        );
        if declared != (transformer.input, transformer.output) {
            return Err(ConstructionError::TransformerTypeMismatch {
                transformer: name.to_string(),
                declared: format!("{} -> {}", declared.0, declared.1),
                actual: format!("{} -> {}", transformer.input, transformer.output),
            });
        }

        Ok(transformer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input(&self) -> PrimitiveType {
        self.input
    }

    pub fn output(&self) -> PrimitiveType {
        self.output
    }

    /// Convert `value` if its runtime type matches the input marker; otherwise hand it back
    /// untouched so that the structural check reports the mismatch.
    pub fn apply(&self, value: Value) -> Result<Value, TransformError> {
        if !self.input.matches(&value) {
            return Ok(value);
        }

        let converted = (self.convert)(value).map_err(|message| TransformError {
            transformer: self.name.clone(),
            message,
        })?;

        if self.output.matches(&converted) {
            Ok(converted)
        } else {
            Err(TransformError {
                transformer: self.name.clone(),
                message: format!(
                    "produced {} where {} was declared",
                    value_type_name(&converted),
                    self.output
                ),
            })
        }
    }
}

impl std::fmt::Debug for Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({} -> {})", self.name, self.input, self.output)
    }
}

impl PartialEq for Transformer {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.input == other.input && self.output == other.output
    }
}
