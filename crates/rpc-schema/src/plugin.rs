// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Plugins extend the engine with custom types and prevalidation steps.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::{
    descriptor::{SchemaDescriptor, value_type_name},
    validation_error::{ValidationError, ValidationResult},
};

/// A type referenced by descriptors as `SchemaKind::Custom(name)`.
///
/// Errors returned by `validate` carry paths relative to the value; the engine re-roots them
/// under the path at which the custom type is used.
pub trait CustomType: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    fn validate(&self, value: &Value) -> ValidationResult;
}

/// Runs before the structural check of every node. May replace the value.
pub trait PrevalidationStep: Send + Sync {
    fn prevalidate(
        &self,
        value: Value,
        schema: &SchemaDescriptor,
        path: &str,
    ) -> Result<Value, PrevalidationError>;
}

impl<F> PrevalidationStep for F
where
    F: Fn(Value, &SchemaDescriptor, &str) -> Result<Value, PrevalidationError> + Send + Sync,
{
    fn prevalidate(
        &self,
        value: Value,
        schema: &SchemaDescriptor,
        path: &str,
    ) -> Result<Value, PrevalidationError> {
        self(value, schema, path)
    }
}

/// Malformed input detected during prevalidation. Aborts the validation pass.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct PrevalidationError {
    pub message: String,
}

impl PrevalidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct Plugin {
    pub name: String,
    pub description: Option<String>,
    pub version: String,
    pub types: Vec<Arc<dyn CustomType>>,
    pub prevalidate: Vec<Arc<dyn PrevalidationStep>>,
}

impl Plugin {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: version.into(),
            types: Vec::new(),
            prevalidate: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_type(mut self, custom_type: Arc<dyn CustomType>) -> Self {
        self.types.push(custom_type);
        self
    }

    pub fn with_prevalidation(mut self, step: impl PrevalidationStep + 'static) -> Self {
        self.prevalidate.push(Arc::new(step));
        self
    }
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("version", &self.version)
            .field(
                "types",
                &self.types.iter().map(|ty| ty.name()).collect::<Vec<_>>(),
            )
            .field("prevalidate", &self.prevalidate.len())
            .finish()
    }
}

/// A custom type backed by a check function that accepts or rejects the whole value.
pub struct FnCustomType<F> {
    name: String,
    description: Option<String>,
    check: F,
}

impl<F> CustomType for FnCustomType<F>
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    fn validate(&self, value: &Value) -> ValidationResult {
        match (self.check)(value) {
            Ok(()) => ValidationResult::ok(),
            Err(message) => ValidationResult::from_errors(vec![
                ValidationError::new("", message)
                    .with_expected(self.name.clone())
                    .with_received(value_type_name(value))
                    .with_value(value.clone()),
            ]),
        }
    }
}

pub fn custom_type<F>(
    name: impl Into<String>,
    description: impl Into<String>,
    check: F,
) -> Arc<dyn CustomType>
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
{
    Arc::new(FnCustomType {
        name: name.into(),
        description: Some(description.into()),
        check,
    })
}
