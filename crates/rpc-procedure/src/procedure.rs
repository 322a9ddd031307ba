// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Procedures bind an input schema, an output schema and a handler.
//!
//! There are two ways to build one, and both produce the same [`Procedure`]:
//!
//! ```
//! let greeting = Procedure::new(input, output, handler);
//!
//! let greeting = Procedure::builder()
//!     .input(input)?
//!     .output(output)?
//!     .handler(handler)?;
//! ```
//!
//! The builder rejects out-of-order steps with a [`DefinitionError`].

use std::sync::Arc;

use rpc_schema::SchemaDescriptor;
use serde_json::Value;

use crate::{error::DefinitionError, handler::Handler};

#[derive(Clone)]
pub struct Procedure {
    input: SchemaDescriptor,
    output: SchemaDescriptor,
    handler: Arc<dyn Handler>,
    description: Option<String>,
}

impl Procedure {
    pub fn new(
        input: SchemaDescriptor,
        output: SchemaDescriptor,
        handler: Arc<dyn Handler>,
    ) -> Self {
        Self {
            input,
            output,
            handler,
            description: None,
        }
    }

    pub fn builder() -> ProcedureBuilder {
        ProcedureBuilder::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn input_schema(&self) -> &SchemaDescriptor {
        &self.input
    }

    pub fn output_schema(&self) -> &SchemaDescriptor {
        &self.output
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Run the handler. Callers are expected to pass already validated input.
    pub async fn invoke(&self, input: Value) -> anyhow::Result<Value> {
        self.handler.call(input).await
    }
}

impl std::fmt::Debug for Procedure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Procedure")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Incremental construction: input, then output, then handler.
#[derive(Debug, Default)]
pub struct ProcedureBuilder {
    input: Option<SchemaDescriptor>,
    output: Option<SchemaDescriptor>,
    description: Option<String>,
}

impl ProcedureBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn input(mut self, schema: SchemaDescriptor) -> Result<Self, DefinitionError> {
        if self.input.is_some() {
            return Err(DefinitionError::StageRepeated("input"));
        }
        self.input = Some(schema);
        Ok(self)
    }

    pub fn output(mut self, schema: SchemaDescriptor) -> Result<Self, DefinitionError> {
        if self.input.is_none() {
            return Err(DefinitionError::OutputBeforeInput);
        }
        if self.output.is_some() {
            return Err(DefinitionError::StageRepeated("output"));
        }
        self.output = Some(schema);
        Ok(self)
    }

    pub fn handler(self, handler: Arc<dyn Handler>) -> Result<Procedure, DefinitionError> {
        match (self.input, self.output) {
            (Some(input), Some(output)) => Ok(Procedure {
                input,
                output,
                handler,
                description: self.description,
            }),
            (None, _) => Err(DefinitionError::HandlerBeforeSchemas { missing: "input" }),
            (Some(_), None) => Err(DefinitionError::HandlerBeforeSchemas { missing: "output" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use rpc_schema::Property;
    use serde_json::json;

    fn greeting_input() -> SchemaDescriptor {
        SchemaDescriptor::object([("name", Property::required(SchemaDescriptor::string()))])
    }

    fn greeting_output() -> SchemaDescriptor {
        SchemaDescriptor::object([("greeting", Property::required(SchemaDescriptor::string()))])
    }

    fn greet() -> Arc<dyn Handler> {
        handler_fn(|input| {
            let name = input["name"].as_str().unwrap_or_default();
            Ok(json!({ "greeting": format!("Hello, {name}!") }))
        })
    }

    #[tokio::test]
    async fn both_construction_paths_agree() {
        let handler = greet();

        let declared = Procedure::new(greeting_input(), greeting_output(), handler.clone());
        let built = Procedure::builder()
            .input(greeting_input())
            .unwrap()
            .output(greeting_output())
            .unwrap()
            .handler(handler)
            .unwrap();

        assert_eq!(declared.input_schema(), built.input_schema());
        assert_eq!(declared.output_schema(), built.output_schema());
        assert!(Arc::ptr_eq(declared.handler(), built.handler()));
        assert_eq!(declared.description(), built.description());

        let input = json!({"name": "World"});
        assert_eq!(
            declared.invoke(input.clone()).await.unwrap(),
            built.invoke(input).await.unwrap()
        );
    }

    #[test]
    fn builder_enforces_order() {
        assert_eq!(
            Procedure::builder().output(greeting_output()).unwrap_err(),
            DefinitionError::OutputBeforeInput
        );
        assert_eq!(
            Procedure::builder().handler(greet()).unwrap_err(),
            DefinitionError::HandlerBeforeSchemas { missing: "input" }
        );
        assert_eq!(
            Procedure::builder()
                .input(greeting_input())
                .unwrap()
                .handler(greet())
                .unwrap_err(),
            DefinitionError::HandlerBeforeSchemas { missing: "output" }
        );
        assert_eq!(
            Procedure::builder()
                .input(greeting_input())
                .unwrap()
                .input(greeting_input())
                .unwrap_err(),
            DefinitionError::StageRepeated("input")
        );
    }

    #[test]
    fn description_is_carried() {
        let procedure = Procedure::builder()
            .description("Greets someone")
            .input(greeting_input())
            .unwrap()
            .output(greeting_output())
            .unwrap()
            .handler(greet())
            .unwrap();

        assert_eq!(procedure.description(), Some("Greets someone"));
    }
}
