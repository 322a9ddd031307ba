// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Self-description of a compiled router.
//!
//! [`Router::describe`] lists every method with its parameter and result descriptors in their
//! declarative JSON form. The same document is served by the built-in `rpc.discover` method
//! when [`RouterOptions::enable_discover`](crate::RouterOptions) is set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::router::Router;

pub const RESERVED_ROOT: &str = "rpc";
pub const DISCOVER_METHOD: &str = "rpc.discover";

/// All methods served by a router, sorted by path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiDescription {
    pub methods: Vec<MethodDescription>,
}

impl ApiDescription {
    pub fn method(&self, name: &str) -> Option<&MethodDescription> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodDescription {
    /// Fully-qualified path, e.g. `posts.publish`
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub params: Value,
    pub result: Value,
}

impl Router {
    pub fn describe(&self) -> ApiDescription {
        let methods = self
            .procedures
            .iter()
            .map(|(name, compiled)| MethodDescription {
                name: name.clone(),
                description: compiled.procedure.description().map(str::to_string),
                params: compiled.input.descriptor().to_json(),
                result: compiled.output.descriptor().to_json(),
            })
            .collect();

        ApiDescription { methods }
    }
}

#[cfg(test)]
mod tests {
    use rpc_procedure::{Namespace, Procedure, handler_fn};
    use rpc_schema::{Engine, EngineOptions, Property, SchemaDescriptor};
    use serde_json::json;

    use super::*;
    use crate::protocol::{JsonRpcId, JsonRpcRequest};
    use crate::RouterOptions;

    fn namespace() -> Namespace {
        let publish = Procedure::new(
            SchemaDescriptor::object([("title", Property::required(SchemaDescriptor::string()))]),
            SchemaDescriptor::boolean(),
            handler_fn(|_| Ok(json!(true))),
        )
        .with_description("Publish a post");
        let ping = Procedure::new(
            SchemaDescriptor::null(),
            SchemaDescriptor::string(),
            handler_fn(|_| Ok(json!("pong"))),
        );

        Namespace::new()
            .namespace("posts", Namespace::new().procedure("publish", publish).unwrap())
            .unwrap()
            .procedure("ping", ping)
            .unwrap()
    }

    fn router(enable_discover: bool) -> Router {
        Router::compile(
            &namespace(),
            &Engine::standard(EngineOptions::default()).unwrap(),
            RouterOptions { enable_discover },
        )
        .unwrap()
    }

    #[test]
    fn describes_methods_sorted() {
        let description = router(false).describe();

        let names: Vec<_> = description.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["ping", "posts.publish"]);

        let publish = description.method("posts.publish").unwrap();
        assert_eq!(publish.description.as_deref(), Some("Publish a post"));
        assert_eq!(
            publish.params,
            json!({"type": "object", "properties": {"title": {"type": "string"}}})
        );
        assert_eq!(publish.result, json!({"type": "boolean"}));
    }

    #[tokio::test]
    async fn discover_serves_description() {
        let router = router(true);
        let response = router
            .call_procedure(JsonRpcRequest::new(DISCOVER_METHOD, Value::Null, 1u64.into()))
            .await;

        let served: ApiDescription =
            serde_json::from_value(response.result().unwrap().clone()).unwrap();
        assert_eq!(served, router.describe());
    }

    #[tokio::test]
    async fn discover_is_unknown_when_disabled() {
        let response = router(false)
            .call_procedure(JsonRpcRequest::new(DISCOVER_METHOD, Value::Null, JsonRpcId::Null))
            .await;

        assert_eq!(response.error().unwrap().code, -32601);
    }
}
