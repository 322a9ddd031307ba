// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use rpc_procedure::{Namespace, NamespaceNode, Procedure};
use rpc_schema::{Engine, Validator};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::error::{CompileError, RpcError};
use crate::introspection::{DISCOVER_METHOD, RESERVED_ROOT};
use crate::options::RouterOptions;
use crate::protocol::{JSONRPC_VERSION, JsonRpcId, JsonRpcReply, JsonRpcRequest, JsonRpcResponse};

const FALLBACK_INTERNAL_ERROR: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#;

pub(crate) struct CompiledProcedure {
    pub(crate) procedure: Arc<Procedure>,
    pub(crate) input: Validator,
    pub(crate) output: Validator,
}

/// Dispatch table from fully-qualified method paths to procedures, with their validators built.
///
/// Immutable once compiled, so a single instance can be shared across concurrent callers.
pub struct Router {
    pub(crate) procedures: BTreeMap<String, CompiledProcedure>,
    options: RouterOptions,
}

impl Router {
    pub fn compile(
        namespace: &Namespace,
        engine: &Engine,
        options: RouterOptions,
    ) -> Result<Self, CompileError> {
        let mut procedures = BTreeMap::new();
        register_namespace(&mut procedures, "", namespace, engine)?;

        if options.enable_discover
            && let Some(path) = procedures
                .keys()
                .find(|path| is_reserved(path.as_str()))
        {
            return Err(CompileError::ReservedPath(path.clone()));
        }

        debug!(count = procedures.len(), "Compiled procedures");

        Ok(Self {
            procedures,
            options,
        })
    }

    pub fn options(&self) -> RouterOptions {
        self.options
    }

    /// Fully-qualified method paths, sorted.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.procedures.keys().map(String::as_str)
    }

    pub fn procedure(&self, method: &str) -> Option<&Arc<Procedure>> {
        self.procedures
            .get(method)
            .map(|compiled| &compiled.procedure)
    }

    #[instrument(
        name = "Router::call_procedure",
        skip(self, request),
        fields(method = %request.method)
    )]
    pub async fn call_procedure(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let JsonRpcRequest {
            jsonrpc,
            method,
            params,
            id,
        } = request;

        let outcome = if jsonrpc != JSONRPC_VERSION {
            Err(RpcError::InvalidRequest)
        } else {
            self.resolve(&method, params).await
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                if err.is_internal() {
                    error!("{err}");
                } else {
                    debug!("{err}");
                }
                JsonRpcResponse::failure(id, &err)
            }
        }
    }

    async fn resolve(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        if self.options.enable_discover && method == DISCOVER_METHOD {
            return serde_json::to_value(self.describe())
                .map_err(|err| RpcError::Internal(err.to_string()));
        }

        let compiled = self
            .procedures
            .get(method)
            .ok_or_else(|| RpcError::MethodNotFound(method.to_string()))?;

        let input = compiled
            .input
            .validate(&params)
            .map_err(RpcError::InvalidParams)?;

        let output = compiled
            .procedure
            .invoke(input)
            .await
            .map_err(|cause| RpcError::Handler {
                method: method.to_string(),
                cause,
            })?;

        compiled
            .output
            .validate(&output)
            .map_err(|errors| RpcError::OutputContract {
                method: method.to_string(),
                errors,
            })
    }

    /// Dispatches a parsed payload: a single envelope, or a batch of them.
    pub async fn handle_value(&self, payload: Value) -> JsonRpcReply {
        match payload {
            Value::Array(requests) if requests.is_empty() => JsonRpcReply::Single(
                JsonRpcResponse::failure(JsonRpcId::Null, &RpcError::InvalidRequest),
            ),
            Value::Array(requests) => {
                let responses = join_all(
                    requests
                        .into_iter()
                        .map(|request| self.handle_envelope(request)),
                )
                .await;
                JsonRpcReply::Batch(responses)
            }
            single => JsonRpcReply::Single(self.handle_envelope(single).await),
        }
    }

    /// Dispatches a raw request body and returns the serialized reply.
    #[instrument(name = "Router::handle_payload", skip_all)]
    pub async fn handle_payload(&self, body: &str) -> String {
        let reply = match serde_json::from_str::<Value>(body) {
            Ok(payload) => self.handle_value(payload).await,
            Err(err) => {
                debug!("Unparsable payload: {err}");
                JsonRpcReply::Single(JsonRpcResponse::failure(
                    JsonRpcId::Null,
                    &RpcError::ParseError,
                ))
            }
        };

        serde_json::to_string(&reply).unwrap_or_else(|err| {
            error!("Failed to serialize reply: {err}");
            FALLBACK_INTERNAL_ERROR.to_string()
        })
    }

    async fn handle_envelope(&self, payload: Value) -> JsonRpcResponse {
        let id = JsonRpcId::recover(&payload);

        match serde_json::from_value::<JsonRpcRequest>(payload) {
            Ok(request) => self.call_procedure(request).await,
            Err(err) => {
                debug!("Invalid request envelope: {err}");
                JsonRpcResponse::failure(id, &RpcError::InvalidRequest)
            }
        }
    }
}

fn is_reserved(path: &str) -> bool {
    path == RESERVED_ROOT
        || path
            .strip_prefix(RESERVED_ROOT)
            .is_some_and(|rest| rest.starts_with('.'))
}

fn register_namespace(
    procedures: &mut BTreeMap<String, CompiledProcedure>,
    prefix: &str,
    namespace: &Namespace,
    engine: &Engine,
) -> Result<(), CompileError> {
    for (key, node) in namespace.entries() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };

        match node {
            NamespaceNode::Procedure(procedure) => {
                if procedures.contains_key(&path) {
                    return Err(CompileError::DuplicatePath(path));
                }

                let input = build_validator(engine, procedure.input_schema(), &path)?;
                let output = build_validator(engine, procedure.output_schema(), &path)?;

                procedures.insert(
                    path,
                    CompiledProcedure {
                        procedure: procedure.clone(),
                        input,
                        output,
                    },
                );
            }
            NamespaceNode::Namespace(child) => {
                register_namespace(procedures, &path, child, engine)?;
            }
        }
    }

    Ok(())
}

fn build_validator(
    engine: &Engine,
    schema: &rpc_schema::SchemaDescriptor,
    path: &str,
) -> Result<Validator, CompileError> {
    engine
        .validator(schema.clone())
        .map_err(|source| CompileError::Schema {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use rpc_procedure::handler_fn;
    use rpc_schema::{EngineOptions, Property, SchemaDescriptor};
    use serde_json::json;

    use super::*;

    fn echo() -> Procedure {
        Procedure::new(SchemaDescriptor::any(), SchemaDescriptor::any(), handler_fn(Ok))
    }

    fn engine() -> Engine {
        Engine::standard(EngineOptions::default()).unwrap()
    }

    #[test]
    fn compiles_nested_paths() {
        let namespace = Namespace::new()
            .procedure("ping", echo())
            .unwrap()
            .namespace(
                "a",
                Namespace::new()
                    .namespace("b", Namespace::new().procedure("c", echo()).unwrap())
                    .unwrap(),
            )
            .unwrap();

        let router = Router::compile(&namespace, &engine(), RouterOptions::default()).unwrap();

        assert_eq!(router.methods().collect::<Vec<_>>(), vec!["a.b.c", "ping"]);
        assert!(router.procedure("a.b").is_none());
    }

    #[test]
    fn unknown_custom_type_fails_compile() {
        let procedure = Procedure::new(
            SchemaDescriptor::object([(
                "id",
                Property::required(SchemaDescriptor::custom("ulid")),
            )]),
            SchemaDescriptor::any(),
            handler_fn(Ok),
        );
        let namespace = Namespace::new().procedure("fetch", procedure).unwrap();

        let err = Router::compile(&namespace, &engine(), RouterOptions::default())
            .err()
            .unwrap();

        assert!(matches!(err, CompileError::Schema { ref path, .. } if path == "fetch"));
    }

    #[test]
    fn reserved_root_requires_discover() {
        let namespace = Namespace::new()
            .namespace("rpc", Namespace::new().procedure("ping", echo()).unwrap())
            .unwrap();

        assert!(Router::compile(&namespace, &engine(), RouterOptions::default()).is_ok());

        let err = Router::compile(
            &namespace,
            &engine(),
            RouterOptions {
                enable_discover: true,
            },
        )
        .err()
        .unwrap();
        assert!(matches!(err, CompileError::ReservedPath(ref path) if path == "rpc.ping"));
    }

    #[test]
    fn reserved_check_is_segment_aware() {
        assert!(is_reserved("rpc"));
        assert!(is_reserved("rpc.discover"));
        assert!(!is_reserved("rpcs.list"));
    }

    #[tokio::test]
    async fn version_mismatch_is_invalid_request() {
        let namespace = Namespace::new().procedure("ping", echo()).unwrap();
        let router = Router::compile(&namespace, &engine(), RouterOptions::default()).unwrap();

        let mut request = JsonRpcRequest::new("ping", json!(1), 9u64.into());
        request.jsonrpc = "1.0".to_string();
        let response = router.call_procedure(request).await;

        assert_eq!(response.error().unwrap().code, -32600);
        assert_eq!(response.id, JsonRpcId::from(9u64));
    }
}
