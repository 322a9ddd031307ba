// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct JsonRpcRequest {
    #[serde(alias = "protocolVersion")]
    pub jsonrpc: String,

    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: JsonRpcId,
}

impl JsonRpcRequest {
    pub fn new(method: impl Into<String>, params: Value, id: JsonRpcId) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// Opaque request id, echoed unchanged in the response.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum JsonRpcId {
    Number(serde_json::Number),
    String(String),
    Null,
}

impl JsonRpcId {
    /// Best-effort id recovery from a payload that failed to parse as a request.
    pub fn recover(payload: &Value) -> Self {
        payload
            .get("id")
            .and_then(|id| serde_json::from_value(id.clone()).ok())
            .unwrap_or(JsonRpcId::Null)
    }
}

impl From<u64> for JsonRpcId {
    fn from(value: u64) -> Self {
        JsonRpcId::Number(value.into())
    }
}

impl From<&str> for JsonRpcId {
    fn from(value: &str) -> Self {
        JsonRpcId::String(value.to_string())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum JsonRpcOutcome {
    Result(Value),
    Error(JsonRpcErrorObject),
}

/// Carries exactly one of `result` or `error`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(flatten)]
    pub outcome: JsonRpcOutcome,
    pub id: JsonRpcId,
}

impl JsonRpcResponse {
    pub fn success(id: JsonRpcId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome: JsonRpcOutcome::Result(result),
            id,
        }
    }

    pub fn failure(id: JsonRpcId, error: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            outcome: JsonRpcOutcome::Error(JsonRpcErrorObject {
                code: error.code(),
                message: error.user_error_message(),
            }),
            id,
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            JsonRpcOutcome::Result(result) => Some(result),
            JsonRpcOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&JsonRpcErrorObject> {
        match &self.outcome {
            JsonRpcOutcome::Error(error) => Some(error),
            JsonRpcOutcome::Result(_) => None,
        }
    }
}

/// A reply to a raw payload: one response, or one per batch element in request order.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Single(JsonRpcResponse),
    Batch(Vec<JsonRpcResponse>),
}
