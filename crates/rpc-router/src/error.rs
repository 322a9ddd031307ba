// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use rpc_schema::{ConstructionError, ValidationErrors};
use thiserror::Error;

/// Failure to compile a namespace tree into a router.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Procedure path '{0}' is registered more than once")]
    DuplicatePath(String),

    #[error("Invalid schema for procedure '{path}': {source}")]
    Schema {
        path: String,
        #[source]
        source: ConstructionError,
    },

    #[error("'{0}' is reserved for built-in methods")]
    ReservedPath(String),
}

/// Per-request failure. Each variant maps to a JSON-RPC error code; only
/// [`RpcError::user_error_message`] is ever sent back to the caller.
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("Invalid JSON")]
    ParseError,

    #[error("Invalid JSON-RPC request")]
    InvalidRequest,

    #[error("Method {0} not found")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(ValidationErrors),

    #[error("Procedure {method} failed: {cause:#}")]
    Handler { method: String, cause: anyhow::Error },

    #[error("Output of {method} does not match its schema: {errors}")]
    OutputContract {
        method: String,
        errors: ValidationErrors,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub const PARSE_ERROR_CODE: i64 = -32700;
pub const INVALID_REQUEST_CODE: i64 = -32600;
pub const METHOD_NOT_FOUND_CODE: i64 = -32601;
pub const INVALID_PARAMS_CODE: i64 = -32602;
pub const INTERNAL_ERROR_CODE: i64 = -32603;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::ParseError => PARSE_ERROR_CODE,
            RpcError::InvalidRequest => INVALID_REQUEST_CODE,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND_CODE,
            RpcError::InvalidParams(_) => INVALID_PARAMS_CODE,
            RpcError::Handler { .. } | RpcError::OutputContract { .. } | RpcError::Internal(_) => {
                INTERNAL_ERROR_CODE
            }
        }
    }

    /// The message safe to show to the caller. Handler and output failures are collapsed into a
    /// generic message so that no internal detail leaks.
    pub fn user_error_message(&self) -> String {
        match self {
            RpcError::ParseError
            | RpcError::InvalidRequest
            | RpcError::MethodNotFound(_)
            | RpcError::InvalidParams(_) => self.to_string(),
            RpcError::Handler { .. } | RpcError::OutputContract { .. } | RpcError::Internal(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Caused by the handler or the router rather than by the caller.
    pub fn is_internal(&self) -> bool {
        self.code() == INTERNAL_ERROR_CODE
    }
}
