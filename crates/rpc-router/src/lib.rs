// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! JSON-RPC dispatch over a tree of validated procedures.
//!
//! A [`Namespace`](rpc_procedure::Namespace) is compiled once into a [`Router`], which maps each
//! dot-joined method path to its procedure together with the input and output validators built
//! by a [`rpc_schema::Engine`]. Each call validates its params, awaits the handler, and then
//! validates the handler's result before answering.

mod error;
mod introspection;
mod options;
mod protocol;
mod router;

pub use error::{
    CompileError, INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE, INVALID_REQUEST_CODE,
    METHOD_NOT_FOUND_CODE, PARSE_ERROR_CODE, RpcError,
};
pub use introspection::{ApiDescription, DISCOVER_METHOD, MethodDescription};
pub use options::RouterOptions;
pub use protocol::{
    JSONRPC_VERSION, JsonRpcErrorObject, JsonRpcId, JsonRpcOutcome, JsonRpcReply, JsonRpcRequest,
    JsonRpcResponse,
};
pub use router::Router;
