// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Log filter directives (same syntax as `RUST_LOG`).
pub const RPC_LOG: &str = "RPC_LOG";

/// Remove properties not declared by an object descriptor from validated output.
pub const RPC_STRIP_UNKNOWN_PROPERTIES: &str = "RPC_STRIP_UNKNOWN_PROPERTIES";
/// Report properties not declared by an object descriptor as validation errors.
pub const RPC_ERROR_UNKNOWN_PROPERTIES: &str = "RPC_ERROR_UNKNOWN_PROPERTIES";

/// Serve the reserved `rpc.discover` method.
pub const RPC_ENABLE_DISCOVER: &str = "RPC_ENABLE_DISCOVER";
