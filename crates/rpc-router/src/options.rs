// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use rpc_common::env::{EnvError, Environment};
use rpc_common::env_const::RPC_ENABLE_DISCOVER;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterOptions {
    /// Serve the built-in `rpc.discover` method.
    pub enable_discover: bool,
}

impl RouterOptions {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            enable_discover: env.enabled(RPC_ENABLE_DISCOVER, false)?,
        })
    }
}
