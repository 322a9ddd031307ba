// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// A procedure or namespace assembled incorrectly. Raised while the application is being put
/// together, never while serving a request.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("The output schema cannot be attached before the input schema")]
    OutputBeforeInput,

    #[error("The handler cannot be attached before the {missing} schema")]
    HandlerBeforeSchemas { missing: &'static str },

    #[error("The {0} schema is already attached")]
    StageRepeated(&'static str),

    #[error("Namespace keys must not be empty")]
    EmptyKey,

    #[error("Namespace key '{0}' must not contain '.'")]
    DottedKey(String),

    #[error("Namespace key '{key}' is already used by a {existing}")]
    DuplicateKey { key: String, existing: &'static str },
}
