// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// A malformed descriptor, plugin or engine configuration. These are programmer errors and
/// surface while the application is being assembled, before any value is validated.
#[derive(Error, Debug, PartialEq)]
pub enum ConstructionError {
    #[error("Plugin name must not be empty")]
    EmptyPluginName,

    #[error("Plugin '{0}' must declare a version")]
    MissingPluginVersion(String),

    #[error("Plugin '{0}' is registered more than once")]
    DuplicatePlugin(String),

    #[error("Custom type name must not be empty (plugin '{0}')")]
    EmptyCustomTypeName(String),

    #[error("Custom type '{type_name}' is defined by both '{first}' and '{second}'")]
    DuplicateCustomType {
        type_name: String,
        first: String,
        second: String,
    },

    #[error("Custom type '{type_name}' referenced at '{path}' is not registered")]
    UnknownCustomType { type_name: String, path: String },

    #[error("Unknown properties cannot be both stripped and reported as errors")]
    ConflictingUnknownPropertyOptions,

    #[error("Unknown constraint '{0}'")]
    UnknownConstraint(String),

    #[error("Invalid arguments for constraint '{constraint}': {message}")]
    InvalidConstraintArguments { constraint: String, message: String },

    #[error("Unknown transformer '{0}'")]
    UnknownTransformer(String),

    #[error("Transformer '{transformer}' is declared as {declared}, but converts {actual}")]
    TransformerTypeMismatch {
        transformer: String,
        declared: String,
        actual: String,
    },

    #[error("Malformed descriptor at '{path}': {message}")]
    MalformedDescriptor { path: String, message: String },
}
