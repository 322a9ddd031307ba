// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Declarative, pluggable schema validation.
//!
//! Descriptors ([`SchemaDescriptor`]) declare the expected shape of a `serde_json::Value`. An
//! [`Engine`] configured with [`Plugin`]s turns a descriptor into a [`Validator`], which returns
//! either the validated (possibly transformed) copy of a value or every [`ValidationError`]
//! found in one pass.
//!
//! ```
//! use rpc_schema::{Constraint, Engine, EngineOptions, Property, SchemaDescriptor};
//!
//! let engine = Engine::standard(EngineOptions::default())?;
//! let validator = engine.validator(SchemaDescriptor::object([(
//!     "quantity",
//!     Property::required(SchemaDescriptor::number().with_constraint(Constraint::minimum(1.0))),
//! )]))?;
//!
//! assert!(validator.check(&serde_json::json!({ "quantity": 0 })).errors.len() == 1);
//! ```

pub mod constraint;
pub mod declarative;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod path;
pub mod plugin;
pub mod standard;
pub mod transformer;
pub mod validation_error;

pub use constraint::Constraint;
pub use descriptor::{ObjectDescriptor, PrimitiveType, Property, SchemaDescriptor, SchemaKind};
pub use engine::{Engine, EngineOptions, Validator};
pub use error::ConstructionError;
pub use plugin::{CustomType, Plugin, PrevalidationError, PrevalidationStep, custom_type};
pub use transformer::Transformer;
pub use validation_error::{ValidationError, ValidationErrors, ValidationResult};
