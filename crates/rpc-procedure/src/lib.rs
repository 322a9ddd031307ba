// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

pub mod error;
pub mod handler;
pub mod namespace;
pub mod procedure;

pub use error::DefinitionError;
pub use handler::{Handler, async_handler_fn, handler_fn, typed_handler_fn};
pub use namespace::{Namespace, NamespaceNode};
pub use procedure::{Procedure, ProcedureBuilder};
