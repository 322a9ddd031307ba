// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! A tree of procedures addressed by dot-separated paths.
//!
//! The tree is plain data. It has no dispatch behavior of its own; a router compiles it into a
//! lookup table.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::{error::DefinitionError, procedure::Procedure};

#[derive(Clone, Debug)]
pub enum NamespaceNode {
    Procedure(Arc<Procedure>),
    Namespace(Namespace),
}

impl NamespaceNode {
    fn kind(&self) -> &'static str {
        match self {
            NamespaceNode::Procedure(_) => "procedure",
            NamespaceNode::Namespace(_) => "namespace",
        }
    }
}

impl From<Procedure> for NamespaceNode {
    fn from(procedure: Procedure) -> Self {
        NamespaceNode::Procedure(Arc::new(procedure))
    }
}

impl From<Namespace> for NamespaceNode {
    fn from(namespace: Namespace) -> Self {
        NamespaceNode::Namespace(namespace)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Namespace {
    entries: IndexMap<String, NamespaceNode>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, NamespaceNode)>,
    ) -> Result<Self, DefinitionError> {
        entries
            .into_iter()
            .try_fold(Self::new(), |namespace, (key, node)| namespace.with(key, node))
    }

    pub fn procedure(
        self,
        key: impl Into<String>,
        procedure: Procedure,
    ) -> Result<Self, DefinitionError> {
        self.with(key, procedure.into())
    }

    pub fn namespace(
        self,
        key: impl Into<String>,
        namespace: Namespace,
    ) -> Result<Self, DefinitionError> {
        self.with(key, namespace.into())
    }

    pub fn with(
        mut self,
        key: impl Into<String>,
        node: NamespaceNode,
    ) -> Result<Self, DefinitionError> {
        self.insert(key, node)?;
        Ok(self)
    }

    /// Add an entry. A key may name either a procedure or a namespace, and only once.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        node: NamespaceNode,
    ) -> Result<(), DefinitionError> {
        let key = key.into();

        if key.is_empty() {
            return Err(DefinitionError::EmptyKey);
        }
        if key.contains('.') {
            return Err(DefinitionError::DottedKey(key));
        }
        if let Some(existing) = self.entries.get(&key) {
            return Err(DefinitionError::DuplicateKey {
                key,
                existing: existing.kind(),
            });
        }

        self.entries.insert(key, node);
        Ok(())
    }

    /// Combine two namespaces. Nested namespaces present on both sides are merged recursively;
    /// any other shared key is an error.
    pub fn merge(mut self, other: Namespace) -> Result<Self, DefinitionError> {
        for (key, node) in other.entries {
            if let Some(existing) = self.entries.get_mut(&key) {
                match (existing, node) {
                    (NamespaceNode::Namespace(mine), NamespaceNode::Namespace(theirs)) => {
                        *mine = std::mem::take(mine).merge(theirs)?;
                    }
                    (existing, _) => {
                        return Err(DefinitionError::DuplicateKey {
                            key,
                            existing: existing.kind(),
                        });
                    }
                }
            } else {
                self.entries.insert(key, node);
            }
        }
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&NamespaceNode> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &NamespaceNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
