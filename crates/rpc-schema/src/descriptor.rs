// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Descriptor types that declare the expected shape of a value.
//!
//! A [`SchemaDescriptor`] is an explicit tagged variant ([`SchemaKind`]) plus the optional
//! features every node may carry: a description, an ordered list of [`Constraint`]s and an
//! ordered list of [`Transformer`]s.

use std::fmt::Display;

use indexmap::IndexMap;
use serde_json::Value;

use crate::{constraint::Constraint, transformer::Transformer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Any,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 6] = [
        PrimitiveType::String,
        PrimitiveType::Number,
        PrimitiveType::Integer,
        PrimitiveType::Boolean,
        PrimitiveType::Null,
        PrimitiveType::Any,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
            PrimitiveType::Any => "any",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Whether the runtime type of `value` is acceptable for this primitive. An integer also
    /// accepts a float with no fractional part within the `i64` range, such as `3.0`.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            PrimitiveType::String => value.is_string(),
            PrimitiveType::Number => value.is_number(),
            PrimitiveType::Integer => {
                value.is_i64() || value.is_u64() || integral_float(value).is_some()
            }
            PrimitiveType::Boolean => value.is_boolean(),
            PrimitiveType::Null => value.is_null(),
            PrimitiveType::Any => true,
        }
    }

    /// The canonical form of a value that [`matches`](Self::matches): integral floats become
    /// integers. Everything else is returned unchanged.
    pub fn normalize(&self, value: Value) -> Value {
        match (self, integral_float(&value)) {
            (PrimitiveType::Integer, Some(integer)) => Value::from(integer),
            _ => value,
        }
    }
}

fn integral_float(value: &Value) -> Option<i64> {
    let float = value.as_f64().filter(|_| value.is_f64())?;
    (float.fract() == 0.0 && float >= i64::MIN as f64 && float < i64::MAX as f64)
        .then_some(float as i64)
}

impl Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of the runtime type of a value, as reported in `received`.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Primitive(PrimitiveType),
    Object(ObjectDescriptor),
    Array(Box<SchemaDescriptor>),
    /// A type supplied by a registered plugin, referenced by name
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    pub kind: SchemaKind,
    /// Documentation only; never consulted during validation
    pub description: Option<String>,
    pub constraints: Vec<Constraint>,
    pub transformers: Vec<Transformer>,
}

impl SchemaDescriptor {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            constraints: Vec::new(),
            transformers: Vec::new(),
        }
    }

    pub fn primitive(ty: PrimitiveType) -> Self {
        Self::new(SchemaKind::Primitive(ty))
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveType::String)
    }

    pub fn number() -> Self {
        Self::primitive(PrimitiveType::Number)
    }

    pub fn integer() -> Self {
        Self::primitive(PrimitiveType::Integer)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveType::Boolean)
    }

    pub fn null() -> Self {
        Self::primitive(PrimitiveType::Null)
    }

    pub fn any() -> Self {
        Self::primitive(PrimitiveType::Any)
    }

    /// An object descriptor from `(name, property)` pairs, keeping their order.
    pub fn object<N: Into<String>>(properties: impl IntoIterator<Item = (N, Property)>) -> Self {
        Self::new(SchemaKind::Object(ObjectDescriptor::new(properties)))
    }

    pub fn array(element: SchemaDescriptor) -> Self {
        Self::new(SchemaKind::Array(Box::new(element)))
    }

    pub fn custom(type_name: impl Into<String>) -> Self {
        Self::new(SchemaKind::Custom(type_name.into()))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// A short name for the expected type, used in `expected`.
    pub fn type_name(&self) -> String {
        match &self.kind {
            SchemaKind::Primitive(ty) => ty.name().to_string(),
            SchemaKind::Object(_) => "object".to_string(),
            SchemaKind::Array(element) => format!("{}[]", element.type_name()),
            SchemaKind::Custom(name) => name.clone(),
        }
    }

    /// Names of all custom types referenced anywhere in this descriptor, with the path at which
    /// they are referenced.
    pub fn custom_type_references(&self) -> Vec<(String, &str)> {
        let mut references = Vec::new();
        self.collect_custom_type_references("", &mut references);
        references
    }

    fn collect_custom_type_references<'a>(
        &'a self,
        path: &str,
        references: &mut Vec<(String, &'a str)>,
    ) {
        match &self.kind {
            SchemaKind::Primitive(_) => {}
            SchemaKind::Custom(name) => references.push((path.to_string(), name.as_str())),
            SchemaKind::Array(element) => element
                .collect_custom_type_references(&crate::path::index(path, 0), references),
            SchemaKind::Object(object) => {
                for (name, property) in object.properties.iter() {
                    let property_path = crate::path::property(path, name);
                    property
                        .schema
                        .collect_custom_type_references(&property_path, references)
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectDescriptor {
    pub properties: IndexMap<String, Property>,
}

impl ObjectDescriptor {
    pub fn new<N: Into<String>>(properties: impl IntoIterator<Item = (N, Property)>) -> Self {
        Self {
            properties: properties
                .into_iter()
                .map(|(name, property)| (name.into(), property))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub schema: SchemaDescriptor,
    pub optional: bool,
}

impl Property {
    pub fn required(schema: SchemaDescriptor) -> Self {
        Self {
            schema,
            optional: false,
        }
    }

    pub fn optional(schema: SchemaDescriptor) -> Self {
        Self {
            schema,
            optional: true,
        }
    }
}

impl From<SchemaDescriptor> for Property {
    fn from(schema: SchemaDescriptor) -> Self {
        Property::required(schema)
    }
}
