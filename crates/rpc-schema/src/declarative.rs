// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The declarative authoring form of descriptors.
//!
//! ```json
//! {
//!   "type": "object",
//!   "properties": {
//!     "title": { "type": "string", "constraints": [{ "name": "minLength", "args": [1] }] },
//!     "tags": { "type": [{ "type": "string" }], "optional": true },
//!     "id": { "type": { "custom": "uuid" } },
//!     "author": { "type": { "type": "object", "properties": { "name": { "type": "string" } } } },
//!     "count": {
//!       "type": "number",
//!       "transformers": [{ "name": "text-to-number", "input": "string", "output": "number" }]
//!     }
//!   }
//! }
//! ```
//!
//! Only the keys shown above are recognized. `optional` is meaningful only for a property.
//! A nested descriptor under `"type"` supplies the kind; its constraints and transformers run
//! before the ones declared next to it.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::{
    constraint::Constraint,
    descriptor::{ObjectDescriptor, PrimitiveType, Property, SchemaDescriptor, SchemaKind},
    error::ConstructionError,
    path,
    transformer::Transformer,
};

const KNOWN_KEYS: [&str; 6] = [
    "type",
    "properties",
    "optional",
    "description",
    "constraints",
    "transformers",
];

impl SchemaDescriptor {
    pub fn from_json(value: &Value) -> Result<Self, ConstructionError> {
        parse_property(value, "").map(|property| property.schema)
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();

        match &self.kind {
            SchemaKind::Primitive(ty) => {
                map.insert("type".to_string(), json!(ty.name()));
            }
            SchemaKind::Object(object) => {
                map.insert("type".to_string(), json!("object"));
                let properties = object
                    .properties
                    .iter()
                    .map(|(name, property)| {
                        let mut rendered = property.schema.to_json();
                        if property.optional
                            && let Value::Object(rendered_map) = &mut rendered
                        {
                            rendered_map.insert("optional".to_string(), json!(true));
                        }
                        (name.clone(), rendered)
                    })
                    .collect::<Map<_, _>>();
                map.insert("properties".to_string(), Value::Object(properties));
            }
            SchemaKind::Array(element) => {
                map.insert("type".to_string(), json!([element.to_json()]));
            }
            SchemaKind::Custom(name) => {
                map.insert("type".to_string(), json!({ "custom": name }));
            }
        }

        if let Some(description) = &self.description {
            map.insert("description".to_string(), json!(description));
        }
        if !self.constraints.is_empty() {
            let constraints = self
                .constraints
                .iter()
                .map(|c| json!({ "name": c.name(), "args": c.args() }))
                .collect::<Vec<_>>();
            map.insert("constraints".to_string(), Value::Array(constraints));
        }
        if !self.transformers.is_empty() {
            let transformers = self
                .transformers
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name(),
                        "input": t.input().name(),
                        "output": t.output().name(),
                    })
                })
                .collect::<Vec<_>>();
            map.insert("transformers".to_string(), Value::Array(transformers));
        }

        Value::Object(map)
    }
}

fn malformed(path: &str, message: impl Into<String>) -> ConstructionError {
    ConstructionError::MalformedDescriptor {
        path: path.to_string(),
        message: message.into(),
    }
}

fn parse_property(value: &Value, path: &str) -> Result<Property, ConstructionError> {
    let Value::Object(map) = value else {
        return Err(malformed(path, "descriptor must be an object"));
    };

    if let Some(unknown) = map.keys().find(|key| !KNOWN_KEYS.contains(&key.as_str())) {
        return Err(malformed(path, format!("unrecognized key '{unknown}'")));
    }

    let type_marker = map
        .get("type")
        .ok_or_else(|| malformed(path, "missing 'type'"))?;

    // A nested descriptor contributes its kind and its own description, constraints and
    // transformers; the outer ones are applied after them.
    let base = match type_marker {
        Value::String(name) if name == "object" => {
            let properties = map
                .get("properties")
                .ok_or_else(|| malformed(path, "an object descriptor requires 'properties'"))?;
            SchemaDescriptor::new(SchemaKind::Object(parse_properties(properties, path)?))
        }
        Value::String(name) => {
            let ty = PrimitiveType::from_name(name)
                .ok_or_else(|| malformed(path, format!("unknown type '{name}'")))?;
            SchemaDescriptor::new(SchemaKind::Primitive(ty))
        }
        Value::Array(elements) => match elements.as_slice() {
            [element] => {
                let element = parse_property(element, &path::index(path, 0))?;
                SchemaDescriptor::new(SchemaKind::Array(Box::new(element.schema)))
            }
            _ => {
                return Err(malformed(
                    path,
                    format!(
                        "an array type requires exactly one element descriptor, found {}",
                        elements.len()
                    ),
                ));
            }
        },
        Value::Object(marker) if marker.contains_key("custom") => {
            match (marker.len(), marker.get("custom")) {
                (1, Some(Value::String(name))) if !name.is_empty() => {
                    SchemaDescriptor::new(SchemaKind::Custom(name.clone()))
                }
                _ => {
                    return Err(malformed(
                        path,
                        "a custom type must be written as {\"custom\": \"<name>\"}",
                    ));
                }
            }
        }
        Value::Object(_) => {
            if map.contains_key("properties") {
                return Err(malformed(
                    path,
                    "'properties' belongs inside the nested type descriptor",
                ));
            }
            let nested = parse_property(type_marker, path)?;
            if nested.optional {
                return Err(malformed(path, "a nested type descriptor cannot be optional"));
            }
            nested.schema
        }
        _ => return Err(malformed(path, "'type' must be a string, array or object")),
    };

    if map.contains_key("properties") && !matches!(base.kind, SchemaKind::Object(_)) {
        return Err(malformed(path, "'properties' is only valid for an object"));
    }

    let optional = match map.get("optional") {
        None => false,
        Some(Value::Bool(optional)) => *optional,
        Some(_) => return Err(malformed(path, "'optional' must be a boolean")),
    };

    let description = match map.get("description") {
        None => base.description,
        Some(Value::String(description)) => Some(description.clone()),
        Some(_) => return Err(malformed(path, "'description' must be a string")),
    };

    let mut constraints = base.constraints;
    match map.get("constraints") {
        None => {}
        Some(Value::Array(declared)) => {
            for constraint in declared {
                constraints.push(parse_constraint(constraint, path)?);
            }
        }
        Some(_) => return Err(malformed(path, "'constraints' must be an array")),
    }

    let mut transformers = base.transformers;
    match map.get("transformers") {
        None => {}
        Some(Value::Array(declared)) => {
            for transformer in declared {
                transformers.push(parse_transformer(transformer, path)?);
            }
        }
        Some(_) => return Err(malformed(path, "'transformers' must be an array")),
    }

    Ok(Property {
        schema: SchemaDescriptor {
            kind: base.kind,
            description,
            constraints,
            transformers,
        },
        optional,
    })
}

fn parse_properties(value: &Value, path: &str) -> Result<ObjectDescriptor, ConstructionError> {
    let Value::Object(properties) = value else {
        return Err(malformed(path, "'properties' must be an object"));
    };

    let properties = properties
        .iter()
        .map(|(name, property)| {
            parse_property(property, &path::property(path, name))
                .map(|property| (name.clone(), property))
        })
        .collect::<Result<IndexMap<_, _>, _>>()?;

    Ok(ObjectDescriptor { properties })
}

fn parse_constraint(value: &Value, path: &str) -> Result<Constraint, ConstructionError> {
    match value {
        Value::String(name) => Constraint::from_name(name, &[]),
        Value::Object(map) => {
            let name = map
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(path, "a constraint requires a 'name'"))?;
            let args = match map.get("args") {
                None => &[][..],
                Some(Value::Array(args)) => args.as_slice(),
                Some(_) => return Err(malformed(path, "constraint 'args' must be an array")),
            };
            Constraint::from_name(name, args)
        }
        _ => Err(malformed(path, "a constraint must be a name or an object")),
    }
}

fn parse_transformer(value: &Value, path: &str) -> Result<Transformer, ConstructionError> {
    let marker = |map: &Map<String, Value>, key: &str| match map.get(key) {
        None => Ok(None),
        Some(Value::String(name)) => PrimitiveType::from_name(name)
            .map(Some)
            .ok_or_else(|| malformed(path, format!("unknown type marker '{name}'"))),
        Some(_) => Err(malformed(path, format!("transformer '{key}' must be a string"))),
    };

    match value {
        Value::String(name) => Transformer::from_name(name, None, None),
        Value::Object(map) => {
            let name = map
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| malformed(path, "a transformer requires a 'name'"))?;
            Transformer::from_name(name, marker(map, "input")?, marker(map, "output")?)
        }
        _ => Err(malformed(path, "a transformer must be a name or an object")),
    }
}
