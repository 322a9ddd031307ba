// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The validation engine.
//!
//! An [`Engine`] is configured once from an ordered list of plugins and [`EngineOptions`], then
//! hands out [`Validator`]s for individual descriptors. Building a validator checks that every
//! custom type the descriptor references is registered, so validation itself can only fail on
//! data.
//!
//! Per node, validation runs every plugin's prevalidation steps (in registration order) and then
//! the structural check for the node's kind. Constraints run only when the node's own shape
//! check succeeded. Errors from independent siblings are all collected; a prevalidation failure
//! aborts the whole pass with that single error.

use std::{collections::HashMap, sync::Arc};

use rpc_common::{
    env::{EnvError, Environment},
    env_const::{RPC_ERROR_UNKNOWN_PROPERTIES, RPC_STRIP_UNKNOWN_PROPERTIES},
};
use serde_json::Value;

use crate::{
    descriptor::{ObjectDescriptor, PrimitiveType, SchemaDescriptor, SchemaKind},
    error::ConstructionError,
    path,
    plugin::{CustomType, Plugin},
    validation_error::{ValidationError, ValidationErrors, ValidationResult},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Drop properties not declared by an object descriptor from the validated output
    pub strip_unknown_properties: bool,
    /// Report properties not declared by an object descriptor as errors
    pub error_unknown_properties: bool,
}

impl EngineOptions {
    pub fn from_env(env: &dyn Environment) -> Result<Self, EnvError> {
        Ok(Self {
            strip_unknown_properties: env.enabled(RPC_STRIP_UNKNOWN_PROPERTIES, false)?,
            error_unknown_properties: env.enabled(RPC_ERROR_UNKNOWN_PROPERTIES, false)?,
        })
    }
}

/// Immutable, cheaply clonable engine configuration.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    plugins: Vec<Plugin>,
    custom_types: HashMap<String, Arc<dyn CustomType>>,
    options: EngineOptions,
}

impl Engine {
    pub fn new(plugins: Vec<Plugin>, options: EngineOptions) -> Result<Self, ConstructionError> {
        if options.strip_unknown_properties && options.error_unknown_properties {
            return Err(ConstructionError::ConflictingUnknownPropertyOptions);
        }

        // Custom type name -> defining plugin
        let mut type_owners: HashMap<String, String> = HashMap::new();
        let mut custom_types = HashMap::new();

        for (index, plugin) in plugins.iter().enumerate() {
            if plugin.name.trim().is_empty() {
                return Err(ConstructionError::EmptyPluginName);
            }
            if plugin.version.trim().is_empty() {
                return Err(ConstructionError::MissingPluginVersion(plugin.name.clone()));
            }
            if plugins[..index].iter().any(|p| p.name == plugin.name) {
                return Err(ConstructionError::DuplicatePlugin(plugin.name.clone()));
            }

            for custom_type in plugin.types.iter() {
                let type_name = custom_type.name();
                if type_name.trim().is_empty() {
                    return Err(ConstructionError::EmptyCustomTypeName(plugin.name.clone()));
                }
                if let Some(first) = type_owners.get(type_name) {
                    return Err(ConstructionError::DuplicateCustomType {
                        type_name: type_name.to_string(),
                        first: first.clone(),
                        second: plugin.name.clone(),
                    });
                }
                type_owners.insert(type_name.to_string(), plugin.name.clone());
                custom_types.insert(type_name.to_string(), custom_type.clone());
            }
        }

        tracing::debug!(
            plugins = ?plugins.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            ?options,
            "Configured schema engine"
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                plugins,
                custom_types,
                options,
            }),
        })
    }

    /// An engine with only the standard plugin registered.
    pub fn standard(options: EngineOptions) -> Result<Self, ConstructionError> {
        Self::new(vec![crate::standard::plugin()], options)
    }

    pub fn options(&self) -> EngineOptions {
        self.inner.options
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.inner.plugins
    }

    pub fn custom_type(&self, name: &str) -> Option<&Arc<dyn CustomType>> {
        self.inner.custom_types.get(name)
    }

    pub fn validator(&self, descriptor: SchemaDescriptor) -> Result<Validator, ConstructionError> {
        if let Some((path, type_name)) = descriptor
            .custom_type_references()
            .into_iter()
            .find(|(_, type_name)| !self.inner.custom_types.contains_key(*type_name))
        {
            return Err(ConstructionError::UnknownCustomType {
                type_name: type_name.to_string(),
                path,
            });
        }

        Ok(Validator {
            engine: self.clone(),
            descriptor: Arc::new(descriptor),
        })
    }

    /// Build a validator and run it once.
    pub fn validate(
        &self,
        descriptor: SchemaDescriptor,
        value: &Value,
    ) -> Result<Result<Value, ValidationErrors>, ConstructionError> {
        Ok(self.validator(descriptor)?.validate(value))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("plugins", &self.inner.plugins)
            .field("options", &self.inner.options)
            .finish()
    }
}

/// A descriptor bound to the engine that checked it.
#[derive(Clone, Debug)]
pub struct Validator {
    engine: Engine,
    descriptor: Arc<SchemaDescriptor>,
}

impl Validator {
    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    /// Validate a value, returning the (possibly transformed or stripped) copy on success.
    /// `value` itself is never modified.
    pub fn validate(&self, value: &Value) -> Result<Value, ValidationErrors> {
        let mut run = ValidationRun {
            engine: &self.engine.inner,
            errors: Vec::new(),
        };

        match run.validate_node(&self.descriptor, value.clone(), "") {
            Ok(validated) if run.errors.is_empty() => Ok(validated),
            Ok(_) => Err(ValidationErrors(run.errors)),
            Err(Aborted(error)) => Err(ValidationErrors(vec![error])),
        }
    }

    /// Validate a value, reporting only whether it is valid and why not.
    pub fn check(&self, value: &Value) -> ValidationResult {
        match self.validate(value) {
            Ok(_) => ValidationResult::ok(),
            Err(errors) => errors.into(),
        }
    }
}

/// A prevalidation failure; stops the pass.
struct Aborted(ValidationError);

struct ValidationRun<'a> {
    engine: &'a EngineInner,
    errors: Vec<ValidationError>,
}

impl ValidationRun<'_> {
    fn validate_node(
        &mut self,
        schema: &SchemaDescriptor,
        value: Value,
        path: &str,
    ) -> Result<Value, Aborted> {
        let value = self.prevalidate(schema, value, path)?;

        let (value, shape_ok) = match &schema.kind {
            SchemaKind::Primitive(ty) => self.validate_primitive(*ty, value, path),
            SchemaKind::Custom(type_name) => self.validate_custom(type_name, value, path),
            SchemaKind::Object(object) => self.validate_object(schema, object, value, path)?,
            SchemaKind::Array(element) => self.validate_array(schema, element, value, path)?,
        };

        if shape_ok {
            for constraint in schema.constraints.iter() {
                if !constraint.check(&value) {
                    let signature = constraint.signature();
                    self.errors.push(
                        ValidationError::new(
                            path,
                            format!("Value {value} does not satisfy {signature}"),
                        )
                        .with_expected(signature)
                        .with_received(value.to_string())
                        .with_value(value.clone()),
                    );
                }
            }
        }

        Ok(value)
    }

    fn prevalidate(
        &self,
        schema: &SchemaDescriptor,
        value: Value,
        path: &str,
    ) -> Result<Value, Aborted> {
        self.engine
            .plugins
            .iter()
            .flat_map(|plugin| plugin.prevalidate.iter().map(move |step| (plugin, step)))
            .try_fold(value, |value, (plugin, step)| {
                let original = value.clone();
                step.prevalidate(value, schema, path).map_err(|e| {
                    tracing::debug!(plugin = %plugin.name, path, "Prevalidation failed: {}", e);
                    Aborted(
                        ValidationError::new(path, e.message)
                            .with_expected(schema.type_name())
                            .with_value(original),
                    )
                })
            })
    }

    fn validate_primitive(&mut self, ty: PrimitiveType, value: Value, path: &str) -> (Value, bool) {
        if ty.matches(&value) {
            (ty.normalize(value), true)
        } else {
            self.errors
                .push(ValidationError::type_mismatch(path, ty.name(), &value));
            (value, false)
        }
    }

    fn validate_custom(&mut self, type_name: &str, value: Value, path: &str) -> (Value, bool) {
        // Validators are only built once every referenced custom type is known
        let Some(custom_type) = self.engine.custom_types.get(type_name) else {
            self.errors.push(
                ValidationError::new(path, format!("Unknown custom type '{type_name}'"))
                    .with_expected(type_name),
            );
            return (value, false);
        };

        let result = custom_type.validate(&value);
        if result.valid && result.errors.is_empty() {
            (value, true)
        } else {
            if result.errors.is_empty() {
                self.errors.push(
                    ValidationError::new(path, format!("Invalid {type_name}"))
                        .with_expected(type_name)
                        .with_value(value.clone()),
                );
            }
            self.errors
                .extend(result.errors.into_iter().map(|error| error.prefixed(path)));
            (value, false)
        }
    }

    fn validate_object(
        &mut self,
        schema: &SchemaDescriptor,
        object: &ObjectDescriptor,
        value: Value,
        path: &str,
    ) -> Result<(Value, bool), Aborted> {
        let Value::Object(mut map) = value else {
            self.errors
                .push(ValidationError::type_mismatch(path, schema.type_name(), &value));
            return Ok((value, false));
        };

        for (name, property) in object.properties.iter() {
            let property_path = path::property(path, name);
            match map.get_mut(name) {
                Some(slot) => {
                    let property_value = slot.take();
                    *slot = self.validate_node(&property.schema, property_value, &property_path)?;
                }
                None if property.optional => {}
                None => self.errors.push(ValidationError::missing_property(
                    &property_path,
                    property.schema.type_name(),
                )),
            }
        }

        let options = self.engine.options;
        if options.strip_unknown_properties {
            map.retain(|name, _| object.properties.contains_key(name));
        } else if options.error_unknown_properties {
            for (name, unknown) in map.iter() {
                if !object.properties.contains_key(name) {
                    self.errors.push(ValidationError::unknown_property(
                        &path::property(path, name),
                        unknown,
                    ));
                }
            }
        }

        Ok((Value::Object(map), true))
    }

    fn validate_array(
        &mut self,
        schema: &SchemaDescriptor,
        element: &SchemaDescriptor,
        value: Value,
        path: &str,
    ) -> Result<(Value, bool), Aborted> {
        let Value::Array(elems) = value else {
            self.errors
                .push(ValidationError::type_mismatch(path, schema.type_name(), &value));
            return Ok((value, false));
        };

        let validated = elems
            .into_iter()
            .enumerate()
            .map(|(index, elem)| self.validate_node(element, elem, &path::index(path, index)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((Value::Array(validated), true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraint::Constraint,
        descriptor::Property,
        plugin::{PrevalidationError, custom_type},
        transformer::Transformer,
    };
    use rpc_common::env::MapEnvironment;
    use serde_json::json;

    fn user_descriptor() -> SchemaDescriptor {
        SchemaDescriptor::object([
            ("name", Property::required(SchemaDescriptor::string())),
            (
                "age",
                Property::required(
                    SchemaDescriptor::integer().with_constraint(Constraint::minimum(0.0)),
                ),
            ),
            (
                "email",
                Property::optional(SchemaDescriptor::string()),
            ),
        ])
    }

    fn engine(options: EngineOptions) -> Engine {
        Engine::standard(options).unwrap()
    }

    #[test]
    fn matching_value_is_valid() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();
        let value = json!({"name": "Ada", "age": 36});

        let result = validator.check(&value);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(validator.validate(&value).unwrap(), value);
    }

    #[test]
    fn single_mismatch_names_the_property() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();

        let errors = validator
            .validate(&json!({"name": 42, "age": 36}))
            .unwrap_err()
            .into_errors();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "name");
        assert_eq!(errors[0].expected.as_deref(), Some("string"));
        assert_eq!(errors[0].received.as_deref(), Some("number"));
        assert_eq!(errors[0].value, Some(json!(42)));
    }

    #[test]
    fn sibling_failures_are_aggregated() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();

        let errors = validator
            .validate(&json!({"name": false, "age": -1, "email": 3}))
            .unwrap_err()
            .into_errors();

        let paths = errors.iter().map(|e| e.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["name", "age", "email"]);
    }

    #[test]
    fn type_failure_skips_own_constraints_but_not_siblings() {
        let descriptor = SchemaDescriptor::object([
            (
                "count",
                Property::required(
                    SchemaDescriptor::number().with_constraint(Constraint::minimum(1.0)),
                ),
            ),
            (
                "limit",
                Property::required(
                    SchemaDescriptor::number().with_constraint(Constraint::maximum(10.0)),
                ),
            ),
        ]);
        let validator = engine(EngineOptions::default()).validator(descriptor).unwrap();

        let errors = validator
            .validate(&json!({"count": "zero", "limit": 11}))
            .unwrap_err()
            .into_errors();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path, "count");
        assert_eq!(errors[0].expected.as_deref(), Some("number"));
        assert_eq!(errors[1].path, "limit");
        assert_eq!(errors[1].expected.as_deref(), Some("maximum(10)"));
    }

    #[test]
    fn container_constraints_run_despite_child_errors() {
        let descriptor = SchemaDescriptor::array(SchemaDescriptor::integer())
            .with_constraint(Constraint::max_length(2));
        let validator = engine(EngineOptions::default()).validator(descriptor).unwrap();

        let errors = validator
            .validate(&json!([1, "two", 3]))
            .unwrap_err()
            .into_errors();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path, "[1]");
        assert_eq!(errors[1].path, "");
        assert_eq!(errors[1].expected.as_deref(), Some("maxLength(2)"));
    }

    #[test]
    fn integral_float_is_an_integer() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();

        let validated = validator
            .validate(&json!({"name": "Ada", "age": 36.0}))
            .unwrap();
        assert_eq!(validated, json!({"name": "Ada", "age": 36}));
        assert!(validated["age"].is_i64());

        let errors = validator
            .validate(&json!({"name": "Ada", "age": 36.5}))
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "age");
    }

    #[test]
    fn minimum_constraint() {
        let descriptor = SchemaDescriptor::object([(
            "quantity",
            Property::required(
                SchemaDescriptor::number().with_constraint(Constraint::minimum(1.0)),
            ),
        )]);
        let validator = engine(EngineOptions::default()).validator(descriptor).unwrap();

        let errors = validator
            .validate(&json!({"quantity": 0}))
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "quantity");
        assert!(errors[0].message.contains("minimum(1)"));

        assert!(validator.check(&json!({"quantity": 1})).valid);
    }

    #[test]
    fn transformer_runs_before_structural_check() {
        let validator = engine(EngineOptions::default())
            .validator(SchemaDescriptor::number().with_transformer(Transformer::text_to_number()))
            .unwrap();

        let input = json!("42");
        assert_eq!(validator.validate(&input).unwrap(), json!(42));
        // The input is left alone
        assert_eq!(input, json!("42"));
    }

    #[test]
    fn nested_transformers_and_constraints_compose() {
        let descriptor = SchemaDescriptor::object([(
            "pages",
            Property::required(SchemaDescriptor::array(
                SchemaDescriptor::integer()
                    .with_transformer(Transformer::trim())
                    .with_transformer(Transformer::text_to_integer())
                    .with_constraint(Constraint::minimum(1.0)),
            )),
        )]);
        let validator = engine(EngineOptions::default()).validator(descriptor).unwrap();

        assert_eq!(
            validator.validate(&json!({"pages": [" 1 ", 2, "3"]})).unwrap(),
            json!({"pages": [1, 2, 3]})
        );

        let errors = validator
            .validate(&json!({"pages": ["0"]}))
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "pages[0]");
    }

    #[test]
    fn failed_transform_aborts_with_path() {
        let descriptor = SchemaDescriptor::object([
            (
                "price",
                Property::required(
                    SchemaDescriptor::number().with_transformer(Transformer::text_to_number()),
                ),
            ),
            ("title", Property::required(SchemaDescriptor::string())),
        ]);
        let validator = engine(EngineOptions::default()).validator(descriptor).unwrap();

        let errors = validator
            .validate(&json!({"price": "cheap", "title": 1}))
            .unwrap_err()
            .into_errors();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "price");
        assert!(errors[0].message.contains("'cheap' is not a number"));
    }

    #[test]
    fn transformers_need_a_plugin_to_apply_them() {
        let engine = Engine::new(vec![], EngineOptions::default()).unwrap();
        let validator = engine
            .validator(SchemaDescriptor::number().with_transformer(Transformer::text_to_number()))
            .unwrap();

        assert!(!validator.check(&json!("42")).valid);
    }

    #[test]
    fn unknown_properties_pass_through_by_default() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();
        let value = json!({"name": "Ada", "age": 36, "role": "admin"});

        assert_eq!(validator.validate(&value).unwrap(), value);
    }

    #[test]
    fn unknown_properties_stripped() {
        let validator = engine(EngineOptions {
            strip_unknown_properties: true,
            ..Default::default()
        })
        .validator(user_descriptor())
        .unwrap();
        let value = json!({"name": "Ada", "role": "admin", "age": 36});

        assert_eq!(
            validator.validate(&value).unwrap(),
            json!({"name": "Ada", "age": 36})
        );
        assert_eq!(value["role"], json!("admin"));
    }

    #[test]
    fn unknown_properties_reported() {
        let validator = engine(EngineOptions {
            error_unknown_properties: true,
            ..Default::default()
        })
        .validator(user_descriptor())
        .unwrap();

        let errors = validator
            .validate(&json!({"name": "Ada", "age": 36, "role": "admin"}))
            .unwrap_err()
            .into_errors();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "role");
        assert_eq!(errors[0].message, "Unknown property");
    }

    #[test]
    fn conflicting_unknown_property_options() {
        assert_eq!(
            Engine::standard(EngineOptions {
                strip_unknown_properties: true,
                error_unknown_properties: true,
            })
            .unwrap_err(),
            ConstructionError::ConflictingUnknownPropertyOptions
        );
    }

    #[test]
    fn missing_required_property() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();

        let errors = validator.validate(&json!({})).unwrap_err().into_errors();
        let paths = errors.iter().map(|e| e.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["name", "age"]);
        assert_eq!(errors[0].received.as_deref(), Some("missing"));
    }

    #[test]
    fn non_object_does_not_descend() {
        let validator = engine(EngineOptions::default())
            .validator(user_descriptor())
            .unwrap();

        let errors = validator.validate(&json!([1])).unwrap_err().into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "");
        assert_eq!(errors[0].received.as_deref(), Some("array"));
    }

    #[test]
    fn nested_paths() {
        let descriptor = SchemaDescriptor::object([(
            "posts",
            Property::required(SchemaDescriptor::array(SchemaDescriptor::object([(
                "title",
                Property::required(SchemaDescriptor::string()),
            )]))),
        )]);
        let validator = engine(EngineOptions::default()).validator(descriptor).unwrap();

        let errors = validator
            .validate(&json!({"posts": [{"title": "a"}, {"title": 2}]}))
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "posts[1].title");
    }

    #[test]
    fn custom_type_errors_are_prefixed() {
        let point = custom_type("point", "An [x, y] pair", |value| match value.as_array() {
            Some(coordinates) if coordinates.len() == 2 => Ok(()),
            _ => Err("Expected an [x, y] pair".to_string()),
        });
        let engine = Engine::new(
            vec![Plugin::new("geometry", "1.0.0").with_type(point)],
            EngineOptions::default(),
        )
        .unwrap();

        let validator = engine
            .validator(SchemaDescriptor::object([(
                "location",
                Property::required(SchemaDescriptor::custom("point")),
            )]))
            .unwrap();

        assert!(validator.check(&json!({"location": [1, 2]})).valid);

        let errors = validator
            .validate(&json!({"location": [1]}))
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "location");
        assert_eq!(errors[0].expected.as_deref(), Some("point"));
    }

    #[test]
    fn silent_custom_type_failure_gets_a_generic_error() {
        struct Never;

        impl CustomType for Never {
            fn name(&self) -> &str {
                "never"
            }

            fn validate(&self, _value: &Value) -> ValidationResult {
                ValidationResult {
                    valid: false,
                    errors: vec![],
                }
            }
        }

        let engine = Engine::new(
            vec![Plugin::new("strict", "0.1.0").with_type(Arc::new(Never))],
            EngineOptions::default(),
        )
        .unwrap();
        let validator = engine
            .validator(SchemaDescriptor::object([(
                "token",
                Property::required(SchemaDescriptor::custom("never")),
            )]))
            .unwrap();

        let errors = validator
            .validate(&json!({"token": "abc"}))
            .unwrap_err()
            .into_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "token");
        assert_eq!(errors[0].message, "Invalid never");
        assert_eq!(errors[0].expected.as_deref(), Some("never"));
        assert_eq!(errors[0].value, Some(json!("abc")));
    }

    #[test]
    fn unregistered_custom_type_is_a_construction_error() {
        let result = engine(EngineOptions::default()).validator(SchemaDescriptor::object([(
            "slug",
            Property::required(SchemaDescriptor::custom("slug")),
        )]));

        assert_eq!(
            result.unwrap_err(),
            ConstructionError::UnknownCustomType {
                type_name: "slug".to_string(),
                path: "slug".to_string()
            }
        );
    }

    #[test]
    fn prevalidation_steps_run_in_registration_order() {
        fn append_a(
            value: Value,
            _schema: &SchemaDescriptor,
            _path: &str,
        ) -> Result<Value, PrevalidationError> {
            Ok(match value {
                Value::String(s) => Value::String(s + "a"),
                other => other,
            })
        }

        fn append_b(
            value: Value,
            _schema: &SchemaDescriptor,
            _path: &str,
        ) -> Result<Value, PrevalidationError> {
            Ok(match value {
                Value::String(s) => Value::String(s + "b"),
                other => other,
            })
        }

        let engine = Engine::new(
            vec![
                Plugin::new("first", "1").with_prevalidation(append_a),
                Plugin::new("second", "1").with_prevalidation(append_b),
            ],
            EngineOptions::default(),
        )
        .unwrap();

        let validator = engine.validator(SchemaDescriptor::string()).unwrap();
        assert_eq!(validator.validate(&json!("")).unwrap(), json!("ab"));
    }

    #[test]
    fn malformed_plugins() {
        assert_eq!(
            Engine::new(vec![Plugin::new("", "1")], EngineOptions::default()).unwrap_err(),
            ConstructionError::EmptyPluginName
        );
        assert_eq!(
            Engine::new(vec![Plugin::new("x", "")], EngineOptions::default()).unwrap_err(),
            ConstructionError::MissingPluginVersion("x".to_string())
        );
        assert_eq!(
            Engine::new(
                vec![Plugin::new("x", "1"), Plugin::new("x", "2")],
                EngineOptions::default()
            )
            .unwrap_err(),
            ConstructionError::DuplicatePlugin("x".to_string())
        );

        let uuid_again = custom_type("uuid", "Another uuid", |_| Ok(()));
        assert!(matches!(
            Engine::new(
                vec![
                    crate::standard::plugin(),
                    Plugin::new("mine", "1").with_type(uuid_again)
                ],
                EngineOptions::default()
            ),
            Err(ConstructionError::DuplicateCustomType { type_name, .. }) if type_name == "uuid"
        ));
    }

    #[test]
    fn options_from_env() {
        let env = MapEnvironment::from([(RPC_STRIP_UNKNOWN_PROPERTIES, "true")]);
        assert_eq!(
            EngineOptions::from_env(&env).unwrap(),
            EngineOptions {
                strip_unknown_properties: true,
                error_unknown_properties: false
            }
        );

        let env = MapEnvironment::from([(RPC_ERROR_UNKNOWN_PROPERTIES, "sometimes")]);
        assert!(EngineOptions::from_env(&env).is_err());
    }
}
