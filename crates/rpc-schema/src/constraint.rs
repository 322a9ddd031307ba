// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Named predicates attached to a descriptor node, checked after the node's own shape check
//! succeeds.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::ConstructionError;

pub type ConstraintPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct Constraint {
    name: String,
    args: Vec<Value>,
    predicate: ConstraintPredicate,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        args: Vec<Value>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            args,
            predicate: Arc::new(predicate),
        }
    }

    pub fn minimum(minimum: f64) -> Self {
        Self::new("minimum", vec![number_value(minimum)], move |value| {
            value.as_f64().is_some_and(|value| value >= minimum)
        })
    }

    pub fn maximum(maximum: f64) -> Self {
        Self::new("maximum", vec![number_value(maximum)], move |value| {
            value.as_f64().is_some_and(|value| value <= maximum)
        })
    }

    /// Minimum number of characters of a string or elements of an array.
    pub fn min_length(min_length: usize) -> Self {
        Self::new("minLength", vec![Value::from(min_length)], move |value| {
            length(value).is_some_and(|length| length >= min_length)
        })
    }

    /// Maximum number of characters of a string or elements of an array.
    pub fn max_length(max_length: usize) -> Self {
        Self::new("maxLength", vec![Value::from(max_length)], move |value| {
            length(value).is_some_and(|length| length <= max_length)
        })
    }

    pub fn pattern(pattern: &str) -> Result<Self, ConstructionError> {
        let regex = Regex::new(pattern).map_err(|e| ConstructionError::InvalidConstraintArguments {
            constraint: "pattern".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self::new(
            "pattern",
            vec![Value::from(pattern)],
            move |value| value.as_str().is_some_and(|s| regex.is_match(s)),
        ))
    }

    pub fn one_of(allowed: impl IntoIterator<Item = Value>) -> Self {
        let allowed: Vec<Value> = allowed.into_iter().collect();
        let args = allowed.clone();
        Self::new("oneOf", args, move |value| allowed.contains(value))
    }

    /// Resolve a built-in constraint from its declarative form (`{"name": .., "args": [..]}`).
    pub fn from_name(name: &str, args: &[Value]) -> Result<Self, ConstructionError> {
        let invalid = |message: &str| ConstructionError::InvalidConstraintArguments {
            constraint: name.to_string(),
            message: message.to_string(),
        };

        match name {
            "minimum" | "maximum" => {
                let [bound] = args else {
                    return Err(invalid("expected exactly one numeric argument"));
                };
                let bound = bound
                    .as_f64()
                    .ok_or_else(|| invalid("expected exactly one numeric argument"))?;
                Ok(if name == "minimum" {
                    Self::minimum(bound)
                } else {
                    Self::maximum(bound)
                })
            }
            "minLength" | "maxLength" => {
                let [bound] = args else {
                    return Err(invalid("expected exactly one non-negative integer argument"));
                };
                let bound = bound
                    .as_u64()
                    .ok_or_else(|| invalid("expected exactly one non-negative integer argument"))?
                    as usize;
                Ok(if name == "minLength" {
                    Self::min_length(bound)
                } else {
                    Self::max_length(bound)
                })
            }
            "pattern" => match args {
                [Value::String(pattern)] => Self::pattern(pattern),
                _ => Err(invalid("expected exactly one string argument")),
            },
            "oneOf" => {
                if args.is_empty() {
                    Err(invalid("expected at least one allowed value"))
                } else {
                    Ok(Self::one_of(args.iter().cloned()))
                }
            }
            _ => Err(ConstructionError::UnknownConstraint(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    /// Rendered as a call, e.g. `minimum(1)`.
    pub fn signature(&self) -> String {
        let args = self
            .args
            .iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({args})", self.name)
    }
}

impl std::fmt::Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.signature())
    }
}

/// Two constraints are the same if they have the same name and arguments.
impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.args == other.args
    }
}

fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(elems) => Some(elems.len()),
        _ => None,
    }
}

/// Keep integral bounds as integers so that they render as `1` rather than `1.0`.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_bounds() {
        let minimum = Constraint::minimum(1.0);
        assert_eq!(minimum.signature(), "minimum(1)");
        assert!(!minimum.check(&json!(0)));
        assert!(minimum.check(&json!(1)));
        assert!(minimum.check(&json!(1.5)));
        assert!(!minimum.check(&json!("2")));

        let maximum = Constraint::maximum(2.5);
        assert_eq!(maximum.signature(), "maximum(2.5)");
        assert!(maximum.check(&json!(2)));
        assert!(!maximum.check(&json!(3)));
    }

    #[test]
    fn lengths_count_characters() {
        let max_length = Constraint::max_length(3);
        assert!(max_length.check(&json!("héé")));
        assert!(!max_length.check(&json!("abcd")));
        assert!(max_length.check(&json!([1, 2])));
        assert!(!Constraint::min_length(1).check(&json!("")));
    }

    #[test]
    fn declarative_resolution() {
        let pattern = Constraint::from_name("pattern", &[json!("^[a-z-]+$")]).unwrap();
        assert!(pattern.check(&json!("hello-world")));
        assert!(!pattern.check(&json!("Hello")));

        let one_of = Constraint::from_name("oneOf", &[json!("draft"), json!("published")]).unwrap();
        assert_eq!(one_of.signature(), r#"oneOf("draft", "published")"#);
        assert!(one_of.check(&json!("draft")));
        assert!(!one_of.check(&json!("archived")));

        assert!(matches!(
            Constraint::from_name("minimum", &[json!("one")]),
            Err(ConstructionError::InvalidConstraintArguments { .. })
        ));
        assert!(matches!(
            Constraint::from_name("pattern", &[json!("(")]),
            Err(ConstructionError::InvalidConstraintArguments { .. })
        ));
        assert!(matches!(
            Constraint::from_name("even", &[]),
            Err(ConstructionError::UnknownConstraint(name)) if name == "even"
        ));
    }

    #[test]
    fn equality_ignores_predicate() {
        assert_eq!(Constraint::minimum(1.0), Constraint::minimum(1.0));
        assert_ne!(Constraint::minimum(1.0), Constraint::maximum(1.0));
    }
}
