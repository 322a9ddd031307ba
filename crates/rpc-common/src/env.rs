// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Key/value configuration sources.
//!
//! Options are read explicitly by the entry point from an [`Environment`] and passed down to
//! the engine and router. Tests use [`MapEnvironment`] instead of mutating the process
//! environment.

use std::collections::HashMap;
use std::sync::Arc;

const ENABLED_VALUES: [&str; 6] = ["true", "1", "yes", "on", "enabled", "enable"];
const DISABLED_VALUES: [&str; 6] = ["false", "0", "no", "off", "disabled", "disable"];

pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Interpret `key` as an on/off flag (case-insensitive), or `default_value` when unset.
    fn enabled(&self, key: &str, default_value: bool) -> Result<bool, EnvError> {
        let Some(raw) = self.get(key) else {
            return Ok(default_value);
        };

        let normalized = raw.trim().to_ascii_lowercase();
        if ENABLED_VALUES.contains(&normalized.as_str()) {
            Ok(true)
        } else if DISABLED_VALUES.contains(&normalized.as_str()) {
            Ok(false)
        } else {
            Err(EnvError::InvalidFlag {
                key: key.to_string(),
                value: raw,
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "{key} must be one of true/1/yes/on/enabled/enable or false/0/no/off/disabled/disable, got '{value}'"
    )]
    InvalidFlag { key: String, value: String },
}

/// The process environment.
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed values, consulted before an optional underlying environment.
#[derive(Clone, Default)]
pub struct MapEnvironment {
    overrides: HashMap<String, String>,
    underlying: Option<Arc<dyn Environment>>,
}

impl MapEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layered_over(mut self, underlying: Arc<dyn Environment>) -> Self {
        self.underlying = Some(underlying);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

impl Environment for MapEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        match self.overrides.get(key) {
            Some(value) => Some(value.clone()),
            None => self.underlying.as_deref().and_then(|env| env.get(key)),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for MapEnvironment {
    fn from(entries: [(&str, &str); N]) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |env, (key, value)| env.with(key, value))
    }
}
