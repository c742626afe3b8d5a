// src/config/options.rs

//! Typed accessor over a step's open-ended option bag.
//!
//! Keys are compared after normalisation (lower-cased, `-` and `_` removed),
//! so `timeoutSeconds`, `timeout-seconds` and `timeout_seconds` are the same
//! option. Each lookup takes a list of names: the canonical spelling first,
//! then any aliases. The first name present wins.

use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::errors::{Result, SitepipeError};

/// Normalise an option key for comparison.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOptions {
    values: Map<String, Value>,
}

impl From<Map<String, Value>> for StepOptions {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl StepOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Find the first present (non-null) option among `names`, returning the
    /// key as spelled in the document together with its value.
    pub fn find(&self, names: &[&str]) -> Option<(&str, &Value)> {
        names.iter().find_map(|name| {
            let wanted = normalize_key(name);
            self.values
                .iter()
                .find(|(k, v)| !v.is_null() && normalize_key(k) == wanted)
                .map(|(k, v)| (k.as_str(), v))
        })
    }

    pub fn contains(&self, names: &[&str]) -> bool {
        self.find(names).is_some()
    }

    pub fn raw(&self, names: &[&str]) -> Option<&Value> {
        self.find(names).map(|(_, v)| v)
    }

    /// Typed lookup. `Ok(None)` when absent; a configuration error naming the
    /// option when present but not coercible.
    pub fn get<T: FromOption>(&self, names: &[&str]) -> Result<Option<T>> {
        match self.find(names) {
            None => Ok(None),
            Some((key, value)) => T::from_option(value).map(Some).ok_or_else(|| {
                SitepipeError::config(format!(
                    "option '{key}' must be {} (got {value})",
                    T::KIND
                ))
            }),
        }
    }

    pub fn get_or<T: FromOption>(&self, names: &[&str], default: T) -> Result<T> {
        Ok(self.get(names)?.unwrap_or(default))
    }

    pub fn require<T: FromOption>(&self, names: &[&str]) -> Result<T> {
        self.get(names)?.ok_or_else(|| {
            SitepipeError::config(format!(
                "missing required option '{}'",
                names.first().copied().unwrap_or("?")
            ))
        })
    }

    /// A non-blank string option.
    pub fn get_string(&self, names: &[&str]) -> Result<Option<String>> {
        Ok(self
            .get::<String>(names)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }

    pub fn require_string(&self, names: &[&str]) -> Result<String> {
        self.get_string(names)?.ok_or_else(|| {
            SitepipeError::config(format!(
                "missing required option '{}'",
                names.first().copied().unwrap_or("?")
            ))
        })
    }

    pub fn get_list(&self, names: &[&str]) -> Result<Vec<String>> {
        self.get_or(names, Vec::new())
    }

    pub fn get_path(&self, names: &[&str]) -> Result<Option<PathBuf>> {
        Ok(self.get_string(names)?.map(PathBuf::from))
    }

    /// Parse an enumerated option through `FromStr`.
    pub fn get_enum<T>(&self, names: &[&str]) -> Result<Option<T>>
    where
        T: std::str::FromStr<Err = String>,
    {
        match self.get_string(names)? {
            None => Ok(None),
            Some(s) => s.parse::<T>().map(Some).map_err(SitepipeError::ConfigError),
        }
    }

    /// Set an option, replacing whatever spelling of it is already present.
    pub fn set(&mut self, name: &str, value: Value) {
        let wanted = normalize_key(name);
        let existing = self
            .values
            .keys()
            .find(|k| normalize_key(k) == wanted)
            .cloned();
        match existing {
            Some(key) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.insert(name.to_string(), value);
            }
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }
}

/// Coercion from a raw option value into a typed setting.
pub trait FromOption: Sized {
    /// Human-readable kind used in error messages.
    const KIND: &'static str;

    fn from_option(value: &Value) -> Option<Self>;
}

impl FromOption for String {
    const KIND: &'static str = "a string";

    fn from_option(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl FromOption for bool {
    const KIND: &'static str = "a boolean";

    fn from_option(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|i| i != 0),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromOption for i64 {
    const KIND: &'static str = "an integer";

    fn from_option(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FromOption for i32 {
    const KIND: &'static str = "an integer";

    fn from_option(value: &Value) -> Option<Self> {
        i64::from_option(value).and_then(|i| i32::try_from(i).ok())
    }
}

impl FromOption for u32 {
    const KIND: &'static str = "a non-negative integer";

    fn from_option(value: &Value) -> Option<Self> {
        i64::from_option(value).and_then(|i| u32::try_from(i).ok())
    }
}

impl FromOption for Vec<String> {
    const KIND: &'static str = "a list of strings";

    fn from_option(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items.iter().map(String::from_option).collect(),
            Value::String(s) => Some(
                s.split([',', ';'])
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl FromOption for Map<String, Value> {
    const KIND: &'static str = "an object";

    fn from_option(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }
}

impl FromOption for Vec<Map<String, Value>> {
    const KIND: &'static str = "a list of objects";

    fn from_option(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|v| v.as_object().cloned())
            .collect()
    }
}
