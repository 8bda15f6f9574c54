//! Command option schema and validation.
//!
//! Each exporter declares which options its rendering binary understands
//! and how values are checked. Validation is a silent filter: an option
//! that is unknown, or whose value fails its declared [`OptionKind`], is
//! dropped and the current options stay as they were.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value carried by a command option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean flag, rendered as `true` or `false`.
    Bool(bool),
    /// Integer value, rendered in decimal.
    Integer(i64),
    /// Free text, rendered verbatim.
    Text(String),
}

impl OptionValue {
    /// Parses a command-line value: booleans first, then integers, then text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => raw
                .parse::<i64>()
                .map_or_else(|_| Self::Text(raw.to_owned()), Self::Integer),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Validation rule attached to one option name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    /// Only genuine booleans are accepted.
    Bool,
    /// Any value is accepted; content is not checked.
    String,
    /// Only text exactly matching one of the listed values is accepted.
    OneOf(Vec<String>),
    /// Unrecognised rule tag; any value passes through unvalidated.
    Unvalidated(String),
}

impl OptionKind {
    /// Maps a rule tag to its kind. Unknown tags become [`Self::Unvalidated`].
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "bool" => Self::Bool,
            "string" => Self::String,
            other => Self::Unvalidated(other.to_owned()),
        }
    }

    /// Builds an enumerated-set rule from its allowed values.
    #[must_use]
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::OneOf(allowed.into_iter().map(Into::into).collect())
    }

    /// Returns whether `value` satisfies this rule.
    #[must_use]
    pub fn accepts(&self, value: &OptionValue) -> bool {
        match self {
            Self::Bool => matches!(value, OptionValue::Bool(_)),
            Self::OneOf(allowed) => match value {
                OptionValue::Text(text) => allowed.iter().any(|candidate| candidate == text),
                OptionValue::Bool(_) | OptionValue::Integer(_) => false,
            },
            Self::String | Self::Unvalidated(_) => true,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Bool => "a boolean".to_owned(),
            Self::OneOf(allowed) => format!("one of [{}]", allowed.join(", ")),
            Self::String => "a string".to_owned(),
            Self::Unvalidated(tag) => format!("any value ({tag})"),
        }
    }
}

/// Reason an option was not merged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptionRejection {
    /// The option name is not declared in the schema.
    #[error("option '{name}' is not supported")]
    UnknownOption {
        /// Option name as supplied.
        name: String,
    },

    /// The value does not satisfy the option's declared rule.
    #[error("option '{name}' expects {expected}, got '{value}'")]
    InvalidValue {
        /// Option name as supplied.
        name: String,
        /// Description of the accepted values.
        expected: String,
        /// Rejected value, rendered as it would appear on the command line.
        value: String,
    },
}

/// Declared option names and their validation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    rules: BTreeMap<String, OptionKind>,
}

impl OptionSchema {
    /// Creates an empty schema; every option is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, kind: OptionKind) -> Self {
        self.rules.insert(name.into(), kind);
        self
    }

    /// Returns the rule for `name`, if declared.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<&OptionKind> {
        self.rules.get(name)
    }

    /// Returns whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Returns the number of declared options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether no options are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Checks `value` against the rule declared for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`OptionRejection::UnknownOption`] when `name` is not declared
    /// and [`OptionRejection::InvalidValue`] when the value fails the rule.
    pub fn validate(&self, name: &str, value: &OptionValue) -> Result<(), OptionRejection> {
        let kind = self
            .kind(name)
            .ok_or_else(|| OptionRejection::UnknownOption {
                name: name.to_owned(),
            })?;

        if kind.accepts(value) {
            Ok(())
        } else {
            Err(OptionRejection::InvalidValue {
                name: name.to_owned(),
                expected: kind.describe(),
                value: value.to_string(),
            })
        }
    }
}

impl<K: Into<String>> FromIterator<(K, OptionKind)> for OptionSchema {
    fn from_iter<T: IntoIterator<Item = (K, OptionKind)>>(iter: T) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(name, kind)| (name.into(), kind))
                .collect(),
        }
    }
}

/// Option values in insertion order.
///
/// Setting an existing name overwrites its value in place, so the order of
/// first insertion is what command composition sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    entries: Vec<(String, OptionValue)>,
}

impl CommandOptions {
    /// Creates an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, keeping the position of an existing entry.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) {
        let key = name.into();
        let option_value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = option_value,
            None => self.entries.push((key, option_value)),
        }
    }

    /// Returns the value for `name`, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Returns whether `name` is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of options set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for CommandOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut options = Self::new();
        for (name, value) in iter {
            options.set(name, value);
        }
        options
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
