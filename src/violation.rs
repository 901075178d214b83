// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turn constraint violations reported by a validation engine into log messages.
//!
//! Validation itself happens elsewhere. This module receives its verdicts as
//! [`ConstraintViolation`]s, fills in their message templates and logs them through the `log`
//! facade with [`ViolationReporter`].
//!
//! Message templates of constraints that carry attributes refer to them with `$name`; `$value`
//! stands for the invalid value:
//!
//! ```
//! use logtree::violation::ConstraintViolation;
//!
//! let violation = ConstraintViolation::new("retries", -3, "$value is not in [$min, $max]", "Range")
//!     .with_attribute("min", 0)
//!     .with_attribute("max", 10);
//!
//! assert_eq!(violation.interpolated_message(), "-3 is not in [0, 10]");
//! ```

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use log::Level;

const TEMPLATE_KEY: char = '$';

/// A value carried by a violation: the invalid value or an attribute of the constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string.
    Str(String),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A boolean.
    Bool(bool),
    /// The absence of a value.
    Null,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => f.write_str(&format_quotient(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Wraps `s` in single or double quotation marks.
pub fn quote(s: &str, single: bool) -> String {
    let quote = if single { '\'' } else { '"' };
    format!("{quote}{s}{quote}")
}

/// Quotes a value according to its type: strings in double quotation marks, numbers bare, anything
/// else in single quotation marks.
pub fn smart_quote(value: &Value) -> String {
    match value {
        Value::Int(_) | Value::Float(_) => value.to_string(),
        Value::Str(s) => quote(s, false),
        other => quote(&other.to_string(), true),
    }
}

/// Formats a number, dropping the fractional part when it is zero.
pub fn format_quotient(value: f64) -> String {
    let text = value.to_string();
    match text.split_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole.to_string(),
        _ => text,
    }
}

/// A single constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    property_path: String,
    invalid_value: Value,
    message: String,
    constraint: String,
    attributes: Option<BTreeMap<String, Value>>,
}

impl ConstraintViolation {
    /// Creates a violation of `constraint` by the value at `property_path`.
    ///
    /// Without attributes the message is used verbatim and logged at [`Level::Error`].
    pub fn new(
        property_path: impl Into<String>,
        invalid_value: impl Into<Value>,
        message: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            property_path: property_path.into(),
            invalid_value: invalid_value.into(),
            message: message.into(),
            constraint: constraint.into(),
            attributes: None,
        }
    }

    /// Adds an attribute of the violated constraint.
    ///
    /// A violation with attributes has its message template interpolated, and its `level`
    /// attribute, if any, selects the level it is logged at.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// The path of the property that holds the invalid value.
    pub fn property_path(&self) -> &str {
        &self.property_path
    }

    /// The invalid value.
    pub fn invalid_value(&self) -> &Value {
        &self.invalid_value
    }

    /// The message template.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The name of the violated constraint.
    pub fn constraint(&self) -> &str {
        &self.constraint
    }

    /// The attribute with this name.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.as_ref()?.get(key)
    }

    /// The level to log this violation at.
    pub fn level(&self) -> Level {
        match self.attribute("level") {
            Some(Value::Str(level)) => Level::from_str(level).unwrap_or(Level::Error),
            _ => Level::Error,
        }
    }

    /// The message with every `$name` replaced by the smart-quoted attribute value, or by the
    /// invalid value for `$value`. Unknown names become `'null'`.
    ///
    /// Messages of violations without attributes are returned verbatim.
    pub fn interpolated_message(&self) -> String {
        let Some(attributes) = &self.attributes else {
            return self.message.clone();
        };

        let mut text = String::with_capacity(self.message.len());
        let mut rest = self.message.as_str();
        while let Some(start) = rest.find(TEMPLATE_KEY) {
            text.push_str(&rest[..start]);
            let after = &rest[start + TEMPLATE_KEY.len_utf8()..];
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
                .unwrap_or(after.len());
            let name = &after[..end];

            if name.is_empty() {
                text.push(TEMPLATE_KEY);
            } else if name == "value" {
                text.push_str(&smart_quote(&self.invalid_value));
            } else {
                text.push_str(&smart_quote(attributes.get(name).unwrap_or(&Value::Null)));
            }
            rest = &after[end..];
        }
        text.push_str(rest);
        text
    }
}

/// The number of recent violations a [`ViolationReporter`] keeps by default.
pub const DEFAULT_RECENT_CAPACITY: usize = 64;

/// Logs constraint violations and remembers the most recent ones it processed.
///
/// One reporter is typically created at startup and handed to the interception layer that runs
/// validations. It keeps at most `capacity` violations; the oldest is forgotten when a new one
/// arrives at capacity.
#[derive(Debug)]
pub struct ViolationReporter {
    recent: Mutex<VecDeque<ConstraintViolation>>,
    capacity: usize,
}

impl Default for ViolationReporter {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_RECENT_CAPACITY)
    }
}

impl ViolationReporter {
    /// Creates a reporter that keeps [`DEFAULT_RECENT_CAPACITY`] recent violations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reporter that keeps up to `capacity` recent violations. Zero keeps none.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// The maximum number of recent violations kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Logs `violation` at its level, followed by a debug record naming the offending property,
    /// and returns the logged message.
    pub fn report(&self, violation: ConstraintViolation) -> String {
        let message = violation.interpolated_message();
        log::log!(violation.level(), "{message}");
        log::debug!(
            "property '{}' with value '{}' has violated constraint {}: {message}",
            violation.property_path(),
            violation.invalid_value(),
            violation.constraint(),
        );

        if self.capacity > 0 {
            let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
            if recent.len() == self.capacity {
                recent.pop_front();
            }
            recent.push_back(violation);
        }
        message
    }

    /// Reports every violation in order and returns how many were reported.
    pub fn report_all(&self, violations: impl IntoIterator<Item = ConstraintViolation>) -> usize {
        violations
            .into_iter()
            .map(|violation| self.report(violation))
            .count()
    }

    /// The recent violations, oldest first.
    pub fn recent_violations(&self) -> Vec<ConstraintViolation> {
        let recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.iter().cloned().collect()
    }

    /// Forgets the recent violations and returns them, oldest first.
    pub fn take_recent_violations(&self) -> Vec<ConstraintViolation> {
        let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.drain(..).collect()
    }
}
