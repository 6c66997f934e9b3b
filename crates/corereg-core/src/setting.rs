//! Descriptive metadata for configuration options.
//!
//! The registry never parses configuration. It only records what each option
//! looks like (type, default, editor hint) so the external configuration store
//! can be validated against it.

use std::fmt;

use thiserror::Error;

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    /// Integer value.
    Int(i64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    Str(String),
}

impl SettingValue {
    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SettingValue::Int(_) => "int",
            SettingValue::Bool(_) => "bool",
            SettingValue::Str(_) => "string",
        }
    }

    /// The integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Int(v) => write!(f, "{v}"),
            SettingValue::Bool(v) => write!(f, "{v}"),
            SettingValue::Str(v) => write!(f, "\"{v}\""),
        }
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<i32> for SettingValue {
    fn from(v: i32) -> Self {
        SettingValue::Int(i64::from(v))
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Str(v.to_string())
    }
}

/// Editor hint restricting the accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettingHint {
    /// Any value of the right type.
    #[default]
    None,
    /// Integer range. `or_greater` lifts the upper bound.
    Range {
        min: i64,
        max: i64,
        step: i64,
        or_greater: bool,
    },
    /// Path to a file matching a glob filter such as `*.crt`.
    File { filter: String },
}

/// Why a setting value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingError {
    /// The value has the wrong type.
    #[error("setting '{name}' expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// An integer value is outside the declared range.
    #[error("setting '{name}' value {value} is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A file path does not match the declared filter.
    #[error("setting '{name}' path '{value}' does not match '{filter}'")]
    FilterMismatch {
        name: String,
        value: String,
        filter: String,
    },
}

/// Metadata describing one configuration option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingInfo {
    /// Slash-separated option path.
    pub name: String,
    /// Value used when the store has none.
    pub default: SettingValue,
    /// Accepted values.
    pub hint: SettingHint,
    /// Changing the value only takes effect after a restart.
    pub restart_required: bool,
}

impl SettingInfo {
    /// Create a setting description with no hint.
    pub fn new(name: impl Into<String>, default: impl Into<SettingValue>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            hint: SettingHint::None,
            restart_required: false,
        }
    }

    /// Restrict to an integer range.
    pub fn with_range(mut self, min: i64, max: i64, step: i64) -> Self {
        self.hint = SettingHint::Range {
            min,
            max,
            step,
            or_greater: false,
        };
        self
    }

    /// Lift the upper bound of a range hint.
    pub fn or_greater(mut self) -> Self {
        if let SettingHint::Range { or_greater, .. } = &mut self.hint {
            *or_greater = true;
        }
        self
    }

    /// Restrict to file paths matching `filter`.
    pub fn with_file_filter(mut self, filter: impl Into<String>) -> Self {
        self.hint = SettingHint::File {
            filter: filter.into(),
        };
        self
    }

    /// Mark the setting as requiring a restart.
    pub fn restart_required(mut self) -> Self {
        self.restart_required = true;
        self
    }

    /// Check `value` against the declared type and hint.
    pub fn validate(&self, value: &SettingValue) -> Result<(), SettingError> {
        if std::mem::discriminant(value) != std::mem::discriminant(&self.default) {
            return Err(SettingError::TypeMismatch {
                name: self.name.clone(),
                expected: self.default.type_name(),
                actual: value.type_name(),
            });
        }

        match (&self.hint, value) {
            (
                SettingHint::Range {
                    min,
                    max,
                    or_greater,
                    ..
                },
                SettingValue::Int(v),
            ) => {
                if *v < *min || (!*or_greater && *v > *max) {
                    return Err(SettingError::OutOfRange {
                        name: self.name.clone(),
                        value: *v,
                        min: *min,
                        max: *max,
                    });
                }
            }
            (SettingHint::File { filter }, SettingValue::Str(path)) => {
                // Empty means "not overridden".
                if !path.is_empty() && !matches_filter(path, filter) {
                    return Err(SettingError::FilterMismatch {
                        name: self.name.clone(),
                        value: path.clone(),
                        filter: filter.clone(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

/// Match a `*.ext[,*.ext]` filter against a path, case-insensitively.
fn matches_filter(path: &str, filter: &str) -> bool {
    let path = path.to_ascii_lowercase();
    filter
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .any(|f| match f.strip_prefix('*') {
            Some(suffix) => path.ends_with(&suffix.to_ascii_lowercase()),
            None => path == f.to_ascii_lowercase(),
        })
}
