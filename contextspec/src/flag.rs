use std::fmt::Display;

use crate::ConcernError;

/// A loosely typed flag setting, as it may arrive from test configuration.
///
/// Only [`FlagValue::Bool`] is accepted where a flag is expected; anything else is
/// rejected with [`ConcernError::NonBooleanFlag`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagValue {
    /// A boolean flag.
    Bool(bool),
    /// An integer value.
    Int(i64),
    /// A textual value.
    Text(String),
}

impl FlagValue {
    /// Returns the boolean this value holds, or an error naming the value received.
    pub fn as_bool(&self) -> Result<bool, ConcernError> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(ConcernError::NonBooleanFlag(other.to_string())),
        }
    }
}

impl Display for FlagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for FlagValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FlagValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
