use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ValidationError
///
/// The structured error carrier returned by generated validation. This is
/// the primary contract: a consumer calling the non-throwing construction
/// path always receives either a valid instance or one of these, never a
/// partial instance. The panicking factories are an ergonomic layer on top.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Hash, Serialize, ThisError)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Standard message for a failed smart-enum key lookup.
    #[must_use]
    pub fn unknown_key(type_name: &str, key: impl std::fmt::Display) -> Self {
        Self::new(format!("there is no instance of '{type_name}' with key '{key}'"))
    }

    /// Standard message for a rejected default key value.
    #[must_use]
    pub fn default_value(type_name: &str) -> Self {
        Self::new(format!("'{type_name}' must not be the default value"))
    }

    /// Standard message for conversions where the contract yields no
    /// instance (empty input on an `empty_yields_none` type).
    #[must_use]
    pub fn no_instance(type_name: &str) -> Self {
        Self::new(format!("input yields no instance of '{type_name}'"))
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for ValidationError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
