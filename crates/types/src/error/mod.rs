// Path: crates/types/src/error/mod.rs
//! Core error types for nrepo.
//!
//! The content index itself never fails a lookup or search: "not found",
//! "nothing new", and stale references are all plain `None`/`false` results.
//! The errors here cover the edges of the system, where text becomes a `Name`
//! and where configuration is loaded from disk.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised while constructing or parsing names and components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// A name component had zero length.
    #[error("Name components must not be empty")]
    EmptyComponent,
    /// A `%XX` escape sequence was truncated or not valid hex.
    #[error("Invalid percent-escape at byte offset {offset} in {uri:?}")]
    InvalidEscape {
        /// The URI being parsed.
        uri: String,
        /// The offset of the offending `%`.
        offset: usize,
    },
    /// The URI did not start with `/` after the optional scheme was stripped.
    #[error("Name URI must be absolute: {0:?}")]
    NotAbsolute(String),
    /// A `.` or `..` path segment, which names no component.
    #[error("Name URI contains a dot segment: {0:?}")]
    DotSegment(String),
}

impl ErrorCode for NameError {
    fn code(&self) -> &'static str {
        match self {
            Self::EmptyComponent => "NAME_EMPTY_COMPONENT",
            Self::InvalidEscape { .. } => "NAME_INVALID_ESCAPE",
            Self::NotAbsolute(_) => "NAME_NOT_ABSOLUTE",
            Self::DotSegment(_) => "NAME_DOT_SEGMENT",
        }
    }
}

/// Errors raised while loading or validating a [`crate::config::RepoConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file was not valid TOML for the expected schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field was syntactically valid but semantically unacceptable.
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        /// The dotted path of the rejected field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "CONFIG_IO",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::Invalid { .. } => "CONFIG_INVALID",
        }
    }
}

impl From<NameError> for ConfigError {
    fn from(err: NameError) -> Self {
        ConfigError::Invalid {
            field: "index.responder_id",
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(NameError::EmptyComponent.code(), "NAME_EMPTY_COMPONENT");
        assert_eq!(NameError::DotSegment("/.".into()).code(), "NAME_DOT_SEGMENT");
        let invalid = ConfigError::Invalid {
            field: "telemetry.log_filter",
            reason: "empty".into(),
        };
        assert_eq!(invalid.code(), "CONFIG_INVALID");
        assert!(invalid.to_string().contains("telemetry.log_filter"));
    }

    #[test]
    fn name_error_converts_into_config_error() {
        let err: ConfigError = NameError::EmptyComponent.into();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }
}
