use thiserror::Error;

use super::datasize::DataSizeError;
use super::duration::DurationError;
use super::node::{Location, Node};

/// Broad category of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingRequired,
    Duplicate,
    Unexpected,
    TypeConversion,
    Custom,
    DataSizeSyntax,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{}missing required directive: {directive}", at(.location))]
    MissingRequired {
        directive: String,
        location: Option<Location>,
    },

    #[error("{}duplicate directive: {directive}{}", at(.location), previously(.previous))]
    DuplicateDirective {
        directive: String,
        location: Option<Location>,
        previous: Option<Location>,
    },

    #[error("{}unexpected directive: {directive}", at(.location))]
    UnexpectedDirective {
        directive: String,
        location: Option<Location>,
    },

    #[error("{}{directive}: cannot convert '{raw}' to {expected}", at(.location))]
    TypeConversion {
        directive: String,
        location: Option<Location>,
        raw: String,
        expected: &'static str,
    },

    #[error("{}{directive}: expected {expected} argument(s), got {found}", at(.location))]
    ArgumentCount {
        directive: String,
        location: Option<Location>,
        expected: &'static str,
        found: usize,
    },

    #[error("{directive}: inherited value is {found}, expected {expected}")]
    TypeMismatch {
        directive: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{}{directive}: {source}", at(.location))]
    InvalidDataSize {
        directive: String,
        location: Option<Location>,
        source: DataSizeError,
    },

    #[error("{}{directive}: {source}", at(.location))]
    InvalidDuration {
        directive: String,
        location: Option<Location>,
        source: DurationError,
    },

    #[error("{}{directive}: {message}", at(.location))]
    Invalid {
        directive: String,
        location: Option<Location>,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ConfigError {
    /// Builds an error for a directive node rejected by a parse callback.
    pub fn invalid(node: &Node, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            directive: node.name.clone(),
            location: node.location.clone(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::MissingRequired { .. } => ErrorKind::MissingRequired,
            ConfigError::DuplicateDirective { .. } => ErrorKind::Duplicate,
            ConfigError::UnexpectedDirective { .. } => ErrorKind::Unexpected,
            ConfigError::TypeConversion { .. }
            | ConfigError::ArgumentCount { .. }
            | ConfigError::TypeMismatch { .. }
            | ConfigError::InvalidDuration { .. } => ErrorKind::TypeConversion,
            ConfigError::InvalidDataSize { .. } => ErrorKind::DataSizeSyntax,
            ConfigError::Invalid { .. } | ConfigError::Other(_) => ErrorKind::Custom,
        }
    }
}

fn at(location: &Option<Location>) -> String {
    match location {
        Some(loc) => format!("{loc}: "),
        None => String::new(),
    }
}

fn previously(location: &Option<Location>) -> String {
    match location {
        Some(loc) => format!(" (previously defined at {loc})"),
        None => String::new(),
    }
}
