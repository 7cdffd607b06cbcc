//! Error handling for symbolic derivation, configuration and report output

use std::io;

/// Unified error for building expressions, reading configuration and writing reports.
#[derive(Debug)]
pub enum KinematicsError {
    IoError(io::Error),
    ParseError(String),
    ConfigError(String),
    UndefinedSymbol(String),
    MalformedInput { expected: usize, found: usize },
}

impl std::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            KinematicsError::IoError(ref err) =>
                write!(f, "IO Error: {}", err),
            KinematicsError::ParseError(ref msg) =>
                write!(f, "Parse Error: {}", msg),
            KinematicsError::ConfigError(ref msg) =>
                write!(f, "Configuration Error: {}", msg),
            KinematicsError::UndefinedSymbol(ref name) =>
                write!(f, "Undefined symbol: {}", name),
            KinematicsError::MalformedInput { expected, found } =>
                write!(f, "Malformed input: expected {} components, found {}", expected, found),
        }
    }
}

impl std::error::Error for KinematicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KinematicsError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for KinematicsError {
    fn from(err: io::Error) -> Self {
        KinematicsError::IoError(err)
    }
}
