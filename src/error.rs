// Error types shared by the platform layer and its collaborators

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValetError {
    /// The package manager reported a failure.
    #[error("Unable to install [{package}].")]
    Installation { package: String, output: String },

    /// The host is not configured the way we need (e.g. no linked PHP).
    #[error("{message}")]
    Configuration { message: String },

    /// A capability name typed by a human did not match any known key.
    #[error("Unknown capability: {key}")]
    UnknownCapability { key: String },

    /// The command primitive could not start the process at all.
    #[error("Failed to execute `{command}`: {message}")]
    Command { command: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValetError {
    pub fn configuration(message: impl Into<String>) -> Self {
        ValetError::Configuration {
            message: message.into(),
        }
    }

    pub fn installation(package: &str, output: impl Into<String>) -> Self {
        ValetError::Installation {
            package: package.to_string(),
            output: output.into(),
        }
    }
}

pub type Result<T, E = ValetError> = std::result::Result<T, E>;
