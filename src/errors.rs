use thiserror::Error;

/// User-facing errors raised while loading or validating a device
/// configuration. Every schema variant carries the full dotted key path
/// of the offending option so the user can find it in their file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown configuration key '{path}'")]
    UnknownKey { path: String },

    #[error("Missing required configuration key '{path}'")]
    MissingKey { path: String },

    #[error("Invalid type for '{path}': expected {expected}, found {found}")]
    InvalidType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Failed to load configuration from '{path}': {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration format: {0}")]
    Format(#[from] toml::de::Error),
}

/// Errors raised during the code-generation phase, after validation has
/// already passed.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The identifier passed validation but has no declared object behind
    /// it. This is a build-system invariant violation, not user error, and
    /// must propagate immediately.
    #[error("Identifier '{ident}' does not resolve to a declared object (build invariant violated)")]
    UnresolvedId { ident: String },

    /// The identifier resolves to an object of the wrong build-time type.
    /// Same class of invariant violation as `UnresolvedId`.
    #[error("Identifier '{ident}' resolves to {found}, expected {expected} (build invariant violated)")]
    TypeMismatch {
        ident: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{ident}' is already registered")]
    RegistrationConflict { ident: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type aliases for convenience
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type BuildResult<T> = Result<T, BuildError>;
