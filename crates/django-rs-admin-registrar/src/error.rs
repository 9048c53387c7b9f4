//! Error types for the admin registrar.
//!
//! [`RegistrarError`] mirrors the exceptions the admin registration machinery
//! raises in Django: `AlreadyRegistered`, `NotRegistered`, `ImportError` and
//! `ImproperlyConfigured`, plus the few failures specific to this crate.

use thiserror::Error;

/// The error type for every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum RegistrarError {
    // ── Admin site ───────────────────────────────────────────────────

    /// The model is already registered on the admin site.
    #[error("The model {0} is already registered with '{1}'.")]
    AlreadyRegistered(String, String),

    /// The model is not registered on the admin site.
    #[error("The model {0} is not registered")]
    NotRegistered(String),

    // ── Import-by-string ─────────────────────────────────────────────

    /// A dotted path could not be resolved.
    #[error("Import error: {0}")]
    ImportError(String),

    // ── Configuration ────────────────────────────────────────────────

    /// The settings are present but malformed.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A settings document could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Class hierarchy ──────────────────────────────────────────────

    /// No consistent method resolution order exists for the given bases.
    #[error("Cannot create a consistent method resolution order (MRO) for {0}")]
    InconsistentHierarchy(String),

    /// A default admin class was already set for the model.
    #[error("A default admin class is already set for {0}")]
    DuplicateDefault(String),

    /// A class of the wrong kind was passed where a model was expected.
    #[error("Type error: {0}")]
    TypeError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A convenience type alias for `Result<T, RegistrarError>`.
pub type RegistrarResult<T> = Result<T, RegistrarError>;
