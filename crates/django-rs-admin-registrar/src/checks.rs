//! Check messages reported by [`AdminRegistrar::check`](crate::registrar::AdminRegistrar::check).

use std::fmt;

/// Severity levels for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    /// A warning that may indicate a problem.
    Warning,
    /// An error that will make registration fail.
    Error,
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// The result of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckMessage {
    /// The severity level of this check result.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// An optional hint for how to resolve the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "admin_registrar.W001").
    pub id: &'static str,
}

impl CheckMessage {
    /// Creates a warning.
    pub fn warning(id: &'static str, msg: impl Into<String>) -> Self {
        Self {
            level: CheckLevel::Warning,
            msg: msg.into(),
            hint: None,
            id,
        }
    }

    /// Creates an error.
    pub fn error(id: &'static str, msg: impl Into<String>) -> Self {
        Self {
            level: CheckLevel::Error,
            msg: msg.into(),
            hint: None,
            id,
        }
    }

    /// Attaches a hint.
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns `true` for errors.
    pub fn is_serious(&self) -> bool {
        self.level >= CheckLevel::Error
    }
}

impl fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.level, self.id, self.msg)?;
        if let Some(hint) = &self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        Ok(())
    }
}
