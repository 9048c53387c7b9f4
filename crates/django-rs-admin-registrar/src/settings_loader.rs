//! Loading registrar settings from host settings files.
//!
//! The host project keeps its settings in a TOML or JSON document; the
//! registrar reads the `ADMIN_REGISTRAR` table out of it and ignores the rest.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Read the `ADMIN_REGISTRAR` table from a TOML or JSON file.
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ADMIN_REGISTRAR_COLORED_LOGS` | `COLORED_LOGS` ("true"/"1"/"yes" => true) |
//! | `ADMIN_REGISTRAR_HIDDEN_ADMIN_CLASS` | `HIDDEN_ADMIN_CLASS` |
//! | `ADMIN_REGISTRAR_ADMINS_RESOLVER` | `ADMINS_RESOLVER` |
//! | `ADMIN_REGISTRAR_REGISTER_ON_SITE` | `REGISTER_ON_SITE` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use django_rs_admin_registrar::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("settings.toml").unwrap();
//! println!("colored logs: {}", settings.colored_logs);
//! ```

use std::path::Path;

use crate::conf::{RegistrarSettings, Setting};
use crate::error::{RegistrarError, RegistrarResult};

/// Reads registrar settings from a host settings TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or the `ADMIN_REGISTRAR`
/// table is not a valid registrar settings table.
pub fn from_toml_str(toml_str: &str) -> RegistrarResult<RegistrarSettings> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RegistrarError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    RegistrarSettings::from_host(&toml_to_json(toml_value))
}

/// Reads registrar settings from a host settings TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are rejected
/// by [`from_toml_str`].
pub fn from_toml_file(path: impl AsRef<Path>) -> RegistrarResult<RegistrarSettings> {
    from_toml_str(&read_file(path.as_ref(), "TOML")?)
}

/// Reads registrar settings from a TOML file, then applies environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> RegistrarResult<RegistrarSettings> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Reads registrar settings from a host settings JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or the `ADMIN_REGISTRAR`
/// entry is not a valid registrar settings object.
pub fn from_json_str(json_str: &str) -> RegistrarResult<RegistrarSettings> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RegistrarError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    RegistrarSettings::from_host(&json_value)
}

/// Reads registrar settings from a host settings JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are rejected
/// by [`from_json_str`].
pub fn from_json_file(path: impl AsRef<Path>) -> RegistrarResult<RegistrarSettings> {
    from_json_str(&read_file(path.as_ref(), "JSON")?)
}

/// Reads registrar settings from a JSON file, then applies environment overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> RegistrarResult<RegistrarSettings> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Default settings with environment overrides applied.
pub fn from_env() -> RegistrarSettings {
    let mut settings = RegistrarSettings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `ADMIN_REGISTRAR_*` environment variables to `settings`.
///
/// An empty value for a path setting clears it, restoring the default.
pub fn apply_env_overrides(settings: &mut RegistrarSettings) {
    if let Ok(val) = std::env::var(Setting::ColoredLogs.env_var()) {
        settings.colored_logs = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var(Setting::HiddenAdminClass.env_var()) {
        settings.hidden_admin_class = non_empty(val);
    }

    if let Ok(val) = std::env::var(Setting::AdminsResolver.env_var()) {
        settings.admins_resolver = non_empty(val);
    }

    if let Ok(val) = std::env::var(Setting::RegisterOnSite.env_var()) {
        settings.register_on_site = non_empty(val);
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_file(path: &Path, format: &str) -> RegistrarResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        RegistrarError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn non_empty(val: String) -> Option<String> {
    let trimmed = val.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = true
            installed_apps = ["shop"]

            [ADMIN_REGISTRAR]
            COLORED_LOGS = true
            HIDDEN_ADMIN_CLASS = "shop.admin.QuietAdmin"

            [ADMIN_REGISTRAR.DEFAULT_ADMIN_CLASSES]
            "solo.models.SingletonModel" = "solo.admin.SingletonModelAdmin"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(settings.colored_logs);
        assert_eq!(
            settings.hidden_admin_class.as_deref(),
            Some("shop.admin.QuietAdmin")
        );
        assert_eq!(settings.default_admin_classes.len(), 1);
        // Unset keys keep their defaults
        assert!(settings.admins_resolver.is_none());
    }

    #[test]
    fn test_from_toml_str_without_table() {
        let settings = from_toml_str("debug = false").unwrap();
        assert_eq!(settings, RegistrarSettings::default());
    }

    #[test]
    fn test_from_toml_str_not_a_table() {
        let err = from_toml_str(r#"ADMIN_REGISTRAR = "yes""#).unwrap_err();
        assert!(err.to_string().contains("should be a dict, got str"));
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(RegistrarError::ConfigurationError(_))));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "ADMIN_REGISTRAR": {
                "ADMINS_RESOLVER": "shop.resolvers.by_app",
                "REGISTER_ON_SITE": "shop.site.register"
            }
        }"#;
        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.admins_resolver.as_deref(), Some("shop.resolvers.by_app"));
        assert_eq!(settings.register_on_site.as_deref(), Some("shop.site.register"));
        assert!(!settings.colored_logs);
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[ADMIN_REGISTRAR]\nCOLORED_LOGS = true\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert!(settings.colored_logs);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"ADMIN_REGISTRAR": {"COLORED_LOGS": true}}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert!(settings.colored_logs);
    }

    #[test]
    fn test_from_file_missing() {
        let err = from_toml_file("/nonexistent/path/settings.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
        assert!(from_json_file("/nonexistent/path/settings.json").is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    #[test]
    fn test_apply_env_overrides_colored_logs() {
        let mut settings = RegistrarSettings::default();
        std::env::set_var("ADMIN_REGISTRAR_COLORED_LOGS", "yes");
        apply_env_overrides(&mut settings);
        std::env::remove_var("ADMIN_REGISTRAR_COLORED_LOGS");
        assert!(settings.colored_logs);
    }

    #[test]
    fn test_apply_env_overrides_hidden_admin_class() {
        let mut settings = RegistrarSettings::default();
        std::env::set_var("ADMIN_REGISTRAR_HIDDEN_ADMIN_CLASS", " shop.admin.QuietAdmin ");
        apply_env_overrides(&mut settings);
        std::env::remove_var("ADMIN_REGISTRAR_HIDDEN_ADMIN_CLASS");
        assert_eq!(
            settings.hidden_admin_class.as_deref(),
            Some("shop.admin.QuietAdmin")
        );
    }

    #[test]
    fn test_apply_env_overrides_empty_clears() {
        let mut settings = RegistrarSettings {
            register_on_site: Some("shop.site.register".to_string()),
            ..RegistrarSettings::default()
        };
        std::env::set_var("ADMIN_REGISTRAR_REGISTER_ON_SITE", "");
        apply_env_overrides(&mut settings);
        std::env::remove_var("ADMIN_REGISTRAR_REGISTER_ON_SITE");
        assert!(settings.register_on_site.is_none());
    }

    #[test]
    fn test_toml_file_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[ADMIN_REGISTRAR]\nADMINS_RESOLVER = \"shop.resolvers.by_app\"\n",
        )
        .unwrap();

        std::env::set_var("ADMIN_REGISTRAR_ADMINS_RESOLVER", "shop.resolvers.strict");
        let settings = from_toml_file_with_env(&path).unwrap();
        std::env::remove_var("ADMIN_REGISTRAR_ADMINS_RESOLVER");
        assert_eq!(settings.admins_resolver.as_deref(), Some("shop.resolvers.strict"));
    }

    #[test]
    fn test_toml_to_json() {
        let value: toml::Value = toml::from_str("a = 1\nb = [true, \"x\"]\n[c]\nd = 1.5").unwrap();
        assert_eq!(
            toml_to_json(value),
            serde_json::json!({"a": 1, "b": [true, "x"], "c": {"d": 1.5}})
        );
    }
}
