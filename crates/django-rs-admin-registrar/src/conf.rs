//! Registrar settings.
//!
//! The registrar is configured through a single nested mapping,
//! `ADMIN_REGISTRAR`, inside the host project's settings:
//!
//! ```toml
//! [ADMIN_REGISTRAR]
//! COLORED_LOGS = true
//! HIDDEN_ADMIN_CLASS = "project.admin.QuietAdmin"
//!
//! [ADMIN_REGISTRAR.DEFAULT_ADMIN_CLASSES]
//! "solo.models.SingletonModel" = "solo.admin.SingletonModelAdmin"
//! ```
//!
//! [`RegistrarSettings`] is the raw mapping. [`Conf`] pairs it with a
//! [`ClassRegistry`] and resolves the values that name classes lazily, on first
//! access, caching the result. [`SETTINGS`] is the process-wide instance.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::admin::AdminClass;
use crate::error::{RegistrarError, RegistrarResult};
use crate::importer::ClassRegistry;
use crate::resolvers::{AdminsResolver, FirstMroMatchResolver, FIRST_MRO_MATCH_RESOLVER_PATH};
use crate::site::{DefaultSite, RegisterOnSite};

/// The key of the registrar's mapping in the host settings.
pub const CONFIG_DICT_NAME: &str = "ADMIN_REGISTRAR";

/// The individual registrar settings, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    /// `HIDDEN_ADMIN_CLASS`: admin class used for hidden models.
    HiddenAdminClass,
    /// `DEFAULT_ADMIN_CLASSES`: model path -> admin path defaults.
    DefaultAdminClasses,
    /// `ADMINS_RESOLVER`: resolver used when no admin class is set.
    AdminsResolver,
    /// `REGISTER_ON_SITE`: the registration callback.
    RegisterOnSite,
    /// `COLORED_LOGS`: whether debug logs use ANSI colors.
    ColoredLogs,
}

impl Setting {
    /// Every setting, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::HiddenAdminClass,
        Self::DefaultAdminClasses,
        Self::AdminsResolver,
        Self::RegisterOnSite,
        Self::ColoredLogs,
    ];

    /// Returns the key of this setting inside `ADMIN_REGISTRAR`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::HiddenAdminClass => "HIDDEN_ADMIN_CLASS",
            Self::DefaultAdminClasses => "DEFAULT_ADMIN_CLASSES",
            Self::AdminsResolver => "ADMINS_RESOLVER",
            Self::RegisterOnSite => "REGISTER_ON_SITE",
            Self::ColoredLogs => "COLORED_LOGS",
        }
    }

    /// Returns the environment variable overriding this setting.
    pub fn env_var(self) -> String {
        format!("{CONFIG_DICT_NAME}_{}", self.name())
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The raw `ADMIN_REGISTRAR` mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrarSettings {
    /// Dotted path of the admin class used for hidden models.
    #[serde(rename = "HIDDEN_ADMIN_CLASS", default, skip_serializing_if = "Option::is_none")]
    pub hidden_admin_class: Option<String>,

    /// Default admin classes for models and their subclasses, by dotted path.
    #[serde(
        rename = "DEFAULT_ADMIN_CLASSES",
        alias = "ADMIN_CLASSES_FOR_MODELS",
        default
    )]
    pub default_admin_classes: BTreeMap<String, String>,

    /// Dotted path of the resolver used when a model has no admin class.
    #[serde(rename = "ADMINS_RESOLVER", default, skip_serializing_if = "Option::is_none")]
    pub admins_resolver: Option<String>,

    /// Dotted path of the registration callback.
    #[serde(rename = "REGISTER_ON_SITE", default, skip_serializing_if = "Option::is_none")]
    pub register_on_site: Option<String>,

    /// Whether debug logs use ANSI colors.
    #[serde(rename = "COLORED_LOGS", default)]
    pub colored_logs: bool,
}

impl RegistrarSettings {
    /// Extracts the `ADMIN_REGISTRAR` mapping from the host settings.
    ///
    /// A missing entry yields the defaults. An entry that is not a mapping is
    /// an error, as is a mapping with unknown keys.
    pub fn from_host(host: &serde_json::Value) -> RegistrarResult<Self> {
        match host.get(CONFIG_DICT_NAME) {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value @ serde_json::Value::Object(_)) => serde_json::from_value(value.clone())
                .map_err(|e| {
                    RegistrarError::ImproperlyConfigured(format!("{CONFIG_DICT_NAME}: {e}"))
                }),
            Some(other) => Err(RegistrarError::ImproperlyConfigured(format!(
                "{CONFIG_DICT_NAME} should be a dict, got {}.",
                json_type_name(other)
            ))),
        }
    }
}

const fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "str",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "dict",
    }
}

/// Registrar settings with lazily imported values.
///
/// Each accessor resolves its setting on first call and returns the cached
/// value afterwards. Settings that name a class fall back to the built-in
/// default when unset.
pub struct Conf {
    settings: RegistrarSettings,
    registry: Arc<ClassRegistry>,
    hidden_admin_class: OnceCell<AdminClass>,
    admins_resolver: OnceCell<Arc<dyn AdminsResolver>>,
    register_on_site: OnceCell<Arc<dyn RegisterOnSite>>,
}

impl Conf {
    /// Creates a configuration from raw settings and the registry used to
    /// import the classes they name.
    pub fn new(settings: RegistrarSettings, registry: Arc<ClassRegistry>) -> Self {
        Self {
            settings,
            registry,
            hidden_admin_class: OnceCell::new(),
            admins_resolver: OnceCell::new(),
            register_on_site: OnceCell::new(),
        }
    }

    /// Returns the raw settings.
    pub const fn settings(&self) -> &RegistrarSettings {
        &self.settings
    }

    /// Returns the registry used to import classes.
    pub const fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// `HIDDEN_ADMIN_CLASS`, defaulting to `HiddenAdmin`.
    pub fn hidden_admin_class(&self) -> RegistrarResult<&AdminClass> {
        self.hidden_admin_class.get_or_try_init(|| {
            self.settings
                .hidden_admin_class
                .as_deref()
                .map_or_else(|| Ok(AdminClass::hidden()), |path| self.registry.import_admin(path))
        })
    }

    /// `DEFAULT_ADMIN_CLASSES`, as dotted paths.
    pub const fn default_admin_classes(&self) -> &BTreeMap<String, String> {
        &self.settings.default_admin_classes
    }

    /// `ADMINS_RESOLVER`, defaulting to a first-MRO-match resolver over
    /// `DEFAULT_ADMIN_CLASSES`.
    pub fn admins_resolver(&self) -> RegistrarResult<&Arc<dyn AdminsResolver>> {
        self.admins_resolver.get_or_try_init(|| {
            match self.settings.admins_resolver.as_deref() {
                None | Some(FIRST_MRO_MATCH_RESOLVER_PATH) => {
                    let resolver: Arc<dyn AdminsResolver> = Arc::new(FirstMroMatchResolver::new(
                        self.settings.default_admin_classes.clone(),
                        Arc::clone(&self.registry),
                    ));
                    Ok(resolver)
                }
                Some(path) => self.registry.import_resolver(path),
            }
        })
    }

    /// `REGISTER_ON_SITE`, defaulting to registration into the default site.
    pub fn register_on_site(&self) -> RegistrarResult<&Arc<dyn RegisterOnSite>> {
        self.register_on_site.get_or_try_init(|| {
            self.settings.register_on_site.as_deref().map_or_else(
                || {
                    let site: Arc<dyn RegisterOnSite> = Arc::new(DefaultSite);
                    Ok(site)
                },
                |path| self.registry.import_register_on_site(path),
            )
        })
    }

    /// `COLORED_LOGS`.
    pub const fn colored_logs(&self) -> bool {
        self.settings.colored_logs
    }
}

impl Default for Conf {
    fn default() -> Self {
        Self::new(
            RegistrarSettings::default(),
            Arc::new(ClassRegistry::with_builtins()),
        )
    }
}

impl fmt::Debug for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conf")
            .field("settings", &self.settings)
            .field("registry_len", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// A lazily-initialized, globally-accessible [`Conf`].
///
/// Call [`configure`](LazyConf::configure) once at startup. If nothing was
/// configured, the first [`get`](LazyConf::get) installs the defaults.
pub struct LazyConf {
    inner: OnceLock<Arc<Conf>>,
}

impl Default for LazyConf {
    fn default() -> Self {
        Self::new()
    }
}

impl LazyConf {
    /// Creates a new, unconfigured `LazyConf`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the settings. Must be called at most once, before any `get`.
    ///
    /// # Panics
    ///
    /// Panics if the settings have already been configured or read.
    pub fn configure(&self, conf: Conf) {
        assert!(
            self.inner.set(Arc::new(conf)).is_ok(),
            "{CONFIG_DICT_NAME} settings have already been configured"
        );
    }

    /// Returns the configured settings, or the defaults.
    pub fn get(&self) -> Arc<Conf> {
        Arc::clone(self.inner.get_or_init(|| Arc::new(Conf::default())))
    }

    /// Returns `true` if settings have been configured or read.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global registrar settings.
pub static SETTINGS: LazyConf = LazyConf::new();
