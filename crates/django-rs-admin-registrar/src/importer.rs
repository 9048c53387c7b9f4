//! Import-by-string.
//!
//! Settings refer to classes and callables by dotted path, the way Django's
//! `import_string` does. Rust cannot load a class from a string at runtime, so
//! everything a setting may name is registered up front in a [`ClassRegistry`]
//! and looked up from there.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::admin::AdminClass;
use crate::apps::AppConfig;
use crate::error::{RegistrarError, RegistrarResult};
use crate::models::ModelClass;
use crate::reflection::split_path;
use crate::resolvers::{AdminsResolver, GlobalFirstMroMatch, FIRST_MRO_MATCH_RESOLVER_PATH};
use crate::site::{DefaultSite, RegisterOnSite};

/// Dotted path under which registration into the default site is importable.
pub const SITE_REGISTER_PATH: &str = "django.contrib.admin.site.register";

/// Something a dotted path can name.
#[derive(Clone)]
pub enum Importable {
    /// A model class.
    Model(ModelClass),
    /// An admin class.
    Admin(AdminClass),
    /// A default admin class resolver.
    Resolver(Arc<dyn AdminsResolver>),
    /// A registration callback.
    RegisterOnSite(Arc<dyn RegisterOnSite>),
}

impl Importable {
    /// Returns a short description of the kind, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Model(_) => "model class",
            Self::Admin(_) => "admin class",
            Self::Resolver(_) => "admins resolver",
            Self::RegisterOnSite(_) => "register-on-site callable",
        }
    }
}

impl fmt::Debug for Importable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(model) => f.debug_tuple("Model").field(model).finish(),
            Self::Admin(admin) => f.debug_tuple("Admin").field(admin).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
            Self::RegisterOnSite(_) => f.write_str("RegisterOnSite(..)"),
        }
    }
}

/// Dotted path -> class lookup table.
///
/// # Examples
///
/// ```
/// use django_rs_admin_registrar::importer::ClassRegistry;
///
/// let registry = ClassRegistry::with_builtins();
/// let admin = registry.import_admin("django.contrib.admin.ModelAdmin").unwrap();
/// assert_eq!(admin.name(), "ModelAdmin");
///
/// assert!(registry.import_string("ModelAdmin").is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct ClassRegistry {
    entries: HashMap<String, Importable>,
}

impl ClassRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in classes and callables.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.add_model(&ModelClass::root());
        registry.add_admin(&AdminClass::model_admin());
        registry.add_admin(&AdminClass::hidden());
        registry.add_resolver(FIRST_MRO_MATCH_RESOLVER_PATH, Arc::new(GlobalFirstMroMatch));
        registry.add_register_on_site(SITE_REGISTER_PATH, Arc::new(DefaultSite));
        registry
    }

    /// Adds an entry, replacing any previous entry under the same path.
    pub fn insert(&mut self, path: impl Into<String>, item: Importable) {
        self.entries.insert(path.into(), item);
    }

    /// Adds a model under its own dotted path.
    pub fn add_model(&mut self, model: &ModelClass) {
        self.insert(model.path(), Importable::Model(model.clone()));
    }

    /// Adds every model an application declares.
    pub fn add_app(&mut self, app: &dyn AppConfig) {
        for model in app.models() {
            self.add_model(model);
        }
    }

    /// Adds an admin class under its own dotted path.
    pub fn add_admin(&mut self, admin_class: &AdminClass) {
        self.insert(admin_class.path(), Importable::Admin(admin_class.clone()));
    }

    /// Adds a resolver under the given path.
    pub fn add_resolver(&mut self, path: impl Into<String>, resolver: Arc<dyn AdminsResolver>) {
        self.insert(path, Importable::Resolver(resolver));
    }

    /// Adds a registration callback under the given path.
    pub fn add_register_on_site(
        &mut self,
        path: impl Into<String>,
        register: Arc<dyn RegisterOnSite>,
    ) {
        self.insert(path, Importable::RegisterOnSite(register));
    }

    /// Returns `true` if something is registered under `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a dotted path.
    pub fn import_string(&self, path: &str) -> RegistrarResult<Importable> {
        let (module, name) = split_path(path).ok_or_else(|| {
            RegistrarError::ImportError(format!("{path} doesn't look like a module path"))
        })?;

        self.entries.get(path).cloned().ok_or_else(|| {
            RegistrarError::ImportError(format!(
                "Module \"{module}\" does not define a \"{name}\" attribute/class"
            ))
        })
    }

    /// Looks up a model class.
    pub fn import_model(&self, path: &str) -> RegistrarResult<ModelClass> {
        match self.import_string(path)? {
            Importable::Model(model) => Ok(model),
            other => Err(wrong_kind(path, "model class", &other)),
        }
    }

    /// Looks up an admin class.
    pub fn import_admin(&self, path: &str) -> RegistrarResult<AdminClass> {
        match self.import_string(path)? {
            Importable::Admin(admin_class) => Ok(admin_class),
            other => Err(wrong_kind(path, "admin class", &other)),
        }
    }

    /// Looks up a resolver.
    pub fn import_resolver(&self, path: &str) -> RegistrarResult<Arc<dyn AdminsResolver>> {
        match self.import_string(path)? {
            Importable::Resolver(resolver) => Ok(resolver),
            other => Err(wrong_kind(path, "admins resolver", &other)),
        }
    }

    /// Looks up a registration callback.
    pub fn import_register_on_site(&self, path: &str) -> RegistrarResult<Arc<dyn RegisterOnSite>> {
        match self.import_string(path)? {
            Importable::RegisterOnSite(register) => Ok(register),
            other => Err(wrong_kind(path, "register-on-site callable", &other)),
        }
    }
}

fn wrong_kind(path: &str, expected: &str, found: &Importable) -> RegistrarError {
    RegistrarError::ImproperlyConfigured(format!(
        "{path} should be a {expected}, got a {}.",
        found.kind()
    ))
}
