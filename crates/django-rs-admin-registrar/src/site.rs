//! The admin site and the registration seam.
//!
//! [`AdminSite`] is the registry models end up in, keyed by
//! `"app_label.model_name"`. Like Django's `AdminSite.register`, registering a
//! model twice is an error. [`RegisterOnSite`] is the single call the registrar
//! makes per model; it is implemented by `AdminSite` and by plain closures, so
//! callers can register somewhere else entirely.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;

use crate::admin::{AdminClass, ModelAdmin};
use crate::error::{RegistrarError, RegistrarResult};
use crate::models::ModelClass;

/// The registration callback invoked once per registered model.
pub trait RegisterOnSite: Send + Sync {
    /// Registers `model` with `admin_class`.
    fn register(&self, model: &ModelClass, admin_class: &AdminClass) -> RegistrarResult<()>;

    /// Returns `true` if the model is already registered.
    ///
    /// Callbacks that cannot tell return `false`.
    fn is_registered(&self, _model: &ModelClass) -> bool {
        false
    }
}

impl<F> RegisterOnSite for F
where
    F: Fn(&ModelClass, &AdminClass) -> RegistrarResult<()> + Send + Sync,
{
    fn register(&self, model: &ModelClass, admin_class: &AdminClass) -> RegistrarResult<()> {
        self(model, admin_class)
    }
}

/// The admin site: every registered model and its admin class.
///
/// Registration goes through `&self` so that a single site can be shared as a
/// process-wide static (see [`SITE`]).
///
/// # Examples
///
/// ```
/// use django_rs_admin_registrar::admin::AdminClass;
/// use django_rs_admin_registrar::models::ModelClass;
/// use django_rs_admin_registrar::site::AdminSite;
///
/// let site = AdminSite::new("admin");
/// let article = ModelClass::concrete("blog.models.Article").build().unwrap();
/// site.register(&article, &AdminClass::model_admin()).unwrap();
///
/// assert!(site.is_registered(&article));
/// assert!(site.register(&article, &AdminClass::model_admin()).is_err());
/// ```
pub struct AdminSite {
    name: String,
    registry: RwLock<HashMap<String, ModelAdmin>>,
}

impl AdminSite {
    /// Creates a new, empty admin site.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            registry: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the site name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a model with an admin class.
    ///
    /// Abstract models and non-model classes cannot be registered.
    pub fn register(&self, model: &ModelClass, admin_class: &AdminClass) -> RegistrarResult<()> {
        if !model.is_model() || model.is_abstract() {
            return Err(RegistrarError::ImproperlyConfigured(format!(
                "The model {} is abstract, so it cannot be registered with admin.",
                model.name()
            )));
        }

        let key = model.site_key();
        let mut registry = self.registry.write().expect("admin site lock poisoned");
        if let Some(existing) = registry.get(&key) {
            return Err(RegistrarError::AlreadyRegistered(
                model.label(),
                existing.admin_class.path().to_string(),
            ));
        }

        registry.insert(key, ModelAdmin::new(model, admin_class));
        Ok(())
    }

    /// Removes a model from the site.
    pub fn unregister(&self, model: &ModelClass) -> RegistrarResult<()> {
        self.registry
            .write()
            .expect("admin site lock poisoned")
            .remove(&model.site_key())
            .map(|_| ())
            .ok_or_else(|| RegistrarError::NotRegistered(model.label()))
    }

    /// Returns `true` if the model is registered.
    pub fn is_registered(&self, model: &ModelClass) -> bool {
        self.registry
            .read()
            .expect("admin site lock poisoned")
            .contains_key(&model.site_key())
    }

    /// Returns the `ModelAdmin` for a registered model key (`"app.model"`).
    pub fn get_model_admin(&self, model_key: &str) -> Option<ModelAdmin> {
        self.registry
            .read()
            .expect("admin site lock poisoned")
            .get(model_key)
            .cloned()
    }

    /// Returns every registered model key, sorted.
    pub fn registered_models(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .registry
            .read()
            .expect("admin site lock poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Returns the number of registered models.
    pub fn model_count(&self) -> usize {
        self.registry.read().expect("admin site lock poisoned").len()
    }

    /// Returns the model keys listed in the admin index, grouped by app label.
    ///
    /// Models registered with a hiding admin class are left out.
    pub fn index(&self) -> Vec<(String, Vec<String>)> {
        let registry = self.registry.read().expect("admin site lock poisoned");
        let mut apps: HashMap<String, Vec<String>> = HashMap::new();
        for admin in registry.values().filter(|admin| admin.is_visible()) {
            apps.entry(admin.app_label().to_string())
                .or_default()
                .push(admin.model_name());
        }
        drop(registry);

        let mut index: Vec<(String, Vec<String>)> = apps.into_iter().collect();
        for (_, models) in &mut index {
            models.sort_unstable();
        }
        index.sort_by(|a, b| a.0.cmp(&b.0));
        index
    }
}

impl RegisterOnSite for AdminSite {
    fn register(&self, model: &ModelClass, admin_class: &AdminClass) -> RegistrarResult<()> {
        Self::register(self, model, admin_class)
    }

    fn is_registered(&self, model: &ModelClass) -> bool {
        Self::is_registered(self, model)
    }
}

impl std::fmt::Debug for AdminSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSite")
            .field("name", &self.name)
            .field("models", &self.registered_models().join(", "))
            .finish()
    }
}

/// The default admin site, the equivalent of `django.contrib.admin.site`.
pub static SITE: Lazy<AdminSite> = Lazy::new(|| AdminSite::new("admin"));

/// Registers into [`SITE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSite;

impl RegisterOnSite for DefaultSite {
    fn register(&self, model: &ModelClass, admin_class: &AdminClass) -> RegistrarResult<()> {
        SITE.register(model, admin_class)
    }

    fn is_registered(&self, model: &ModelClass) -> bool {
        SITE.is_registered(model)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn product() -> ModelClass {
        ModelClass::concrete("shop.models.Product").build().unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let site = AdminSite::new("admin");
        site.register(&product(), &AdminClass::model_admin()).unwrap();

        assert_eq!(site.name(), "admin");
        assert_eq!(site.model_count(), 1);
        assert!(site.is_registered(&product()));
        let admin = site.get_model_admin("shop.product").unwrap();
        assert_eq!(admin.admin_class, AdminClass::model_admin());
        assert_eq!(site.registered_models(), vec!["shop.product"]);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let site = AdminSite::new("admin");
        site.register(&product(), &AdminClass::model_admin()).unwrap();
        let err = site.register(&product(), &AdminClass::hidden()).unwrap_err();
        assert!(matches!(err, RegistrarError::AlreadyRegistered(ref label, _) if label == "shop.Product"));
        // The first registration is kept.
        assert_eq!(
            site.get_model_admin("shop.product").unwrap().admin_class,
            AdminClass::model_admin()
        );
    }

    #[test]
    fn test_abstract_model_rejected() {
        let site = AdminSite::new("admin");
        let base = ModelClass::abstract_model("shop.models.Base").build().unwrap();
        assert!(site.register(&base, &AdminClass::model_admin()).is_err());
        assert_eq!(site.model_count(), 0);
    }

    #[test]
    fn test_unregister() {
        let site = AdminSite::new("admin");
        site.register(&product(), &AdminClass::model_admin()).unwrap();
        site.unregister(&product()).unwrap();
        assert!(!site.is_registered(&product()));
        assert!(matches!(
            site.unregister(&product()),
            Err(RegistrarError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_index_omits_hidden_models() {
        let site = AdminSite::new("admin");
        let order = ModelClass::concrete("shop.models.Order").build().unwrap();
        let tag = ModelClass::concrete("blog.models.Tag").build().unwrap();
        site.register(&product(), &AdminClass::model_admin()).unwrap();
        site.register(&order, &AdminClass::hidden()).unwrap();
        site.register(&tag, &AdminClass::model_admin()).unwrap();

        assert_eq!(
            site.index(),
            vec![
                ("blog".to_string(), vec!["tag".to_string()]),
                ("shop".to_string(), vec!["product".to_string()]),
            ]
        );
        assert_eq!(site.model_count(), 3);
    }

    #[test]
    fn test_closure_register_on_site() {
        let seen = Mutex::new(Vec::new());
        let callback = |model: &ModelClass, admin: &AdminClass| {
            seen.lock()
                .unwrap()
                .push(format!("{}:{}", model.name(), admin.name()));
            Ok::<(), RegistrarError>(())
        };
        RegisterOnSite::register(&callback, &product(), &AdminClass::model_admin()).unwrap();
        assert!(!RegisterOnSite::is_registered(&callback, &product()));
        assert_eq!(*seen.lock().unwrap(), vec!["Product:ModelAdmin".to_string()]);
    }
}
