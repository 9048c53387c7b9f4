//! Applications and the models they declare.
//!
//! The registrar works on one application at a time. [`AppConfig`] is the
//! small slice of Django's `AppConfig` it needs: a name and the list of models.
//! [`AppRegistry`] holds several apps and looks them up by label or name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{RegistrarError, RegistrarResult};
use crate::models::ModelClass;

/// An installed application.
///
/// # Examples
///
/// ```
/// use django_rs_admin_registrar::apps::AppConfig;
/// use django_rs_admin_registrar::models::ModelClass;
///
/// struct ShopApp {
///     models: Vec<ModelClass>,
/// }
///
/// impl AppConfig for ShopApp {
///     fn name(&self) -> &str { "project.shop" }
///     fn models(&self) -> &[ModelClass] { &self.models }
/// }
///
/// let app = ShopApp { models: vec![] };
/// assert_eq!(app.label(), "shop");
/// ```
pub trait AppConfig: Send + Sync {
    /// Returns the full dotted name of the application.
    fn name(&self) -> &str;

    /// Returns a short label derived from the name (the last component).
    fn label(&self) -> &str {
        self.name().rsplit('.').next().unwrap_or_else(|| self.name())
    }

    /// Returns a human-readable name for the application.
    fn verbose_name(&self) -> &str {
        self.name()
    }

    /// Returns every model declared by the application, abstract ones included.
    fn models(&self) -> &[ModelClass];

    /// Returns the registrable models: declared models minus abstract ones,
    /// in declaration order.
    fn get_models(&self) -> Vec<ModelClass> {
        self.models()
            .iter()
            .filter(|model| !model.is_abstract())
            .cloned()
            .collect()
    }

    /// Returns `true` if the model is declared by this application.
    fn contains(&self, model: &ModelClass) -> bool {
        self.models().contains(model)
    }
}

/// A plain owned [`AppConfig`].
#[derive(Debug, Clone)]
pub struct App {
    name: String,
    verbose_name: Option<String>,
    models: Vec<ModelClass>,
}

impl App {
    /// Creates an application with no models.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verbose_name: None,
            models: Vec::new(),
        }
    }

    /// Sets the verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = Some(name.into());
        self
    }

    /// Declares a model.
    #[must_use]
    pub fn model(mut self, model: &ModelClass) -> Self {
        self.models.push(model.clone());
        self
    }

    /// Declares several models at once.
    #[must_use]
    pub fn with_models<'a>(mut self, models: impl IntoIterator<Item = &'a ModelClass>) -> Self {
        self.models.extend(models.into_iter().cloned());
        self
    }
}

impl AppConfig for App {
    fn name(&self) -> &str {
        &self.name
    }

    fn verbose_name(&self) -> &str {
        self.verbose_name.as_deref().unwrap_or(&self.name)
    }

    fn models(&self) -> &[ModelClass] {
        &self.models
    }
}

/// A registry of installed applications.
#[derive(Default)]
pub struct AppRegistry {
    apps: Vec<Arc<dyn AppConfig>>,
    app_labels: HashMap<String, usize>,
}

impl AppRegistry {
    /// Creates a new, empty `AppRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application.
    ///
    /// Fails if an application with the same label is already registered.
    pub fn register(&mut self, app: Arc<dyn AppConfig>) -> RegistrarResult<()> {
        let label = app.label().to_string();
        if self.app_labels.contains_key(&label) {
            return Err(RegistrarError::ImproperlyConfigured(format!(
                "Application labels aren't unique, duplicates: {label}"
            )));
        }

        self.app_labels.insert(label, self.apps.len());
        self.apps.push(app);
        Ok(())
    }

    /// Returns the app with the given label.
    pub fn get_app_config(&self, label: &str) -> RegistrarResult<Arc<dyn AppConfig>> {
        self.app_labels
            .get(label)
            .map(|&idx| Arc::clone(&self.apps[idx]))
            .ok_or_else(|| {
                RegistrarError::ImproperlyConfigured(format!(
                    "No installed app with label '{label}'."
                ))
            })
    }

    /// Returns the app with the given full dotted name, if registered.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn AppConfig>> {
        self.apps.iter().find(|app| app.name() == name).cloned()
    }

    /// Returns all registered apps in registration order.
    pub fn get_app_configs(&self) -> &[Arc<dyn AppConfig>] {
        &self.apps
    }

    /// Returns the app that declares the given model, if any.
    pub fn app_for_model(&self, model: &ModelClass) -> Option<Arc<dyn AppConfig>> {
        self.apps.iter().find(|app| app.contains(model)).cloned()
    }
}

impl std::fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.apps.iter().map(|app| app.name()).collect();
        f.debug_struct("AppRegistry").field("apps", &names).finish()
    }
}
