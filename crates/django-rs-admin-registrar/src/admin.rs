//! Admin classes.
//!
//! An [`AdminClass`] is the registrar's view of a `ModelAdmin` subclass: a
//! dotted path and the presentation options it carries. Registering a model
//! binds it to an admin class, producing a [`ModelAdmin`] that the
//! [`AdminSite`](crate::site::AdminSite) stores.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::ModelClass;
use crate::reflection::DottedPath;

/// Dotted path of the framework's default admin class.
pub const MODEL_ADMIN_PATH: &str = "django.contrib.admin.ModelAdmin";

/// Dotted path of the built-in hidden admin class.
pub const HIDDEN_ADMIN_PATH: &str = "admin_registrar.admin.HiddenAdmin";

static MODEL_ADMIN: Lazy<AdminClass> =
    Lazy::new(|| AdminClass::new(MODEL_ADMIN_PATH, AdminOptions::default()));

static HIDDEN_ADMIN: Lazy<AdminClass> = Lazy::new(|| {
    MODEL_ADMIN.subclass_with(HIDDEN_ADMIN_PATH, |options| options.show_in_index = false)
});

/// Presentation options carried by an admin class.
///
/// A trimmed-down version of the options on django-rs's `ModelAdmin`: the
/// registrar only needs enough of them to tell admin classes apart and to
/// hide models from the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminOptions {
    /// Fields to display in the list view.
    pub list_display: Vec<String>,
    /// Fields searched when using the search box.
    pub search_fields: Vec<String>,
    /// Default ordering for the list view (prefix with "-" for descending).
    pub ordering: Vec<String>,
    /// Number of items per page in list view.
    pub list_per_page: usize,
    /// Fields that are read-only in forms.
    pub readonly_fields: Vec<String>,
    /// Whether the model is listed in the admin index.
    ///
    /// `false` makes `get_model_perms` empty: the model stays registered
    /// (related-object popups keep working) but is not shown.
    pub show_in_index: bool,
}

impl Default for AdminOptions {
    fn default() -> Self {
        Self {
            list_display: vec!["__str__".to_string()],
            search_fields: Vec::new(),
            ordering: Vec::new(),
            list_per_page: 100,
            readonly_fields: Vec::new(),
            show_in_index: true,
        }
    }
}

impl AdminOptions {
    /// Sets the fields to display in the list view.
    #[must_use]
    pub fn list_display(mut self, fields: Vec<&str>) -> Self {
        self.list_display = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the search fields.
    #[must_use]
    pub fn search_fields(mut self, fields: Vec<&str>) -> Self {
        self.search_fields = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the default ordering.
    #[must_use]
    pub fn ordering(mut self, fields: Vec<&str>) -> Self {
        self.ordering = fields.into_iter().map(String::from).collect();
        self
    }

    /// Sets the number of items per page.
    #[must_use]
    pub const fn list_per_page(mut self, n: usize) -> Self {
        self.list_per_page = n;
        self
    }

    /// Sets the read-only fields.
    #[must_use]
    pub fn readonly_fields(mut self, fields: Vec<&str>) -> Self {
        self.readonly_fields = fields.into_iter().map(String::from).collect();
        self
    }
}

struct AdminClassInner {
    path: String,
    base: Option<AdminClass>,
    options: AdminOptions,
}

/// A handle to an admin class.
///
/// Equality uses the dotted path only.
///
/// # Examples
///
/// ```
/// use django_rs_admin_registrar::admin::{AdminClass, AdminOptions};
///
/// let singleton = AdminClass::model_admin()
///     .subclass_with("solo.admin.SingletonModelAdmin", |o| o.list_per_page = 1);
/// assert_eq!(singleton.name(), "SingletonModelAdmin");
/// assert!(singleton.is_subclass_of(&AdminClass::model_admin()));
/// ```
#[derive(Clone)]
pub struct AdminClass(Arc<AdminClassInner>);

impl AdminClass {
    /// Creates a root admin class with the given options.
    pub fn new(path: impl Into<String>, options: AdminOptions) -> Self {
        Self(Arc::new(AdminClassInner {
            path: path.into(),
            base: None,
            options,
        }))
    }

    /// Returns the framework's default `ModelAdmin`.
    pub fn model_admin() -> Self {
        MODEL_ADMIN.clone()
    }

    /// Returns the built-in `HiddenAdmin`.
    pub fn hidden() -> Self {
        HIDDEN_ADMIN.clone()
    }

    /// Derives a subclass that inherits this class's options unchanged.
    #[must_use]
    pub fn subclass(&self, path: impl Into<String>) -> Self {
        self.subclass_with(path, |_| {})
    }

    /// Derives a subclass, letting the caller adjust the inherited options.
    #[must_use]
    pub fn subclass_with(
        &self,
        path: impl Into<String>,
        configure: impl FnOnce(&mut AdminOptions),
    ) -> Self {
        let mut options = self.0.options.clone();
        configure(&mut options);
        Self(Arc::new(AdminClassInner {
            path: path.into(),
            base: Some(self.clone()),
            options,
        }))
    }

    /// Returns the full dotted path.
    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Returns the class name, the last segment of the path.
    pub fn name(&self) -> &str {
        crate::reflection::typename(self)
    }

    /// Returns the parent admin class, if any.
    pub fn base(&self) -> Option<&Self> {
        self.0.base.as_ref()
    }

    /// Returns the presentation options.
    pub fn options(&self) -> &AdminOptions {
        &self.0.options
    }

    /// Returns `true` if this class is `other` or derives from it.
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class == other {
                return true;
            }
            current = class.base();
        }
        false
    }
}

impl PartialEq for AdminClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.path == other.0.path
    }
}

impl Eq for AdminClass {}

impl fmt::Debug for AdminClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClass")
            .field("path", &self.0.path)
            .field("base", &self.0.base.as_ref().map(Self::path))
            .finish_non_exhaustive()
    }
}

impl fmt::Display for AdminClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.path)
    }
}

impl DottedPath for AdminClass {
    fn dotted_path(&self) -> &str {
        self.path()
    }
}

/// An inline admin bound to the model it edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineAdmin {
    path: String,
    model: ModelClass,
}

impl InlineAdmin {
    /// Creates an inline admin editing `model`.
    pub fn new(path: impl Into<String>, model: &ModelClass) -> Self {
        Self {
            path: path.into(),
            model: model.clone(),
        }
    }

    /// Returns the dotted path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the model this inline edits.
    pub const fn model(&self) -> &ModelClass {
        &self.model
    }
}

impl DottedPath for InlineAdmin {
    fn dotted_path(&self) -> &str {
        &self.path
    }
}

/// A model bound to an admin class, as stored by the admin site.
#[derive(Debug, Clone)]
pub struct ModelAdmin {
    /// The registered model.
    pub model: ModelClass,
    /// The admin class the model is registered with.
    pub admin_class: AdminClass,
}

impl ModelAdmin {
    /// Binds `model` to `admin_class`.
    pub fn new(model: &ModelClass, admin_class: &AdminClass) -> Self {
        Self {
            model: model.clone(),
            admin_class: admin_class.clone(),
        }
    }

    /// Returns the application label.
    pub fn app_label(&self) -> &str {
        self.model.app_label()
    }

    /// Returns the lowercased model name.
    pub fn model_name(&self) -> String {
        self.model.model_name()
    }

    /// Returns the permissions shown in the admin index.
    ///
    /// Empty for admin classes that hide the model.
    pub fn model_perms(&self) -> HashMap<&'static str, bool> {
        if !self.admin_class.options().show_in_index {
            return HashMap::new();
        }
        ["add", "change", "delete", "view"]
            .into_iter()
            .map(|perm| (perm, true))
            .collect()
    }

    /// Returns `true` if the model is listed in the admin index.
    pub fn is_visible(&self) -> bool {
        !self.model_perms().is_empty()
    }
}
