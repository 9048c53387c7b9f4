//! Model classes and their ancestor chains.
//!
//! A [`ModelClass`] is a cheap, cloneable handle describing a model type the
//! way the admin sees it: a dotted path, a kind, and the bases it inherits
//! from. Its method resolution order is computed once, with C3 linearization,
//! when the class is built. This mirrors what Django's admin relies on from
//! `type.mro()` when looking up defaults for a model's ancestors.
//!
//! # Examples
//!
//! ```
//! use django_rs_admin_registrar::models::ModelClass;
//!
//! let base = ModelClass::abstract_model("catalog.models.Item").build().unwrap();
//! let book = ModelClass::concrete("catalog.models.Book").base(&base).build().unwrap();
//!
//! let mro: Vec<_> = book.mro().iter().map(|c| c.name().to_string()).collect();
//! assert_eq!(mro, vec!["Book", "Item", "Model"]);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::error::{RegistrarError, RegistrarResult};
use crate::reflection::{split_path, DottedPath};

/// The dotted path of the root model class.
pub const ROOT_MODEL_PATH: &str = "django.db.models.Model";

static ROOT: Lazy<ModelClass> = Lazy::new(|| {
    ModelClass(Arc::new(ModelClassInner {
        path: ROOT_MODEL_PATH.to_string(),
        app_label: "models".to_string(),
        kind: ModelKind::Abstract,
        bases: Vec::new(),
        ancestors: Vec::new(),
    }))
});

/// What sort of class a [`ModelClass`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// A concrete model backed by its own table.
    Concrete,
    /// An abstract model; never listed by an app and never registered.
    Abstract,
    /// A proxy model sharing its parent's table.
    Proxy,
    /// A plain base class that is not a model at all.
    Mixin,
}

impl ModelKind {
    /// Returns `true` for every kind that is a model.
    pub const fn is_model(self) -> bool {
        !matches!(self, Self::Mixin)
    }
}

struct ModelClassInner {
    path: String,
    app_label: String,
    kind: ModelKind,
    bases: Vec<ModelClass>,
    /// The MRO without the class itself.
    ancestors: Vec<ModelClass>,
}

/// A handle to a model class.
///
/// Equality and hashing use the dotted path only, so two handles built for
/// the same path compare equal.
#[derive(Clone)]
pub struct ModelClass(Arc<ModelClassInner>);

impl ModelClass {
    /// Returns the root `django.db.models.Model` class.
    pub fn root() -> Self {
        ROOT.clone()
    }

    /// Starts building a concrete model.
    pub fn concrete(path: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder::new(path, ModelKind::Concrete)
    }

    /// Starts building an abstract model.
    pub fn abstract_model(path: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder::new(path, ModelKind::Abstract)
    }

    /// Starts building a proxy model.
    pub fn proxy(path: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder::new(path, ModelKind::Proxy)
    }

    /// Starts building a non-model base class.
    pub fn mixin(path: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder::new(path, ModelKind::Mixin)
    }

    /// Returns the full dotted path, e.g. `shop.models.Product`.
    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Returns the class name, the last segment of the path.
    pub fn name(&self) -> &str {
        split_path(&self.0.path).map_or(self.0.path.as_str(), |(_, name)| name)
    }

    /// Returns the module part of the path.
    pub fn module(&self) -> &str {
        split_path(&self.0.path).map_or("", |(module, _)| module)
    }

    /// Returns the application label this model belongs to.
    pub fn app_label(&self) -> &str {
        &self.0.app_label
    }

    /// Returns the lowercased model name, as used in admin URLs.
    pub fn model_name(&self) -> String {
        self.name().to_lowercase()
    }

    /// Returns the `"app_label.ModelName"` label.
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label(), self.name())
    }

    /// Returns the `"app_label.model_name"` key used by the admin site.
    pub fn site_key(&self) -> String {
        format!("{}.{}", self.app_label(), self.model_name())
    }

    /// Returns what sort of class this is.
    pub fn kind(&self) -> ModelKind {
        self.0.kind
    }

    /// Returns `true` if this class is a model (anything but a mixin).
    pub fn is_model(&self) -> bool {
        self.0.kind.is_model()
    }

    /// Returns `true` for abstract models.
    pub fn is_abstract(&self) -> bool {
        self.0.kind == ModelKind::Abstract
    }

    /// Returns the direct bases in declaration order.
    pub fn bases(&self) -> &[Self] {
        &self.0.bases
    }

    /// Returns the method resolution order, starting with this class.
    pub fn mro(&self) -> Vec<Self> {
        let mut mro = Vec::with_capacity(self.0.ancestors.len() + 1);
        mro.push(self.clone());
        mro.extend(self.0.ancestors.iter().cloned());
        mro
    }

    /// Returns `true` if `other` appears in this class's MRO.
    pub fn is_subclass_of(&self, other: &Self) -> bool {
        self == other || self.0.ancestors.contains(other)
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.path == other.0.path
    }
}

impl Eq for ModelClass {}

impl Hash for ModelClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.path.hash(state);
    }
}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("path", &self.0.path)
            .field("kind", &self.0.kind)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.path)
    }
}

impl DottedPath for ModelClass {
    fn dotted_path(&self) -> &str {
        self.path()
    }
}

/// Builder for [`ModelClass`].
#[derive(Debug)]
pub struct ModelClassBuilder {
    path: String,
    kind: ModelKind,
    app_label: Option<String>,
    bases: Vec<ModelClass>,
}

impl ModelClassBuilder {
    fn new(path: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            path: path.into(),
            kind,
            app_label: None,
            bases: Vec::new(),
        }
    }

    /// Appends a base class. Order matters for the MRO.
    #[must_use]
    pub fn base(mut self, base: &ModelClass) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Overrides the app label. By default it is the first path segment.
    #[must_use]
    pub fn app_label(mut self, label: impl Into<String>) -> Self {
        self.app_label = Some(label.into());
        self
    }

    /// Validates the hierarchy and computes the MRO.
    ///
    /// A model whose bases contain no model gets the root model appended as
    /// its last base. A mixin may only inherit from other mixins.
    pub fn build(mut self) -> RegistrarResult<ModelClass> {
        if split_path(&self.path).is_none() {
            return Err(RegistrarError::TypeError(format!(
                "{} is not a dotted path",
                self.path
            )));
        }

        if self.kind.is_model() {
            if !self.bases.iter().any(ModelClass::is_model) {
                self.bases.push(ModelClass::root());
            }
        } else if let Some(model) = self.bases.iter().find(|b| b.is_model()) {
            return Err(RegistrarError::TypeError(format!(
                "mixin {} cannot inherit from model {}",
                self.path, model
            )));
        }

        let ancestors = linearize(&self.path, &self.bases)?;
        let app_label = self.app_label.unwrap_or_else(|| {
            self.path
                .split('.')
                .next()
                .unwrap_or_default()
                .to_string()
        });

        Ok(ModelClass(Arc::new(ModelClassInner {
            path: self.path,
            app_label,
            kind: self.kind,
            bases: self.bases,
            ancestors,
        })))
    }
}

/// C3 merge of the bases' MROs followed by the list of bases itself.
fn linearize(path: &str, bases: &[ModelClass]) -> RegistrarResult<Vec<ModelClass>> {
    let mut sequences: Vec<Vec<ModelClass>> = bases.iter().map(ModelClass::mro).collect();
    sequences.push(bases.to_vec());

    let mut result = Vec::new();
    loop {
        sequences.retain(|seq| !seq.is_empty());
        if sequences.is_empty() {
            return Ok(result);
        }

        let candidate = sequences
            .iter()
            .map(|seq| &seq[0])
            .find(|head| !sequences.iter().any(|seq| seq[1..].contains(head)))
            .cloned()
            .ok_or_else(|| RegistrarError::InconsistentHierarchy(path.to_string()))?;

        for seq in &mut sequences {
            if seq[0] == candidate {
                seq.remove(0);
            }
        }
        result.push(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(mro: &[ModelClass]) -> Vec<&str> {
        mro.iter().map(ModelClass::name).collect()
    }

    #[test]
    fn test_root_model() {
        let root = ModelClass::root();
        assert_eq!(root.path(), ROOT_MODEL_PATH);
        assert!(root.is_model());
        assert!(root.is_abstract());
        assert_eq!(names(&root.mro()), vec!["Model"]);
    }

    #[test]
    fn test_plain_model_inherits_root() {
        let product = ModelClass::concrete("shop.models.Product").build().unwrap();
        assert_eq!(product.bases(), &[ModelClass::root()]);
        assert_eq!(names(&product.mro()), vec!["Product", "Model"]);
        assert_eq!(product.app_label(), "shop");
        assert_eq!(product.label(), "shop.Product");
        assert_eq!(product.site_key(), "shop.product");
        assert_eq!(product.module(), "shop.models");
    }

    #[test]
    fn test_app_label_override() {
        let user = ModelClass::concrete("django.contrib.auth.models.User")
            .app_label("auth")
            .build()
            .unwrap();
        assert_eq!(user.site_key(), "auth.user");
    }

    #[test]
    fn test_mixin_first_mro() {
        let mixin = ModelClass::mixin("shop.mixins.Timestamped").build().unwrap();
        let order = ModelClass::concrete("shop.models.Order")
            .base(&mixin)
            .build()
            .unwrap();
        assert_eq!(names(&order.mro()), vec!["Order", "Timestamped", "Model"]);
        assert!(!order.mro()[1].is_model());
    }

    #[test]
    fn test_diamond_mro() {
        let base = ModelClass::abstract_model("a.models.Base").build().unwrap();
        let left = ModelClass::abstract_model("a.models.Left").base(&base).build().unwrap();
        let right = ModelClass::abstract_model("a.models.Right").base(&base).build().unwrap();
        let child = ModelClass::concrete("a.models.Child")
            .base(&left)
            .base(&right)
            .build()
            .unwrap();
        assert_eq!(
            names(&child.mro()),
            vec!["Child", "Left", "Right", "Base", "Model"]
        );
        assert!(child.is_subclass_of(&base));
        assert!(!base.is_subclass_of(&child));
    }

    #[test]
    fn test_inconsistent_hierarchy() {
        let base = ModelClass::abstract_model("a.models.Base").build().unwrap();
        let derived = ModelClass::abstract_model("a.models.Derived")
            .base(&base)
            .build()
            .unwrap();
        let err = ModelClass::concrete("a.models.Broken")
            .base(&base)
            .base(&derived)
            .build()
            .unwrap_err();
        assert!(matches!(err, RegistrarError::InconsistentHierarchy(p) if p == "a.models.Broken"));
    }

    #[test]
    fn test_mixin_cannot_inherit_model() {
        let product = ModelClass::concrete("shop.models.Product").build().unwrap();
        let err = ModelClass::mixin("shop.mixins.Bad").base(&product).build().unwrap_err();
        assert!(matches!(err, RegistrarError::TypeError(_)));
    }

    #[test]
    fn test_path_must_be_dotted() {
        assert!(ModelClass::concrete("Product").build().is_err());
    }

    #[test]
    fn test_equality_by_path() {
        let a = ModelClass::concrete("shop.models.Product").build().unwrap();
        let b = ModelClass::concrete("shop.models.Product").build().unwrap();
        assert_eq!(a, b);
        let mut set = std::collections::HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }
}
