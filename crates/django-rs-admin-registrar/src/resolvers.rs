//! Default admin class resolution.
//!
//! When a model has no explicit admin class, the registrar asks an
//! [`AdminsResolver`]. The built-in [`FirstMroMatchResolver`] walks the
//! model's method resolution order and returns the admin class configured for
//! the first ancestor that has one, so a default set for an abstract base such
//! as `solo.models.SingletonModel` applies to every model deriving from it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::admin::AdminClass;
use crate::conf::SETTINGS;
use crate::error::{RegistrarError, RegistrarResult};
use crate::importer::ClassRegistry;
use crate::models::ModelClass;

/// Dotted path under which the built-in resolver is importable.
pub const FIRST_MRO_MATCH_RESOLVER_PATH: &str = "admin_registrar.resolvers.first_mro_match_resolver";

/// Maps a model class to its default admin class.
pub trait AdminsResolver: Send + Sync {
    /// Returns the admin class to register `model` with.
    fn resolve(&self, model: &ModelClass) -> RegistrarResult<AdminClass>;
}

impl<F> AdminsResolver for F
where
    F: Fn(&ModelClass) -> RegistrarResult<AdminClass> + Send + Sync,
{
    fn resolve(&self, model: &ModelClass) -> RegistrarResult<AdminClass> {
        self(model)
    }
}

/// Resolves the admin class of the first ancestor with a configured default.
///
/// The `model path -> admin path` mapping is imported on first use and kept for
/// the lifetime of the resolver. The walk stops at the first class in the MRO
/// that is not a model, and falls back to `ModelAdmin`.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
///
/// use django_rs_admin_registrar::admin::AdminClass;
/// use django_rs_admin_registrar::importer::ClassRegistry;
/// use django_rs_admin_registrar::models::ModelClass;
/// use django_rs_admin_registrar::resolvers::{AdminsResolver, FirstMroMatchResolver};
///
/// let singleton = ModelClass::abstract_model("solo.models.SingletonModel").build().unwrap();
/// let config = ModelClass::concrete("site.models.Config").base(&singleton).build().unwrap();
/// let singleton_admin = AdminClass::model_admin().subclass("solo.admin.SingletonModelAdmin");
///
/// let mut registry = ClassRegistry::with_builtins();
/// registry.add_model(&singleton);
/// registry.add_admin(&singleton_admin);
///
/// let mapping = BTreeMap::from([(
///     "solo.models.SingletonModel".to_string(),
///     "solo.admin.SingletonModelAdmin".to_string(),
/// )]);
/// let resolver = FirstMroMatchResolver::new(mapping, Arc::new(registry));
/// assert_eq!(resolver.resolve(&config).unwrap(), singleton_admin);
/// ```
pub struct FirstMroMatchResolver {
    mapping: BTreeMap<String, String>,
    registry: Arc<ClassRegistry>,
    parsed: RwLock<Option<HashMap<ModelClass, AdminClass>>>,
}

impl FirstMroMatchResolver {
    /// Creates a resolver over a `model path -> admin path` mapping.
    pub fn new(mapping: BTreeMap<String, String>, registry: Arc<ClassRegistry>) -> Self {
        Self {
            mapping,
            registry,
            parsed: RwLock::new(None),
        }
    }

    /// Creates a resolver with no configured defaults.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new(), Arc::new(ClassRegistry::with_builtins()))
    }

    /// Sets the default admin class for `model` and its subclasses.
    ///
    /// Fails if `model` is not a model, if `admin_class` does not derive from
    /// `ModelAdmin`, or if a default is already set for `model`.
    pub fn set_default(&self, model: &ModelClass, admin_class: &AdminClass) -> RegistrarResult<()> {
        self.ensure_parsed()?;
        let mut parsed = self.parsed.write().expect("resolver lock poisoned");
        let defaults = parsed.get_or_insert_with(HashMap::new);
        insert_default(defaults, model, admin_class)?;
        drop(parsed);

        tracing::debug!(
            "admin class {} successfully set as default admin class for subclasses of {}.",
            admin_class.name(),
            model.name()
        );
        Ok(())
    }

    /// Returns the number of models with a configured default.
    pub fn len(&self) -> RegistrarResult<usize> {
        self.ensure_parsed()?;
        Ok(self
            .parsed
            .read()
            .expect("resolver lock poisoned")
            .as_ref()
            .map_or(0, HashMap::len))
    }

    /// Returns `true` if no defaults are configured.
    pub fn is_empty(&self) -> RegistrarResult<bool> {
        Ok(self.len()? == 0)
    }

    fn ensure_parsed(&self) -> RegistrarResult<()> {
        if self.parsed.read().expect("resolver lock poisoned").is_some() {
            return Ok(());
        }

        let mut defaults = HashMap::with_capacity(self.mapping.len());
        for (model_path, admin_path) in &self.mapping {
            let model = self.registry.import_model(model_path)?;
            let admin_class = self.registry.import_admin(admin_path)?;
            insert_default(&mut defaults, &model, &admin_class)?;
        }

        let mut parsed = self.parsed.write().expect("resolver lock poisoned");
        if parsed.is_none() {
            *parsed = Some(defaults);
        }
        Ok(())
    }
}

fn insert_default(
    defaults: &mut HashMap<ModelClass, AdminClass>,
    model: &ModelClass,
    admin_class: &AdminClass,
) -> RegistrarResult<()> {
    if !model.is_model() {
        return Err(RegistrarError::TypeError(format!(
            "{model} should be a subclass of Model"
        )));
    }
    if !admin_class.is_subclass_of(&AdminClass::model_admin()) {
        return Err(RegistrarError::TypeError(format!(
            "{admin_class} should be a subclass of ModelAdmin"
        )));
    }
    if defaults.contains_key(model) {
        return Err(RegistrarError::DuplicateDefault(model.path().to_string()));
    }
    defaults.insert(model.clone(), admin_class.clone());
    Ok(())
}

impl AdminsResolver for FirstMroMatchResolver {
    fn resolve(&self, model: &ModelClass) -> RegistrarResult<AdminClass> {
        self.ensure_parsed()?;
        let parsed = self.parsed.read().expect("resolver lock poisoned");
        let Some(defaults) = parsed.as_ref() else {
            return Ok(AdminClass::model_admin());
        };

        for class in model.mro() {
            if !class.is_model() {
                break;
            }
            if let Some(admin_class) = defaults.get(&class) {
                return Ok(admin_class.clone());
            }
        }
        Ok(AdminClass::model_admin())
    }
}

impl std::fmt::Debug for FirstMroMatchResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstMroMatchResolver")
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}

static FIRST_MRO_MATCH: Lazy<FirstMroMatchResolver> = Lazy::new(|| {
    let conf = SETTINGS.get();
    FirstMroMatchResolver::new(
        conf.default_admin_classes().clone(),
        Arc::clone(conf.registry()),
    )
});

/// Returns the process-wide resolver built from [`SETTINGS`].
///
/// The mapping is read from the global settings the first time this is called,
/// so configure the settings before the first registration.
pub fn first_mro_match_resolver() -> &'static FirstMroMatchResolver {
    &FIRST_MRO_MATCH
}

/// Delegates to [`first_mro_match_resolver`]; this is what the built-in
/// dotted path imports.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalFirstMroMatch;

impl AdminsResolver for GlobalFirstMroMatch {
    fn resolve(&self, model: &ModelClass) -> RegistrarResult<AdminClass> {
        first_mro_match_resolver().resolve(model)
    }
}
