//! Declarative admin registration for one application.
//!
//! [`AdminRegistrar`] collects, for a single app, which models to leave out,
//! which to register hidden, and which admin class to use for specific models.
//! [`perform_register`](AdminRegistrar::perform_register) then walks the app's
//! models and registers each one exactly once:
//!
//! 1. excluded models are skipped;
//! 2. hidden models get `HIDDEN_ADMIN_CLASS`;
//! 3. models with an explicit admin class get that class;
//! 4. everything else gets whatever the resolver returns.
//!
//! Registering a model that is already on the site fails the whole call, like
//! Django's `AlreadyRegistered`. Exclude such models instead.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use django_rs_admin_registrar::admin::AdminClass;
//! use django_rs_admin_registrar::apps::App;
//! use django_rs_admin_registrar::models::ModelClass;
//! use django_rs_admin_registrar::registrar::AdminRegistrar;
//! use django_rs_admin_registrar::site::AdminSite;
//!
//! let product = ModelClass::concrete("shop.models.Product").build().unwrap();
//! let log = ModelClass::concrete("shop.models.AuditLog").build().unwrap();
//! let tag = ModelClass::concrete("shop.models.Tag").build().unwrap();
//! let app = App::new("shop").with_models([&product, &log, &tag]);
//!
//! let site = Arc::new(AdminSite::new("admin"));
//! let mut registrar = AdminRegistrar::new(Arc::new(app)).register_on_site(site.clone());
//! registrar.exclude(&log);
//! registrar.hide_model(&tag);
//! let product_admin = registrar.set_for_model(&product)(
//!     AdminClass::model_admin().subclass("shop.admin.ProductAdmin"),
//! );
//!
//! let report = registrar.perform_register().unwrap();
//! assert_eq!(report.registered().count(), 2);
//! assert_eq!(site.get_model_admin("shop.product").unwrap().admin_class, product_admin);
//! assert!(!site.is_registered(&log));
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::admin::{AdminClass, InlineAdmin};
use crate::apps::AppConfig;
use crate::checks::CheckMessage;
use crate::colors::Palette;
use crate::conf::{Conf, SETTINGS};
use crate::error::RegistrarResult;
use crate::models::ModelClass;
use crate::reflection::typename;
use crate::resolvers::AdminsResolver;
use crate::site::RegisterOnSite;

/// What the registrar does with one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The model is left out.
    Excluded,
    /// The model is registered with the hidden admin class.
    Hidden(AdminClass),
    /// The model is registered with an explicitly set admin class.
    Custom(AdminClass),
    /// The model is registered with the class the resolver returned.
    Resolved(AdminClass),
}

impl Decision {
    /// Returns the admin class to register with, or `None` when excluded.
    pub const fn admin_class(&self) -> Option<&AdminClass> {
        match self {
            Self::Excluded => None,
            Self::Hidden(admin_class) | Self::Custom(admin_class) | Self::Resolved(admin_class) => {
                Some(admin_class)
            }
        }
    }
}

/// A model and the decision taken for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    /// The model.
    pub model: ModelClass,
    /// What happens to it.
    pub decision: Decision,
}

/// The outcome of [`AdminRegistrar::perform_register`], in model order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    /// One entry per model of the app.
    pub entries: Vec<Planned>,
}

impl RegistrationReport {
    /// Models that were registered, with their admin classes.
    pub fn registered(&self) -> impl Iterator<Item = (&ModelClass, &AdminClass)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.decision.admin_class().map(|admin| (&entry.model, admin)))
    }

    /// Models that were excluded.
    pub fn excluded(&self) -> impl Iterator<Item = &ModelClass> {
        self.entries
            .iter()
            .filter(|entry| entry.decision == Decision::Excluded)
            .map(|entry| &entry.model)
    }

    /// Models that were registered hidden.
    pub fn hidden(&self) -> impl Iterator<Item = &ModelClass> {
        self.entries
            .iter()
            .filter(|entry| matches!(entry.decision, Decision::Hidden(_)))
            .map(|entry| &entry.model)
    }
}

/// Registers an application's models on the admin site.
pub struct AdminRegistrar {
    app: Arc<dyn AppConfig>,
    excluded_models: HashSet<ModelClass>,
    hidden_models: HashSet<ModelClass>,
    classes_for_models: HashMap<ModelClass, AdminClass>,
    resolver: Option<Arc<dyn AdminsResolver>>,
    site: Option<Arc<dyn RegisterOnSite>>,
    conf: Option<Arc<Conf>>,
}

impl AdminRegistrar {
    /// Creates a registrar for `app`.
    ///
    /// Unless [`conf`](Self::conf) is given, the global [`SETTINGS`] are read
    /// the first time a setting is needed, not here.
    pub fn new(app: Arc<dyn AppConfig>) -> Self {
        Self {
            app,
            excluded_models: HashSet::new(),
            hidden_models: HashSet::new(),
            classes_for_models: HashMap::new(),
            resolver: None,
            site: None,
            conf: None,
        }
    }

    /// Sets the initial model -> admin class mapping.
    #[must_use]
    pub fn classes_for_models(
        mut self,
        classes: impl IntoIterator<Item = (ModelClass, AdminClass)>,
    ) -> Self {
        self.classes_for_models.extend(classes);
        self
    }

    /// Sets the initially excluded models.
    #[must_use]
    pub fn excluded_models(mut self, models: impl IntoIterator<Item = ModelClass>) -> Self {
        self.excluded_models.extend(models);
        self
    }

    /// Sets the initially hidden models.
    #[must_use]
    pub fn hidden_models(mut self, models: impl IntoIterator<Item = ModelClass>) -> Self {
        self.hidden_models.extend(models);
        self
    }

    /// Overrides `ADMINS_RESOLVER` for this registrar.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn AdminsResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Overrides `REGISTER_ON_SITE` for this registrar.
    #[must_use]
    pub fn register_on_site(mut self, site: Arc<dyn RegisterOnSite>) -> Self {
        self.site = Some(site);
        self
    }

    /// Uses `conf` instead of the global settings.
    #[must_use]
    pub fn conf(mut self, conf: Arc<Conf>) -> Self {
        self.conf = Some(conf);
        self
    }

    /// Returns the application this registrar works on.
    pub fn app(&self) -> &Arc<dyn AppConfig> {
        &self.app
    }

    /// Leaves `model` out of the registration.
    pub fn exclude(&mut self, model: &ModelClass) {
        self.excluded_models.insert(model.clone());
    }

    /// Leaves the model edited by `inline` out of the registration.
    pub fn exclude_inline(&mut self, inline: &InlineAdmin) {
        self.exclude(inline.model());
    }

    /// Registers `model` with `admin_class`.
    pub fn set_admin_class_for_model(&mut self, model: &ModelClass, admin_class: &AdminClass) {
        self.classes_for_models
            .insert(model.clone(), admin_class.clone());
    }

    /// Returns a function that records its argument as the admin class for
    /// `model` and hands it back, so an admin class can be declared and bound
    /// in one expression.
    pub fn set_for_model<'a>(
        &'a mut self,
        model: &'a ModelClass,
    ) -> impl FnOnce(AdminClass) -> AdminClass + 'a {
        move |admin_class| {
            self.set_admin_class_for_model(model, &admin_class);
            admin_class
        }
    }

    /// Registers `model` with the hidden admin class.
    pub fn hide_model(&mut self, model: &ModelClass) {
        self.hidden_models.insert(model.clone());
    }

    /// Decides what to do with one model without registering anything.
    pub fn decide(&self, model: &ModelClass) -> RegistrarResult<Decision> {
        if self.excluded_models.contains(model) {
            return Ok(Decision::Excluded);
        }
        if self.hidden_models.contains(model) {
            return Ok(Decision::Hidden(self.active_conf().hidden_admin_class()?.clone()));
        }
        if let Some(admin_class) = self.classes_for_models.get(model) {
            return Ok(Decision::Custom(admin_class.clone()));
        }
        let admin_class = match &self.resolver {
            Some(resolver) => resolver.resolve(model)?,
            None => self.active_conf().admins_resolver()?.resolve(model)?,
        };
        Ok(Decision::Resolved(admin_class))
    }

    /// Decides every model of the app without registering anything.
    pub fn plan(&self) -> RegistrarResult<Vec<Planned>> {
        self.app
            .get_models()
            .into_iter()
            .map(|model| {
                let decision = self.decide(&model)?;
                Ok(Planned { model, decision })
            })
            .collect()
    }

    /// Registers every model of the app that is not excluded.
    ///
    /// Stops at the first failing registration and returns its error; models
    /// registered before it stay registered.
    pub fn perform_register(&self) -> RegistrarResult<RegistrationReport> {
        let site = self.target_site()?;
        let palette = Palette::for_colored(self.active_conf().colored_logs());
        let mut report = RegistrationReport::default();

        tracing::debug!("{}", "-".repeat(48));
        for model in self.app.get_models() {
            let start = format!(
                "model {} from {}",
                palette.paint(palette.green, typename(&model)),
                palette.paint(palette.magenta, self.app.name()),
            );

            let decision = self.decide(&model)?;
            match decision.admin_class() {
                None => {
                    tracing::debug!("{start} is {}.", palette.paint(palette.red, "excluded"));
                }
                Some(admin_class) => {
                    site.register(&model, admin_class)?;
                    let middle = if matches!(decision, Decision::Hidden(_)) {
                        "was hidden by"
                    } else {
                        "succesfully registered with"
                    };
                    tracing::debug!(
                        "{start} {middle} {} admin class.",
                        palette.paint(palette.green, admin_class.name())
                    );
                }
            }
            report.entries.push(Planned { model, decision });
        }

        Ok(report)
    }

    /// Reports configuration that is probably a mistake.
    ///
    /// * `admin_registrar.W001`: an excluded model is not part of the app.
    /// * `admin_registrar.W002`: a hidden model is not part of the app.
    /// * `admin_registrar.W003`: a model with an admin class is not part of the app.
    /// * `admin_registrar.W004`: an excluded model is also hidden or has an admin class.
    /// * `admin_registrar.W005`: a hidden model also has an admin class.
    /// * `admin_registrar.E001`: a model to register is already on the site.
    /// * `admin_registrar.E002`: a setting cannot be resolved.
    pub fn check(&self) -> Vec<CheckMessage> {
        let mut messages = Vec::new();
        let app_name = self.app.name();

        for model in sorted(&self.excluded_models) {
            if !self.app.contains(model) {
                messages.push(
                    CheckMessage::warning(
                        "admin_registrar.W001",
                        format!("Excluded model {} is not part of app {app_name}.", model.label()),
                    )
                    .hint("Remove it from the excluded models."),
                );
            }
            if self.hidden_models.contains(model) || self.classes_for_models.contains_key(model) {
                messages.push(
                    CheckMessage::warning(
                        "admin_registrar.W004",
                        format!("Model {} is excluded and also configured.", model.label()),
                    )
                    .hint("Exclusion wins; drop the other configuration."),
                );
            }
        }

        for model in sorted(&self.hidden_models) {
            if !self.app.contains(model) {
                messages.push(CheckMessage::warning(
                    "admin_registrar.W002",
                    format!("Hidden model {} is not part of app {app_name}.", model.label()),
                ));
            }
            if self.classes_for_models.contains_key(model) && !self.excluded_models.contains(model)
            {
                messages.push(
                    CheckMessage::warning(
                        "admin_registrar.W005",
                        format!("Model {} is hidden and also has an admin class.", model.label()),
                    )
                    .hint("Hiding wins; the admin class is ignored."),
                );
            }
        }

        let custom: HashSet<ModelClass> = self.classes_for_models.keys().cloned().collect();
        for model in sorted(&custom) {
            if !self.app.contains(model) {
                messages.push(CheckMessage::warning(
                    "admin_registrar.W003",
                    format!(
                        "Model {} has an admin class but is not part of app {app_name}.",
                        model.label()
                    ),
                ));
            }
        }

        match self.target_site() {
            Ok(site) => {
                for model in self.app.get_models() {
                    if !self.excluded_models.contains(&model) && site.is_registered(&model) {
                        messages.push(
                            CheckMessage::error(
                                "admin_registrar.E001",
                                format!("Model {} is already registered.", model.label()),
                            )
                            .hint("Exclude it from the registrar."),
                        );
                    }
                }
            }
            Err(e) => messages.push(CheckMessage::error("admin_registrar.E002", e.to_string())),
        }

        if let Err(e) = self.plan() {
            messages.push(CheckMessage::error("admin_registrar.E002", e.to_string()));
        }

        messages
    }

    fn active_conf(&self) -> Arc<Conf> {
        self.conf.clone().unwrap_or_else(|| SETTINGS.get())
    }

    fn target_site(&self) -> RegistrarResult<Arc<dyn RegisterOnSite>> {
        match &self.site {
            Some(site) => Ok(Arc::clone(site)),
            None => Ok(Arc::clone(self.active_conf().register_on_site()?)),
        }
    }
}

fn sorted(models: &HashSet<ModelClass>) -> Vec<&ModelClass> {
    let mut models: Vec<&ModelClass> = models.iter().collect();
    models.sort_by(|a, b| a.path().cmp(b.path()));
    models
}

impl fmt::Debug for AdminRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminRegistrar")
            .field("app", &self.app.name())
            .field("excluded_models", &sorted(&self.excluded_models))
            .field("hidden_models", &sorted(&self.hidden_models))
            .field("classes_for_models", &self.classes_for_models.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::apps::App;
    use crate::checks::CheckLevel;
    use crate::conf::RegistrarSettings;
    use crate::error::RegistrarError;
    use crate::importer::ClassRegistry;
    use crate::logging::capture::Buffer;
    use crate::logging::{strip_ansi, RegistrarFormatter};
    use crate::site::AdminSite;

    struct Shop {
        product: ModelClass,
        order: ModelClass,
        tag: ModelClass,
        app: Arc<App>,
    }

    fn shop() -> Shop {
        let base = ModelClass::abstract_model("shop.models.Base").build().unwrap();
        let product = ModelClass::concrete("shop.models.Product").base(&base).build().unwrap();
        let order = ModelClass::concrete("shop.models.Order").build().unwrap();
        let tag = ModelClass::concrete("shop.models.Tag").build().unwrap();
        let app = Arc::new(App::new("shop").with_models([&base, &product, &order, &tag]));
        Shop {
            product,
            order,
            tag,
            app,
        }
    }

    fn registrar(shop: &Shop, site: &Arc<AdminSite>) -> AdminRegistrar {
        AdminRegistrar::new(shop.app.clone())
            .conf(Arc::new(Conf::default()))
            .register_on_site(site.clone())
    }

    #[test]
    fn test_registers_every_concrete_model() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let report = registrar(&shop, &site).perform_register().unwrap();

        assert_eq!(report.registered().count(), 3);
        assert_eq!(
            site.registered_models(),
            vec!["shop.order", "shop.product", "shop.tag"]
        );
        for (_, admin_class) in report.registered() {
            assert_eq!(admin_class, &AdminClass::model_admin());
        }
    }

    fn register_capturing_logs(colored: bool) -> String {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let settings = RegistrarSettings {
            colored_logs: colored,
            ..RegistrarSettings::default()
        };
        let conf = Conf::new(settings, Arc::new(ClassRegistry::with_builtins()));
        let registrar = AdminRegistrar::new(shop.app.clone())
            .conf(Arc::new(conf))
            .register_on_site(site)
            .excluded_models([shop.order.clone()])
            .hidden_models([shop.tag.clone()]);

        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .event_format(RegistrarFormatter::new(Palette::plain()))
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            registrar.perform_register().unwrap();
        });
        buffer.contents()
    }

    const EXPECTED_LOG: &str = "\
[DEBUG] Admin registrar: ------------------------------------------------
[DEBUG] Admin registrar: model Product from shop succesfully registered with ModelAdmin admin class.
[DEBUG] Admin registrar: model Order from shop is excluded.
[DEBUG] Admin registrar: model Tag from shop was hidden by HiddenAdmin admin class.
";

    #[test]
    fn test_debug_log_lines() {
        let output = register_capturing_logs(false);
        assert_eq!(output, EXPECTED_LOG);
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_debug_log_lines_colored() {
        let output = register_capturing_logs(true);
        assert!(output.contains(
            "model \x1b[1;32mProduct\x1b[0m from \x1b[1;35mshop\x1b[0m \
             succesfully registered with \x1b[1;32mModelAdmin\x1b[0m admin class."
        ));
        assert!(output.contains("is \x1b[1;31mexcluded\x1b[0m."));
        assert_eq!(strip_ansi(&output), EXPECTED_LOG);
    }

    #[test]
    fn test_precedence() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let custom = AdminClass::model_admin().subclass("shop.admin.ProductAdmin");

        let mut registrar = registrar(&shop, &site);
        registrar.exclude(&shop.order);
        registrar.hide_model(&shop.order);
        registrar.hide_model(&shop.tag);
        registrar.set_admin_class_for_model(&shop.tag, &custom);
        registrar.set_admin_class_for_model(&shop.product, &custom);

        let plan = registrar.plan().unwrap();
        let decisions: Vec<&Decision> = plan.iter().map(|p| &p.decision).collect();
        assert_eq!(
            decisions,
            vec![
                &Decision::Custom(custom.clone()),
                &Decision::Excluded,
                &Decision::Hidden(AdminClass::hidden()),
            ]
        );
        // Planning registers nothing.
        assert_eq!(site.model_count(), 0);
    }

    #[test]
    fn test_report_groups() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let registrar = registrar(&shop, &site)
            .excluded_models([shop.order.clone()])
            .hidden_models([shop.tag.clone()]);

        let report = registrar.perform_register().unwrap();
        assert_eq!(report.excluded().collect::<Vec<_>>(), vec![&shop.order]);
        assert_eq!(report.hidden().collect::<Vec<_>>(), vec![&shop.tag]);
        assert_eq!(report.entries.len(), 3);
        assert!(!site.get_model_admin("shop.tag").unwrap().is_visible());
    }

    #[test]
    fn test_set_for_model_returns_admin_class() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let mut registrar = registrar(&shop, &site);
        let admin = registrar.set_for_model(&shop.product)(
            AdminClass::model_admin().subclass("shop.admin.ProductAdmin"),
        );
        assert_eq!(admin.name(), "ProductAdmin");
        assert_eq!(
            registrar.decide(&shop.product).unwrap(),
            Decision::Custom(admin)
        );
    }

    #[test]
    fn test_exclude_inline() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let mut registrar = registrar(&shop, &site);
        registrar.exclude_inline(&InlineAdmin::new("shop.admin.TagInline", &shop.tag));
        assert_eq!(registrar.decide(&shop.tag).unwrap(), Decision::Excluded);
    }

    #[test]
    fn test_duplicate_registration_aborts() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        site.register(&shop.order, &AdminClass::model_admin()).unwrap();

        let err = registrar(&shop, &site).perform_register().unwrap_err();
        assert!(matches!(err, RegistrarError::AlreadyRegistered(ref label, _) if label == "shop.Order"));
        // Product comes before Order and stays registered; Tag is never reached.
        assert!(site.is_registered(&shop.product));
        assert!(!site.is_registered(&shop.tag));
    }

    #[test]
    fn test_custom_resolver_and_callback() {
        let shop = shop();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);
        let callback = move |model: &ModelClass, admin: &AdminClass| {
            recorded
                .lock()
                .unwrap()
                .push((model.name().to_string(), admin.name().to_string()));
            Ok::<(), RegistrarError>(())
        };
        let resolver = |_: &ModelClass| {
            Ok::<_, RegistrarError>(AdminClass::model_admin().subclass("shop.admin.AutoAdmin"))
        };

        let registrar = AdminRegistrar::new(shop.app.clone())
            .conf(Arc::new(Conf::default()))
            .resolver(Arc::new(resolver))
            .register_on_site(Arc::new(callback))
            .excluded_models([shop.product.clone()]);
        registrar.perform_register().unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![
                ("Order".to_string(), "AutoAdmin".to_string()),
                ("Tag".to_string(), "AutoAdmin".to_string()),
            ]
        );
    }

    #[test]
    fn test_settings_defaults_applied_through_resolver() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        let base_admin = AdminClass::model_admin().subclass("shop.admin.BaseAdmin");

        let mut registry = ClassRegistry::with_builtins();
        registry.add_app(shop.app.as_ref());
        registry.add_admin(&base_admin);
        let settings = RegistrarSettings {
            default_admin_classes: [("shop.models.Base".to_string(), "shop.admin.BaseAdmin".to_string())]
                .into_iter()
                .collect(),
            ..RegistrarSettings::default()
        };
        let conf = Arc::new(Conf::new(settings, Arc::new(registry)));

        let registrar = AdminRegistrar::new(shop.app.clone())
            .conf(conf)
            .register_on_site(site.clone());
        registrar.perform_register().unwrap();

        assert_eq!(
            site.get_model_admin("shop.product").unwrap().admin_class,
            base_admin
        );
        assert_eq!(
            site.get_model_admin("shop.order").unwrap().admin_class,
            AdminClass::model_admin()
        );
    }

    #[test]
    fn test_hidden_admin_class_from_settings() {
        let shop = shop();
        let quiet = AdminClass::hidden().subclass("shop.admin.QuietAdmin");
        let mut registry = ClassRegistry::with_builtins();
        registry.add_admin(&quiet);
        let settings = RegistrarSettings {
            hidden_admin_class: Some("shop.admin.QuietAdmin".to_string()),
            ..RegistrarSettings::default()
        };

        let mut registrar = AdminRegistrar::new(shop.app.clone())
            .conf(Arc::new(Conf::new(settings, Arc::new(registry))));
        registrar.hide_model(&shop.tag);
        assert_eq!(registrar.decide(&shop.tag).unwrap(), Decision::Hidden(quiet));
    }

    #[test]
    fn test_check_reports_problems() {
        let shop = shop();
        let site = Arc::new(AdminSite::new("admin"));
        site.register(&shop.order, &AdminClass::model_admin()).unwrap();
        let stranger = ModelClass::concrete("blog.models.Post").build().unwrap();

        let mut registrar = registrar(&shop, &site);
        registrar.exclude(&stranger);
        registrar.exclude(&shop.tag);
        registrar.hide_model(&shop.tag);

        let messages = registrar.check();
        let ids: Vec<&str> = messages.iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![
                "admin_registrar.W001",
                "admin_registrar.W004",
                "admin_registrar.E001",
            ]
        );
        assert_eq!(messages[2].level, CheckLevel::Error);
    }

    #[test]
    fn test_check_reports_unresolvable_setting() {
        let shop = shop();
        let settings = RegistrarSettings {
            admins_resolver: Some("shop.resolvers.missing".to_string()),
            ..RegistrarSettings::default()
        };
        let site = Arc::new(AdminSite::new("admin"));
        let registrar = AdminRegistrar::new(shop.app.clone())
            .conf(Arc::new(Conf::new(
                settings,
                Arc::new(ClassRegistry::with_builtins()),
            )))
            .register_on_site(site);

        let messages = registrar.check();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, "admin_registrar.E002");
        assert!(messages[0].is_serious());
    }
}
