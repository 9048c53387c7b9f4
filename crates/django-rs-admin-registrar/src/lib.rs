//! # django-rs-admin-registrar
//!
//! Declarative registration of an application's models on the admin site.
//!
//! An [`AdminRegistrar`] registers every model of one app, except the ones you
//! exclude, with an admin class picked by a resolver. Models can be hidden
//! from the admin index or given an explicit admin class. The default resolver
//! walks each model's MRO and uses the first base listed in the
//! `DEFAULT_ADMIN_CLASSES` setting.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`models`] - Model class handles and MRO computation
//! - [`apps`] - Application configs and the app registry
//! - [`admin`] - Admin classes, inlines, and model admins
//! - [`site`] - The admin site and the `REGISTER_ON_SITE` hook
//! - [`importer`] - Dotted-path lookup of classes and callables
//! - [`conf`] - `ADMIN_REGISTRAR` settings and their resolution
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`resolvers`] - Admin class resolvers
//! - [`registrar`] - The registrar itself
//! - [`checks`] - Configuration checks
//! - [`colors`] - ANSI colors for log lines
//! - [`logging`] - Tracing-based logging integration
//! - [`reflection`] - Helpers over dotted paths

pub mod admin;
pub mod apps;
pub mod checks;
pub mod colors;
pub mod conf;
pub mod error;
pub mod importer;
pub mod logging;
pub mod models;
pub mod reflection;
pub mod registrar;
pub mod resolvers;
pub mod settings_loader;
pub mod site;

// Re-export the most commonly used types at the crate root.
pub use admin::{AdminClass, InlineAdmin};
pub use apps::{App, AppConfig};
pub use conf::{Conf, RegistrarSettings, SETTINGS};
pub use error::{RegistrarError, RegistrarResult};
pub use models::ModelClass;
pub use registrar::AdminRegistrar;
pub use site::{AdminSite, SITE};
