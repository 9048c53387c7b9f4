//! # Shop admin registration demo
//!
//! Registers a small shop app on the admin site with `AdminRegistrar`:
//!
//! - `ShopConfig` gets `SingletonModelAdmin` through `DEFAULT_ADMIN_CLASSES`
//! - `Category` and `FeaturedProduct` get `OrderedModelAdmin` the same way
//! - `Product` gets an explicit `ProductAdmin`
//! - `Tag` is registered hidden, `AuditLog` and `ProductTag` are excluded
//!
//! ## Running
//!
//! ```bash
//! cargo run --package shop-demo -- --settings demos/shop/shop.toml register
//! ```

mod models;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use django_rs_admin_registrar::admin::InlineAdmin;
use django_rs_admin_registrar::logging::setup_logging;
use django_rs_admin_registrar::registrar::Decision;
use django_rs_admin_registrar::{
    settings_loader, AdminRegistrar, Conf, RegistrarResult, RegistrarSettings, SETTINGS, SITE,
};

#[derive(Debug, Parser)]
#[command(name = "shop-demo", about = "Registers the demo shop app on the admin site")]
struct Cli {
    /// Host settings file (TOML) holding an ADMIN_REGISTRAR table.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log filter directive.
    #[arg(long, default_value = "debug")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show what would be registered, and with which admin class.
    Plan,
    /// Report configuration problems.
    Check,
    /// Register the app and print the admin index.
    Register,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> RegistrarResult<ExitCode> {
    let settings: RegistrarSettings = match &cli.settings {
        Some(path) => settings_loader::from_toml_file_with_env(path)?,
        None => settings_loader::from_env(),
    };
    setup_logging(&cli.log_level, settings.colored_logs);

    let shop = models::shop()?;
    SETTINGS.configure(Conf::new(settings, Arc::new(shop.registry)));
    let ordered_admin = SETTINGS
        .get()
        .registry()
        .import_admin("ordered_model.admin.OrderedModelAdmin")?;

    let mut registrar = AdminRegistrar::new(shop.app);
    registrar.exclude(&shop.audit_log);
    registrar.exclude_inline(&InlineAdmin::new(
        "shop.admin.ProductTagInline",
        &shop.tag_inline_model,
    ));
    registrar.hide_model(&shop.tag);
    registrar.set_for_model(&shop.product)(ordered_admin.subclass_with(
        "shop.admin.ProductAdmin",
        |options| {
            options.search_fields = vec!["name".to_string(), "sku".to_string()];
            options.list_per_page = 50;
        },
    ));

    match cli.command {
        Command::Plan => {
            for planned in registrar.plan()? {
                let outcome = match &planned.decision {
                    Decision::Excluded => "excluded".to_string(),
                    Decision::Hidden(admin) => format!("hidden ({})", admin.name()),
                    Decision::Custom(admin) => format!("{} (explicit)", admin.name()),
                    Decision::Resolved(admin) => admin.name().to_string(),
                };
                println!("{:<24} {outcome}", planned.model.label());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => {
            let messages = registrar.check();
            for message in &messages {
                println!("{message}");
            }
            println!("System check identified {} issue(s).", messages.len());
            if messages.iter().any(|m| m.is_serious()) {
                Ok(ExitCode::FAILURE)
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }
        Command::Register => {
            let report = registrar.perform_register()?;
            tracing::info!(
                "registered {} model(s), {} hidden, {} excluded",
                report.registered().count(),
                report.hidden().count(),
                report.excluded().count()
            );
            for (app_label, models) in SITE.index() {
                println!("{app_label}");
                for model in models {
                    println!("  {model}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
