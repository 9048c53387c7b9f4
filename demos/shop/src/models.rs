//! The demo shop's models, admin classes, and class registry.

use std::sync::Arc;

use django_rs_admin_registrar::admin::AdminClass;
use django_rs_admin_registrar::apps::App;
use django_rs_admin_registrar::importer::ClassRegistry;
use django_rs_admin_registrar::models::ModelClass;
use django_rs_admin_registrar::RegistrarResult;

/// Everything the demo registers.
pub struct Shop {
    pub app: Arc<App>,
    pub registry: ClassRegistry,
    pub product: ModelClass,
    pub audit_log: ModelClass,
    pub tag: ModelClass,
    pub tag_inline_model: ModelClass,
}

/// Builds the shop app.
///
/// `ShopConfig` is a singleton, `Product` and `Category` are ordered, and
/// `FeaturedProduct` is a proxy of `Product` that inherits its admin.
pub fn shop() -> RegistrarResult<Shop> {
    let singleton = ModelClass::abstract_model("solo.models.SingletonModel").build()?;
    let ordered = ModelClass::abstract_model("ordered_model.models.OrderedModel").build()?;
    let timestamped = ModelClass::mixin("shop.mixins.TimestampedMixin").build()?;

    let config = ModelClass::concrete("shop.models.ShopConfig")
        .base(&singleton)
        .build()?;
    let category = ModelClass::concrete("shop.models.Category")
        .base(&ordered)
        .build()?;
    let product = ModelClass::concrete("shop.models.Product")
        .base(&ordered)
        .base(&timestamped)
        .build()?;
    let featured = ModelClass::proxy("shop.models.FeaturedProduct")
        .base(&product)
        .build()?;
    let product_tag = ModelClass::concrete("shop.models.ProductTag").build()?;
    let audit_log = ModelClass::concrete("shop.models.AuditLog")
        .base(&timestamped)
        .build()?;
    let tag = ModelClass::concrete("shop.models.Tag").build()?;

    let app = Arc::new(App::new("shop").verbose_name("Shop").with_models([
        &ordered,
        &config,
        &category,
        &product,
        &featured,
        &product_tag,
        &audit_log,
        &tag,
    ]));

    let mut registry = ClassRegistry::with_builtins();
    registry.add_model(&singleton);
    registry.add_model(&ordered);
    registry.add_app(app.as_ref());
    registry.add_admin(&AdminClass::model_admin().subclass("solo.admin.SingletonModelAdmin"));
    registry.add_admin(&AdminClass::model_admin().subclass_with(
        "ordered_model.admin.OrderedModelAdmin",
        |options| options.ordering = vec!["order".to_string()],
    ));

    Ok(Shop {
        app,
        registry,
        product,
        audit_log,
        tag,
        tag_inline_model: product_tag,
    })
}
