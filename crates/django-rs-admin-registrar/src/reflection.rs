//! Name helpers for dotted-path identified classes.

/// Anything identified by a dotted path such as `shop.models.Product`.
pub trait DottedPath {
    /// Returns the full dotted path.
    fn dotted_path(&self) -> &str;
}

/// Returns the short type name of a class: the last segment of its dotted path.
///
/// # Examples
///
/// ```
/// use django_rs_admin_registrar::models::ModelClass;
/// use django_rs_admin_registrar::reflection::typename;
///
/// let product = ModelClass::concrete("shop.models.Product").build().unwrap();
/// assert_eq!(typename(&product), "Product");
/// ```
pub fn typename<T: DottedPath + ?Sized>(obj: &T) -> &str {
    split_path(obj.dotted_path()).map_or_else(|| obj.dotted_path(), |(_, name)| name)
}

/// Splits `module.path.Name` into `("module.path", "Name")`.
///
/// Returns `None` when the path has no module part.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    path.rsplit_once('.')
        .filter(|(module, name)| !module.is_empty() && !name.is_empty())
}
