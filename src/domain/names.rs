//! Naming rules for type-declaration packages
//!
//! Declaration packages live under the `@types/` scope. Scoped dependencies
//! are mangled the way DefinitelyTyped publishes them:
//! `@babel/core` is typed by `@types/babel__core`.

/// Scope prefix shared by every type-declaration package
pub const TYPES_NAMESPACE: &str = "@types/";

/// Synthetic dependency standing for the host runtime itself
pub const HOST_RUNTIME: &str = "node";

/// Separator used to flatten `@scope/name` into a single types package name
const SCOPE_SEPARATOR: &str = "__";

/// Returns true if `name` is a type-declaration package
pub fn is_types_package(name: &str) -> bool {
    name.starts_with(TYPES_NAMESPACE)
}

/// Returns the type-declaration package name for a dependency
pub fn types_name(dependency: &str) -> String {
    match dependency
        .strip_prefix('@')
        .and_then(|scoped| scoped.split_once('/'))
    {
        Some((scope, name)) => format!("{}{}{}{}", TYPES_NAMESPACE, scope, SCOPE_SEPARATOR, name),
        None => format!("{}{}", TYPES_NAMESPACE, dependency),
    }
}
