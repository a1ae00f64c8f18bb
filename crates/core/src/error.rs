//! Error types shared by the navigation modules.
//!
//! Configuration problems are detected once, when the route table and the
//! controller are built, and are not meant to be recovered from: the
//! application should refuse to start. Navigation errors happen at runtime
//! and leave the controller in a consistent state.

/// Errors raised while building the route table or the controller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Two routes declare the same path
    #[error("duplicate route path '{0}'")]
    DuplicatePath(String),

    /// A route was declared without a view to render
    #[error("route '{0}' has no view")]
    MissingView(String),

    /// A route path is empty or does not start with '/'
    #[error("invalid route path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// The history base cannot be used as a URL prefix
    #[error("invalid history base '{0}'")]
    InvalidBase(String),

    /// The fallback redirect points to a path no route declares
    #[error("fallback redirect target '{0}' is not a declared route")]
    UnknownFallback(String),
}

/// Errors raised by a navigation attempt.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No route matches the requested path and the fallback rejects it
    #[error("no route matches '{0}'")]
    NotFound(String),

    /// The navigation target could not be parsed as a location
    #[error("invalid location '{location}': {reason}")]
    InvalidLocation {
        location: String,
        reason: &'static str,
    },
}
