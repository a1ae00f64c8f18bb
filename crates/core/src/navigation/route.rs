use super::location::Location;
use crate::error::ConfigurationError;
use std::fmt;
use std::sync::Arc;

/// Capability of a view to be mounted and unmounted by the controller.
///
/// The controller knows nothing about what a view draws. It only guarantees
/// that at most one routed view is mounted at a time, that `unmount` is
/// called on the previous view before the next one is mounted, and that a
/// view that is already mounted is never mounted again.
pub trait Renderable {
    /// Human-readable view name, used in logs and navigation events.
    fn name(&self) -> &str;

    /// Called when the view becomes the active one for `location`.
    fn mount(&self, location: &Location);

    /// Called when another location takes over or the active path no
    /// longer matches any route.
    fn unmount(&self);
}

/// Shared handle to an externally owned view.
pub type ViewRef = Arc<dyn Renderable + Send + Sync>;

/// A validated route path.
///
/// Paths are matched verbatim, so `/setting_window` and `/setting_window/`
/// are two different paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePath(String);

impl RoutePath {
    pub fn new(path: impl Into<String>) -> Result<RoutePath, ConfigurationError> {
        let path = path.into();
        let invalid = |path: String, reason| Err(ConfigurationError::InvalidPath { path, reason });

        if path.is_empty() {
            return invalid(path, "path is empty");
        }
        if !path.starts_with('/') {
            return invalid(path, "path must start with '/'");
        }
        if path.contains(['?', '#']) {
            return invalid(path, "path must not contain a query or fragment");
        }

        Ok(RoutePath(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A unique-path-to-view binding.
#[derive(Clone)]
pub struct Route {
    path: RoutePath,
    view: ViewRef,
}

impl Route {
    pub fn new(path: RoutePath, view: ViewRef) -> Route {
        Route { path, view }
    }

    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    pub fn view(&self) -> &ViewRef {
        &self.view
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("view", &self.view.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_path_accepts_absolute_paths() {
        assert_eq!(RoutePath::new("/").unwrap().as_str(), "/");
        assert_eq!(
            RoutePath::new("/setting_window").unwrap().to_string(),
            "/setting_window"
        );
    }

    #[test]
    fn route_path_rejects_empty_path() {
        assert!(matches!(
            RoutePath::new(""),
            Err(ConfigurationError::InvalidPath { .. })
        ));
    }

    #[test]
    fn route_path_rejects_relative_path() {
        assert!(matches!(
            RoutePath::new("setting_window"),
            Err(ConfigurationError::InvalidPath { .. })
        ));
    }

    #[test]
    fn route_path_rejects_query_and_fragment() {
        assert!(RoutePath::new("/a?b").is_err());
        assert!(RoutePath::new("/a#b").is_err());
    }
}
