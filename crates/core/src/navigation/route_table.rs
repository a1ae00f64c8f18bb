use super::route::{Route, RoutePath, ViewRef};
use crate::error::ConfigurationError;
use std::collections::HashMap;

/// The complete, static collection of routes.
///
/// A table is only obtainable through [`RouteTableBuilder::build`], which
/// guarantees that every path is valid and unique and that every route has
/// a view. The table cannot be modified afterwards.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use zerolaunch_core::navigation::{Location, Renderable, RouteTable};
///
/// struct Blank;
///
/// impl Renderable for Blank {
///     fn name(&self) -> &str { "Blank" }
///     fn mount(&self, _location: &Location) {}
///     fn unmount(&self) {}
/// }
///
/// let table = RouteTable::builder()
///     .route("/", Arc::new(Blank))
///     .route("/about", Arc::new(Blank))
///     .build()?;
/// assert_eq!(table.len(), 2);
/// assert!(table.contains("/about"));
/// # Ok::<(), zerolaunch_core::ConfigurationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Looks up the route whose path equals `path` exactly.
    pub fn match_path(&self, path: &str) -> Option<(usize, &Route)> {
        self.index
            .get(path)
            .map(|&position| (position, &self.routes[position]))
    }

    pub fn get(&self, position: usize) -> Option<&Route> {
        self.routes.get(position)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Routes in declaration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.path().as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects route declarations and validates them on [`build`](Self::build).
#[derive(Default)]
pub struct RouteTableBuilder {
    declarations: Vec<(String, Option<ViewRef>)>,
}

impl RouteTableBuilder {
    pub fn route(self, path: impl Into<String>, view: ViewRef) -> Self {
        self.maybe_route(path, Some(view))
    }

    /// Declares a route whose view may be missing.
    ///
    /// A missing view is reported as [`ConfigurationError::MissingView`] by
    /// [`build`](Self::build).
    pub fn maybe_route(mut self, path: impl Into<String>, view: Option<ViewRef>) -> Self {
        self.declarations.push((path.into(), view));
        self
    }

    pub fn build(self) -> Result<RouteTable, ConfigurationError> {
        let mut routes = Vec::with_capacity(self.declarations.len());
        let mut index = HashMap::with_capacity(self.declarations.len());

        for (path, view) in self.declarations {
            let path = RoutePath::new(path)?;
            let view = view.ok_or_else(|| ConfigurationError::MissingView(path.to_string()))?;

            if index.insert(path.to_string(), routes.len()).is_some() {
                return Err(ConfigurationError::DuplicatePath(path.to_string()));
            }

            tracing::trace!(path = %path, view = view.name(), "Declared route");
            routes.push(Route::new(path, view));
        }

        Ok(RouteTable { routes, index })
    }
}
