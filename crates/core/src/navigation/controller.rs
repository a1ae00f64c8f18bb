use super::history::History;
use super::location::Location;
use super::route::Route;
use super::route_table::RouteTable;
use crate::error::{ConfigurationError, NavigationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::Sender;

/// Sink for navigation events.
pub type Hub = Sender<NavigationEvent>;

/// What the controller does with a location no route matches.
///
/// ```toml
/// fallback = "reject"
/// # or
/// fallback = { redirect = "/" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Refuse the navigation with [`NavigationError::NotFound`].
    #[default]
    Reject,
    /// Replace the unmatched location with this declared path.
    Redirect(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    Initial,
    Push,
    Replace,
    Pop,
    Redirect,
}

impl fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavigationKind::Initial => "initial",
            NavigationKind::Push => "push",
            NavigationKind::Replace => "replace",
            NavigationKind::Pop => "pop",
            NavigationKind::Redirect => "redirect",
        };
        f.write_str(name)
    }
}

/// Sent on the [`Hub`] after every completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub kind: NavigationKind,
    pub from: Option<Location>,
    pub to: Location,
    pub view: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The location is now current and its view is mounted.
    Navigated(Location),
    /// An unmatched location was replaced by the fallback target.
    Redirected { from: Location, to: Location },
    /// The target is already the current location; nothing changed.
    Duplicated,
    /// A history move went out of range; nothing changed.
    Stationary,
}

/// The runtime navigation authority of the application.
///
/// There is exactly one controller per running application. It is built once
/// at startup and handed to whatever needs to navigate, instead of being
/// looked up through global state.
///
/// # Invariants
///
/// - At most one routed view is mounted, and it is the view bound to the
///   current history location.
/// - A view is never mounted twice in a row: navigating between locations
///   that share a route keeps the view mounted.
/// - A rejected navigation leaves both the history and the mounted view
///   untouched.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use zerolaunch_core::navigation::{
///     HistoryMode, Location, NavigationController, Renderable, RouteTable, SessionHistory,
/// };
///
/// struct Blank(&'static str);
///
/// impl Renderable for Blank {
///     fn name(&self) -> &str { self.0 }
///     fn mount(&self, _location: &Location) {}
///     fn unmount(&self) {}
/// }
///
/// let table = RouteTable::builder()
///     .route("/", Arc::new(Blank("App")))
///     .route("/setting_window", Arc::new(Blank("SettingWindow")))
///     .build()?;
/// let history = SessionHistory::new(HistoryMode::Web, "/", Location::root())?;
/// let mut controller = NavigationController::new(table, Box::new(history));
///
/// controller.start().unwrap();
/// controller.push("/setting_window").unwrap();
/// assert_eq!(controller.current_route().unwrap().view().name(), "SettingWindow");
///
/// controller.back().unwrap();
/// assert_eq!(controller.current_route().unwrap().view().name(), "App");
/// # Ok::<(), zerolaunch_core::ConfigurationError>(())
/// ```
pub struct NavigationController {
    table: RouteTable,
    history: Box<dyn History + Send>,
    fallback: Fallback,
    mounted: Option<usize>,
    hub: Option<Hub>,
}

impl NavigationController {
    pub fn new(table: RouteTable, history: Box<dyn History + Send>) -> NavigationController {
        NavigationController {
            table,
            history,
            fallback: Fallback::Reject,
            mounted: None,
            hub: None,
        }
    }

    /// Sets the fallback policy, checking that a redirect target is declared.
    pub fn with_fallback(
        mut self,
        fallback: Fallback,
    ) -> Result<NavigationController, ConfigurationError> {
        if let Fallback::Redirect(target) = &fallback {
            if !self.table.contains(target) {
                return Err(ConfigurationError::UnknownFallback(target.clone()));
            }
        }

        self.fallback = fallback;
        Ok(self)
    }

    pub fn with_hub(mut self, hub: Hub) -> NavigationController {
        self.hub = Some(hub);
        self
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    pub fn fallback(&self) -> &Fallback {
        &self.fallback
    }

    pub fn current_location(&self) -> &Location {
        self.history.location()
    }

    /// The route whose view is currently mounted.
    pub fn current_route(&self) -> Option<&Route> {
        self.mounted.and_then(|position| self.table.get(position))
    }

    /// Finds the route `target` would render, without navigating.
    pub fn resolve(&self, target: &str) -> Result<&Route, NavigationError> {
        let location = Location::parse(target)?;
        self.table
            .match_path(location.path())
            .map(|(_, route)| route)
            .ok_or_else(|| NavigationError::NotFound(location.path().to_string()))
    }

    /// The addressable URL of `target` under the configured history mode.
    pub fn href(&self, target: &str) -> Result<String, NavigationError> {
        let location = Location::parse(target)?;
        Ok(self.history.href(&location))
    }

    /// Mounts the view for the location the history starts at.
    ///
    /// Calling `start` again while a view is mounted is a no-op.
    pub fn start(&mut self) -> Result<NavigationOutcome, NavigationError> {
        if self.mounted.is_some() {
            return Ok(NavigationOutcome::Duplicated);
        }

        let location = self.history.location().clone();
        tracing::info!(location = %location, "Starting navigation");
        self.settle(None, location, NavigationKind::Initial)
    }

    /// Navigates to `target`, adding a history entry.
    pub fn push(&mut self, target: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(target, NavigationKind::Push)
    }

    /// Navigates to `target`, overwriting the current history entry.
    pub fn replace(&mut self, target: &str) -> Result<NavigationOutcome, NavigationError> {
        self.navigate(target, NavigationKind::Replace)
    }

    pub fn back(&mut self) -> Result<NavigationOutcome, NavigationError> {
        self.go(-1)
    }

    pub fn forward(&mut self) -> Result<NavigationOutcome, NavigationError> {
        self.go(1)
    }

    /// Moves `delta` entries through the history and mounts the view bound
    /// to the restored location.
    pub fn go(&mut self, delta: isize) -> Result<NavigationOutcome, NavigationError> {
        let from = self.history.location().clone();
        let Some(to) = self.history.go(delta).cloned() else {
            tracing::debug!(delta, position = self.history.position(), "History move out of range");
            return Ok(NavigationOutcome::Stationary);
        };

        self.settle(Some(from), to, NavigationKind::Pop)
    }

    /// Applies a location change reported by the host, such as the user
    /// pressing back inside the webview.
    ///
    /// If `location` is already in the history, the cursor moves to the
    /// nearest such entry so back/forward stay in step with the host.
    /// Otherwise the host navigated somewhere new and an entry is pushed.
    pub fn sync(&mut self, location: Location) -> Result<NavigationOutcome, NavigationError> {
        let from = self.history.location().clone();
        if self.mounted.is_some() && location == from {
            return Ok(NavigationOutcome::Duplicated);
        }

        match self.history.offset_of(&location) {
            Some(delta) => {
                tracing::debug!(delta, location = %location, "Host moved through history");
                self.history.go(delta);
            }
            None => self.history.push(location.clone()),
        }

        self.settle(Some(from), location, NavigationKind::Pop)
    }

    fn navigate(
        &mut self,
        target: &str,
        kind: NavigationKind,
    ) -> Result<NavigationOutcome, NavigationError> {
        let location = Location::parse(target)?;
        let from = self.history.location().clone();

        if self.mounted.is_some() && location == from {
            tracing::debug!(location = %location, "Already at location");
            return Ok(NavigationOutcome::Duplicated);
        }

        let Some((position, _)) = self.table.match_path(location.path()) else {
            return self.reject_or_redirect(from, location, kind);
        };

        self.record(kind, location.clone());
        self.activate(position, &location);
        self.emit(kind, Some(from), &location, position);

        Ok(NavigationOutcome::Navigated(location))
    }

    /// Handles an unmatched target that is not in the history yet.
    fn reject_or_redirect(
        &mut self,
        from: Location,
        requested: Location,
        kind: NavigationKind,
    ) -> Result<NavigationOutcome, NavigationError> {
        let Fallback::Redirect(target) = self.fallback.clone() else {
            tracing::warn!(path = requested.path(), "No route matches, navigation rejected");
            return Err(NavigationError::NotFound(requested.path().to_string()));
        };

        let redirect = Location::new(target);
        let position = self.matched_position(&redirect)?;
        tracing::info!(requested = %requested, redirect = %redirect, "No route matches, redirecting");

        if self.mounted.is_some() && redirect == from {
            return Ok(NavigationOutcome::Redirected {
                from: requested,
                to: redirect,
            });
        }

        self.record(kind, redirect.clone());
        self.activate(position, &redirect);
        self.emit(NavigationKind::Redirect, Some(from), &redirect, position);

        Ok(NavigationOutcome::Redirected {
            from: requested,
            to: redirect,
        })
    }

    /// Mounts the view for `to`, which is already the current history entry.
    fn settle(
        &mut self,
        from: Option<Location>,
        to: Location,
        kind: NavigationKind,
    ) -> Result<NavigationOutcome, NavigationError> {
        if let Some((position, _)) = self.table.match_path(to.path()) {
            self.activate(position, &to);
            self.emit(kind, from, &to, position);
            return Ok(NavigationOutcome::Navigated(to));
        }

        let Fallback::Redirect(target) = self.fallback.clone() else {
            tracing::warn!(path = to.path(), "Current location matches no route");
            self.deactivate();
            return Err(NavigationError::NotFound(to.path().to_string()));
        };

        let redirect = Location::new(target);
        let position = self.matched_position(&redirect)?;
        tracing::info!(location = %to, redirect = %redirect, "Current location matches no route, redirecting");

        self.history.replace(redirect.clone());
        self.activate(position, &redirect);
        self.emit(NavigationKind::Redirect, from, &redirect, position);

        Ok(NavigationOutcome::Redirected { from: to, to: redirect })
    }

    fn matched_position(&self, location: &Location) -> Result<usize, NavigationError> {
        self.table
            .match_path(location.path())
            .map(|(position, _)| position)
            .ok_or_else(|| NavigationError::NotFound(location.path().to_string()))
    }

    fn record(&mut self, kind: NavigationKind, location: Location) {
        match kind {
            NavigationKind::Replace => self.history.replace(location),
            _ => self.history.push(location),
        }
    }

    fn activate(&mut self, position: usize, location: &Location) {
        if self.mounted == Some(position) {
            tracing::trace!(location = %location, "View already mounted");
            return;
        }

        self.deactivate();

        if let Some(route) = self.table.get(position) {
            tracing::debug!(path = %route.path(), view = route.view().name(), "Mounting view");
            route.view().mount(location);
            self.mounted = Some(position);
        }
    }

    fn deactivate(&mut self) {
        if let Some(route) = self.mounted.take().and_then(|position| self.table.get(position)) {
            tracing::debug!(path = %route.path(), view = route.view().name(), "Unmounting view");
            route.view().unmount();
        }
    }

    fn emit(
        &self,
        kind: NavigationKind,
        from: Option<Location>,
        to: &Location,
        position: usize,
    ) {
        let view = self
            .table
            .get(position)
            .map(|route| route.view().name().to_string())
            .unwrap_or_default();

        tracing::info!(%kind, to = %to, view = %view, "Navigated");

        if let Some(hub) = &self.hub {
            let event = NavigationEvent {
                kind,
                from,
                to: to.clone(),
                view,
            };
            if hub.send(event).is_err() {
                tracing::warn!("Navigation event receiver disconnected");
            }
        }
    }
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("table", &self.table)
            .field("location", self.history.location())
            .field("fallback", &self.fallback)
            .field("mounted", &self.current_route().map(|route| route.path()))
            .finish()
    }
}
