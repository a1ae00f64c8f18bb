//! The launcher's route table and the windows that host it.
//!
//! | Path              | View            | Window           |
//! |-------------------|-----------------|------------------|
//! | `/`               | `App`           | `main`           |
//! | `/setting_window` | `SettingWindow` | `setting_window` |
//!
//! The views are owned by the surrounding application and handed in through
//! [`AppViews`]; this module only binds them to paths.

use crate::error::ConfigurationError;
use crate::navigation::{
    History, Location, NavigationController, RouteTable, SessionHistory, ViewRef,
};
use crate::settings::NavigationSettings;

pub const MAIN_PATH: &str = "/";
pub const SETTING_WINDOW_PATH: &str = "/setting_window";

/// The views the launcher routes to.
///
/// A `None` entry makes [`build_controller`] fail with
/// [`ConfigurationError::MissingView`].
#[derive(Clone, Default)]
pub struct AppViews {
    pub app: Option<ViewRef>,
    pub setting_window: Option<ViewRef>,
}

impl AppViews {
    pub fn new(app: ViewRef, setting_window: ViewRef) -> AppViews {
        AppViews {
            app: Some(app),
            setting_window: Some(setting_window),
        }
    }
}

/// Builds the static route table.
pub fn route_table(views: &AppViews) -> Result<RouteTable, ConfigurationError> {
    RouteTable::builder()
        .maybe_route(MAIN_PATH, views.app.clone())
        .maybe_route(SETTING_WINDOW_PATH, views.setting_window.clone())
        .build()
}

/// Builds the application's navigation controller.
///
/// `host` is the location the host environment reports at startup; the
/// controller's history starts there. Nothing is mounted until
/// [`NavigationController::start`] is called.
///
/// # Errors
///
/// Any [`ConfigurationError`]: a missing view, an invalid history base, or a
/// fallback redirect to an undeclared path. These are startup failures; the
/// application should not continue with an ambiguous routing setup.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use zerolaunch_core::app_routes::{build_controller, AppViews};
/// use zerolaunch_core::navigation::{Location, Renderable};
/// use zerolaunch_core::settings::NavigationSettings;
///
/// struct Blank(&'static str);
///
/// impl Renderable for Blank {
///     fn name(&self) -> &str { self.0 }
///     fn mount(&self, _location: &Location) {}
///     fn unmount(&self) {}
/// }
///
/// let views = AppViews::new(Arc::new(Blank("App")), Arc::new(Blank("SettingWindow")));
/// let mut controller =
///     build_controller(&views, &NavigationSettings::default(), &Location::root())?;
/// controller.start().unwrap();
/// assert_eq!(controller.current_route().unwrap().view().name(), "App");
/// # Ok::<(), zerolaunch_core::ConfigurationError>(())
/// ```
pub fn build_controller(
    views: &AppViews,
    settings: &NavigationSettings,
    host: &Location,
) -> Result<NavigationController, ConfigurationError> {
    let table = route_table(views)?;
    let history = SessionHistory::from_host_location(settings.history, &settings.base, host)?;

    tracing::debug!(
        routes = table.len(),
        history = ?settings.history,
        fallback = ?settings.fallback,
        "Building navigation controller"
    );

    NavigationController::new(table, Box::new(history)).with_fallback(settings.fallback.clone())
}

/// The launcher's top-level windows, each showing one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppWindow {
    /// The search bar.
    Main,
    /// The settings window, created hidden at startup and shown on demand.
    Settings,
}

impl AppWindow {
    pub const ALL: [AppWindow; 2] = [AppWindow::Main, AppWindow::Settings];

    /// Label the host uses to identify the window.
    pub fn label(self) -> &'static str {
        match self {
            AppWindow::Main => "main",
            AppWindow::Settings => "setting_window",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AppWindow::Main => "ZeroLaunch",
            AppWindow::Settings => "Settings",
        }
    }

    /// The route the window opens on.
    pub fn path(self) -> &'static str {
        match self {
            AppWindow::Main => MAIN_PATH,
            AppWindow::Settings => SETTING_WINDOW_PATH,
        }
    }

    pub fn from_label(label: &str) -> Option<AppWindow> {
        AppWindow::ALL
            .into_iter()
            .find(|window| window.label() == label)
    }

    /// The URL the window's webview is opened on, e.g.
    /// `http://localhost:1420/setting_window`.
    pub fn entry_url(self, origin: &str, history: &dyn History) -> String {
        let href = history.href(&Location::new(self.path()));
        format!("{}{}", origin.trim_end_matches('/'), href)
    }
}
