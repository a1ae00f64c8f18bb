//! Navigation shell for the ZeroLaunch launcher.
//!
//! The launcher renders two views, the search bar (`App`) and the settings
//! window (`SettingWindow`), each bound to a URL path. This crate owns the
//! binding between those paths and the views, the session history behind
//! them and the controller that keeps the right view mounted.
//!
//! Start from [`app_routes::build_controller`]; the building blocks live in
//! [`navigation`].

pub mod app_routes;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod navigation;
pub mod settings;

pub use crate::app_routes::{build_controller, AppViews, AppWindow};
pub use crate::error::{ConfigurationError, NavigationError};
pub use crate::navigation::{
    Fallback, History, HistoryMode, Location, NavigationController, NavigationEvent,
    NavigationKind, NavigationOutcome, Renderable, Route, RoutePath, RouteTable, SessionHistory,
    ViewRef,
};
