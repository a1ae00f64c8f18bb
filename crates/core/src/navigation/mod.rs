//! Path-based navigation between views.
//!
//! The pieces fit together like this:
//!
//! ```text
//! NavigationController
//!   ├── RouteTable      (static path -> view bindings)
//!   ├── History         (visited locations + cursor)
//!   ├── Fallback        (what to do with unmatched paths)
//!   └── Hub             (optional sink for NavigationEvents)
//! ```
//!
//! - [`route`]: route paths and the [`Renderable`] capability views implement
//! - [`route_table`]: the validated, immutable table of routes
//! - [`location`]: parsing of navigation targets and host URLs
//! - [`history`]: session history and how locations map to addressable URLs
//! - [`controller`]: the controller that matches locations and mounts views

pub mod controller;
pub mod history;
pub mod location;
pub mod route;
pub mod route_table;

pub use self::controller::{
    Fallback, Hub, NavigationController, NavigationEvent, NavigationKind, NavigationOutcome,
};
pub use self::history::{History, HistoryMode, SessionHistory};
pub use self::location::Location;
pub use self::route::{Renderable, Route, RoutePath, ViewRef};
pub use self::route_table::{RouteTable, RouteTableBuilder};
