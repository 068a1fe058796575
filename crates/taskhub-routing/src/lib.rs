//! TaskHub Routing - route guard and navigation chrome
//!
//! Maps paths to required permissions, decides allow/redirect/forced-logout
//! for each path change, and projects breadcrumbs and the sidebar menu.
//!
//! # Example
//!
//! ```rust
//! use taskhub_access::{Principal, Role};
//! use taskhub_routing::{GuardDecision, RouteGuard};
//!
//! let guard = RouteGuard::default();
//! let user = Principal::new("u1", Role::ClientUser).with_client("C1");
//!
//! assert!(guard.check(Some(&user), "/tasks").is_allowed());
//! assert!(matches!(
//!     guard.check(Some(&user), "/unknown"),
//!     GuardDecision::ForceLogout { .. }
//! ));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod breadcrumbs;
pub mod error;
pub mod guard;
pub mod landing;
pub mod menu;
pub mod pattern;
pub mod table;

pub use breadcrumbs::{breadcrumbs, entity_href, Breadcrumb, DASHBOARD_LABEL};
pub use error::RouteError;
pub use guard::{
    GuardDecision, RouteGuard, DEFAULT_ENTRY_PAGE, DEFAULT_EXEMPT_PATHS, REASON_NOT_SIGNED_IN,
    REASON_NO_ROUTE,
};
pub use landing::{LandingPages, DEFAULT_LANDING_PAGE};
pub use menu::{menu, MenuEntry, MenuItem, STANDARD_MENU};
pub use pattern::{RouteParams, RoutePattern};
pub use table::{
    DynamicRoute, DynamicRouteConfig, ExactRouteConfig, RouteMatch, RoutePermissionTable,
    RouteTableConfig,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
