//! TaskHub Core - portal orchestration
//!
//! Wires the permission evaluator, route guard, navigation resolver and
//! breadcrumb/menu projection into one [`Portal`] driven by path changes.
//!
//! # Architecture
//!
//! ```text
//! UserRecord ─login─→ Session ─→ Principal
//!                                   │
//! path change ─→ RouteGuard ─→ NavigationResolver ─→ PortalView
//!                   │                                 (context, breadcrumbs, menu)
//!                   └─ Router (redirect / logout)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use taskhub_core::{LoggingRouter, Portal, PortalConfig, UserRecord};
//!
//! # async fn example(lookup: taskhub_core::SharedLookup) -> taskhub_core::Result<()> {
//! let config = PortalConfig::load("portal.toml")?;
//! taskhub_core::init_tracing(&config.logging)?;
//!
//! let audit = Arc::new(taskhub_access::TracingAuditSink);
//! let portal = Portal::new(config, lookup, Arc::new(LoggingRouter), audit)?;
//! portal.login(&UserRecord::new("u1", "agency_admin"));
//! let view = portal.on_route_change("/clients/C1").await;
//! println!("{:?}", view.breadcrumbs);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod portal;
pub mod router;
pub mod session;
pub mod telemetry;

pub use config::{LookupCacheConfig, PortalConfig};
pub use error::{PortalError, Result};
pub use portal::{Portal, PortalView, SharedLookup};
pub use router::{LoggingRouter, Router};
#[cfg(any(test, feature = "mocks"))]
pub use router::MockRouter;
pub use session::{Session, UserRecord};
pub use telemetry::{init_tracing, LoggingConfig};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
