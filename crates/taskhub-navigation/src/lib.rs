//! TaskHub Navigation - hierarchical navigation context
//!
//! Derives the active system/agency/client from the current route and keeps
//! it consistent under overlapping navigations.
//!
//! # Core Concepts
//!
//! - [`NavigationContext`]: the active `{system, agency, client}` triple
//! - [`RouteState`]: which resolution a path change triggers
//! - [`NavigationResolver`]: single writer of the context, last navigation wins
//! - [`EntityLookup`]: external entity service, optionally behind [`CachedLookup`]
//! - [`visible_in`]: tag/SOP filtering by the active context
//!
//! # Example
//!
//! ```rust,ignore
//! use taskhub_navigation::{NavigationResolver, NavigationOutcome};
//!
//! # async fn example(lookup: impl taskhub_navigation::EntityLookup) {
//! let audit = std::sync::Arc::new(taskhub_access::NullAuditSink);
//! let resolver = NavigationResolver::new(lookup, audit);
//! let reader = resolver.subscribe();
//!
//! match resolver.navigate("/clients/C1", Some("C1")).await {
//!     NavigationOutcome::Updated(ctx) => println!("now in {:?}", ctx.most_specific()),
//!     other => println!("context kept: {other:?}"),
//! }
//! assert_eq!(reader.snapshot(), resolver.snapshot());
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod context;
pub mod error;
pub mod lookup;
pub mod resolver;
pub mod route_state;
pub mod visibility;

pub use cache::{CachedLookup, LookupCacheStats};
pub use context::{EntityLabel, NavigationContext};
pub use error::{LookupError, ResolveError};
pub use lookup::{AgencyRecord, ClientRecord, EntityLookup, SystemRecord};
pub use resolver::{ContextReader, NavigationOutcome, NavigationResolver, NavigationTicket};
pub use route_state::{collection_kind, normalize_path, segments, RouteState};
pub use visibility::{visible_in, ItemScope, Scoped, ScopedItem};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
