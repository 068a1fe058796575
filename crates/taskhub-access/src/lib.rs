//! TaskHub Access - role and permission evaluation
//!
//! Decides who may view or manage which entity at which level of the
//! system → agency → client hierarchy.
//!
//! # Core Concepts
//!
//! - [`Role`]: one of four fixed roles, bound to a user at login
//! - [`Permission`]: closed set of fourteen permission kinds
//! - [`PermissionEvaluator`]: table-driven, fail-closed evaluation
//! - [`AuditSink`]: fire-and-forget destination for every decision
//!
//! # Example
//!
//! ```rust
//! use taskhub_access::{EntityScope, Permission, PermissionEvaluator, Principal, Role};
//!
//! let evaluator = PermissionEvaluator::default();
//! let admin = Principal::new("u1", Role::AgencyAdmin).with_agency("A1");
//!
//! assert!(evaluator.evaluate(&admin, Permission::ViewAgency, EntityScope::id("A1")).granted);
//! assert!(!evaluator.evaluate(&admin, Permission::ViewSystem, EntityScope::NONE).granted);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod audit;
pub mod error;
pub mod evaluator;
pub mod matrix;
pub mod permission;
pub mod principal;
pub mod role;

pub use audit::{
    emit, AuditLevel, AuditRecord, AuditSink, ChannelAuditSink, FanoutAuditSink,
    MemoryAuditSink, NullAuditSink, SharedAuditSink, TracingAuditSink,
};
pub use error::{AccessError, AuditError};
pub use evaluator::{
    decide, grant_for, Decision, Grant, PermissionEvaluator, REASON_NO_ROLE,
    REASON_UNKNOWN_PERMISSION,
};
pub use matrix::{MatrixCell, MatrixRow, PermissionMatrix};
pub use permission::Permission;
pub use principal::{EntityScope, Principal};
pub use role::{EntityKind, Role};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
