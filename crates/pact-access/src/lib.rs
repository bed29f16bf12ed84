//! # pact-access
//!
//! Resolves which accounts can see a given agreement.
//!
//! Visibility derives from two sources: direct membership in the
//! agreement's department, and explicit per-department permission grants.
//! [`resolve`] computes the deduplicated access list from a raw user
//! roster; it is the local fallback used while an agreement has not been
//! persisted yet — once it has an id, the backend's already-computed list
//! is authoritative and is displayed instead.

pub mod resolver;
pub mod roster;

pub use resolver::resolve;
pub use roster::{AccessUser, PermissionGrant};
