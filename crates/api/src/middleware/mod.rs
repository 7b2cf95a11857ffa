//! Request extractors that gate and validate handler input.
//!
//! - [`auth::AuthUser`] -- resolves a JWT Bearer token to an active user.
//! - [`free_access::SiteAccess`] -- one unauthenticated pass per client
//!   address, then falls back to [`auth::AuthUser`].
//! - [`path::PathParam`] -- path segment with a JSON 400 on parse failure.
//! - [`validated_json::ValidatedJson`] -- JSON body that must pass `validator` rules.

pub mod auth;
pub mod free_access;
pub mod path;
pub mod validated_json;
