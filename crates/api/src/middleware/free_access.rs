//! One free site evaluation per client address.
//!
//! The first request from an address is let through without credentials;
//! every later request from that address must carry a valid bearer token.
//! Addresses are remembered for the life of the process and never evicted.
//! The check and the mark happen under one lock, so concurrent first
//! requests from the same address get exactly one free pass.

use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use parking_lot::Mutex;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Header consulted when `TRUST_FORWARDED_FOR` is enabled.
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Set of client addresses that have already used their free pass.
#[derive(Debug, Default)]
pub struct FreeAccessTracker {
    used: Mutex<HashSet<IpAddr>>,
}

impl FreeAccessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `ip` has already spent its free pass.
    pub fn has_used(&self, ip: IpAddr) -> bool {
        self.used.lock().contains(&ip)
    }

    /// Claim the free pass for `ip`. Returns `true` only for the call that
    /// actually consumed it.
    pub fn try_claim(&self, ip: IpAddr) -> bool {
        self.used.lock().insert(ip)
    }

    /// Number of addresses that have spent their pass.
    pub fn used_count(&self) -> usize {
        self.used.lock().len()
    }
}

/// How a request to the gated endpoint was admitted.
#[derive(Debug, Clone)]
pub enum SiteAccess {
    /// First request from this address; no credentials checked.
    FreePass { ip: IpAddr },
    /// Free pass already spent; a valid token was presented.
    Authenticated(AuthUser),
}

impl FromRequestParts<AppState> for SiteAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ip = client_ip(parts, state.config.trust_forwarded_for)?;

        if state.free_access.try_claim(ip) {
            tracing::info!(%ip, "Granted free evaluation pass");
            return Ok(SiteAccess::FreePass { ip });
        }

        let user = AuthUser::from_request_parts(parts, state).await.inspect_err(|_| {
            tracing::debug!(%ip, "Free pass already used and no valid token presented");
        })?;
        Ok(SiteAccess::Authenticated(user))
    }
}

/// Resolve the client address for a request.
///
/// With `trust_forwarded_for`, the left-most parseable `X-Forwarded-For`
/// entry wins; otherwise (or if the header is absent) the TCP peer is used.
pub fn client_ip(parts: &Parts, trust_forwarded_for: bool) -> Result<IpAddr, AppError> {
    if trust_forwarded_for {
        if let Some(ip) = forwarded_ip(parts) {
            return Ok(ip);
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .ok_or_else(|| AppError::InternalError("Client address unavailable".into()))
}

fn forwarded_ip(parts: &Parts) -> Option<IpAddr> {
    parts
        .headers
        .get(FORWARDED_FOR)?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}
