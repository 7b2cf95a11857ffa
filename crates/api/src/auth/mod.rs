//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- access-token issuing and validation.
//! - [`service`] -- register / login / verify flows over a [`UserStore`].
//!
//! [`UserStore`]: sitescore_db::store::UserStore

pub mod jwt;
pub mod password;
pub mod service;
