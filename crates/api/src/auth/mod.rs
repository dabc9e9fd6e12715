//! Authentication building blocks.
//!
//! Token issuance (login, refresh, password handling) lives in the account
//! service; this API only validates the HS256 access tokens it receives.

pub mod jwt;
