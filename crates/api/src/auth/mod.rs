//! Token validation.
//!
//! Session issuance (login, refresh) lives in the identity service; this
//! server only validates the Bearer tokens it is handed.

pub mod jwt;
