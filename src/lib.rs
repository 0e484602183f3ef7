//! Language negotiation and localized content for axum sites.
//!
//! Each request's language is taken from the URI prefix, the language cookie,
//! the `Accept-Language` header or the configured default, in that order. See
//! [`i18n`] for the building blocks and [`middleware`] for the axum wiring.

pub mod config;
pub mod i18n;
pub mod middleware;
pub mod server;
