//! HTTP controller endpoints for the Passerelle web surface and publisher API.
//!
//! Web handlers answer JSON documents for reads and `303 See Other` redirects carrying a
//! flash notice for writes. Each handler checks the `Accept` header, resolves the signed
//! in user from the session, applies the matching policy and only then calls a service.
//! API handlers authenticate a publisher application with its bearer token instead.

pub mod api;
pub mod auth;
pub mod collectivity;
pub mod ddfip;
pub mod dgfip;
pub mod office;
pub mod organization;
pub mod package;
pub mod publisher;
pub mod report;
pub mod territory;
pub mod transmission;
pub mod user;
pub mod util;
