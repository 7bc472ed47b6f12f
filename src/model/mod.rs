//! Data transfer objects exchanged with clients.
//!
//! Output documents are named `XDto`, submitted attributes `XForm`. Every type derives
//! `utoipa::ToSchema` so the publisher API and authentication routes are documented.

pub mod api;
pub mod auth;
pub mod list;
pub mod notice;
pub mod oauth;
pub mod organization;
pub mod package;
pub mod report;
pub mod territory;
pub mod transmission;
pub mod user;
