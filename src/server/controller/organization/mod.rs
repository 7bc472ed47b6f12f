//! `/organisation` pages, where organization admins manage their own organization.
//!
//! Members, collectivities and offices share their handlers with the administration pages,
//! restricted to the signed in user's organization. OAuth applications only exist here.

pub mod collectivity;
pub mod oauth;
pub mod office;
pub mod user;
