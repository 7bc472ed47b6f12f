//! Utility functions for controller request handling.
//!
//! Helpers shared by every handler: the signed in user and API client lookups, content
//! negotiation, query string parsing and the JSON or redirect answers.

pub mod bearer;
pub mod format;
pub mod get_user;
pub mod params;
pub mod respond;
