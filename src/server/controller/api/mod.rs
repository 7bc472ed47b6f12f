//! JSON API used by publisher software, authenticated with OAuth bearer tokens.
//!
//! Records a publisher doesn't manage are reported missing (404) rather than forbidden.

pub mod collectivity;
pub mod transmission;

pub static API_TAG: &str = "api";
