//! Utility functions shared by services and controllers.
//!
//! `validation` holds the field format rules, `secret` the token, digest and password
//! helpers used by invitations, OAuth applications and sign in.

pub mod secret;
pub mod validation;
