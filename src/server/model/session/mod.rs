//! Session data models and utilities.
//!
//! Type-safe wrappers for session data stored with tower-sessions (Valkey backed in
//! production). Each submodule owns one session key with methods to insert, retrieve and
//! remove its value.

pub mod notice;
pub mod user;
