//! Server application models and type definitions.
//!
//! This module contains the application state, database model type aliases, the domain
//! enumerations stored as strings in the database (organization & territory types, form
//! types, anomalies, priorities, statuses), the authenticated principals and the typed
//! session data structures.

pub mod app;
pub mod auth;
pub mod db;
pub mod organization;
pub mod report;
pub mod session;
