//! Server application core modules.
//!
//! This module contains all server-side functionality for Passerelle: HTTP routing and
//! controllers for the web surface and the publisher API, policies deciding who may do
//! what, services holding the workflow rules, repositories over the database, and the
//! background territory imports.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod policy;
pub mod router;
pub mod service;
pub mod startup;
pub mod task;
pub mod util;
