//! Test fixture modules for database record creation.
//!
//! Each submodule provides fixtures for one area of the data model:
//!
//! - `auth` - OAuth applications and publisher access tokens
//! - `factory` - In-memory models used by the fixtures and unit tests
//! - `organization` - Publishers, collectivities, DDFIPs, DGFIPs and offices
//! - `report` - Reports, transmissions and packages
//! - `territory` - Regions, départements, EPCIs and communes
//! - `user` - Users, passwords and office membership

pub mod auth;
pub mod factory;
pub mod organization;
pub mod report;
pub mod territory;
pub mod user;
