//! Data access layer repositories.
//!
//! Repositories own the queries of one table (or a small group of join tables) and take any
//! [`sea_orm::ConnectionTrait`] so services can run them inside a transaction.

pub mod collectivity;
pub mod ddfip;
pub mod dgfip;
pub mod discard;
pub mod listing;
pub mod oauth;
pub mod office;
pub mod organization;
pub mod package;
pub mod publisher;
pub mod report;
pub mod territory;
pub mod transmission;
pub mod user;
