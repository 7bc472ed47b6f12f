//! Test utilities shared by the passerelle crates.
//!
//! Tests start from a [`TestBuilder`], which creates an in-memory SQLite database with the
//! application tables, a session backed by an in-memory store and a mock HTTP server. The
//! resulting [`TestContext`] exposes fixture groups (`territory()`, `organization()`, `user()`,
//! `report()`, `auth()`) to insert records.

pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod model;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::*,
        fixtures::{auth::digest, factory, territory::TestTerritories},
        TestBuilder, TestContext, TestError,
    };
}
