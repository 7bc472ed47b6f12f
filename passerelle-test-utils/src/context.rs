//! Test context structure and utilities.
//!
//! This module provides the `TestContext` returned by `TestBuilder`. The context includes an
//! in-memory SQLite database, a mock HTTP server for territory import sources, an HTTP client
//! and a session backed by an in-memory store.

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Test context structure returned by `TestBuilder`
///
/// Provides access to the database connection, the session used by handlers under test,
/// the mock HTTP server and the collection of mock endpoints for assertion.
///
/// ```ignore
/// let test = TestBuilder::new().with_tables().build().await?;
///
/// let publisher = test.organization().insert_publisher("123456789").await?;
/// let admin = test.user().insert_admin("Publisher", publisher.id, "admin@acme.fr").await?;
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,
    /// HTTP client used by import jobs
    pub http_client: reqwest::Client,
    /// Session used as the signed-in browser session
    pub session: Session,

    /// Mock HTTP server serving import sources
    pub(crate) server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Convert database and HTTP client into any type that can be constructed from them
    ///
    /// This allows conversion to `AppState` without creating a circular dependency
    /// between the test-utils crate and the main passerelle crate.
    pub fn to_app_state<T>(&self) -> T
    where
        T: From<(DatabaseConnection, reqwest::Client)>,
    {
        T::from((self.db.clone(), self.http_client.clone()))
    }

    /// Base URL of the mock HTTP server.
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Create a fresh session sharing nothing with `self.session`.
    ///
    /// Used when a test needs a second browser, e.g. a user from another organization.
    pub fn new_session(&self) -> Session {
        let store = Arc::new(MemoryStore::default());
        Session::new(None, store, None)
    }
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context
    /// - `Err(TestError::DbErr)` - Database connection failed
    pub(crate) async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;

        Ok(TestContext {
            server: mock_server,
            db,
            http_client: reqwest::Client::new(),
            session,
            mocks: Vec::new(),
        })
    }

    /// Create database tables from schema statements.
    ///
    /// # Arguments
    /// - `stmts` - Vector of CREATE TABLE statements to execute
    ///
    /// # Returns
    /// - `Ok(())` - All tables created successfully
    /// - `Err(TestError::DbErr)` - Table creation failed
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
