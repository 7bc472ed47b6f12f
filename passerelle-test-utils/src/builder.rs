//! Declarative test builder.
//!
//! The builder queues table creation and mock endpoints, then executes everything in `build()`.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// Builder for declarative test initialization.
///
/// Methods can be chained together and finalized with `build()` to create a complete test
/// setup.
pub struct TestBuilder {
    tables: Vec<TableCreateStatement>,
    include_all_tables: bool,

    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
    csv_endpoints: Vec<(String, String, usize)>,
}

impl TestBuilder {
    /// Create a new TestBuilder with no tables or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_all_tables: false,
            mock_builders: Vec::new(),
            csv_endpoints: Vec::new(),
        }
    }

    /// Add every application table to the test database.
    ///
    /// Tables are created parents first so foreign keys resolve.
    pub fn with_tables(mut self) -> Self {
        self.include_all_tables = true;
        self
    }

    /// Add a single entity table to the test database.
    ///
    /// Chain multiple calls to add multiple tables. Useful to test behavior when related
    /// tables are missing.
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Serve a CSV document at `path` on the mock server.
    ///
    /// # Arguments
    /// - `path` - Request path, e.g. `/communes.csv`
    /// - `body` - CSV document returned with status 200
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn with_csv_endpoint(
        mut self,
        path: impl Into<String>,
        body: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.csv_endpoints
            .push((path.into(), body.into(), expected_requests));
        self
    }

    /// Add a custom mock endpoint with full control.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test context by creating all configured tables and mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test environment ready for use
    /// - `Err(TestError::DbErr)` - Database table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        let mut all_tables = Vec::new();

        if self.include_all_tables {
            let schema = Schema::new(sea_orm::DbBackend::Sqlite);
            all_tables.extend(vec![
                schema.create_table_from_entity(entity::prelude::Region),
                schema.create_table_from_entity(entity::prelude::Departement),
                schema.create_table_from_entity(entity::prelude::Epci),
                schema.create_table_from_entity(entity::prelude::Commune),
                schema.create_table_from_entity(entity::prelude::Publisher),
                schema.create_table_from_entity(entity::prelude::Collectivity),
                schema.create_table_from_entity(entity::prelude::Ddfip),
                schema.create_table_from_entity(entity::prelude::Dgfip),
                schema.create_table_from_entity(entity::prelude::User),
                schema.create_table_from_entity(entity::prelude::Office),
                schema.create_table_from_entity(entity::prelude::OfficeUser),
                schema.create_table_from_entity(entity::prelude::OfficeCommune),
                schema.create_table_from_entity(entity::prelude::OauthApplication),
                schema.create_table_from_entity(entity::prelude::OauthAccessToken),
                schema.create_table_from_entity(entity::prelude::Transmission),
                schema.create_table_from_entity(entity::prelude::Package),
                schema.create_table_from_entity(entity::prelude::Report),
            ]);
        }

        all_tables.extend(self.tables);
        setup.with_tables(all_tables).await?;

        // Custom endpoints first so tests can stack several mocks on the same path
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (path, body, expected) in self.csv_endpoints {
            mocks.push(
                setup
                    .server
                    .mock("GET", path.as_str())
                    .with_status(200)
                    .with_header("content-type", "text/csv")
                    .with_body(body)
                    .expect(expected)
                    .create(),
            );
        }

        setup.mocks = mocks;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
