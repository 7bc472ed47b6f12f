pub use sea_orm_migration::prelude::*;

mod m20260901_000001_create_region_table;
mod m20260901_000002_create_departement_table;
mod m20260901_000003_create_epci_table;
mod m20260901_000004_create_commune_table;
mod m20260901_000005_create_publisher_table;
mod m20260901_000006_create_collectivity_table;
mod m20260901_000007_create_ddfip_table;
mod m20260901_000008_create_dgfip_table;
mod m20260901_000009_create_user_table;
mod m20260901_000010_create_office_table;
mod m20260901_000011_create_office_user_table;
mod m20260901_000012_create_office_commune_table;
mod m20260901_000013_create_oauth_application_table;
mod m20260901_000014_create_oauth_access_token_table;
mod m20260901_000015_create_transmission_table;
mod m20260901_000016_create_package_table;
mod m20260901_000017_create_report_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_region_table::Migration),
            Box::new(m20260901_000002_create_departement_table::Migration),
            Box::new(m20260901_000003_create_epci_table::Migration),
            Box::new(m20260901_000004_create_commune_table::Migration),
            Box::new(m20260901_000005_create_publisher_table::Migration),
            Box::new(m20260901_000006_create_collectivity_table::Migration),
            Box::new(m20260901_000007_create_ddfip_table::Migration),
            Box::new(m20260901_000008_create_dgfip_table::Migration),
            Box::new(m20260901_000009_create_user_table::Migration),
            Box::new(m20260901_000010_create_office_table::Migration),
            Box::new(m20260901_000011_create_office_user_table::Migration),
            Box::new(m20260901_000012_create_office_commune_table::Migration),
            Box::new(m20260901_000013_create_oauth_application_table::Migration),
            Box::new(m20260901_000014_create_oauth_access_token_table::Migration),
            Box::new(m20260901_000015_create_transmission_table::Migration),
            Box::new(m20260901_000016_create_package_table::Migration),
            Box::new(m20260901_000017_create_report_table::Migration),
        ]
    }
}
