pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_sessions_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Override the migration table name to avoid clashing with a host
    // application's own migrator.
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("pg_session_state_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_sessions_table::Migration)]
    }
}
