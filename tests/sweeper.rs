//! End-to-end sweeper test: a spawned sweeper garbage-collects expired rows
//! from a real (SQLite-backed) store.

use std::sync::Arc;
use std::time::Duration;

use pg_session_state_store::entity::session;
use pg_session_state_store::migration::Migrator;
use pg_session_state_store::{ExpirySweeper, PostgresStore, SessionStore, StoreConfig};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter};
use sea_orm_migration::MigratorTrait;

async fn connect() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1);
    let conn = Database::connect(options).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    conn
}

#[tokio::test]
async fn spawned_sweeper_collects_expired_rows() {
    let conn = connect().await;
    let store = Arc::new(PostgresStore::new(conn.clone()));

    store.create_uninitialized("stale", 20).await.unwrap();
    store.create_uninitialized("live", 20).await.unwrap();

    let past = chrono::Utc::now() - chrono::Duration::minutes(5);
    session::Entity::update_many()
        .col_expr(
            session::Column::Expires,
            Expr::value(sea_orm::prelude::DateTimeWithTimeZone::from(past)),
        )
        .filter(session::Column::SessionId.eq("stale"))
        .exec(&conn)
        .await
        .unwrap();

    let config = StoreConfig {
        auto_delete_expired: true,
        sweep_interval_ms: 50,
        ..StoreConfig::default()
    };
    let mut handle = ExpirySweeper::new(Arc::clone(&store), &config).spawn();

    tokio::time::sleep(Duration::from_millis(300)).await;
    handle.shutdown();

    let remaining = session::Entity::find().all(&conn).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].session_id, "live");
}
