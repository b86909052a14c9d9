//! Sea-ORM entity for the session state table.
//!
//! The entity is the single place where logical field names are mapped onto
//! physical column names; store code addresses columns exclusively through
//! [`Column`] and never spells a column string.

use sea_orm::entity::prelude::*;

/// One row per active or recently-active session.
///
/// A session is keyed by the (`session_id`, `application_name`) pair so that
/// several logical applications can share one table. The row carries the lock
/// protocol state (`locked`, `lock_id`, `lock_date`) alongside the expiry
/// bookkeeping (`expires`, `timeout_minutes`) and the opaque payload blob.
///
/// # Database Schema
///
/// | Column           | Type        | Description                              |
/// |------------------|-------------|------------------------------------------|
/// | session_id       | VARCHAR(80) | Caller-assigned session ID (PK part)     |
/// | application_name | VARCHAR(255)| Application scope (PK part)              |
/// | created          | TIMESTAMPTZ | Set once at row creation                 |
/// | expires          | TIMESTAMPTZ | Row is expired when `now > expires`      |
/// | timeout_minutes  | INTEGER     | Recomputes `expires` on every touch      |
/// | locked           | BOOLEAN     | True while a request holds the row       |
/// | lock_id          | INTEGER     | Lock generation, only ever increases     |
/// | lock_date        | TIMESTAMPTZ | Most recent lock acquisition             |
/// | data             | BYTEA       | MessagePack payload, empty until written |
/// | flags            | INTEGER     | 0 = normal, 1 = uninitialized            |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Caller-assigned session identifier, immutable once created.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub session_id: String,

    /// Application scope; together with `session_id` forms the true key.
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub application_name: String,

    /// Creation timestamp, never updated after insert.
    pub created: DateTimeWithTimeZone,

    /// Expiry timestamp, refreshed to `now + timeout_minutes` on every touch.
    pub expires: DateTimeWithTimeZone,

    /// Idle timeout used to recompute `expires`.
    pub timeout_minutes: i32,

    /// Whether a request currently holds the row exclusively.
    pub locked: bool,

    /// Lock generation counter; incremented on each exclusive acquisition and
    /// never reused within the life of the row.
    pub lock_id: i32,

    /// Timestamp of the most recent lock acquisition, reported to callers as
    /// the lock age for orphaned-lock detection.
    pub lock_date: DateTimeWithTimeZone,

    /// Serialized session payload; empty for uninitialized rows.
    pub data: Vec<u8>,

    /// Row state flags, see [`crate::SessionAction`].
    pub flags: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
