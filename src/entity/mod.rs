//! Database entity models for pg-session-state-store.
//!
//! This module contains the Sea-ORM entity definitions used by the PostgreSQL
//! session store implementation. The primary entity is the `session` entity,
//! which represents the table holding session rows together with their lock
//! and expiry state.

/// Session row entity, schema mapping and column definitions.
pub mod session;
