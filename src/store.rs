//! Store contract: the session operations, their outcome types and the error
//! taxonomy.
//!
//! The contract replaces exception-based signaling with explicit results:
//! "row missing", "row expired" and "row locked by someone else" are ordinary
//! [`GetOutcome`] values the caller polls against, while [`StoreError`] is
//! reserved for genuine storage failures.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use time::Duration;

use crate::codec::SessionPayload;

/// Boxed error type accepted from expire callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Callback invoked once per expired session before its row is deleted.
///
/// Callbacks run inside the sweep transaction; returning an error aborts the
/// whole sweep, so the same sessions will be notified again on the next cycle.
/// Callbacks must therefore tolerate duplicate notification.
pub type ExpireCallback =
    Arc<dyn Fn(&str, &SessionPayload) -> std::result::Result<(), BoxError> + Send + Sync>;

/// Errors surfaced by session store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying database failure. The enclosing transaction has been rolled
    /// back; no partial state is visible.
    #[error("database error: {0}")]
    Backend(#[from] DbErr),

    /// Payload serialization failure.
    #[error("payload encode error: {0}")]
    Encode(String),

    /// Payload deserialization failure.
    #[error("payload decode error: {0}")]
    Decode(String),

    /// `create_uninitialized` kept losing insert/overwrite races and gave up.
    #[error("session creation still conflicting after {attempts} attempts")]
    RetryExhausted {
        /// Number of insert-then-overwrite rounds attempted.
        attempts: u32,
    },

    /// An expire callback rejected a session during a callback-mode sweep.
    /// The sweep transaction was rolled back and no rows were deleted.
    #[error("expire callback failed for session {session_id}: {source}")]
    Callback {
        /// Session the callback was invoked for.
        session_id: String,
        /// Error returned by the callback.
        source: BoxError,
    },
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Post-fetch action the caller should take for a session row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Row holds real payload data; use it as-is.
    None,
    /// Row was created uninitialized and has never been written; the caller
    /// receives a fresh empty payload and should populate it.
    Initialize,
}

impl SessionAction {
    pub(crate) fn from_flags(flags: i32) -> Self {
        match flags {
            1 => Self::Initialize,
            _ => Self::None,
        }
    }

    pub(crate) fn as_flags(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Initialize => 1,
        }
    }
}

/// A successfully fetched session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionFetch {
    /// Decoded payload; a fresh empty payload when `action` is
    /// [`SessionAction::Initialize`].
    pub payload: SessionPayload,
    /// Current lock generation. After an exclusive fetch this is the
    /// generation the caller now holds and must pass back to
    /// `release`/`update_and_release`/`remove`.
    pub lock_id: i32,
    /// Whether the row still needs its first write.
    pub action: SessionAction,
    /// Idle timeout stored on the row.
    pub timeout_minutes: i32,
}

/// Outcome of a [`SessionStore::get`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum GetOutcome {
    /// No row exists for the id, or the row has expired. Indistinguishable by
    /// design; the caller treats both as a miss.
    Missing,
    /// The row is exclusively held by another request. The caller polls and
    /// retries, using `lock_age` to detect orphaned locks.
    Locked {
        /// Lock generation currently holding the row.
        lock_id: i32,
        /// Time elapsed since the lock was acquired.
        lock_age: Duration,
    },
    /// The row was available (and is now locked, if the fetch was exclusive).
    Found(SessionFetch),
}

/// Atomic, race-safe operations on session rows for one application scope.
///
/// Mutual exclusion is entirely database-transaction-based: an exclusive
/// fetch takes a row-level lock for the duration of its transaction, and the
/// conditional writes (`release`, `update_and_release`, `remove`) guard
/// against stale callers by matching the lock generation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts a new uninitialized row (`flags` = uninitialized, empty
    /// payload, unlocked, lock generation zero).
    ///
    /// Tolerates benign races: a duplicate-key conflict falls back to
    /// overwriting the existing row, and the insert-then-overwrite pair is
    /// retried a bounded number of times before failing with
    /// [`StoreError::RetryExhausted`].
    async fn create_uninitialized(&self, session_id: &str, timeout_minutes: i32) -> Result<()>;

    /// Fetches a session row, optionally acquiring the exclusive lock.
    ///
    /// When `exclusive` is true and the row is available, the lock generation
    /// is incremented and the row is marked locked within the same
    /// transaction as the read, so no two callers can both believe they hold
    /// the lock.
    async fn get(&self, session_id: &str, exclusive: bool) -> Result<GetOutcome>;

    /// Clears the lock and refreshes the expiry, provided `lock_id` still
    /// matches the row's current generation. A stale generation is a silent
    /// no-op: the session may already have been cleaned up.
    async fn release(&self, session_id: &str, lock_id: i32) -> Result<()>;

    /// Writes the payload and clears the lock.
    ///
    /// With `is_new` set, any pre-existing row for the id is deleted first
    /// (covering reuse of an expired id) and a fresh unlocked row is
    /// inserted, all in one transaction. Otherwise the existing row is
    /// updated conditioned on a matching lock generation.
    async fn update_and_release(
        &self,
        session_id: &str,
        lock_id: i32,
        payload: &SessionPayload,
        timeout_minutes: i32,
        is_new: bool,
    ) -> Result<()>;

    /// Deletes the row, conditioned on a matching lock generation.
    async fn remove(&self, session_id: &str, lock_id: i32) -> Result<()>;

    /// Refreshes the expiry without touching lock state or payload.
    async fn touch(&self, session_id: &str) -> Result<()>;
}

/// Expired-row sweeping, implemented by stores that support background
/// garbage collection.
#[async_trait]
pub trait SessionSweep: Send + Sync {
    /// Deletes every expired row in the store's application scope in a single
    /// transaction. Returns the number of rows removed.
    async fn delete_expired(&self) -> Result<u64>;

    /// Invokes `callback` once per expired session, then deletes the row,
    /// all within one transaction. A callback error rolls back the entire
    /// sweep. Returns the number of rows removed. Invocation order follows
    /// the query result and is otherwise unspecified.
    async fn sweep_expired_with(&self, callback: &ExpireCallback) -> Result<u64>;
}
