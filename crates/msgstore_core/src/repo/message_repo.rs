//! Message repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete over the `message` table.
//! - Map between `Message` values and table rows.
//!
//! # Invariants
//! - Every operation is exactly one statement round trip.
//! - Ids come from the engine (`RETURNING id`), never from the caller.
//! - Update/delete succeed only when exactly one row was affected; more than
//!   one affected row is reported as `StoreError::IntegrityViolation`.
//! - `message.text` is nullable in the schema; a NULL read maps to `""`.

use crate::db::DbError;
use crate::model::message::{Message, MessageId};
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for message store operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// `update`/`delete` changed more than one row for a single id.
    IntegrityViolation { id: MessageId, affected: usize },
    /// `create` was handed a message that already has a store id.
    AlreadyPersisted(MessageId),
    /// `update` was handed a message without a store id.
    MissingId,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::IntegrityViolation { id, affected } => write!(
                f,
                "integrity violation: {affected} rows affected for message id {id}"
            ),
            Self::AlreadyPersisted(id) => write!(f, "message already persisted with id {id}"),
            Self::MissingId => write!(f, "message has no id"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::IntegrityViolation { .. } | Self::AlreadyPersisted(_) | Self::MissingId => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data access contract for messages.
pub trait MessageRepository {
    /// Inserts a transient message and returns it with the assigned id.
    fn create(&self, message: Message) -> StoreResult<Message>;
    /// Returns every stored message. Order is unspecified.
    fn find_all(&self) -> StoreResult<Vec<Message>>;
    fn find_by_id(&self, id: MessageId) -> StoreResult<Option<Message>>;
    /// Rewrites `text` of the row with `message.id`; `false` if no such row.
    fn update(&self, message: &Message) -> StoreResult<bool>;
    /// Removes the row with `id`; `false` if no such row.
    fn delete(&self, id: MessageId) -> StoreResult<bool>;
}

/// SQLite-backed message store.
///
/// Holds only a borrowed connection; concurrency control is left to SQLite.
pub struct SqliteMessageRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMessageRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MessageRepository for SqliteMessageRepository<'_> {
    fn create(&self, mut message: Message) -> StoreResult<Message> {
        if let Some(id) = message.id {
            return Err(StoreError::AlreadyPersisted(id));
        }

        let id = self
            .conn
            .query_row(
                "INSERT INTO message (text) VALUES (?1) RETURNING id;",
                [message.text.as_str()],
                |row| row.get::<_, MessageId>(0),
            )
            .map_err(|err| log_failure("message_create", err))?;

        debug!("event=message_create module=repo status=ok id={id}");
        message.id = Some(id);
        Ok(message)
    }

    fn find_all(&self) -> StoreResult<Vec<Message>> {
        let messages =
            select_all(self.conn).map_err(|err| log_failure("message_find_all", err))?;

        debug!(
            "event=message_find_all module=repo status=ok count={}",
            messages.len()
        );
        Ok(messages)
    }

    fn find_by_id(&self, id: MessageId) -> StoreResult<Option<Message>> {
        let message = self
            .conn
            .query_row(
                "SELECT id, text FROM message WHERE id = ?1;",
                [id],
                message_from_row,
            )
            .optional()
            .map_err(|err| log_failure("message_find_by_id", err))?;

        debug!(
            "event=message_find_by_id module=repo status=ok id={id} found={}",
            message.is_some()
        );
        Ok(message)
    }

    fn update(&self, message: &Message) -> StoreResult<bool> {
        let id = message.id.ok_or(StoreError::MissingId)?;

        let affected = self
            .conn
            .execute(
                "UPDATE message SET text = ?1 WHERE id = ?2;",
                params![message.text.as_str(), id],
            )
            .map_err(|err| log_failure("message_update", err))?;

        single_row_outcome("message_update", id, affected)
    }

    fn delete(&self, id: MessageId) -> StoreResult<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM message WHERE id = ?1;", [id])
            .map_err(|err| log_failure("message_delete", err))?;

        single_row_outcome("message_delete", id, affected)
    }
}

fn select_all(conn: &Connection) -> rusqlite::Result<Vec<Message>> {
    let mut stmt = conn.prepare("SELECT id, text FROM message;")?;
    let rows = stmt.query_map([], message_from_row)?;
    rows.collect()
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    let text: Option<String> = row.get("text")?;
    Ok(Message::with_id(row.get("id")?, text.unwrap_or_default()))
}

fn single_row_outcome(event: &str, id: MessageId, affected: usize) -> StoreResult<bool> {
    match affected {
        0 | 1 => {
            debug!("event={event} module=repo status=ok id={id} affected={affected}");
            Ok(affected == 1)
        }
        _ => {
            error!(
                "event={event} module=repo status=error id={id} affected={affected} error_code=integrity_violation"
            );
            Err(StoreError::IntegrityViolation { id, affected })
        }
    }
}

fn log_failure(event: &str, err: rusqlite::Error) -> StoreError {
    error!("event={event} module=repo status=error error_code=db_failed error={err}");
    err.into()
}
