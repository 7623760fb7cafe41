//! PostgreSQL implementations of the [`store`](crate::store) traits.

pub mod guest;
pub mod invitation;
pub mod membership;
pub mod ticket;
pub mod user;

pub use guest::GuestRepository;
pub use invitation::InvitationRepository;
pub use membership::MembershipRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;

use invitehub_core::error::{AppError, ErrorKind};

/// Map a failed write, surfacing constraint violations as domain errors.
pub(crate) fn write_error(context: &str, e: sqlx::Error) -> AppError {
    let violation = e.as_database_error().map(|db| db.kind());
    match violation {
        Some(sqlx::error::ErrorKind::UniqueViolation) => {
            AppError::with_source(ErrorKind::Conflict, format!("{context}: already exists"), e)
        }
        Some(sqlx::error::ErrorKind::ForeignKeyViolation) => AppError::with_source(
            ErrorKind::NotFound,
            format!("{context}: referenced record not found"),
            e,
        ),
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), e),
    }
}

/// Begin a transaction on the pool.
pub(crate) async fn begin(
    pool: &sqlx::PgPool,
) -> Result<sqlx::Transaction<'static, sqlx::Postgres>, AppError> {
    pool.begin()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
}

/// Commit a transaction.
pub(crate) async fn commit(tx: sqlx::Transaction<'static, sqlx::Postgres>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}
