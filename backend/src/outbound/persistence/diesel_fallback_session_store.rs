//! PostgreSQL-backed `FallbackSessionStore` using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    FallbackSessionRecord, FallbackSessionStore, FallbackSessionStoreError, StoredSession,
};

use super::models::{NewSurfSessionRow, SurfSessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::surf_sessions_duplicate;

/// Diesel-backed writer for `surf_sessions_duplicate`.
#[derive(Clone)]
pub struct DieselFallbackSessionStore {
    pool: DbPool,
}

impl DieselFallbackSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FallbackSessionStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            FallbackSessionStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> FallbackSessionStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "fallback insert failed");
        }
        other => debug!(error = %other, "fallback insert failed"),
    }
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FallbackSessionStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            FallbackSessionStoreError::query("session violates a table constraint")
        }
        _ => FallbackSessionStoreError::query("database error"),
    }
}

#[async_trait]
impl FallbackSessionStore for DieselFallbackSessionStore {
    async fn insert(
        &self,
        record: &FallbackSessionRecord,
    ) -> Result<StoredSession, FallbackSessionStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: SurfSessionRow = diesel::insert_into(surf_sessions_duplicate::table)
            .values(NewSurfSessionRow::from(record))
            .returning(SurfSessionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; inserts need a live database.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PoolError::checkout("timed out"))]
    #[case(PoolError::build("bad url"))]
    fn pool_failures_are_connection_errors(#[case] error: PoolError) {
        assert!(matches!(
            map_pool_error(error),
            FallbackSessionStoreError::Connection { .. }
        ));
    }

    #[rstest]
    fn other_diesel_failures_are_query_errors() {
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            FallbackSessionStoreError::Query { .. }
        ));
    }
}
