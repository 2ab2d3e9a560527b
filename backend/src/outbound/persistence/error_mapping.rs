//! Shared mapping from Diesel and pool errors to port error enums.

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use super::pool::PoolError;

/// Map a pool error through the port's connection-error constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.to_string())
}

/// Map a Diesel error through the port's constructors: connection loss maps
/// to the connection variant, everything else to the query variant.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::BrokenTransactionManager => connection(error.to_string()),
        DieselError::NotFound => query("record not found".to_owned()),
        _ => query(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Probe {
        Query(String),
        Connection(String),
    }

    #[rstest]
    fn not_found_maps_to_query() {
        let mapped = map_diesel_error(DieselError::NotFound, Probe::Query, Probe::Connection);
        assert_eq!(mapped, Probe::Query("record not found".to_owned()));
    }

    #[rstest]
    fn broken_transaction_manager_maps_to_connection() {
        let mapped = map_diesel_error(
            DieselError::BrokenTransactionManager,
            Probe::Query,
            Probe::Connection,
        );
        assert!(matches!(mapped, Probe::Connection(_)));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_pool_error(PoolError::checkout("refused"), Probe::Connection);
        assert!(matches!(mapped, Probe::Connection(message) if message.contains("refused")));
    }
}
