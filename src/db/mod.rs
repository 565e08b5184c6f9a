// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations
// - Timestamp encoding shared by the repositories

pub mod connection;
pub mod migrations;

pub use connection::{
    create_connection_pool, get_connection, get_database_path, ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, initialize_database, verify_database_integrity, DatabaseStats,
};

use chrono::{DateTime, SecondsFormat, Utc};

/// Encode a timestamp for storage.
///
/// Fixed-width so that lexical order in SQL matches chronological order.
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp inside a row mapper
pub fn decode_timestamp(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Decode a stored UUID inside a row mapper
pub fn decode_uuid(raw: &str) -> rusqlite::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(raw).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamps_sort_lexically() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = a + chrono::Duration::microseconds(500_000);
        let c = a + chrono::Duration::seconds(1);

        let (ea, eb, ec) = (encode_timestamp(&a), encode_timestamp(&b), encode_timestamp(&c));
        assert!(ea < eb && eb < ec);
        assert_eq!(ea.len(), ec.len());
        assert_eq!(decode_timestamp(&eb).unwrap(), b);
    }

    #[test]
    fn test_invalid_uuid_causes_error_not_nil() {
        assert!(decode_uuid("not-a-valid-uuid").is_err());
    }
}
