//! SQLite connection setup and schema migrations for the record store.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use super::DatabaseError;
use crate::config;

/// Ordered schema migrations. Each runs once, in its own transaction.
const MIGRATIONS: &[(i64, &str)] = &[
    (1, include_str!("../../resources/migrations/001_initial.sql")),
    (2, include_str!("../../resources/migrations/002_required_columns.sql")),
];

/// Open (or create) the record store file and bring its schema up to date.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    prepare(Connection::open(path)?)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> Result<Connection, DatabaseError> {
    conn.busy_timeout(config::DB_BUSY_TIMEOUT)?;
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Apply every migration newer than the stored schema version.
///
/// Stores created before version tracking existed report version 0; the
/// initial migration only uses `IF NOT EXISTS`, so it adopts their tables.
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn)?;
    for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
        tracing::info!(from = current, to = version, "Applying schema migration");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .and_then(|()| tx.commit())
            .map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

/// Highest applied migration, 0 for a fresh or untracked store.
fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let tracked = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !tracked {
        return Ok(0);
    }
    let version: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Number of user tables in the store.
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // 7 entity tables + schema_version
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 8, "Expected 8 tables, got {count}");
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        // Run migrations again; should not error
        let result = run_migrations(&conn);
        assert!(result.is_ok());
        assert_eq!(count_tables(&conn).unwrap(), 8);
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn database_reopens_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emr.db");

        let conn = open_database(&path).unwrap();
        conn.execute("INSERT INTO patients (name) VALUES ('Jane Doe')", [])
            .unwrap();
        drop(conn);

        // Re-open; schema creation must not fail or duplicate anything
        let conn2 = open_database(&path).unwrap();
        assert_eq!(count_tables(&conn2).unwrap(), 8);
        let patients: i64 = conn2
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(patients, 1);
        let versions: i64 = conn2
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 2);
    }

    #[test]
    fn legacy_database_without_version_table_migrates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emr.db");

        let legacy = Connection::open(&path).unwrap();
        legacy
            .execute_batch(
                "CREATE TABLE patients (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    age INTEGER, sex TEXT, contact TEXT, address TEXT,
                    civil_status TEXT, date_of_birth DATE, birthplace TEXT,
                    primary_language TEXT, religion TEXT, occupation TEXT,
                    usual_healthcare_provider TEXT, reason_for_health_contact TEXT,
                    attending_physician TEXT, weight REAL, height REAL,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                );
                INSERT INTO patients (name) VALUES ('Legacy Patient');

                CREATE TABLE medical_history (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    patient_id INTEGER,
                    diagnosis TEXT,
                    chronic_condition TEXT,
                    procedure TEXT,
                    date_recorded DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (patient_id) REFERENCES patients(id)
                );
                INSERT INTO medical_history (patient_id, diagnosis, date_recorded)
                    VALUES (1, 'Asthma', '2019-09-03T11:00');
                INSERT INTO medical_history (patient_id, diagnosis) VALUES (1, NULL);
                INSERT INTO medical_history (patient_id, diagnosis) VALUES (77, 'Orphan');

                CREATE TABLE vital_signs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    patient_id INTEGER,
                    blood_pressure TEXT,
                    pulse INTEGER,
                    temperature REAL,
                    respiratory_rate INTEGER,
                    oxygen_saturation INTEGER,
                    recorded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (patient_id) REFERENCES patients(id)
                );
                INSERT INTO vital_signs (patient_id, blood_pressure, pulse, temperature)
                    VALUES (1, '120/80', '', '36.6');

                CREATE TABLE appointments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    patient_id INTEGER,
                    appointment_date DATETIME,
                    reason TEXT,
                    status TEXT,
                    follow_up_instructions TEXT,
                    FOREIGN KEY (patient_id) REFERENCES patients(id)
                );
                INSERT INTO appointments (patient_id, appointment_date, reason, status)
                    VALUES (1, '2024-06-01T09:30', NULL, NULL);
                INSERT INTO appointments (patient_id, appointment_date, reason, status)
                    VALUES (1, NULL, 'Undated', 'scheduled');",
            )
            .unwrap();
        drop(legacy);

        let conn = open_database(&path).unwrap();
        assert_eq!(count_tables(&conn).unwrap(), 8);
        let name: String = conn
            .query_row("SELECT name FROM patients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name, "Legacy Patient");

        // Rows with NULL required columns are backfilled and readable
        let history = crate::db::list_medical_history(&conn).unwrap();
        let diagnoses: Vec<_> = history.iter().map(|e| e.fields.diagnosis.as_str()).collect();
        assert_eq!(history.len(), 2);
        assert!(diagnoses.contains(&"Asthma"));
        assert!(diagnoses.contains(&""));

        let vitals = crate::db::list_vital_signs(&conn).unwrap();
        assert_eq!(vitals.len(), 1);
        assert_eq!(vitals[0].fields.pulse, None);
        assert_eq!(vitals[0].fields.temperature, Some(36.6));

        let appointments = crate::db::list_appointments(&conn).unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].fields.status.as_str(), "scheduled");

        let summary = crate::summary::get_patient_summary(&conn, 1, 5).unwrap();
        assert_eq!(summary.medical_history.len(), 2);

        // Required columns are now enforced on the rebuilt tables
        let result = conn.execute(
            "INSERT INTO medical_history (patient_id, diagnosis) VALUES (1, NULL)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn not_null_columns_reject_missing_values() {
        let conn = open_memory_database().unwrap();
        let result = conn.execute("INSERT INTO patients (age) VALUES (30)", []);
        assert!(result.is_err());
    }
}
