//! SQLite schema definition.

/// Complete database schema for hair-count.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,                         -- UUID
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    phone TEXT,
    email TEXT,
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);

-- ============================================================================
-- Treatments (one row per session)
-- ============================================================================

CREATE TABLE IF NOT EXISTS treatments (
    id TEXT PRIMARY KEY,                         -- UUID, never reused
    patient_id TEXT NOT NULL REFERENCES patients(id) ON DELETE CASCADE,
    treatment_type TEXT NOT NULL,                -- label, see BillingCategory
    treatment_date TEXT NOT NULL,                -- YYYY-MM-DD
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_treatments_patient ON treatments(patient_id);
CREATE INDEX IF NOT EXISTS idx_treatments_date ON treatments(treatment_date);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO patients (id, name) VALUES ('p1', '   ')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_treatment_requires_patient() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            r#"
            INSERT INTO treatments (id, patient_id, treatment_type, treatment_date)
            VALUES ('t1', 'missing', 'arm', '2024-01-01')
            "#,
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_patient_cascades() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute("INSERT INTO patients (id, name) VALUES ('p1', 'Hanako')", [])
            .unwrap();
        conn.execute(
            r#"
            INSERT INTO treatments (id, patient_id, treatment_type, treatment_date)
            VALUES ('t1', 'p1', 'arm', '2024-01-01')
            "#,
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM patients WHERE id = 'p1'", []).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM treatments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
