//! Treatment database operations.

use chrono::NaiveDate;
use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::models::{NewTreatment, TreatmentRecord, TreatmentType};

const DATE_FORMAT: &str = "%Y-%m-%d";

impl Database {
    /// Store a treatment, assigning an ID and defaulting the date to `today`.
    pub fn insert_treatment(
        &self,
        treatment: NewTreatment,
        today: NaiveDate,
    ) -> DbResult<TreatmentRecord> {
        let record = treatment.into_record(today);
        self.conn.execute(
            r#"
            INSERT INTO treatments (id, patient_id, treatment_type, treatment_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                record.id,
                record.patient_id,
                record.treatment_type.label(),
                record.treatment_date.format(DATE_FORMAT).to_string(),
            ],
        )?;
        Ok(record)
    }

    /// List a patient's treatments, newest first.
    pub fn list_treatments_for_patient(&self, patient_id: &str) -> DbResult<Vec<TreatmentRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, treatment_type, treatment_date
            FROM treatments
            WHERE patient_id = ?
            ORDER BY treatment_date DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([patient_id], treatment_row)?;

        let mut treatments = Vec::new();
        for row in rows {
            treatments.push(row?.try_into()?);
        }
        Ok(treatments)
    }

    /// List every treatment in the clinic, newest first.
    pub fn list_all_treatments(&self) -> DbResult<Vec<TreatmentRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, patient_id, treatment_type, treatment_date
            FROM treatments
            ORDER BY treatment_date DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map([], treatment_row)?;

        let mut treatments = Vec::new();
        for row in rows {
            treatments.push(row?.try_into()?);
        }
        Ok(treatments)
    }

    /// Delete a treatment. Returns false when no such treatment exists.
    pub fn delete_treatment(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM treatments WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct TreatmentRow {
    id: String,
    patient_id: String,
    treatment_type: String,
    treatment_date: String,
}

fn treatment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TreatmentRow> {
    Ok(TreatmentRow {
        id: row.get(0)?,
        patient_id: row.get(1)?,
        treatment_type: row.get(2)?,
        treatment_date: row.get(3)?,
    })
}

impl TryFrom<TreatmentRow> for TreatmentRecord {
    type Error = DbError;

    fn try_from(row: TreatmentRow) -> Result<Self, Self::Error> {
        // Rows written by older clients may carry a time component.
        let date_part = row
            .treatment_date
            .get(..10)
            .unwrap_or(row.treatment_date.as_str());
        let treatment_date = NaiveDate::parse_from_str(date_part, DATE_FORMAT).map_err(|e| {
            DbError::Constraint(format!(
                "Invalid treatment date '{}' on {}: {}",
                row.treatment_date, row.id, e
            ))
        })?;

        Ok(TreatmentRecord {
            id: row.id,
            patient_id: row.patient_id,
            treatment_type: TreatmentType::parse(&row.treatment_type),
            treatment_date,
        })
    }
}
