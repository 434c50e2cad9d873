//! Tests for the foreign-language API surface.

use hair_count_core::{
    known_treatment_types, open_database_in_memory, open_key_value_snapshot,
    open_key_value_store, FfiNewTreatment, FfiPatientInput, HairCountCore, HairCountError,
};
use std::sync::Arc;

fn input(name: &str) -> FfiPatientInput {
    FfiPatientInput {
        name: name.to_string(),
        phone: None,
        email: None,
        notes: None,
    }
}

fn treatment(patient_id: &str, treatment_type: &str, date: &str) -> FfiNewTreatment {
    FfiNewTreatment {
        patient_id: patient_id.to_string(),
        treatment_type: treatment_type.to_string(),
        treatment_date: Some(date.to_string()),
    }
}

fn cores() -> Vec<(&'static str, Arc<HairCountCore>)> {
    vec![
        ("sqlite", open_database_in_memory().unwrap()),
        ("key-value", open_key_value_store()),
    ]
}

#[test]
fn test_summary_progress_across_ffi() {
    for (name, core) in cores() {
        let patient = core.register_patient(input("Hanako Yamada")).unwrap();

        for day in 1..=5 {
            core.record_treatment(treatment(
                &patient.id,
                "full-body (face, nape, VIO included)",
                &format!("2024-01-{:02}", day),
            ))
            .unwrap();
        }
        core.record_treatment(treatment(&patient.id, "nape", "2024-01-20"))
            .unwrap();

        let summary = core.treatment_summary(patient.id.clone()).unwrap();
        assert_eq!(summary.full_body.key, "full_body", "{}", name);
        assert_eq!(summary.full_body.count, 5, "{}", name);
        assert_eq!(summary.full_body.remaining_sessions, 1, "{}", name);
        assert_eq!(summary.full_body.status, "standard price", "{}", name);
        assert_eq!(summary.facial.combined_count, Some(5), "{}", name);
        assert_eq!(summary.facial.remaining_sessions, 6, "{}", name);
        assert_eq!(summary.beard.combined_count, None, "{}", name);

        let history = core.treatment_history(patient.id.clone()).unwrap();
        assert_eq!(history.len(), 6, "{}", name);
        assert_eq!(history[0].treatment_date, "2024-01-20", "{}", name);
        assert_eq!(history[0].treatment_type, "nape", "{}", name);
    }
}

#[test]
fn test_legacy_label_counts() {
    let core = open_database_in_memory().unwrap();
    let patient = core.register_patient(input("Taro Suzuki")).unwrap();

    for month in 1..=11 {
        core.record_treatment(treatment(
            &patient.id,
            "男性ひげ脱毛",
            &format!("2024-{:02}-01", month),
        ))
        .unwrap();
    }

    let summary = core.treatment_summary(patient.id.clone()).unwrap();
    assert!(summary.beard.discount_applied);
    assert_eq!(summary.beard.status, "half-price applied");

    let history = core.treatment_history(patient.id).unwrap();
    assert_eq!(history[0].treatment_type, "male beard");
}

#[test]
fn test_errors_map_to_ffi_variants() {
    let core = open_key_value_store();

    assert!(matches!(
        core.register_patient(input("  ")),
        Err(HairCountError::InvalidInput(_))
    ));

    assert!(matches!(
        core.record_treatment(treatment("ghost", "arm", "2024-01-01")),
        Err(HairCountError::NotFound(_))
    ));

    let patient = core.register_patient(input("Yumi Sato")).unwrap();
    assert!(matches!(
        core.record_treatment(treatment(&patient.id, "arm", "2024/01/01")),
        Err(HairCountError::InvalidInput(_))
    ));
    assert!(matches!(
        core.record_treatment(treatment(&patient.id, "arm", "2999-01-01")),
        Err(HairCountError::InvalidInput(_))
    ));
    assert!(matches!(
        core.record_treatment(treatment(&patient.id, " ", "2024-01-01")),
        Err(HairCountError::InvalidInput(_))
    ));
}

#[test]
fn test_blank_date_means_today() {
    let core = open_database_in_memory().unwrap();
    let patient = core.register_patient(input("Yumi Sato")).unwrap();

    let record = core
        .record_treatment(FfiNewTreatment {
            patient_id: patient.id.clone(),
            treatment_type: "arm".to_string(),
            treatment_date: Some(String::new()),
        })
        .unwrap();

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    assert_eq!(record.treatment_date.len(), 10);
    assert!(record.treatment_date <= today);
}

#[test]
fn test_seed_overview_and_reports() {
    let core = open_database_in_memory().unwrap();
    assert_eq!(core.seed_sample_data().unwrap(), 3);

    let overview = core.overview(None).unwrap();
    assert_eq!(overview.patient_count, 3);
    assert_eq!(overview.treatment_count, 23);
    assert_eq!(overview.recent_treatments.len(), 5);
    assert_eq!(overview.recent_treatments[0].patient_name, "Yumi Sato");
    assert_eq!(overview.treatments_by_type[0].treatment_type, "female facial");
    assert_eq!(overview.treatments_by_type[0].count, 13);

    let csv = core.export_discount_report_csv().unwrap();
    assert_eq!(csv.lines().count(), 10);

    let json = core.export_discount_report_json().unwrap();
    let report: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(report["discounted_count"], 1);
}

#[test]
fn test_patient_updates_and_search() {
    let core = open_key_value_store();
    let patient = core.register_patient(input("Hanako")).unwrap();

    let mut update = input("Hanako Yamada");
    update.email = Some("hanako@example.com".to_string());
    assert!(core.update_patient(patient.id.clone(), update).unwrap());
    assert!(!core.update_patient("missing".to_string(), input("X")).unwrap());

    let found = core.search_patients("EXAMPLE.com".to_string()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Hanako Yamada");
    assert_eq!(core.list_patients().unwrap().len(), 1);
    assert!(core.get_patient("missing".to_string()).unwrap().is_none());
}

#[test]
fn test_key_value_snapshot_restores_clinic() {
    let core = open_key_value_store();
    let patient = core.register_patient(input("Hanako Yamada")).unwrap();
    for month in 1..=6 {
        core.record_treatment(treatment(
            &patient.id,
            "full-body (face, nape, VIO included)",
            &format!("2024-{:02}-15", month),
        ))
        .unwrap();
    }

    let snapshot = core.to_snapshot().unwrap().expect("key-value core has a snapshot");
    drop(core);

    let restored = open_key_value_snapshot(snapshot).unwrap();
    let summary = restored.treatment_summary(patient.id.clone()).unwrap();
    assert_eq!(summary.full_body.count, 6);
    assert!(summary.full_body.discount_applied);
    assert_eq!(restored.list_patients().unwrap()[0].name, "Hanako Yamada");

    assert!(matches!(
        open_key_value_snapshot("not a snapshot".to_string()),
        Err(HairCountError::SerializationError(_))
    ));
}

#[test]
fn test_database_core_has_no_snapshot() {
    let core = open_database_in_memory().unwrap();
    core.register_patient(input("Taro Suzuki")).unwrap();
    assert!(core.to_snapshot().unwrap().is_none());
}

#[test]
fn test_patient_detail() {
    for (name, core) in cores() {
        let patient = core.register_patient(input("Taro Suzuki")).unwrap();
        core.record_treatment(treatment(&patient.id, "male beard", "2024-02-25"))
            .unwrap();
        core.record_treatment(treatment(&patient.id, "male beard", "2024-03-25"))
            .unwrap();

        let detail = core.patient_detail(patient.id.clone()).unwrap().unwrap();
        assert_eq!(detail.patient.name, "Taro Suzuki", "{}", name);
        assert_eq!(detail.history.len(), 2, "{}", name);
        assert_eq!(detail.history[0].treatment_date, "2024-03-25", "{}", name);
        assert_eq!(detail.summary.beard.count, 2, "{}", name);
        assert_eq!(detail.summary.beard.remaining_sessions, 9, "{}", name);

        assert!(core.patient_detail("missing".to_string()).unwrap().is_none(), "{}", name);
    }
}

#[test]
fn test_known_treatment_types() {
    let types = known_treatment_types();
    assert_eq!(types.len(), 7);
    assert!(types.contains(&"male beard".to_string()));
    assert!(types.contains(&"VIO".to_string()));
}
