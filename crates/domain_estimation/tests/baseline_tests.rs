//! Tests for the baseline entity

use chrono::NaiveDate;
use uuid::Uuid;

use core_kernel::UserId;
use domain_estimation::{Baseline, BaselineChanges, BaselineRecord, NewBaseline};

fn new_baseline() -> NewBaseline {
    NewBaseline {
        code: "PRJ-001".to_string(),
        review: 1,
        title: "Data platform".to_string(),
        description: "Migration to the new data platform".to_string(),
        start_year: 2022,
        start_month: 1,
        duration: 24,
        manager_id: UserId::new(),
        estimator_id: UserId::new(),
    }
}

fn assert_validation(result: Result<Baseline, domain_estimation::EstimationError>, message: &str) {
    let err = result.unwrap_err();
    assert!(err.is_validation(), "expected validation error, got {err:?}");
    assert!(err.to_string().contains(message), "{err} does not contain {message}");
}

// ============================================================================
// Creation
// ============================================================================

mod baseline_creation_tests {
    use super::*;

    #[test]
    fn test_create_valid_baseline() {
        let baseline = Baseline::new(new_baseline()).unwrap();

        assert!(!baseline.id().is_nil());
        assert_eq!(baseline.code(), "PRJ-001");
        assert_eq!(baseline.review(), 1);
        assert_eq!(baseline.start_date(), NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(baseline.duration(), 24);
        assert!(baseline.updated_at().is_none());
    }

    #[test]
    fn test_code_is_required() {
        let mut input = new_baseline();
        input.code = "  ".to_string();
        assert_validation(Baseline::new(input), "code is required");
    }

    #[test]
    fn test_code_length_is_limited() {
        let mut input = new_baseline();
        input.code = "X".repeat(21);
        assert_validation(Baseline::new(input), "at most 20 characters");
    }

    #[test]
    fn test_review_must_be_positive() {
        let mut input = new_baseline();
        input.review = 0;
        assert_validation(Baseline::new(input), "invalid review 0");
    }

    #[test]
    fn test_title_is_required() {
        let mut input = new_baseline();
        input.title = String::new();
        assert_validation(Baseline::new(input), "title is required");
    }

    #[test]
    fn test_duration_bounds() {
        for duration in [0, 61, -3] {
            let mut input = new_baseline();
            input.duration = duration;
            assert_validation(Baseline::new(input), "duration");
        }

        let mut input = new_baseline();
        input.duration = 60;
        assert!(Baseline::new(input).is_ok());
    }

    #[test]
    fn test_invalid_start_month() {
        let mut input = new_baseline();
        input.start_month = 13;
        assert!(Baseline::new(input).unwrap_err().is_validation());
    }

    #[test]
    fn test_manager_and_estimator_are_required() {
        let mut input = new_baseline();
        input.manager_id = UserId::from_uuid(Uuid::nil());
        assert_validation(Baseline::new(input), "manager is required");

        let mut input = new_baseline();
        input.estimator_id = UserId::from_uuid(Uuid::nil());
        assert_validation(Baseline::new(input), "estimator is required");
    }

    #[test]
    fn test_validation_message_names_entity() {
        let mut input = new_baseline();
        input.review = -1;
        let err = Baseline::new(input).unwrap_err();
        assert_eq!(err.to_string(), "baseline domain validation failed: invalid review -1");
    }
}

// ============================================================================
// Restore and update
// ============================================================================

mod baseline_lifecycle_tests {
    use super::*;

    #[test]
    fn test_restore_rejects_mid_month_start() {
        let baseline = Baseline::new(new_baseline()).unwrap();
        let record = BaselineRecord {
            id: baseline.id(),
            code: baseline.code().to_string(),
            review: baseline.review(),
            title: baseline.title().to_string(),
            description: baseline.description().to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
            duration: baseline.duration(),
            manager_id: baseline.manager_id(),
            estimator_id: baseline.estimator_id(),
            created_at: baseline.created_at(),
            updated_at: None,
        };

        assert!(Baseline::restore(record).unwrap_err().is_validation());
    }

    #[test]
    fn test_update_patches_start_month_only() {
        let mut baseline = Baseline::new(new_baseline()).unwrap();

        baseline
            .update(BaselineChanges {
                start_month: Some(7),
                title: Some("Data platform v2".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(baseline.start_date(), NaiveDate::from_ymd_opt(2022, 7, 1).unwrap());
        assert_eq!(baseline.title(), "Data platform v2");
        assert!(baseline.updated_at().is_some());
    }

    #[test]
    fn test_failed_update_leaves_baseline_unchanged() {
        let mut baseline = Baseline::new(new_baseline()).unwrap();
        let before = baseline.clone();

        let result = baseline.update(BaselineChanges {
            title: Some("Renamed".to_string()),
            duration: Some(0),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(baseline, before);
    }
}
