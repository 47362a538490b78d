//! Unit tests for the Identifiers module
//!
//! Tests cover creation, prefixes, parsing and conversion of the
//! estimation identifiers.

use core_kernel::{
    BaselineId, CostId, EffortId, PlanId, PortfolioId, BudgetId, WorkloadId,
    UserId, CompetenceId,
};
use uuid::Uuid;

mod creation {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(BaselineId::new(), BaselineId::new());
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = PortfolioId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = PortfolioId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(*PlanId::from_uuid(uuid).as_uuid(), uuid);
    }

    #[test]
    fn test_nil_id() {
        assert!(UserId::from_uuid(Uuid::nil()).is_nil());
    }
}

mod prefixes {
    use super::*;

    #[test]
    fn test_all_prefixes() {
        assert_eq!(BaselineId::prefix(), "BSL");
        assert_eq!(CostId::prefix(), "CST");
        assert_eq!(EffortId::prefix(), "EFF");
        assert_eq!(PlanId::prefix(), "PLN");
        assert_eq!(PortfolioId::prefix(), "PRT");
        assert_eq!(BudgetId::prefix(), "BDG");
        assert_eq!(WorkloadId::prefix(), "WKL");
        assert_eq!(UserId::prefix(), "USR");
        assert_eq!(CompetenceId::prefix(), "CMP");
    }

    #[test]
    fn test_display_format() {
        let uuid = Uuid::new_v4();
        let id = CostId::from_uuid(uuid);
        assert_eq!(id.to_string(), format!("CST-{}", uuid));
    }
}

mod parsing {
    use super::*;

    #[test]
    fn test_parse_with_prefix() {
        let id = EffortId::new();
        let parsed: EffortId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_bare_uuid() {
        let uuid = Uuid::new_v4();
        let parsed: BudgetId = uuid.to_string().parse().unwrap();
        assert_eq!(*parsed.as_uuid(), uuid);
    }

    #[test]
    fn test_parse_rejects_foreign_prefix() {
        let id = BaselineId::new();
        assert!(id.to_string().parse::<PlanId>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("not-a-uuid".parse::<WorkloadId>().is_err());
    }
}

mod serialization {
    use super::*;

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&CompetenceId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}
