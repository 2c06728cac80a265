//! Profile domain: scoped versus full enforcement.

use pretty_assertions::assert_eq;
use ward_tests::prelude::*;

fn wrap_ann(country: &str, strategy: Collect<String>) -> DomainRef {
    init_tracing();
    DomainFactory::new(profile_registry())
        .wrap(&ann(country), profile_contract(), strategy)
        .unwrap()
}

mod scoped {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mismatched_phone_number_reports_only_touched_rules() {
        // GIVEN
        let violations = Collect::new();
        let profile = wrap_ann("1", violations.clone());
        profile
            .with_writable(|p| p.set_path("address.street", Value::Null))
            .unwrap();
        assert_eq!(violations.take(), vec![STREET_NULL]);

        // WHEN
        profile
            .with_writable(|p| p.set("phoneNumber", phone_number("44", "555-0100")))
            .unwrap();

        // THEN
        assert_eq!(violations.take(), vec![CODE_MISMATCH]);
        assert_eq!(profile.text("phoneNumber.code"), Some("44".to_string()));
    }

    #[test]
    fn test_matching_phone_number_is_clean() {
        let violations = Collect::new();
        let profile = wrap_ann("44", violations.clone());

        profile
            .with_writable(|p| p.set("phoneNumber", phone_number("44", "555-0100")))
            .unwrap();

        assert!(violations.is_empty());
    }

    #[test]
    fn test_country_change_triggers_cross_field_rule() {
        // GIVEN
        let violations = Collect::new();
        let profile = wrap_ann("44", violations.clone());
        profile
            .with_writable(|p| p.set("phoneNumber", phone_number("44", "555-0100")))
            .unwrap();

        // WHEN
        profile
            .with_writable(|p| p.set_path("address.country", "33"))
            .unwrap();

        // THEN
        assert_eq!(violations.take(), vec![CODE_MISMATCH]);
    }

    #[test]
    fn test_valid_street_change_reports_nothing() {
        let violations = Collect::new();
        let profile = wrap_ann("1", violations.clone());

        profile
            .with_writable(|p| p.set_path("address.street", "High Street"))
            .unwrap();

        assert!(violations.is_empty());
    }

    #[test]
    fn test_fail_fast_surfaces_the_mismatch() {
        // GIVEN
        let profile = DomainFactory::new(profile_registry())
            .wrap(&ann("1"), profile_contract(), FailFast)
            .unwrap();

        // WHEN
        let result = profile.with_writable(|p| p.set("phoneNumber", phone_number("44", "555-0100")));

        // THEN
        assert_eq!(
            result,
            Err(DomainError::Contract(ContractError::validation_failed(CODE_MISMATCH)))
        );
        // No rollback: the assignment stays.
        assert_eq!(profile.text("phoneNumber.number"), Some("555-0100".to_string()));
    }
}

mod full {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_enforcement_reports_every_failure_in_order() {
        // GIVEN
        let violations = Collect::new();
        let profile = wrap_ann("1", violations.clone());
        profile
            .with_writable(|p| p.set("phoneNumber", phone_number("44", "555-0100")))
            .unwrap();
        violations.take();

        // WHEN
        let report = profile.validate().unwrap();

        // THEN
        assert_eq!(violations.take(), vec![LAST_NAME_NULL, CODE_MISMATCH]);
        assert_eq!(report, EnforcementReport { checks_run: 5, failures: 2 });
    }

    #[test]
    fn test_full_enforcement_on_fresh_profile() {
        let violations = Collect::new();
        let profile = wrap_ann("1", violations.clone());

        profile.validate().unwrap();

        assert_eq!(
            violations.take(),
            vec![LAST_NAME_NULL, PHONE_NUMBER_NULL, CODE_MISMATCH]
        );
    }

    #[test]
    fn test_validate_from_nested_node_checks_the_root() {
        let violations = Collect::new();
        let profile = wrap_ann("1", violations.clone());
        let address = profile.node("address").unwrap().unwrap();

        address.validate().unwrap();

        assert_eq!(violations.len(), 3);
    }
}
