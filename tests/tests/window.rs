//! Writable window lifecycle.

use std::panic::{self, AssertUnwindSafe};

use pretty_assertions::assert_eq;
use ward_tests::prelude::*;

fn profile_with(config: FactoryConfig, violations: Collect<String>) -> DomainRef {
    init_tracing();
    DomainFactory::with_config(profile_registry(), config)
        .wrap(&ann("1"), profile_contract(), violations)
        .unwrap()
}

mod read_only {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mutation_outside_window_leaves_value_unchanged() {
        // GIVEN
        let profile = profile_with(FactoryConfig::default(), Collect::new());
        let address = profile.node("address").unwrap().unwrap();

        // WHEN
        let top = profile.set("firstName", "Bob");
        let nested = address.set("country", "44");

        // THEN
        assert_eq!(top.unwrap_err().read_only_path(), Some(&FieldPath::parse("firstName")));
        assert_eq!(nested, Err(DomainError::read_only("address.country")));
        assert_eq!(profile.text("firstName"), Some("Ann".to_string()));
        assert_eq!(profile.text("address.country"), Some("1".to_string()));
    }

    #[test]
    fn test_handles_escaping_the_window_are_read_only_again() {
        let profile = profile_with(FactoryConfig::default(), Collect::new());

        let escaped = profile
            .with_writable(|p| Ok::<_, DomainError>(p.node("address")?))
            .unwrap()
            .unwrap();

        assert!(escaped.set("street", "Elsewhere").unwrap_err().is_read_only());
        assert!(!escaped.is_writable());
    }

    #[test]
    fn test_new_nested_instance_is_intercepted_later() {
        // GIVEN
        let profile = profile_with(FactoryConfig::default(), Collect::new());
        let fresh = address("Harbour Road", "44");

        // WHEN
        profile.with_writable(|p| p.set("address", &fresh)).unwrap();
        let wrapped = profile.node("address").unwrap().unwrap();

        // THEN
        assert_eq!(wrapped.path(), FieldPath::parse("address"));
        assert!(wrapped.set("street", "Other").unwrap_err().is_read_only());
        assert_eq!(fresh.borrow().get_field("street"), Some(&Value::from("Harbour Road")));
    }
}

mod touched {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn field() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["firstName", "lastName", "address.street", "address.country"])
    }

    proptest! {
        #[test]
        fn each_touched_path_is_recorded_once(fields in prop::collection::vec(field(), 1..20)) {
            let profile = profile_with(FactoryConfig::default(), Collect::new());

            let touched = profile
                .with_writable(|p| {
                    for field in &fields {
                        p.set_path(*field, "x")?;
                    }
                    Ok::<_, DomainError>(p.touched_paths())
                })
                .unwrap();

            let mut expected: Vec<FieldPath> = Vec::new();
            for field in &fields {
                let path = FieldPath::parse(field);
                if !expected.contains(&path) {
                    expected.push(path);
                }
            }
            prop_assert_eq!(touched, expected);
            prop_assert!(profile.touched_paths().is_empty());
        }
    }
}

mod failure {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    enum AppError {
        Domain(DomainError),
        Rejected(&'static str),
    }

    impl From<DomainError> for AppError {
        fn from(error: DomainError) -> Self {
            AppError::Domain(error)
        }
    }

    #[test]
    fn test_mutator_error_wins_but_enforcement_still_runs() {
        // GIVEN
        let violations = Collect::new();
        let profile = profile_with(FactoryConfig::default(), violations.clone());

        // WHEN
        let result: Result<(), AppError> = profile.with_writable(|p| {
            p.set("phoneNumber", phone_number("44", "555-0100"))?;
            Err(AppError::Rejected("changed my mind"))
        });

        // THEN
        assert_eq!(result, Err(AppError::Rejected("changed my mind")));
        assert_eq!(violations.take(), vec![CODE_MISMATCH]);
        assert!(!profile.is_writable());
        assert!(profile.touched_paths().is_empty());
        // Partial mutations are not rolled back.
        assert!(!profile.is_null("phoneNumber"));
    }

    #[test]
    fn test_enforcement_skipped_on_failure_when_disabled() {
        let violations = Collect::new();
        let config = FactoryConfig::default().with_validate_on_failure(false);
        let profile = profile_with(config, violations.clone());

        let result: Result<(), AppError> = profile.with_writable(|p| {
            p.set("phoneNumber", phone_number("44", "555-0100"))?;
            Err(AppError::Rejected("stop"))
        });

        assert!(result.is_err());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_panic_closes_window_and_resumes() {
        // GIVEN
        let violations = Collect::new();
        let profile = profile_with(FactoryConfig::default(), violations.clone());

        // WHEN
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            profile.with_writable(|p| -> DomainResult<()> {
                p.set("phoneNumber", phone_number("44", "555-0100"))?;
                panic!("mutator blew up");
            })
        }));

        // THEN
        assert!(outcome.is_err());
        assert_eq!(violations.take(), vec![CODE_MISMATCH]);
        assert_eq!(profile.window_state(), WindowState::Closed);
        assert!(profile.touched_paths().is_empty());
        assert!(profile.set("firstName", "Bob").unwrap_err().is_read_only());
    }

    #[test]
    fn test_window_usable_after_failure() {
        let profile = profile_with(FactoryConfig::default(), Collect::new());
        let _ = profile.with_writable(|_| Err::<(), _>(AppError::Rejected("first")));

        let result = profile.with_writable(|p| p.set("lastName", "Smith"));

        assert_eq!(result, Ok(()));
        assert_eq!(profile.text("lastName"), Some("Smith".to_string()));
    }
}

mod reentrancy {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nested_window_rejected_by_default() {
        let profile = profile_with(FactoryConfig::default(), Collect::new());
        let address = profile.node("address").unwrap().unwrap();

        let result = profile.with_writable(|_| address.with_writable(|a| a.set("street", "x")));

        assert_eq!(result, Err(DomainError::WindowAlreadyOpen));
        assert_eq!(profile.text("address.street"), Some("Main Street".to_string()));
    }

    #[test]
    fn test_nested_window_merges_into_outer() {
        // GIVEN
        let violations = Collect::new();
        let profile = profile_with(FactoryConfig::merging(), violations.clone());
        let address = profile.node("address").unwrap().unwrap();

        // WHEN
        let touched = profile
            .with_writable(|p| {
                address.with_writable(|a| a.set("country", "44"))?;
                assert!(p.is_writable());
                p.set("phoneNumber", phone_number("44", "555-0100"))?;
                Ok::<_, DomainError>(p.touched_paths())
            })
            .unwrap();

        // THEN
        assert_eq!(
            touched,
            vec![FieldPath::parse("address.country"), FieldPath::parse("phoneNumber")]
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_window_cannot_open_during_enforcement() {
        let contract: Contract<DomainRef, String> = Contract::builder()
            .rule("firstName", |root: &DomainRef| {
                root.with_writable(|r| r.set("lastName", "Sneaky"))
                    .err()
                    .map(|e| e.to_string())
            })
            .build();
        let violations = Collect::new();
        let profile = DomainFactory::new(profile_registry())
            .wrap(&ann("1"), contract, violations.clone())
            .unwrap();

        profile.with_writable(|p| p.set("firstName", "Bob")).unwrap();

        assert_eq!(
            violations.take(),
            vec![DomainError::EnforcementInProgress.to_string()]
        );
        assert!(profile.is_null("lastName"));
    }
}
