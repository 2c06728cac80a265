//! Nested domains: paths are rooted at the outermost object.

use pretty_assertions::assert_eq;
use ward_tests::prelude::*;

fn wrap_nested() -> DomainRef {
    init_tracing();
    DomainFactory::new(Registry::empty())
        .wrap_default(&nested("before"))
        .unwrap()
}

#[test]
fn test_leaf_mutation_records_full_path() {
    // GIVEN
    let root = wrap_nested();
    let inner = root.get_path("outerDomain.innerDomain").unwrap().into_node().unwrap();

    // WHEN
    let touched = root
        .with_writable(|_| {
            inner.set("value", "after")?;
            Ok::<_, DomainError>(root.touched_paths())
        })
        .unwrap();

    // THEN
    assert_eq!(touched, vec![FieldPath::parse("outerDomain.innerDomain.value")]);
    assert_eq!(root.text("outerDomain.innerDomain.value"), Some("after".to_string()));
}

#[test]
fn test_nested_nodes_know_their_paths() {
    let root = wrap_nested();

    let outer = root.node("outerDomain").unwrap().unwrap();
    let inner = outer.node("innerDomain").unwrap().unwrap();

    assert_eq!(outer.path().to_string(), "outerDomain");
    assert_eq!(inner.path().to_string(), "outerDomain.innerDomain");
    assert_eq!(inner.root(), root);
}

#[test]
fn test_rule_on_leaf_runs_when_leaf_touched() {
    // GIVEN
    let contract: Contract<DomainRef, String> = Contract::builder()
        .rule("outerDomain.innerDomain.value", |root: &DomainRef| {
            let value = root.text("outerDomain.innerDomain.value")?;
            (value.len() > 5).then(|| format!("{} is too long", value))
        })
        .build();
    let violations = Collect::new();
    let root = DomainFactory::new(Registry::empty())
        .wrap(&nested("short"), contract, violations.clone())
        .unwrap();

    // WHEN
    let replacement = object!("Outer", {
        "outerValue" => "replaced",
        "innerDomain" => object!("Inner", { "value" => "unused" }),
    });
    root.with_writable(|r| r.set("outerDomain", &replacement))
        .unwrap();
    root.with_writable(|r| r.set_path("outerDomain.innerDomain.value", "much too long"))
        .unwrap();

    // THEN
    assert_eq!(violations.take(), vec!["unused is too long", "much too long is too long"]);
}

#[test]
fn test_outer_sibling_does_not_trigger_leaf_rule() {
    let contract: Contract<DomainRef, String> = Contract::builder()
        .rule("outerDomain.innerDomain.value", |_: &DomainRef| Some("fired".to_string()))
        .build();
    let violations = Collect::new();
    let root = DomainFactory::new(Registry::empty())
        .wrap(&nested("v"), contract, violations.clone())
        .unwrap();

    root.with_writable(|r| r.set_path("outerDomain.outerValue", "changed"))
        .unwrap();

    assert!(violations.is_empty());
}
