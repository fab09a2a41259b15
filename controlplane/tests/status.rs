mod common;

use common::*;
use controlplane::{status::*, traits::HasConditions, *};

fn web() -> Ingress {
    ingress("web", IngressSpec::default())
}

#[test]
fn test_resolved_condition() {
    let ing = web();
    let cond = get_resolved_condition(&ing, &[]);

    assert_eq!(cond.type_, "Resolved");
    assert_eq!(cond.status, "True");
    assert_eq!(cond.reason, "Resolved");
    assert_eq!(cond.observed_generation, Some(3));
}

#[test]
fn test_resolved_condition_lists_unresolved_rules() {
    let ing = web();
    let errors = vec![
        Error::MissingServiceError {
            rule: "b.example.com/".to_string(),
            service: "default/svc-b".to_string(),
        },
        Error::MissingServiceError {
            rule: "d.example.com/".to_string(),
            service: "default/svc-d".to_string(),
        },
    ];
    let cond = get_resolved_condition(&ing, &errors);

    assert_eq!(cond.status, "True");
    assert_eq!(cond.reason, "BackendNotFound");
    assert!(cond.message.contains("default/svc-b"));
    assert!(cond.message.contains("default/svc-d"));
}

#[test]
fn test_failed_condition() {
    let ing = web();
    let cond = get_failed_condition(&ing, &Error::DuplicateBackendError("http:a:_2f:svc:80".to_string()));

    assert_eq!(cond.status, "False");
    assert_eq!(cond.reason, "DuplicateBackend");
    assert!(cond.message.contains("http:a:_2f:svc:80"));
}

#[test]
fn test_set_condition_only_replaces_on_status_change() {
    let mut ing = web();
    let resolved = get_resolved_condition(&ing, &[]);
    set_condition(&mut ing, resolved.clone());
    assert_eq!(ing.get_conditions_mut().as_ref().unwrap().len(), 1);

    // same status: only the observed generation moves
    ing.metadata.generation = Some(4);
    let mut again = get_resolved_condition(&ing, &[]);
    again.message = "changed".to_string();
    set_condition(&mut ing, again);
    let conditions = ing.get_conditions_mut().as_ref().unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].observed_generation, Some(4));
    assert_eq!(conditions[0].message, resolved.message);

    let failed = get_failed_condition(&ing, &Error::InvalidConfigError("bad".to_string()));
    set_condition(&mut ing, failed);
    let conditions = ing.get_conditions_mut().as_ref().unwrap();
    assert_eq!(conditions.len(), 1);
    assert_eq!(conditions[0].status, "False");
    assert_eq!(conditions[0].reason, "InvalidConfiguration");
}
