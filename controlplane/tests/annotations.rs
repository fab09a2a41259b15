use std::collections::BTreeMap;

use controlplane::{consts::*, Annotations, Error, LoadBalancerType};
use kube::core::ObjectMeta;

fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults_without_annotations() {
    let meta = ObjectMeta::default();
    let annotations = Annotations::of(&meta);

    assert!(!annotations.sticky_session());
    assert!(!annotations.stats());
    assert_eq!(annotations.stats_user(), "");
    assert_eq!(annotations.stats_password(), "");
    assert_eq!(annotations.lb_name(), "");
    assert_eq!(annotations.lb_type(), "LoadBalancer");
    assert_eq!(annotations.daemon_hostname(), "");
    assert_eq!(annotations.load_balancer_ip(), "");
    assert!(!annotations.load_balancer_persist());
    assert_eq!(
        annotations.load_balancer_type().unwrap(),
        LoadBalancerType::LoadBalancer
    );
}

#[test]
fn test_presence_enables_sticky_session_and_stats() {
    let map = annotations(&[(STICKY_SESSION, "false"), (STATS_ON, "")]);
    let annotations = Annotations::from(&map);

    assert!(annotations.sticky_session());
    assert!(annotations.stats());
}

#[test]
fn test_values_are_passed_through() {
    let map = annotations(&[
        (STATS_USER, "admin"),
        (STATS_PASSWORD, "s3cr3t"),
        (LB_NAME, "edge"),
        (DAEMON_HOSTNAME, "master0"),
        (LOAD_BALANCER_IP, "10.0.0.10"),
        ("ingress.appscode.com/unknown", "ignored"),
    ]);
    let annotations = Annotations::from(&map);

    assert_eq!(annotations.stats_user(), "admin");
    assert_eq!(annotations.stats_password(), "s3cr3t");
    assert_eq!(annotations.lb_name(), "edge");
    assert_eq!(annotations.daemon_hostname(), "master0");
    assert_eq!(annotations.load_balancer_ip(), "10.0.0.10");
}

#[test]
fn test_load_balancer_persist_requires_true() {
    for value in ["true", "True", "TRUE"] {
        let map = annotations(&[(LOAD_BALANCER_PERSIST, value)]);
        assert!(
            Annotations::from(&map).load_balancer_persist(),
            "{value} should enable persistence"
        );
    }
    for value in ["yes", "1", "", "on", " true"] {
        let map = annotations(&[(LOAD_BALANCER_PERSIST, value)]);
        assert!(
            !Annotations::from(&map).load_balancer_persist(),
            "{value} should not enable persistence"
        );
    }
}

#[test]
fn test_lb_type_is_returned_verbatim() {
    let daemon = annotations(&[(LB_TYPE, "Daemon")]);
    let parsed = Annotations::from(&daemon);
    assert_eq!(parsed.lb_type(), "Daemon");
    assert_eq!(parsed.load_balancer_type().unwrap(), LoadBalancerType::Daemon);

    let lowercase = annotations(&[(LB_TYPE, "daemon")]);
    let parsed = Annotations::from(&lowercase);
    assert_eq!(parsed.lb_type(), "daemon");
    assert!(matches!(
        parsed.load_balancer_type(),
        Err(Error::InvalidConfigError(_))
    ));
}
