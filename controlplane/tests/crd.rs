use controlplane::*;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

#[test]
fn test_backend_defaults() {
    let backend = IngressBackend::default();
    assert_eq!(backend.service_name, "");
    assert_eq!(backend.service_port, IntOrString::Int(0));
    assert!(backend.rewrite_rule.is_empty());
    assert!(backend.header_rule.is_empty());
}

#[test]
fn test_backend_without_rules_deserializes() {
    let backend: IngressBackend = serde_yaml::from_str("serviceName: web\nservicePort: 80\n").unwrap();
    assert_eq!(backend.service_name, "web");
    assert_eq!(backend.service_port, IntOrString::Int(80));
    assert!(backend.rewrite_rule.is_empty());
    assert!(backend.header_rule.is_empty());

    let named: IngressBackend =
        serde_yaml::from_str("serviceName: web\nservicePort: http\nrewriteRule: [\"a\"]\n").unwrap();
    assert_eq!(named.service_port, IntOrString::String("http".to_string()));
    assert_eq!(named.rewrite_rule, vec!["a".to_string()]);
}
