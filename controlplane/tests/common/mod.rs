#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use controlplane::*;
use k8s_openapi::api::core::v1::{EndpointAddress, EndpointPort, EndpointSubset, Endpoints};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

pub const NAMESPACE: &str = "default";

// Serves Endpoints from memory, keyed by namespace/name.
#[derive(Clone, Default)]
pub struct StaticEndpoints {
    endpoints: HashMap<String, Endpoints>,
    pub fail_with: Option<String>,
}

impl StaticEndpoints {
    pub fn with_service(mut self, name: &str, ips: &[&str], ports: &[(Option<&str>, i32)]) -> Self {
        let subset = EndpointSubset {
            addresses: Some(
                ips.iter()
                    .map(|ip| EndpointAddress {
                        ip: ip.to_string(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            not_ready_addresses: None,
            ports: Some(
                ports
                    .iter()
                    .map(|(port_name, port)| EndpointPort {
                        name: port_name.map(str::to_string),
                        port: *port,
                        ..Default::default()
                    })
                    .collect(),
            ),
        };
        self.endpoints.insert(
            format!("{NAMESPACE}/{name}"),
            Endpoints {
                subsets: Some(vec![subset]),
                ..Default::default()
            },
        );
        self
    }
}

impl EndpointLister for StaticEndpoints {
    async fn get_endpoints(&self, key: &NamespacedName) -> Result<Option<Endpoints>> {
        if let Some(msg) = &self.fail_with {
            return Err(Error::InvalidConfigError(msg.clone()));
        }
        Ok(self.endpoints.get(&key.to_string()).cloned())
    }
}

pub fn backend(service: &str, port: i32) -> IngressBackend {
    IngressBackend {
        service_name: service.to_string(),
        service_port: IntOrString::Int(port),
        ..Default::default()
    }
}

pub fn http_rule(host: &str, paths: &[(&str, IngressBackend)]) -> IngressRule {
    IngressRule {
        host: host.to_string(),
        http: Some(HTTPIngressRuleValue {
            paths: paths
                .iter()
                .map(|(path, backend)| HTTPIngressPath {
                    path: path.to_string(),
                    backend: backend.clone(),
                })
                .collect(),
        }),
        tcp: vec![],
    }
}

pub fn ingress(name: &str, spec: IngressSpec) -> Ingress {
    let mut ingress = Ingress::new(name, spec);
    ingress.metadata.namespace = Some(NAMESPACE.to_string());
    ingress.metadata.generation = Some(3);
    ingress
}

pub fn annotated(mut ingress: Ingress, annotations: &[(&str, &str)]) -> Ingress {
    ingress.metadata.annotations = Some(
        annotations
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    );
    ingress
}
