/*
Copyright 2024 The Kubernetes Authors.

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::{collections::HashSet, future::Future};

use crate::*;

use chrono::Utc;
use futures::future::join_all;
use k8s_openapi::api::core::v1::{EndpointSubset, Endpoints};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::{Api, Client, ResourceExt};
use tracing::*;

/// Looks up the live Endpoints of a Service.
pub trait EndpointLister {
    /// Returns `None` when the Service has no Endpoints object.
    fn get_endpoints(
        &self,
        key: &NamespacedName,
    ) -> impl Future<Output = Result<Option<Endpoints>>>;
}

/// [`EndpointLister`] reading Endpoints straight from the API server.
#[derive(Clone)]
pub struct KubeEndpointLister {
    client: Client,
}

impl KubeEndpointLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl EndpointLister for KubeEndpointLister {
    async fn get_endpoints(&self, key: &NamespacedName) -> Result<Option<Endpoints>> {
        let endpoints_api: Api<Endpoints> = Api::namespaced(self.client.clone(), &key.namespace);
        endpoints_api
            .get_opt(&key.name)
            .await
            .map_err(Error::KubeError)
    }
}

/// Outcome of resolving an Ingress whose backend names are consistent.
#[derive(Debug)]
pub struct Resolution {
    pub parsed: HAProxyOptions,
    /// One error per rule left out of `parsed` because its Service does not exist.
    pub errors: Vec<Error>,
}

enum RouteKind<'a> {
    Default,
    Http { host: &'a str, path: &'a str, tls: bool },
    Tcp { host: &'a str, rule: &'a TCPIngressRuleValue },
}

// A single backend reference of the Ingress, in rule order.
struct Route<'a> {
    kind: RouteKind<'a>,
    rule: String,
    backend_name: String,
    backend: &'a IngressBackend,
}

// Resolves the provided Ingress into an HAProxy configuration.
//
// Backend names are checked before any lookup is made, a duplicate fails the whole resolution.
// Rules referencing a Service without Endpoints are skipped and reported in the returned errors,
// any other lookup failure is returned as is.
pub async fn resolve<L: EndpointLister>(ingress: &Ingress, lister: &L) -> Result<Resolution> {
    let namespace = ingress
        .namespace()
        .ok_or(Error::InvalidConfigError("invalid namespace".to_string()))?;
    let annotations = Annotations::of(&ingress.metadata);
    let spec = &ingress.spec;
    debug!("resolving ingress {}/{}", namespace, ingress.name_any());

    let routes = plan_routes(spec);
    check_backend_names(&routes)?;

    let lookups = routes.iter().map(|route| {
        let key = NamespacedName {
            name: route.backend.service_name.clone(),
            namespace: namespace.clone(),
        };
        async move {
            let endpoints = lister.get_endpoints(&key).await;
            (key, endpoints)
        }
    });
    let found = join_all(lookups).await;

    let mut parsed = HAProxyOptions {
        timestamp: Utc::now().timestamp_micros(),
        sticky: annotations.sticky_session(),
        has_tls: has_tls(spec),
        stats_enabled: annotations.stats(),
        stats_user: annotations.stats_user().to_string(),
        stats_password: annotations.stats_password().to_string(),
        ..Default::default()
    };
    let mut errors = vec![];

    for (route, (key, endpoints)) in routes.into_iter().zip(found) {
        let Some(endpoints) = endpoints? else {
            warn!(rule = %route.rule, service = %key, "referenced service not found");
            errors.push(Error::MissingServiceError {
                rule: route.rule,
                service: key.to_string(),
            });
            continue;
        };

        let backend = Backend {
            name: route.backend_name,
            rewrite_rules: route.backend.rewrite_rule.clone(),
            header_rules: route.backend.header_rule.clone(),
            endpoints: collect_endpoints(&endpoints, &route.backend.service_port),
        };
        if backend.endpoints.is_empty() {
            debug!(backend = %backend.name, "no ready endpoints");
        }

        match route.kind {
            RouteKind::Default => parsed.default_backend = Some(backend),
            RouteKind::Http { host, path, tls } => {
                let service = Service {
                    name: backend.name.clone(),
                    acl_match: acl_match(path),
                    host: host.to_string(),
                    backend,
                };
                if tls {
                    parsed.https_services.push(service);
                } else {
                    parsed.http_services.push(service);
                }
            }
            RouteKind::Tcp { host, rule } => {
                parsed.tcp_services.push(TCPService {
                    name: backend.name.clone(),
                    host: host.to_string(),
                    port: port_string(&rule.port),
                    secret_name: rule.secret_name.clone(),
                    pem_name: rule.secret_name.as_ref().map(|name| format!("{name}.pem")),
                    backend,
                });
            }
        }
    }

    info!(
        http = parsed.http_services.len(),
        https = parsed.https_services.len(),
        tcp = parsed.tcp_services.len(),
        unresolved = errors.len(),
        "resolved ingress {}/{}",
        namespace,
        ingress.name_any()
    );
    Ok(Resolution { parsed, errors })
}

fn plan_routes(spec: &IngressSpec) -> Vec<Route<'_>> {
    let tls_hosts: HashSet<&str> = spec
        .tls
        .iter()
        .filter(|tls| !tls.secret_name.is_empty())
        .flat_map(|tls| tls.hosts.iter().map(String::as_str))
        .collect();
    let mut routes = vec![];

    if let Some(backend) = &spec.backend {
        routes.push(Route {
            kind: RouteKind::Default,
            rule: "default backend".to_string(),
            backend_name: backend_name(
                "default",
                &[&backend.service_name, &port_string(&backend.service_port)],
            ),
            backend,
        });
    }

    for rule in &spec.rules {
        let host = rule.host.as_str();
        if let Some(http) = &rule.http {
            for path in &http.paths {
                routes.push(Route {
                    kind: RouteKind::Http {
                        host,
                        path: &path.path,
                        tls: tls_hosts.contains(host),
                    },
                    rule: format!(
                        "{}{}",
                        or_default(host, "*"),
                        or_default(&path.path, "/")
                    ),
                    backend_name: backend_name(
                        "http",
                        &[
                            host,
                            &path.path,
                            &path.backend.service_name,
                            &port_string(&path.backend.service_port),
                        ],
                    ),
                    backend: &path.backend,
                });
            }
        }

        for tcp in &rule.tcp {
            let port = port_string(&tcp.port);
            routes.push(Route {
                kind: RouteKind::Tcp { host, rule: tcp },
                rule: format!("{}:{}", or_default(host, "*"), port),
                backend_name: backend_name(
                    "tcp",
                    &[
                        &port,
                        &tcp.backend.service_name,
                        &port_string(&tcp.backend.service_port),
                    ],
                ),
                backend: &tcp.backend,
            });
        }
    }

    routes
}

fn check_backend_names(routes: &[Route<'_>]) -> Result<()> {
    let mut seen = HashSet::new();
    for route in routes {
        if !seen.insert(route.backend_name.as_str()) {
            error!(backend = %route.backend_name, rule = %route.rule, "duplicate backend");
            return Err(Error::DuplicateBackendError(route.backend_name.clone()));
        }
    }
    Ok(())
}

fn has_tls(spec: &IngressSpec) -> bool {
    spec.tls.iter().any(|tls| !tls.secret_name.is_empty())
        || spec
            .rules
            .iter()
            .flat_map(|rule| &rule.tcp)
            .any(|tcp| tcp.secret_name.is_some())
}

// Collects the ready addresses of every subset exposing the requested port.
fn collect_endpoints(endpoints: &Endpoints, service_port: &IntOrString) -> Vec<Endpoint> {
    let mut collected = vec![];
    for subset in endpoints.subsets.iter().flatten() {
        let Some(port) = select_port(subset, service_port) else {
            continue;
        };
        for address in subset.addresses.iter().flatten() {
            collected.push(Endpoint {
                name: format!("server-{}", collected.len()),
                ip: address.ip.clone(),
                port: port.to_string(),
            });
        }
    }
    collected
}

// A numeric port matches by number, or falls back to the only port of the subset. A named port
// matches by name.
fn select_port(subset: &EndpointSubset, service_port: &IntOrString) -> Option<i32> {
    let ports = subset.ports.as_deref().unwrap_or_default();
    let port = match service_port {
        IntOrString::Int(number) => ports
            .iter()
            .find(|port| port.port == *number)
            .or_else(|| if ports.len() == 1 { ports.first() } else { None }),
        IntOrString::String(name) => ports
            .iter()
            .find(|port| port.name.as_deref() == Some(name.as_str())),
    };
    port.map(|port| port.port)
}

fn acl_match(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("path_beg {path}")
    }
}

fn port_string(port: &IntOrString) -> String {
    match port {
        IntOrString::Int(number) => number.to_string(),
        IntOrString::String(name) => name.clone(),
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

// Joins the kind and the escaped parts with `:`. Bytes outside `[A-Za-z0-9.-]` are written as
// `_` followed by their hex value, so distinct parts always give distinct names.
fn backend_name(kind: &str, parts: &[&str]) -> String {
    let mut name = kind.to_string();
    for part in parts {
        name.push(':');
        for byte in part.bytes() {
            match byte {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'.' => name.push(byte as char),
                _ => name.push_str(&format!("_{byte:02x}")),
            }
        }
    }
    name
}
