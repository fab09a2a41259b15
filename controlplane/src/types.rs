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

use std::collections::BTreeSet;

use crate::consts::STATS_PORT;
use serde::Serialize;
use tracing::warn;

/// The configuration resolved from a single Ingress, ready to be rendered into
/// an HAProxy configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HAProxyOptions {
    /// Generation marker, it never decreases once published.
    pub timestamp: i64,

    // applied globally to every section.
    pub sticky: bool,
    pub has_tls: bool,

    pub stats_enabled: bool,
    pub stats_user: String,
    pub stats_password: String,

    pub default_backend: Option<Backend>,
    // Ordered as the rules of the Ingress, the first match wins.
    pub http_services: Vec<Service>,
    pub https_services: Vec<Service>,
    pub tcp_services: Vec<TCPService>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub acl_match: String,
    pub host: String,
    pub backend: Backend,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TCPService {
    pub name: String,
    pub host: String,
    pub port: String,
    pub secret_name: Option<String>,
    pub pem_name: Option<String>,
    pub backend: Backend,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    /// Unique across the whole configuration.
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rewrite_rules: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header_rules: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<Endpoint>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub name: String,
    pub ip: String,
    pub port: String,
}

impl HAProxyOptions {
    /// Iterates over every backend of the configuration, default backend first.
    pub fn backends(&self) -> impl Iterator<Item = &Backend> {
        self.default_backend
            .iter()
            .chain(self.http_services.iter().map(|svc| &svc.backend))
            .chain(self.https_services.iter().map(|svc| &svc.backend))
            .chain(self.tcp_services.iter().map(|svc| &svc.backend))
    }

    /// Returns the ports the load balancer has to listen on, sorted.
    pub fn listen_ports(&self) -> Vec<i32> {
        let mut ports = BTreeSet::new();
        if !self.http_services.is_empty() || self.default_backend.is_some() {
            ports.insert(80);
        }
        if !self.https_services.is_empty() {
            ports.insert(443);
        }
        for svc in &self.tcp_services {
            match svc.port.parse::<i32>() {
                Ok(port) => {
                    ports.insert(port);
                }
                Err(_) => warn!(service = %svc.name, port = %svc.port, "skipping symbolic tcp port"),
            }
        }
        if self.stats_enabled {
            ports.insert(STATS_PORT);
        }
        ports.into_iter().collect()
    }
}
