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

use std::net::IpAddr;

use crate::{consts::*, Annotations, Error, Ingress, LoadBalancerType, Result};
use kube::ResourceExt;

/// Deployment options of the load balancer serving an Ingress, parsed once
/// from its annotations and spec.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KubeOptions {
    // name of the cluster the controller runs in.
    pub cluster_name: String,
    pub provider_name: String,

    // every secret the load balancer needs mounted.
    pub secret_names: Vec<String>,

    pub service_name: String,
    pub controller_name: String,
    pub daemon_set_name: String,
    pub config_map_name: String,

    pub lb_type: LoadBalancerType,
    pub daemon_hostname: Option<String>,
    pub load_balancer_ip: Option<IpAddr>,
    pub load_balancer_persist: bool,

    pub loadbalancer_image: String,
}

impl KubeOptions {
    pub fn for_ingress(
        ingress: &Ingress,
        cluster_name: &str,
        provider_name: &str,
        loadbalancer_image: &str,
    ) -> Result<Self> {
        let annotations = Annotations::of(&ingress.metadata);
        let name = match annotations.lb_name() {
            "" => ingress.name_any(),
            name => name.to_string(),
        };

        let load_balancer_ip = match annotations.load_balancer_ip() {
            "" => None,
            ip => Some(ip.parse::<IpAddr>().map_err(|err| {
                Error::InvalidConfigError(format!("invalid {LOAD_BALANCER_IP} `{ip}`: {err}"))
            })?),
        };
        let daemon_hostname = match annotations.daemon_hostname() {
            "" => None,
            hostname => Some(hostname.to_string()),
        };

        Ok(KubeOptions {
            cluster_name: cluster_name.to_string(),
            provider_name: provider_name.to_string(),
            secret_names: secret_names(ingress),
            service_name: format!("{SERVICE_PREFIX}{name}"),
            controller_name: format!("{CONTROLLER_PREFIX}{name}"),
            daemon_set_name: format!("{DAEMON_SET_PREFIX}{name}"),
            config_map_name: format!("{CONFIG_MAP_PREFIX}{name}"),
            lb_type: annotations.load_balancer_type()?,
            daemon_hostname,
            load_balancer_ip,
            load_balancer_persist: annotations.load_balancer_persist(),
            loadbalancer_image: loadbalancer_image.to_string(),
        })
    }
}

// Returns the TLS and TCP secrets of the Ingress, in order of first appearance.
fn secret_names(ingress: &Ingress) -> Vec<String> {
    let tls = ingress.spec.tls.iter().map(|tls| &tls.secret_name);
    let tcp = ingress
        .spec
        .rules
        .iter()
        .flat_map(|rule| &rule.tcp)
        .filter_map(|tcp| tcp.secret_name.as_ref());

    let mut names: Vec<String> = vec![];
    for name in tls.chain(tcp) {
        if !name.is_empty() && !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}
