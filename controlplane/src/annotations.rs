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

use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{consts::*, Error};
use kube::core::ObjectMeta;

static NO_ANNOTATIONS: BTreeMap<String, String> = BTreeMap::new();

/// Read-only view over the annotations of an Ingress.
///
/// Every accessor is total: a missing key yields the documented default and
/// unknown keys are ignored. Two boolean policies coexist on purpose. The
/// sticky session and stats switches are enabled by the mere presence of
/// their key, while [`Annotations::load_balancer_persist`] requires the
/// value to be `"true"` (case-insensitive).
#[derive(Clone, Copy, Debug)]
pub struct Annotations<'a>(&'a BTreeMap<String, String>);

impl<'a> From<&'a BTreeMap<String, String>> for Annotations<'a> {
    fn from(annotations: &'a BTreeMap<String, String>) -> Self {
        Annotations(annotations)
    }
}

impl<'a> Annotations<'a> {
    pub fn of(meta: &'a ObjectMeta) -> Self {
        Annotations(meta.annotations.as_ref().unwrap_or(&NO_ANNOTATIONS))
    }

    fn value(&self, key: &str) -> &'a str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn sticky_session(&self) -> bool {
        self.0.contains_key(STICKY_SESSION)
    }

    pub fn stats(&self) -> bool {
        self.0.contains_key(STATS_ON)
    }

    pub fn stats_user(&self) -> &'a str {
        self.value(STATS_USER)
    }

    pub fn stats_password(&self) -> &'a str {
        self.value(STATS_PASSWORD)
    }

    pub fn lb_name(&self) -> &'a str {
        self.value(LB_NAME)
    }

    /// Returns the raw load balancer type, `LoadBalancer` when unset.
    pub fn lb_type(&self) -> &'a str {
        self.0
            .get(LB_TYPE)
            .map(String::as_str)
            .unwrap_or(LB_LOAD_BALANCER)
    }

    /// An empty hostname lets a Daemon mode load balancer run on every eligible host.
    pub fn daemon_hostname(&self) -> &'a str {
        self.value(DAEMON_HOSTNAME)
    }

    pub fn load_balancer_ip(&self) -> &'a str {
        self.value(LOAD_BALANCER_IP)
    }

    pub fn load_balancer_persist(&self) -> bool {
        self.value(LOAD_BALANCER_PERSIST).eq_ignore_ascii_case("true")
    }

    /// Parses [`Annotations::lb_type`], rejecting values other than `Daemon` and `LoadBalancer`.
    pub fn load_balancer_type(&self) -> Result<LoadBalancerType, Error> {
        self.lb_type().parse()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadBalancerType {
    /// One HAProxy per selected host, exposed through host networking.
    Daemon,
    /// HAProxy behind a Service of type LoadBalancer.
    #[default]
    LoadBalancer,
}

impl FromStr for LoadBalancerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LB_DAEMON => Ok(LoadBalancerType::Daemon),
            LB_LOAD_BALANCER => Ok(LoadBalancerType::LoadBalancer),
            other => Err(Error::InvalidConfigError(format!(
                "unsupported load balancer type {other}; must be one of {LB_DAEMON} or {LB_LOAD_BALANCER}"
            ))),
        }
    }
}

impl fmt::Display for LoadBalancerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadBalancerType::Daemon => f.write_str(LB_DAEMON),
            LoadBalancerType::LoadBalancer => f.write_str(LB_LOAD_BALANCER),
        }
    }
}
