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

use std::{fmt, sync::Arc};

use kube::Client;
use thiserror::Error;

pub use annotations::{Annotations, LoadBalancerType};
pub use crd::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule, IngressSpec,
    IngressStatus, IngressTLS, TCPIngressRuleValue,
};
pub use image::{get_loadbalancer_image, set_loadbalancer_image, ImagePin};
pub use node::{fully_qualified_node_name, qualify_node_name, query_fqdn};
pub use options::KubeOptions;
pub use resolver::{resolve, EndpointLister, KubeEndpointLister, Resolution};
pub use store::ConfigStore;
pub use types::{Backend, Endpoint, HAProxyOptions, Service, TCPService};

pub mod annotations;
pub mod consts;
pub mod crd;
pub mod image;
pub mod node;
pub mod options;
pub mod resolver;
pub mod status;
pub mod store;
pub mod traits;
pub mod types;

// Context handed to everything that works on a single Ingress.
#[derive(Clone)]
pub struct Context<L = KubeEndpointLister> {
    /// Kubernetes client
    pub client: Client,
    /// Name of the cloud provider the cluster runs on, passed through to the reconciler.
    pub cloud_provider: Option<String>,
    pub options: Arc<KubeOptions>,
    /// Source of the Endpoints backing the Services an Ingress references.
    pub lister: L,
    /// The currently published configuration for the Ingress.
    pub parsed: Arc<ConfigStore>,
}

impl<L: EndpointLister> Context<L> {
    /// Resolves the Ingress against the lister of this context and publishes the result.
    pub async fn resolve_and_publish(&self, ingress: &Ingress) -> Result<Vec<Error>> {
        self.parsed.resolve_and_publish(ingress, &self.lister).await
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("kube error: {0}")]
    KubeError(#[source] kube::Error),
    #[error("invalid configuration: `{0}`")]
    InvalidConfigError(String),
    #[error("rule `{rule}` references service `{service}` which does not exist")]
    MissingServiceError { rule: String, service: String },
    #[error("backend `{0}` is defined more than once")]
    DuplicateBackendError(String),
    #[error("failed to resolve host identity: {0}")]
    HostIdentityError(String),
}

/// The broad class of an [`Error`], used to decide how it is surfaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A rule points at something that does not exist. Other rules still resolve.
    MalformedReference,
    /// The Ingress as a whole cannot produce a valid configuration.
    InvariantViolation,
    HostIdentity,
    Cluster,
    InvalidConfig,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingServiceError { .. } => ErrorKind::MalformedReference,
            Error::DuplicateBackendError(_) => ErrorKind::InvariantViolation,
            Error::HostIdentityError(_) => ErrorKind::HostIdentity,
            Error::KubeError(_) => ErrorKind::Cluster,
            Error::InvalidConfigError(_) => ErrorKind::InvalidConfig,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamespacedName {
    pub name: String,
    pub namespace: String,
}

impl fmt::Display for NamespacedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
