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

use std::sync::Arc;

use crate::{resolver, EndpointLister, Error, HAProxyOptions, Ingress, Result};

use tokio::sync::RwLock;
use tracing::*;

/// Holds the configuration currently published for an Ingress.
///
/// Readers get a shared snapshot and never block each other. A new
/// configuration is resolved without holding the lock and swapped in with a
/// short write, so lookups against the API server never run under the lock.
pub struct ConfigStore {
    current: RwLock<Option<Arc<HAProxyOptions>>>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// Returns the published configuration, if any.
    pub async fn current(&self) -> Option<Arc<HAProxyOptions>> {
        self.current.read().await.clone()
    }

    /// Returns the published configuration, or an error when nothing has
    /// been published yet.
    pub async fn require_current(&self) -> Result<Arc<HAProxyOptions>> {
        self.current().await.ok_or_else(|| {
            Error::InvalidConfigError("no configuration published".to_string())
        })
    }

    /// Replaces the published configuration and returns the one now current.
    /// A configuration older than the published one is dropped.
    pub async fn publish(&self, parsed: HAProxyOptions) -> Arc<HAProxyOptions> {
        let mut current = self.current.write().await;
        if let Some(previous) = current.as_ref() {
            if parsed.timestamp < previous.timestamp {
                warn!(
                    previous = previous.timestamp,
                    resolved = parsed.timestamp,
                    "dropping stale configuration"
                );
                return previous.clone();
            }
        }
        let parsed = Arc::new(parsed);
        *current = Some(parsed.clone());
        parsed
    }

    /// Resolves the Ingress and publishes the result.
    ///
    /// Rules that could not be resolved are returned; the rest of the
    /// configuration is still published. On error nothing is published and
    /// the previous configuration stays current.
    pub async fn resolve_and_publish<L: EndpointLister>(
        &self,
        ingress: &Ingress,
        lister: &L,
    ) -> Result<Vec<Error>> {
        let resolution = resolver::resolve(ingress, lister).await.map_err(|err| {
            error!("keeping previous configuration: {}", err);
            err
        })?;
        let published = self.publish(resolution.parsed).await;
        info!(timestamp = published.timestamp, "published configuration");
        Ok(resolution.errors)
    }
}
