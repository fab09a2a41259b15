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

use std::time::Duration;

use crate::{Error, Result};
use tokio::{process::Command, time::timeout};
use tracing::debug;

// Returns the node name carrying the domain of the local host. The controller runs with host
// networking, so the local fqdn is the fqdn of the node it is scheduled on, while the node name
// known to the API server may have been shortened.
pub async fn fully_qualified_node_name(node_name: &str, wait: Duration) -> Result<String> {
    let fqdn = local_fqdn(wait).await?;
    debug!("found fqdn: {}", fqdn);
    Ok(qualify_node_name(node_name, &fqdn))
}

// Replaces the domain of the node name, if any, with the domain of the provided fqdn.
pub fn qualify_node_name(node_name: &str, fqdn: &str) -> String {
    let short_name = node_name.split('.').next().unwrap_or_default();
    match fqdn.find('.') {
        Some(idx) => format!("{}{}", short_name, &fqdn[idx..]),
        None => short_name.to_string(),
    }
}

async fn local_fqdn(wait: Duration) -> Result<String> {
    let mut command = Command::new("hostname");
    command.arg("-f");
    query_fqdn(command, wait).await
}

/// Runs the provided command and returns its trimmed output as the fqdn of
/// the local host. The command is killed if it does not finish within `wait`.
pub async fn query_fqdn(mut command: Command, wait: Duration) -> Result<String> {
    command.kill_on_drop(true);
    let program = format!("{:?}", command.as_std().get_program());

    let output = timeout(wait, command.output())
        .await
        .map_err(|_| {
            Error::HostIdentityError(format!("{program} did not finish within {wait:?}"))
        })?
        .map_err(|err| Error::HostIdentityError(format!("failed to run {program}: {err}")))?;

    if !output.status.success() {
        return Err(Error::HostIdentityError(format!(
            "{program} exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let fqdn = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if fqdn.is_empty() {
        return Err(Error::HostIdentityError(format!("{program} returned no name")));
    }
    Ok(fqdn)
}
