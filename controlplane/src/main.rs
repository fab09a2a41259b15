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

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use controlplane::{status::*, traits::HasConditions, *};
use kube::{Api, Client};
use tracing::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOADBALANCER_IMAGE: &str = "appscode/haproxy:1.7.0-k8s";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

#[derive(Debug, Parser)]
struct Opt {
    /// Namespace of the Ingress to resolve.
    #[clap(long, default_value = "default")]
    namespace: String,
    /// Name of the Ingress to resolve.
    #[clap(long)]
    name: String,
    #[clap(long, default_value = "")]
    cluster_name: String,
    #[clap(long)]
    cloud_provider: Option<String>,
    #[clap(long, default_value = DEFAULT_LOADBALANCER_IMAGE)]
    loadbalancer_image: String,
    /// Resolve the fully qualified name of this node with the domain of the local host.
    #[clap(long)]
    node_name: Option<String>,
    #[clap(long, default_value_t = 5)]
    hostname_timeout_secs: u64,
    #[clap(long, value_enum, default_value_t = Output::Yaml)]
    output: Output,
    /// Record the outcome of the resolution on the Ingress status.
    #[clap(long)]
    update_status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    set_loadbalancer_image(opt.loadbalancer_image.as_str());

    let client = Client::try_default()
        .await
        .context("failed to create kube Client")?;

    let ingress_api: Api<Ingress> = Api::namespaced(client.clone(), &opt.namespace);
    let mut ingress = ingress_api
        .get(&opt.name)
        .await
        .with_context(|| format!("failed to get ingress {}/{}", opt.namespace, opt.name))?;

    let options = KubeOptions::for_ingress(
        &ingress,
        &opt.cluster_name,
        opt.cloud_provider.as_deref().unwrap_or_default(),
        get_loadbalancer_image(),
    )?;
    debug!(?options, "parsed load balancer options");

    let ctx = Context {
        client: client.clone(),
        cloud_provider: opt.cloud_provider.clone(),
        options: Arc::new(options),
        lister: KubeEndpointLister::new(client.clone()),
        parsed: Arc::new(ConfigStore::new()),
    };

    let condition = match ctx.resolve_and_publish(&ingress).await {
        Ok(errors) => {
            for error in &errors {
                warn!("{}", error);
            }
            get_resolved_condition(&ingress, &errors)
        }
        Err(error) => get_failed_condition(&ingress, &error),
    };

    if opt.update_status {
        set_condition(&mut ingress, condition);
        let status = ingress.get_conditions_mut().clone();
        patch_status(
            &ingress_api,
            &opt.name,
            &IngressStatus { conditions: status },
        )
        .await?;
        info!("updated status of ingress {}/{}", opt.namespace, opt.name);
    }

    if let Some(node_name) = &opt.node_name {
        let fqdn = fully_qualified_node_name(
            node_name,
            Duration::from_secs(opt.hostname_timeout_secs),
        )
        .await?;
        info!("node {} resolves to {}", node_name, fqdn);
    }

    let parsed = ctx.parsed.require_current().await.with_context(|| {
        format!("failed to resolve ingress {}/{}", opt.namespace, opt.name)
    })?;
    let rendered = match opt.output {
        Output::Yaml => serde_yaml::to_string(parsed.as_ref())?,
        Output::Json => serde_json::to_string_pretty(parsed.as_ref())?,
    };
    println!("{rendered}");
    info!(ports = ?parsed.listen_ports(), "load balancer ports");

    Ok(())
}
