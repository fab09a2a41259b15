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

use crate::{
    consts::{INGRESS_FIELD_MANAGER, RESOLVED_CONDITION_TYPE},
    traits::HasConditions,
    *,
};

use chrono::Utc;
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
use kube::api::{Api, Patch, PatchParams};
use serde_json::json;

// Sets the provided condition on any object implementing the HasConditions trait.
//
// The condition on the object is only updated if the new condition has a different status (except
// for the observed generation which is always updated).
pub fn set_condition<T: HasConditions>(obj: &mut T, new_cond: metav1::Condition) {
    if let Some(conditions) = obj.get_conditions_mut() {
        for condition in conditions.iter_mut() {
            if condition.type_ == new_cond.type_ {
                if condition.status == new_cond.status {
                    // always update the observed generation
                    condition.observed_generation = new_cond.observed_generation;
                    return;
                }
                *condition = new_cond;
                return;
            }
        }
        conditions.push(new_cond);
    } else {
        obj.get_conditions_mut().replace(vec![new_cond]);
    }
}

// Returns a Condition of type "Resolved" describing a resolution that produced a configuration.
// Rules left out of the configuration are listed in the message.
pub fn get_resolved_condition(ingress: &Ingress, errors: &[Error]) -> metav1::Condition {
    let mut resolved = metav1::Condition {
        type_: RESOLVED_CONDITION_TYPE.to_string(),
        status: String::from("True"),
        reason: String::from("Resolved"),
        observed_generation: ingress.metadata.generation,
        last_transition_time: metav1::Time(Utc::now()),
        message: String::from("All rules resolved"),
    };

    if let Some(first) = errors.first() {
        resolved.reason = condition_reason(first).to_string();
        resolved.message = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
    }
    resolved
}

// Returns a Condition of type "Resolved" with status False for a resolution that failed as a
// whole.
pub fn get_failed_condition(ingress: &Ingress, error: &Error) -> metav1::Condition {
    metav1::Condition {
        type_: RESOLVED_CONDITION_TYPE.to_string(),
        status: String::from("False"),
        reason: condition_reason(error).to_string(),
        observed_generation: ingress.metadata.generation,
        last_transition_time: metav1::Time(Utc::now()),
        message: error.to_string(),
    }
}

fn condition_reason(error: &Error) -> &'static str {
    match error.kind() {
        ErrorKind::MalformedReference => "BackendNotFound",
        ErrorKind::InvariantViolation => "DuplicateBackend",
        ErrorKind::HostIdentity => "HostIdentityFailed",
        ErrorKind::Cluster => "ClusterError",
        ErrorKind::InvalidConfig => "InvalidConfiguration",
    }
}

// Patch the provided status on the Ingress object.
pub async fn patch_status(
    ingress_api: &Api<Ingress>,
    name: &str,
    status: &IngressStatus,
) -> Result<()> {
    let mut conditions = &vec![];
    if let Some(c) = status.conditions.as_ref() {
        conditions = c;
    }
    let patch = Patch::Apply(json!({
        "apiVersion": "appscode.com/v1beta1",
        "kind": "Ingress",
        "status": {
            "conditions": conditions
        }
    }));
    let params = PatchParams::apply(INGRESS_FIELD_MANAGER).force();
    ingress_api
        .patch_status(name, &params, &patch)
        .await
        .map_err(Error::KubeError)?;
    Ok(())
}
