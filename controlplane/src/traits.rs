use crate::{Ingress, IngressStatus};
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub trait HasConditions {
    fn get_conditions_mut(&mut self) -> &mut Option<Vec<metav1::Condition>>;
}

impl HasConditions for Ingress {
    fn get_conditions_mut(&mut self) -> &mut Option<Vec<metav1::Condition>> {
        &mut self
            .status
            .get_or_insert_with(IngressStatus::default)
            .conditions
    }
}
