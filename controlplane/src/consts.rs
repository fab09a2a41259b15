// Prefix of the LoadBalancer Service created for an Ingress.
pub const SERVICE_PREFIX: &str = "lb-svc-";

// Prefix of the HAProxy Deployment created for an Ingress.
pub const CONTROLLER_PREFIX: &str = "lb-c-";

// Prefix of the HAProxy DaemonSet created for an Ingress running in Daemon mode.
pub const DAEMON_SET_PREFIX: &str = "lb-dm-";

// Prefix of the ConfigMap holding the rendered HAProxy configuration.
pub const CONFIG_MAP_PREFIX: &str = "lb-cm-";

// Pins requests from the same client to the same endpoint. Presence enables it.
pub const STICKY_SESSION: &str = "ingress.appscode.com/stickySession";

// Port HAProxy exposes its stats page on.
pub const STATS_PORT: i32 = 1936;

// Enables the HAProxy stats page. Presence enables it.
pub const STATS_ON: &str = "ingress.appscode.com/stats";

// Basic auth credentials for the stats page.
pub const STATS_USER: &str = "ingress.appscode.com/stats.user";
pub const STATS_PASSWORD: &str = "ingress.appscode.com/stats.password";

pub const LB_NAME: &str = "ingress.appscode.com/name";

// One of LB_DAEMON or LB_LOAD_BALANCER.
pub const LB_TYPE: &str = "ingress.appscode.com/type";
pub const LB_DAEMON: &str = "Daemon";
pub const LB_LOAD_BALANCER: &str = "LoadBalancer";

// Restricts a Daemon mode load balancer to a single host.
pub const DAEMON_HOSTNAME: &str = "ingress.appscode.com/daemon.hostname";

// Requested external ip of a LoadBalancer mode load balancer.
pub const LOAD_BALANCER_IP: &str = "ingress.appscode.com/ip";

// Keeps the external ip when the load balancer is recreated. Only "true" enables it.
pub const LOAD_BALANCER_PERSIST: &str = "ingress.appscode.com/loadbalancer.persist";

// Field manager used when applying Ingress status.
pub const INGRESS_FIELD_MANAGER: &str = "ingress-controlplane-field-manager";

// Condition type reporting the outcome of the last resolution.
pub const RESOLVED_CONDITION_TYPE: &str = "Resolved";
