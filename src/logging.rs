use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "LEXI_LOG";

/// Filter directives for the subscriber: `LEXI_LOG`, then `RUST_LOG`, then a
/// default that shows this crate's routing decisions at debug.
pub fn filter_directives(lexi_log: Option<&str>, rust_log: Option<&str>, component: &str) -> String {
    [lexi_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty() && EnvFilter::try_new(*value).is_ok())
        .map(str::to_string)
        .unwrap_or_else(|| format!("info,lexi_brain=debug,{component}=debug"))
}

/// Installs a compact stderr subscriber. Stdout is reserved for the JSON the CLI prints.
pub fn init_tracing(component: &str) {
    let lexi_log = std::env::var(ENV_LOG).ok();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = filter_directives(lexi_log.as_deref(), rust_log.as_deref(), component);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexi_log_wins_over_rust_log() {
        assert_eq!(
            filter_directives(Some("lexi_brain=trace"), Some("debug"), "lexi"),
            "lexi_brain=trace"
        );
        assert_eq!(filter_directives(Some("  "), Some("debug"), "lexi"), "debug");
    }

    #[test]
    fn default_keeps_routing_logs() {
        assert_eq!(
            filter_directives(None, None, "lexi"),
            "info,lexi_brain=debug,lexi=debug"
        );
    }
}
