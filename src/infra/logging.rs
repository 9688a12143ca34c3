pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Logs go to stderr so stdio mode keeps stdout for protocol frames.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log a metric line and record it with the `metrics` facade.
pub fn log_metric(tool: &str, metric: &str, value: f64) {
    tracing::info!(tool = tool, metric = metric, value = value, "metric");
    let name = format!("gateway.{metric}");
    if metric.ends_with("_total") {
        metrics::counter!(name, "tool" => tool.to_owned()).increment(value as u64);
    } else {
        metrics::histogram!(name, "tool" => tool.to_owned()).record(value);
    }
}
