use tracing_subscriber::EnvFilter;

// RUST_LOG takes precedence over the passed-in default, so users can crank up
// verbosity for one misbehaving module without a rebuild.
pub fn setup(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
