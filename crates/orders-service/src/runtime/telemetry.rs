//! Tracing subscriber setup for binaries.
//!
//! Log levels come from `RUST_LOG`, e.g. `RUST_LOG=orders_service=debug`.
//! Library code never installs a subscriber; only the binary entry point
//! calls this, once.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .init();
}
