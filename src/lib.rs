
mod normalize;
pub use normalize::*;

mod pubchem;
pub use pubchem::*;

mod resolve;
pub use resolve::*;

mod sheet;
pub use sheet::*;

/// Sets up the global tracing subscriber at the given level
/// (overridable through `RUST_LOG`). Safe to call more than once.
pub fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
