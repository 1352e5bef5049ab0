//! Tracing subscriber set-up for hosts.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's decision. [`init`] is what the bundled command-line host uses.

use tracing_subscriber::{
    EnvFilter, fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Installs a compact stderr subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` (for example `"info"`) when `RUST_LOG`
/// is unset or invalid.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed;
/// the existing subscriber stays in place.
pub fn init(default_directive: &str) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::init;

    #[test]
    fn second_installation_is_reported() {
        let first = init("info");
        let second = init("debug");
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
