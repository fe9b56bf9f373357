use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a global `fmt` subscriber. `RUST_LOG` wins over `default_filter`.
/// Does nothing if a subscriber is already installed.
pub fn init(default_filter: &str) {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_filter));
  let _ = tracing_subscriber::registry().with(fmt::layer()).with(filter).try_init();
}

#[cfg(test)]
mod tests {
  #[test]
  fn test_init_is_idempotent() {
    super::init("debug");
    super::init("warn");
    tracing::info!("subscriber installed");
  }
}
