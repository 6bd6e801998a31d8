use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILTER: &str = "docvault=info";

/// Install the global subscriber. `RUST_LOG` wins over `fallback_filter`.
///
/// Returns an error when a global subscriber is already set.
pub fn init_tracing(fallback_filter: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}
