use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. The filter comes from `--log-level`, then
/// `RUST_LOG`, then `info`.
pub fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = build_env_filter(level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!(error))
        .context("failed to install tracing subscriber")
}

fn build_env_filter(level: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = level.map(str::trim).filter(|level| !level.is_empty()) {
        return EnvFilter::try_new(level).with_context(|| format!("invalid log filter `{level}`"));
    }

    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_wins() {
        assert!(build_env_filter(Some("fwmap=debug")).is_ok());
        assert!(build_env_filter(Some("  warn ")).is_ok());
    }

    #[test]
    fn malformed_level_is_reported() {
        assert!(build_env_filter(Some("fwmap=loud")).is_err());
    }
}
