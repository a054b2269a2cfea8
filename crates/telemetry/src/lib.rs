//! Tracing subscriber bootstrap shared by the server and CLI binaries.

use anyhow::anyhow;
use locallib_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `settings.filter` when set. Calling this twice fails,
/// since only one global subscriber may exist.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::info!(
        target: "locallib-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );
    Ok(())
}

fn build_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.filter)
            .map_err(|err| anyhow!("invalid log filter '{}': {err}", settings.filter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            filter: "locallib=loud".to_string(),
        };
        assert!(build_filter(&settings).is_err());
    }

    #[test]
    fn accepts_default_filter() {
        assert!(build_filter(&TelemetrySettings::default()).is_ok());
    }
}
