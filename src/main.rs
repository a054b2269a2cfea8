use anyhow::Context;
use locallib_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    locallib_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.endpoint,
        "locallib-app bootstrap starting"
    );

    locallib_app::run(settings).await
}
