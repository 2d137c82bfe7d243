use anyhow::Context;
use atheneum_kernel::settings::Settings;
use atheneum_kernel::{InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load atheneum settings")?;
    atheneum_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        catalog = %settings.catalog.base_url,
        "atheneum-app bootstrap starting"
    );

    let mut registry = ModuleRegistry::new();
    atheneum_app::modules::register_all(&mut registry, &settings)?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    atheneum_http::start_server(&registry, &settings).await?;

    registry.stop_all().await?;
    Ok(())
}
