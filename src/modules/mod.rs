pub mod books;

use atheneum_kernel::settings::Settings;
use atheneum_kernel::ModuleRegistry;

/// Register all project modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    registry.register(books::create_module(settings)?);
    Ok(())
}
