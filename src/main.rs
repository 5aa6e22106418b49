use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    skyview_core::init()?;

    let (config, validation) = skyview_core::Config::load_validated()?;
    tracing::info!(
        "SkyView started (config dir: {}, {} warning(s))",
        config.config_dir.display(),
        validation.warnings.len()
    );

    skyview_ui::shell::run(config).await?;

    tracing::info!("SkyView shut down");
    Ok(())
}
