use anyhow::Context;
use journal_core::{init_logging, Database};
use journal_web::{build_router, AppState, Settings};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("failed to load settings")?;
    init_logging(&settings.log.level, settings.log.dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let db = Database::bootstrap(&settings.database.path)
        .with_context(|| format!("failed to open {}", settings.database.path.display()))?;
    let state = AppState::new(db).context("failed to compile templates")?;
    let key = settings.session.key()?;
    let router = build_router(
        state,
        &settings.session,
        key,
        &settings.static_dir,
    );

    let addr = settings.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        "event=server_start module=web status=ok addr={addr} version={}",
        journal_core::core_version()
    );
    axum::serve(listener, router).await?;
    Ok(())
}
