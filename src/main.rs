use anyhow::Result;
use sysinfo::System;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tunehub::api::router;
use tunehub::cli::{self, CliAction};
use tunehub::config::load_config;
use tunehub::state::AppState;
use tunehub::utils::format_ram_mb;

#[tokio::main]
async fn main() -> Result<()> {
    match cli::parse_args() {
        CliAction::PrintVersion => {
            cli::print_version();
            return Ok(());
        }
        CliAction::InitConfig => {
            cli::init_config_file();
            return Ok(());
        }
        CliAction::RunServer => { /* continue */ }
    }
    let cfg = load_config();
    let logs_dir_str = std::env::var("TUNEHUB_LOG_DIR").unwrap_or_else(|_| ".logs".into());
    let logs_dir = std::path::Path::new(&logs_dir_str);

    let stdout_layer = fmt::layer().with_target(false).compact();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter).with(stdout_layer);

    // Held until exit so buffered file logs get flushed.
    let _guard_file = match std::fs::create_dir_all(logs_dir) {
        Ok(()) => {
            if cfg.clean_log_on_start {
                let log_path = logs_dir.join("latest.log");
                if let Ok(f) =
                    std::fs::OpenOptions::new().create(true).write(true).truncate(true).open(&log_path)
                {
                    drop(f);
                }
            }
            let file_appender = rolling::never(logs_dir, "latest.log");
            let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().with_ansi(false).with_target(false).with_writer(file_nb).compact();
            registry.with(file_layer).init();
            Some(guard)
        }
        Err(e) => {
            eprintln!("File logging disabled (cannot create {}): {}", logs_dir.display(), e);
            registry.init();
            None
        }
    };

    let mut sys = System::new_all();
    sys.refresh_all();
    let version = env!("CARGO_PKG_VERSION");
    let os = System::name().unwrap_or_else(|| "Unknown OS".into());
    let os_ver = System::os_version().unwrap_or_default();
    let total_mem_mb = sys.total_memory() / (1024 * 1024);
    let cpu_brand = sys.cpus().first().map(|c| c.brand().to_string()).unwrap_or_else(|| "Unknown CPU".into());
    if total_mem_mb == 0 {
        warn!("Unable to determine RAM size");
    }

    info!(
        version,
        os = %format!("{} {}", os, os_ver),
        cpu = %cpu_brand,
        ram_mb = %format_ram_mb(total_mem_mb),
        catalog = %cfg.catalog_base_url,
        lyrics = %cfg.lyrics_base_url,
        "Tunehub server starting"
    );

    let state = AppState::new(cfg)?;

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })
    .ok();

    let app = router(state.clone());

    let bind_addr = (state.cfg.host.as_str(), state.cfg.port);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = %format!("{}:{}", state.cfg.host, state.cfg.port), "Listening");

    tokio::select! {
        res = axum::serve(listener, app) => {
            if let Err(e) = res { tracing::error!(?e, "server error"); }
        }
        _ = shutdown_rx.recv() => { info!("Shutdown signal received"); }
    }

    Ok(())
}
