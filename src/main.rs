use std::sync::Arc;

use clap::Parser;
use tokio::sync::Notify;

use image_resource_server::config::{self, AppState, Config};
use image_resource_server::logger;
use image_resource_server::server::{
    create_reusable_listener, start_server_loop, wait_for_shutdown, ServiceKind,
};

#[derive(Parser, Debug)]
#[command(name = "image-resource-server")]
#[command(about = "Static image resource server with HTTP caching headers", long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        env = "RESOURCE_SERVER_CONFIG",
        default_value = "config.toml",
        help = "Configuration file path"
    )]
    config: String,

    #[arg(
        short = 'D',
        value_name = "KEY=VALUE",
        help = "Process-level override, e.g. -D IMAGE_RESOURCE_DIR=/srv/images (repeatable)"
    )]
    define: Vec<String>,

    #[arg(long, help = "Log level (trace, debug, info, warn, error); overrides logging.level")]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut cfg = Config::load_from(&args.config)?;
    if let Some(level) = args.log_level {
        cfg.logging.level = level;
    }
    logger::init(&cfg.logging)?;

    let overrides = config::parse_overrides(&args.define)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg, overrides))
}

async fn async_main(
    cfg: Config,
    overrides: std::collections::HashMap<String, String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_addr = cfg.get_socket_addr()?;
    let api_addr = cfg.get_api_socket_addr()?;

    let app_listener = create_reusable_listener(app_addr)?;
    let api_listener = create_reusable_listener(api_addr)?;

    let state = Arc::new(AppState::new(&cfg, overrides));
    logger::log_server_start(&app_addr, &api_addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    tokio::spawn(wait_for_shutdown(Arc::clone(&shutdown)));

    // LocalSet for spawn_local connection tasks
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let api_task = tokio::task::spawn_local(start_server_loop(
                api_listener,
                Arc::clone(&state),
                ServiceKind::Api,
                Arc::clone(&shutdown),
            ));
            start_server_loop(app_listener, state, ServiceKind::App, shutdown).await;
            if let Err(e) = api_task.await {
                tracing::error!("API server task failed: {e}");
            }
        })
        .await;

    Ok(())
}
