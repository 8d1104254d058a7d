//! The `hirebench serve` command.

use std::path::PathBuf;

use anyhow::Result;

use hirebench_providers::load_config_from;
use hirebench_server::{serve, AppState};

pub async fn execute(
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(dir) = static_dir {
        config.server.static_dir = dir;
    }

    let state = AppState::from_config(&config)?;
    serve(state, config.server.port).await
}
