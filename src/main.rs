use std::process;

use env_logger::Env;
use log::error;

use scop::config::{ViewerConfig, CONFIG_FILE};
use scop::core::engine::EngineInit;

fn main() {
    #[cfg(debug_assertions)]
    let level = "debug";
    #[cfg(not(debug_assertions))]
    let level = "warn";
    env_logger::init_from_env(Env::default().default_filter_or(level));

    if let Err(e) = run() {
        error!("{:#}", e);
        process::exit(-1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = ViewerConfig::load_or_default(CONFIG_FILE)?;
    EngineInit::new(config)?.start()
}
