use tracing::{error, info};

use ezlog::init::init_tracing_with_config;
use ezlog::init::BridgeConfig;
use ezlog::options::*;
use ezlog::{fields, Log};

fn main() -> Result<(), ezlog::LogError> {
    let log = Log::new([
        with_output_file_path("./logs", "bridge"),
        with_caller(),
        with_global_prefix(fields! { "service" => "bridge-demo" }),
    ])?;

    init_tracing_with_config(&log, BridgeConfig { enable_stdout: true })?;

    info!("tracing events now land in the rolling file");
    error!(user_id = 42, reason = "invalid password", "authentication failed");

    // Direct facade calls and bridged events share the same file.
    log.info().msg("written directly");
    Ok(())
}
