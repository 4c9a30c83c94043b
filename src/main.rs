use std::env;

use hbr_advisor::cli;
use hbr_advisor::config::AdvisorConfig;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &AdvisorConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(hbr_advisor::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing(&AdvisorConfig::from_env());
    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}
