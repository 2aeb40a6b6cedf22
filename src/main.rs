use clap::Parser;
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, warn};

use rust_eduportal_core::config::AppConfig;

mod cli;

#[tokio::main]
async fn main() {
    dotenv().ok();
    let started_at = chrono::Utc::now();

    setup_panic!();
    let cli = cli::Cli::parse();

    // 初始化配置
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        std::process::exit(2);
    }
    let config = AppConfig::get();

    // 初始化日志，输出到 stderr，stdout 留给 JSON 结果
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Project: {} Version: {} Environment: {} API: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.environment,
        config.api.base_url
    );

    let outcome = cli::run(cli, config).await;
    debug!(
        "Finished in {} ms",
        chrono::Utc::now()
            .signed_duration_since(started_at)
            .num_milliseconds()
    );

    if let Err(e) = outcome {
        #[cfg(debug_assertions)]
        eprintln!("{}", e.format_colored());
        #[cfg(not(debug_assertions))]
        eprintln!("{}", e.format_simple());
        drop(guard);
        std::process::exit(1);
    }
}
