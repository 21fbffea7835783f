//! Web 服务器主程序入口

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use translation_api::env::core::LogLevel;
use translation_api::env::{generate_env_docs, EnvVar};
use translation_api::web::WebServer;
use translation_api::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "translation-api", version, about = "Translation API server")]
struct Args {
    /// Bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Port number
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long)]
    log_level: Option<String>,

    /// Print environment variable documentation and exit
    #[arg(long)]
    env_docs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.env_docs {
        print!("{}", generate_env_docs());
        return Ok(());
    }

    // .env 不存在时忽略
    let dotenv_loaded = dotenv::dotenv().ok();

    let mut config = AppConfig::from_env().context("Invalid environment configuration")?;
    if let Some(bind) = args.bind {
        config.web.bind_addr = bind;
    }
    if let Some(port) = args.port {
        config.web.port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = LogLevel::parse(&level)?;
    }
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log_level);
    if let Some(path) = dotenv_loaded {
        tracing::info!("已加载环境变量文件: {}", path.display());
    }
    config.log_summary();

    WebServer::new(config).start().await?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
