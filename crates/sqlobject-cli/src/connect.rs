use crate::cli::GlobalArgs;
use anyhow::Context;
use sqlobject::{DbConfig, MySqlExecutor};
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by RUST_LOG (warnings only by default).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

pub fn load_config(global: &GlobalArgs) -> anyhow::Result<DbConfig> {
    match &global.database {
        Some(url) => DbConfig::from_url(url).context("invalid --database URL"),
        None => DbConfig::from_dotenv()
            .context("database settings missing; set DATABASE_URL or DB_USER/DB_NAME, or pass --database"),
    }
}

pub async fn connect(global: &GlobalArgs) -> anyhow::Result<MySqlExecutor> {
    init_tracing();
    let config = load_config(global)?;
    tracing::debug!(?config, "connecting");
    MySqlExecutor::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}:{}", config.host, config.port))
}
