use github_proxy_cli::{run_cli, CliError};
use tracing::error;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| "github_proxy_cli=info,github_proxy_api=info,github_proxy_core=info".into(),
        ))
        .init();

    if let Err(e) = run_cli().await {
        error!("CLI error: {}", e);

        let exit_code = match e {
            CliError::Configuration(_) => 1,
            CliError::Server(_) => 2,
        };

        std::process::exit(exit_code);
    }
}
