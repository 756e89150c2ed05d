use std::process::ExitCode;

use eyesante_api::{AppConfig, BootstrapError, bootstrap, default_container};
use eyesante_observability::LogFormat;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eyesante_observability::init(LogFormat::default());
            tracing::error!(error = %err, "invalid configuration");
            eprintln!("eyesante: {err}");
            return ExitCode::from(BootstrapError::from(err).exit_code());
        }
    };

    eyesante_observability::init(config.log_format);

    if config.uses_dev_jwt_secret() {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let builder = default_container(&config);

    match bootstrap::run(config, builder, args).await {
        Ok(()) => {
            tracing::info!("stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("eyesante: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
