use anyhow::Context;
use clap::Parser;
use swarm_recompose::adapters::docker;
use swarm_recompose::utils::error::{ErrorSeverity, RecomposeError};
use swarm_recompose::utils::{logger, validation::Validate};
use swarm_recompose::{CliConfig, LoadOutcome, LocalStorage, RecomposeEngine, StackPipeline};

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let settings = cli
        .load_settings()
        .context("Failed to load configuration")?;
    settings
        .validate()
        .context("Configuration validation failed")?;

    let client = docker::connect(&settings.docker)
        .await
        .context("Failed to connect to the Docker daemon")?;
    tracing::info!(
        "Reconstructing stack {} from {}",
        settings.namespace.as_deref().unwrap_or_default(),
        settings.docker.host.as_deref().unwrap_or(docker::LOCAL_DOCKER_HOST)
    );

    let pipeline = StackPipeline::new(client, LocalStorage::current_dir(), settings);
    let engine = RecomposeEngine::new(pipeline);

    match engine.run().await.context("Reconstruction failed")? {
        LoadOutcome::Written { path } => {
            println!("[INFO] Compose file saved; try: cat {}", path);
        }
        LoadOutcome::Rendered { document } => {
            print!("{}", document);
        }
    }

    Ok(())
}

/// Reports a failed run and picks the exit code from the error's severity.
fn report(e: &anyhow::Error) -> i32 {
    let Some(err) = e.downcast_ref::<RecomposeError>() else {
        tracing::error!("❌ {:#}", e);
        eprintln!("[ERROR] {:#}", e);
        return 1;
    };

    tracing::error!(
        "❌ {:#} (Category: {:?}, Severity: {:?})",
        e,
        err.category(),
        err.severity()
    );
    eprintln!("[ERROR] {}", err.user_friendly_message());
    eprintln!("💡 {}", err.recovery_suggestion());

    match err.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        std::process::exit(report(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_survives_context() {
        let missing = anyhow::Error::new(RecomposeError::MissingConfigError {
            field: "namespace".to_string(),
        })
        .context("Configuration validation failed");
        assert_eq!(report(&missing), 1);

        let unavailable = anyhow::Error::new(RecomposeError::DockerApiError {
            status: 503,
            endpoint: "/services".to_string(),
            message: "This node is not a swarm manager.".to_string(),
        })
        .context("Reconstruction failed");
        assert_eq!(report(&unavailable), 2);

        let io = anyhow::Error::new(RecomposeError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        )))
        .context("Reconstruction failed");
        assert_eq!(report(&io), 3);

        assert_eq!(report(&anyhow::anyhow!("unexpected")), 1);
    }
}
