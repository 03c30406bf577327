//! Command execution
//!
//! Loads configuration, opens the store, and dispatches the selected
//! subcommand.

use crate::aggregate::AgeDistribution;
use crate::config::AppConfig;
use crate::error::Result;
use crate::server;
use crate::store::Store;
use crate::stream;
use std::sync::Arc;

/// Executes CLI commands
pub struct Runner {
    cli: crate::cli::Cli,
}

impl Runner {
    /// Create a runner from parsed arguments
    pub fn new(cli: crate::cli::Cli) -> Self {
        Self { cli }
    }

    /// Execute the selected command
    pub async fn run(&self) -> Result<()> {
        let mut config = AppConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            crate::cli::Commands::Ingest { source, batch_size } => {
                if let Some(source) = source {
                    config.source = Some(source.clone());
                }
                if let Some(batch_size) = batch_size {
                    config.batch_size = *batch_size;
                }
                config.validate()?;
                self.run_ingest(&config)
            }
            crate::cli::Commands::Stats => self.run_stats(&config),
            crate::cli::Commands::Serve { port } => {
                let store = Arc::new(Store::open(&config.database)?);
                server::serve(config, store, *port).await
            }
        }
    }

    fn run_ingest(&self, config: &AppConfig) -> Result<()> {
        let source = config.require_source()?.to_path_buf();
        let store = Store::open(&config.database)?;

        let report = stream::ingest_file(&source, &store, config.batch_size, |rows| {
            tracing::info!(rows, "ingest progress");
        })?;

        let distribution = AgeDistribution::from_counts(store.age_counts()?);
        let summary = serde_json::json!({
            "processed_rows": report.rows_processed,
            "headers": report.headers,
            "persisted_rows": store.count()?,
            "age_distribution": distribution,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }

    fn run_stats(&self, config: &AppConfig) -> Result<()> {
        let store = Store::open(&config.database)?;
        let distribution = AgeDistribution::from_counts(store.age_counts()?);
        println!("{}", serde_json::to_string_pretty(&distribution)?);
        Ok(())
    }
}
