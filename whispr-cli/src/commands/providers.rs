//! Providers command - list available providers.

use anyhow::Result;
use tracing::info;
use whispr_providers::list_providers;
use whispr_store::SettingsStore;

use crate::output::{JsonFormatter, ProviderOutput, TextFormatter};
use crate::runtime::credential_source;
use crate::{Cli, OutputFormat};

/// Runs the providers command.
pub async fn run(cli: &Cli) -> Result<()> {
    info!("Listing providers");

    let providers = list_providers();
    let active = SettingsStore::load_default().await?.active_provider().await;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!(" {}", formatter.format_providers_header());
            println!("{}", "─".repeat(70));

            for config in providers {
                let source = credential_source(config.id);
                println!(
                    "{}",
                    formatter.format_provider_line(config, source, config.id == active)
                );
            }

            if !cli.quiet {
                println!();
                println!(
                    "Total: {} providers ({} accept files). * marks the active provider.",
                    providers.len(),
                    providers.iter().filter(|c| c.supports_multimodal).count()
                );
            }
        }
        OutputFormat::Json => {
            let outputs: Vec<ProviderOutput> = providers
                .iter()
                .map(|c| ProviderOutput::new(c, credential_source(c.id), c.id == active))
                .collect();
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&outputs)?);
        }
    }

    Ok(())
}
