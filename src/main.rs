use clap::Parser;
use placemap::utils::{logger, validation::Validate};
use placemap::{visualize, CliConfig, PlacesError, RunConfig, TracingReporter};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Exits with usage text unless exactly one input path is given
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting placemap");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match RunConfig::from_cli(&cli).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => fail("❌ Configuration validation failed", e),
    };

    if cli.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    match visualize(config, TracingReporter, cli.monitor).await {
        Ok(output_path) => {
            println!("✅ Map written to: {}", output_path);
        }
        Err(e) => fail("❌ Map generation failed", e),
    }
}

fn fail(context: &str, e: PlacesError) -> ! {
    tracing::error!(
        "{}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
