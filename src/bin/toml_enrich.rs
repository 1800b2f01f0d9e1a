use anyhow::Context;
use clap::Parser;
use wikidata_enrich::adapters::sparql::build_query;
use wikidata_enrich::adapters::table::read_places;
use wikidata_enrich::core::{ConfigProvider, Storage};
use wikidata_enrich::utils::{logger, validation::Validate};
use wikidata_enrich::{EtlEngine, LocalStorage, LookupPipeline, QueryMode, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-enrich")]
#[command(about = "Wikidata enrichment driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "enrich.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show what would be processed without querying the endpoint
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 先載入配置才知道日誌格式
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let verbose = args.verbose || config.verbose();
    if config.json_logging() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No queries will be sent");
        return perform_dry_run(&config).await;
    }

    let pipeline = LookupPipeline::new(LocalStorage::default(), config)
        .context("Failed to set up the lookup client")?;
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(report) => {
            println!("✅ Results saved to {}", report.output_path);
            println!(
                "📊 {} rows: {} strict, {} relaxed, {} not found, {} failed ({:?})",
                report.summary.total(),
                report.summary.strict_matches,
                report.summary.relaxed_matches,
                report.summary.not_found,
                report.summary.failed,
                report.elapsed
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ Enrichment failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Input: {}", config.input_path());
    println!(
        "  Columns: place='{}', country='{}'",
        config.place_column(),
        config.country_column()
    );
    println!("  Output: {}", config.output_path());
    println!("  Endpoint: {}", config.endpoint());
    println!("  User-Agent: {}", config.user_agent());
    println!("  Concurrent Requests: {}", config.concurrent_requests());

    if let Some(timeout) = config.timeout_seconds() {
        println!("  Timeout: {}s", timeout);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::default();
    let data = storage
        .read_file(config.input_path())
        .await
        .with_context(|| format!("Cannot read {}", config.input_path()))?;
    let places = read_places(
        &data,
        config.input_path(),
        config.place_column(),
        config.country_column(),
        config.delimiter(),
    )?;

    println!("🔍 Dry Run Analysis:");
    println!("  Rows to resolve: {}", places.len());
    println!("  Max requests: {}", places.len() * 2);

    if let Some(first) = places.first() {
        println!();
        println!("📡 Queries for first row ({}, {}):", first.place, first.country);
        let strict = build_query(&first.place, &first.country, QueryMode::Strict);
        let relaxed = build_query(&first.place, &first.country, QueryMode::Relaxed);
        println!("--- strict ---{}", strict);
        println!("--- relaxed ---{}", relaxed);
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
