use clap::Parser;
use immuntrack::adapters::csv_tables;
use immuntrack::core::ConfigProvider;
use immuntrack::domain::model::StatusMode;
use immuntrack::utils::error::ErrorSeverity;
use immuntrack::utils::{logger, validation::Validate};
use immuntrack::{LocalStorage, ReportEngine, StatusPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Requirement report with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "immuntrack.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override status mode from config (missing | percent)
    #[arg(long)]
    mode: Option<StatusMode>,

    /// Dry run - show what would be evaluated without writing reports
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose || config.verbose_logging(), config.json_logging());
    tracing::info!("🚀 Starting TOML-based requirement report");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(mode) = args.mode {
        config.evaluation.mode = mode;
        tracing::info!("🔧 Status mode overridden to: {}", mode);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No reports will be written");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let source = LocalStorage::new(config.data_dir().to_string());
    let sink = LocalStorage::new(config.output_path().to_string());
    let pipeline = StatusPipeline::new(source, sink, config);
    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Report completed successfully!");
            println!("✅ Report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    match &config.report.version {
        Some(version) => println!("  Report: {} v{}", config.report.name, version),
        None => println!("  Report: {}", config.report.name),
    }
    if let Some(description) = &config.report.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.reference_endpoint().unwrap_or(config.data_dir()));
    println!("  User: {}", config.user_id());
    println!("  Mode: {}", config.status_mode());
    match config.today() {
        Some(today) => println!("  Evaluation date: {}", today),
        None => println!("  Evaluation date: today"),
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if let Some(archive) = config.archive_name() {
        println!("  Archive: {}", archive);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    let storage = LocalStorage::new(config.data_dir().to_string());

    println!("📡 Reference Data:");
    if let Some(endpoint) = config.reference_endpoint() {
        println!("  Endpoint: {} (not contacted during dry run)", endpoint);
    } else {
        let reference = csv_tables::read_reference(&storage).await?;
        println!("  Countries: {}", reference.countries.len());
        println!("  Illnesses: {}", reference.illnesses.len());
        println!("  Vaccines: {}", reference.vaccines.len());
        println!("  Requirements: {}", reference.requirements.len());

        let without_rules = reference
            .countries
            .iter()
            .filter(|c| reference.requirements_for(c.id).is_empty())
            .count();
        println!("  Countries without requirements: {}", without_rules);
    }

    println!();
    println!("💉 Vaccination Records:");
    let vaccinations = csv_tables::read_vaccinations(&storage, config.user_id()).await?;
    let doses: usize = vaccinations.iter().map(|v| v.dates.len()).sum();
    println!("  Vaccinations: {}", vaccinations.len());
    println!("  Doses: {}", doses);

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
