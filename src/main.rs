use clap::Parser;
use creature_catalog::config::{Command, ListArgs, ShowArgs};
use creature_catalog::core::export::{export_records, render_record, render_records};
use creature_catalog::core::ConfigProvider;
use creature_catalog::utils::{logger, validation::Validate};
use creature_catalog::{
    CatalogFetcher, CliConfig, FetchOptions, LocalStorage, PokeApiSource, Result, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting catalog CLI");

    // 載入 TOML 配置，命令列參數優先
    let mut config = match TomlConfig::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    let result = match &cli.command {
        Command::List(args) => run_list(&config, args).await,
        Command::Show(args) => run_show(&config, args).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ Catalog command failed: {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run_list(config: &TomlConfig, args: &ListArgs) -> Result<()> {
    let criteria = args.criteria()?;

    let source = PokeApiSource::from_config(config)?;
    let fetcher = CatalogFetcher::with_options(source, FetchOptions::from_config(config));
    let catalog = fetcher.fetch_catalog(config.limit(), config.offset()).await?;

    for skipped in &catalog.skipped {
        eprintln!("⚠️ Skipped {}: {}", skipped.name, skipped.reason);
    }

    let filtered = catalog.filter(&criteria);
    tracing::info!(
        "🔍 {} of {} records match the filters",
        filtered.len(),
        catalog.len()
    );

    if filtered.is_empty() {
        println!("No records match the current filters.");
        return Ok(());
    }

    match &config.output.output_path {
        Some(path) => {
            let (storage, filename) = LocalStorage::for_file(path);
            let written =
                export_records(&storage, &filename, &filtered, config.output.format).await?;
            println!("📁 Wrote {} records to {}", filtered.len(), written);
        }
        None => print!("{}", render_records(&filtered, config.output.format)?),
    }

    Ok(())
}

async fn run_show(config: &TomlConfig, args: &ShowArgs) -> Result<()> {
    let source = PokeApiSource::from_config(config)?;
    let fetcher = CatalogFetcher::with_options(source, FetchOptions::from_config(config));

    let record = fetcher.fetch_one(&args.id).await?;
    print!("{}", render_record(&record, config.output.format)?);
    Ok(())
}
