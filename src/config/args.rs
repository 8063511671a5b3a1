use crate::config::toml_config::TomlConfig;
use crate::core::export::OutputFormat;
use crate::domain::model::{Category, FilterCriteria, Rarity};
use crate::domain::ports::FailurePolicy;
use crate::utils::error::Result;
use crate::utils::validation::validate_search_term;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "catalog")]
#[command(about = "Browse and filter the creature catalog served by PokeAPI")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to ./catalog.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the upstream base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch the catalog and print the records matching the filters
    List(ListArgs),
    /// Fetch and print a single record by id or name
    Show(ShowArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub limit: Option<usize>,

    #[arg(long)]
    pub offset: Option<usize>,

    /// Case-insensitive name search (at least 3 characters)
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub category: Vec<Category>,

    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(1..=3))]
    pub stage: Vec<u8>,

    #[arg(long, value_delimiter = ',')]
    pub rarity: Vec<Rarity>,

    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// Skip records whose detail request fails instead of aborting
    #[arg(long)]
    pub skip_failed: bool,

    /// Fetch species data to fill evolution stage and rarity
    #[arg(long)]
    pub enrich_species: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ShowArgs {
    /// Numeric id or lowercase name
    pub id: String,

    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long)]
    pub enrich_species: bool,
}

impl CliConfig {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(base_url) = &self.base_url {
            config.source.base_url = base_url.clone();
        }

        match &self.command {
            Command::List(args) => {
                if let Some(limit) = args.limit {
                    config.fetch.limit = limit;
                }
                if let Some(offset) = args.offset {
                    config.fetch.offset = offset;
                }
                if let Some(concurrent) = args.concurrent_requests {
                    config.fetch.concurrent_requests = concurrent;
                }
                if args.skip_failed {
                    config.fetch.on_detail_failure = FailurePolicy::Skip;
                }
                if args.enrich_species {
                    config.fetch.enrich_species = true;
                }
                if let Some(format) = args.format {
                    config.output.format = format;
                }
                if args.output.is_some() {
                    config.output.output_path = args.output.clone();
                }
            }
            Command::Show(args) => {
                if args.enrich_species {
                    config.fetch.enrich_species = true;
                }
                if let Some(format) = args.format {
                    config.output.format = format;
                }
            }
        }
    }
}

impl ListArgs {
    pub fn criteria(&self) -> Result<FilterCriteria> {
        let search = self.search.as_deref().unwrap_or_default();
        validate_search_term("search", search)?;

        Ok(FilterCriteria::new()
            .with_name(search.trim())
            .with_categories(self.category.iter().copied())
            .with_evolution_stages(self.stage.iter().copied())
            .with_rarities(self.rarity.iter().copied()))
    }
}
