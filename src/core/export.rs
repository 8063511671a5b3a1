use crate::domain::model::CatalogRecord;
use crate::domain::ports::Storage;
use crate::utils::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
    Tsv,
}

const COLUMNS: [&str; 10] = [
    "id",
    "name",
    "categories",
    "height_m",
    "weight_kg",
    "species",
    "abilities",
    "evolution_stage",
    "rarity",
    "artwork",
];

fn categories_cell(record: &CatalogRecord) -> String {
    record
        .categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

fn row(record: &CatalogRecord) -> [String; 10] {
    [
        record.id.to_string(),
        record.name.clone(),
        categories_cell(record),
        record.height_meters.to_string(),
        record.weight_kilograms.to_string(),
        record.species.clone(),
        record.abilities.join("|"),
        record
            .evolution_stage
            .map(|s| s.to_string())
            .unwrap_or_default(),
        record.rarity.map(|r| r.to_string()).unwrap_or_default(),
        record
            .artwork
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_default(),
    ]
}

fn render_delimited(records: &[&CatalogRecord], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.write_record(row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CatalogError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CatalogError::IoError(std::io::Error::other(e)))
}

fn render_table(records: &[&CatalogRecord]) -> String {
    let mut out = format!(
        "{:>5}  {:<16} {:<18} {:>8} {:>9}\n",
        "ID", "NAME", "CATEGORIES", "HEIGHT", "WEIGHT"
    );
    for record in records {
        out.push_str(&format!(
            "{:>5}  {:<16} {:<18} {:>7}m {:>7}kg\n",
            record.id,
            record.name,
            categories_cell(record),
            record.height_meters,
            record.weight_kilograms
        ));
    }
    out
}

pub fn render_records(records: &[&CatalogRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(records)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Csv => render_delimited(records, b','),
        OutputFormat::Tsv => render_delimited(records, b'\t'),
    }
}

/// 詳細頁：單筆紀錄的所有欄位
pub fn render_record(record: &CatalogRecord, format: OutputFormat) -> Result<String> {
    if format != OutputFormat::Table {
        return match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            _ => render_records(&[record], format),
        };
    }

    let mut out = String::new();
    out.push_str(&format!("#{:03} {}\n", record.id, record.name));
    out.push_str(&format!("  categories : {}\n", categories_cell(record).replace('|', ", ")));
    out.push_str(&format!("  species    : {}\n", record.species));
    out.push_str(&format!("  height     : {} m\n", record.height_meters));
    out.push_str(&format!("  weight     : {} kg\n", record.weight_kilograms));
    out.push_str(&format!("  abilities  : {}\n", record.abilities.join(", ")));
    if let Some(stage) = record.evolution_stage {
        out.push_str(&format!("  evolution  : stage {}\n", stage));
    }
    if let Some(rarity) = record.rarity {
        out.push_str(&format!("  rarity     : {}\n", rarity));
    }
    if let Some(artwork) = &record.artwork {
        out.push_str(&format!("  artwork    : {}\n", artwork));
    }
    out.push_str("  stats:\n");
    for stat in &record.stats {
        out.push_str(&format!("    {:<16} {:>3}\n", stat.name, stat.value));
    }
    Ok(out)
}

/// 將紀錄寫到 storage，回傳實際寫入的路徑
pub async fn export_records<S: Storage>(
    storage: &S,
    filename: &str,
    records: &[&CatalogRecord],
    format: OutputFormat,
) -> Result<String> {
    let content = render_records(records, format)?;
    tracing::debug!("💾 Writing {} records ({} bytes) to {}", records.len(), content.len(), filename);
    storage.write_file(filename, content.as_bytes()).await
}
