use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::utils::error::CatalogError;

/// 生物屬性（上游稱為 type），固定 18 種
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Normal,
        Category::Fire,
        Category::Water,
        Category::Grass,
        Category::Electric,
        Category::Ice,
        Category::Fighting,
        Category::Poison,
        Category::Ground,
        Category::Flying,
        Category::Psychic,
        Category::Bug,
        Category::Rock,
        Category::Ghost,
        Category::Dragon,
        Category::Dark,
        Category::Steel,
        Category::Fairy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Fire => "fire",
            Category::Water => "water",
            Category::Grass => "grass",
            Category::Electric => "electric",
            Category::Ice => "ice",
            Category::Fighting => "fighting",
            Category::Poison => "poison",
            Category::Ground => "ground",
            Category::Flying => "flying",
            Category::Psychic => "psychic",
            Category::Bug => "bug",
            Category::Rock => "rock",
            Category::Ghost => "ghost",
            Category::Dragon => "dragon",
            Category::Dark => "dark",
            Category::Steel => "steel",
            Category::Fairy => "fairy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| CatalogError::InvalidConfigValueError {
                field: "category".to_string(),
                value: s.to_string(),
                reason: "Unknown category".to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
    Mythical,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
            Rarity::Mythical => "mythical",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "rare" => Ok(Rarity::Rare),
            "legendary" => Ok(Rarity::Legendary),
            "mythical" => Ok(Rarity::Mythical),
            _ => Err(CatalogError::InvalidConfigValueError {
                field: "rarity".to_string(),
                value: s.to_string(),
                reason: "Expected one of: common, rare, legendary, mythical".to_string(),
            }),
        }
    }
}

/// 清單 API 中的一筆 (name, url)，解析成 CatalogRecord 後即丟棄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "url")]
    pub reference: Url,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// 正規化後的生物紀錄，建立後不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u32,
    pub name: String,
    pub artwork: Option<Url>,
    pub categories: Vec<Category>,
    pub height_meters: f64,
    pub weight_kilograms: f64,
    pub stats: Vec<Stat>,
    pub abilities: Vec<String>,
    pub species: String,
    /// 只有啟用 species enrichment 時才會有值
    pub evolution_stage: Option<u8>,
    pub rarity: Option<Rarity>,
}

impl CatalogRecord {
    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn with_traits(mut self, traits: SpeciesTraits) -> Self {
        self.evolution_stage = Some(traits.evolution_stage);
        self.rarity = Some(traits.rarity);
        self
    }
}

/// 進化階段與稀有度，來自 species / evolution-chain 端點
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesTraits {
    pub evolution_stage: u8,
    pub rarity: Rarity,
}

/// 篩選條件；每個群組為空代表不限制
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub name_substring: String,
    pub categories: HashSet<Category>,
    pub evolution_stages: BTreeSet<u8>,
    pub rarities: HashSet<Rarity>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name_substring = name.into();
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn with_evolution_stages(mut self, stages: impl IntoIterator<Item = u8>) -> Self {
        self.evolution_stages.extend(stages);
        self
    }

    pub fn with_rarities(mut self, rarities: impl IntoIterator<Item = Rarity>) -> Self {
        self.rarities.extend(rarities);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name_substring.is_empty()
            && self.categories.is_empty()
            && self.evolution_stages.is_empty()
            && self.rarities.is_empty()
    }
}

/// 因 FailurePolicy::Skip 而被略過的清單項目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedEntry {
    pub name: String,
    pub reason: String,
}

/// 單次 session 的完整目錄，依 id 排序
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub records: Vec<CatalogRecord>,
    pub total_available: u64,
    pub skipped: Vec<SkippedEntry>,
    pub fetched_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(mut records: Vec<CatalogRecord>, total_available: u64, skipped: Vec<SkippedEntry>) -> Self {
        records.sort_by_key(|r| r.id);
        Self {
            records,
            total_available,
            skipped,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&CatalogRecord> {
        self.records
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// 目錄中實際出現過的屬性，依列舉順序
    pub fn available_categories(&self) -> Vec<Category> {
        let present: BTreeSet<Category> = self
            .records
            .iter()
            .flat_map(|r| r.categories.iter().copied())
            .collect();
        present.into_iter().collect()
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<&CatalogRecord> {
        crate::core::filter::apply_filters(&self.records, criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u32, name: &str, categories: Vec<Category>) -> CatalogRecord {
        CatalogRecord {
            id,
            name: name.to_string(),
            artwork: None,
            categories,
            height_meters: 1.0,
            weight_kilograms: 10.0,
            stats: vec![],
            abilities: vec![],
            species: name.to_string(),
            evolution_stage: None,
            rarity: None,
        }
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("fire".parse::<Category>().unwrap(), Category::Fire);
        assert_eq!(" Water ".parse::<Category>().unwrap(), Category::Water);
        assert!("shadow".parse::<Category>().is_err());
        assert_eq!(Category::Psychic.to_string(), "psychic");
        assert_eq!(Category::ALL.len(), 18);
    }

    #[test]
    fn test_rarity_parse() {
        assert_eq!("Legendary".parse::<Rarity>().unwrap(), Rarity::Legendary);
        assert!("epic".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_catalog_sorts_by_id_and_lists_categories() {
        let catalog = Catalog::new(
            vec![
                record(4, "charmander", vec![Category::Fire]),
                record(1, "bulbasaur", vec![Category::Grass, Category::Poison]),
            ],
            1302,
            vec![],
        );

        let ids: Vec<u32> = catalog.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
        assert_eq!(catalog.get(4).unwrap().name, "charmander");
        assert!(catalog.get(2).is_none());
        assert_eq!(
            catalog.available_categories(),
            vec![Category::Fire, Category::Grass, Category::Poison]
        );
    }

    #[test]
    fn test_criteria_builder() {
        assert!(FilterCriteria::new().is_empty());
        let criteria = FilterCriteria::new()
            .with_name("char")
            .with_categories([Category::Fire]);
        assert!(!criteria.is_empty());
        assert!(criteria.categories.contains(&Category::Fire));
    }
}
