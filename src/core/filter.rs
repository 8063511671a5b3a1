use crate::domain::model::{CatalogRecord, FilterCriteria};

fn matches_name(record: &CatalogRecord, needle: &str) -> bool {
    needle.is_empty() || record.name.to_lowercase().contains(needle)
}

fn matches_categories(record: &CatalogRecord, criteria: &FilterCriteria) -> bool {
    criteria.categories.is_empty()
        || record
            .categories
            .iter()
            .any(|c| criteria.categories.contains(c))
}

fn matches_stage(record: &CatalogRecord, criteria: &FilterCriteria) -> bool {
    criteria.evolution_stages.is_empty()
        || record
            .evolution_stage
            .is_some_and(|stage| criteria.evolution_stages.contains(&stage))
}

fn matches_rarity(record: &CatalogRecord, criteria: &FilterCriteria) -> bool {
    criteria.rarities.is_empty()
        || record
            .rarity
            .is_some_and(|rarity| criteria.rarities.contains(&rarity))
}

/// 套用篩選條件，保留原本的相對順序
///
/// 群組之間為 AND，群組內為 OR；空群組不做限制。沒有 evolution_stage /
/// rarity 的紀錄不會符合非空的對應群組。
pub fn apply_filters<'a>(
    catalog: &'a [CatalogRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a CatalogRecord> {
    let needle = criteria.name_substring.to_lowercase();

    catalog
        .iter()
        .filter(|record| {
            matches_name(record, &needle)
                && matches_categories(record, criteria)
                && matches_stage(record, criteria)
                && matches_rarity(record, criteria)
        })
        .collect()
}
