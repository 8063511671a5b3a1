use crate::core::schema::{lookup, validate_evolution_chain, validate_species};
use crate::domain::model::{Rarity, SpeciesTraits};
use crate::utils::error::{CatalogError, Result};
use serde_json::Value;
use url::Url;

/// capture_rate 小於等於此值視為 Rare
pub const RARE_CAPTURE_RATE: u64 = 45;

pub fn rarity_of(species: &Value) -> Result<Rarity> {
    let flag = |path: &str| {
        lookup(species, path)
            .and_then(Value::as_bool)
            .ok_or_else(|| CatalogError::mapping(path))
    };

    if flag("is_mythical")? {
        return Ok(Rarity::Mythical);
    }
    if flag("is_legendary")? {
        return Ok(Rarity::Legendary);
    }

    let capture_rate = lookup(species, "capture_rate")
        .and_then(Value::as_u64)
        .ok_or_else(|| CatalogError::mapping("capture_rate"))?;

    Ok(if capture_rate <= RARE_CAPTURE_RATE {
        Rarity::Rare
    } else {
        Rarity::Common
    })
}

pub fn evolution_chain_url(species: &Value) -> Result<Url> {
    lookup(species, "evolution_chain.url")
        .and_then(Value::as_str)
        .and_then(|raw| Url::parse(raw).ok())
        .ok_or_else(|| CatalogError::mapping("evolution_chain.url"))
}

fn depth_of(node: &Value, species_name: &str, depth: u8) -> Option<u8> {
    if lookup(node, "species.name").and_then(Value::as_str) == Some(species_name) {
        return Some(depth);
    }

    node.get("evolves_to")
        .and_then(Value::as_array)?
        .iter()
        .find_map(|child| depth_of(child, species_name, depth.saturating_add(1)))
}

/// 物種在進化鏈中的階段，從 1 開始
pub fn evolution_stage(chain: &Value, species_name: &str) -> Result<u8> {
    let root = chain
        .get("chain")
        .ok_or_else(|| CatalogError::mapping("chain"))?;

    depth_of(root, species_name, 1)
        .ok_or_else(|| CatalogError::mapping(format!("chain[species={}]", species_name)))
}

/// 驗證 species 與 evolution-chain 回應後算出進化階段與稀有度
pub fn species_traits(species: &Value, chain: &Value, species_name: &str) -> Result<SpeciesTraits> {
    validate_species(species)?;
    validate_evolution_chain(chain)?;

    Ok(SpeciesTraits {
        evolution_stage: evolution_stage(chain, species_name)?,
        rarity: rarity_of(species)?,
    })
}
