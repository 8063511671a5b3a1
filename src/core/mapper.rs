use crate::core::schema::lookup;
use crate::domain::model::{CatalogRecord, Category, Stat};
use crate::utils::error::{CatalogError, Result};
use serde_json::Value;
use url::Url;

const ARTWORK_PATH: &str = "other.official-artwork.front_default";

fn require<'a>(value: &'a Value, path: &str, display: &str) -> Result<&'a Value> {
    lookup(value, path)
        .filter(|v| !v.is_null())
        .ok_or_else(|| CatalogError::mapping(display))
}

fn require_str<'a>(value: &'a Value, path: &str, display: &str) -> Result<&'a str> {
    require(value, path, display)?
        .as_str()
        .ok_or_else(|| CatalogError::mapping(display))
}

fn require_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    require(value, path, path)?
        .as_array()
        .ok_or_else(|| CatalogError::mapping(path))
}

fn require_u32(value: &Value, path: &str, display: &str) -> Result<u32> {
    require(value, path, display)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| CatalogError::mapping(display))
}

/// 原始資料以分米 / 百克為單位，轉成公尺 / 公斤
fn tenths(value: &Value, path: &str) -> Result<f64> {
    let raw = require(value, path, path)?
        .as_f64()
        .filter(|n| *n >= 0.0)
        .ok_or_else(|| CatalogError::mapping(path))?;
    Ok(raw / 10.0)
}

fn map_artwork(payload: &Value) -> Result<Option<Url>> {
    let sprites = require(payload, "sprites", "sprites")?;
    match lookup(sprites, ARTWORK_PATH).and_then(Value::as_str) {
        Some(raw) => Url::parse(raw)
            .map(Some)
            .map_err(|_| CatalogError::mapping(format!("sprites.{}", ARTWORK_PATH))),
        None => Ok(None),
    }
}

fn map_categories(payload: &Value) -> Result<Vec<Category>> {
    let types = require_array(payload, "types")?;
    if types.is_empty() {
        return Err(CatalogError::mapping("types"));
    }

    types
        .iter()
        .enumerate()
        .map(|(idx, entry)| -> Result<Category> {
            let path = format!("types[{}].type.name", idx);
            require_str(entry, "type.name", &path)?
                .parse::<Category>()
                .map_err(|_| CatalogError::mapping(path))
        })
        .collect()
}

fn map_stats(payload: &Value) -> Result<Vec<Stat>> {
    require_array(payload, "stats")?
        .iter()
        .enumerate()
        .map(|(idx, entry)| -> Result<Stat> {
            Ok(Stat {
                name: require_str(entry, "stat.name", &format!("stats[{}].stat.name", idx))?
                    .to_string(),
                value: require_u32(entry, "base_stat", &format!("stats[{}].base_stat", idx))?,
            })
        })
        .collect()
}

fn map_abilities(payload: &Value) -> Result<Vec<String>> {
    require_array(payload, "abilities")?
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            require_str(
                entry,
                "ability.name",
                &format!("abilities[{}].ability.name", idx),
            )
            .map(str::to_string)
        })
        .collect()
}

/// 將單筆 detail 回應轉為 CatalogRecord
///
/// 除了 artwork 以外，缺少任何必要欄位都會回傳 `CatalogError::Mapping`，
/// 並附上欄位路徑（例如 `types[1].type.name`）。
pub fn map_detail(payload: &Value) -> Result<CatalogRecord> {
    let id = require_u32(payload, "id", "id")?;
    if id == 0 {
        return Err(CatalogError::mapping("id"));
    }

    Ok(CatalogRecord {
        id,
        name: require_str(payload, "name", "name")?.to_lowercase(),
        artwork: map_artwork(payload)?,
        categories: map_categories(payload)?,
        height_meters: tenths(payload, "height")?,
        weight_kilograms: tenths(payload, "weight")?,
        stats: map_stats(payload)?,
        abilities: map_abilities(payload)?,
        species: require_str(payload, "species.name", "species.name")?.to_string(),
        evolution_stage: None,
        rarity: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bulbasaur() -> Value {
        json!({
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "sprites": {
                "front_default": "https://example.com/front/1.png",
                "other": {
                    "official-artwork": {
                        "front_default": "https://example.com/artwork/1.png"
                    }
                }
            },
            "types": [
                {"slot": 1, "type": {"name": "grass", "url": "https://pokeapi.co/api/v2/type/12/"}},
                {"slot": 2, "type": {"name": "poison", "url": "https://pokeapi.co/api/v2/type/4/"}}
            ],
            "stats": [
                {"base_stat": 45, "effort": 0, "stat": {"name": "hp"}},
                {"base_stat": 49, "effort": 0, "stat": {"name": "attack"}}
            ],
            "abilities": [
                {"ability": {"name": "overgrow"}, "is_hidden": false},
                {"ability": {"name": "chlorophyll"}, "is_hidden": true}
            ],
            "species": {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon-species/1/"}
        })
    }

    fn mapping_path(err: CatalogError) -> String {
        match err {
            CatalogError::Mapping { path } => path,
            other => panic!("expected mapping error, got {:?}", other),
        }
    }

    #[test]
    fn test_map_full_record() {
        let record = map_detail(&bulbasaur()).unwrap();

        assert_eq!(record.id, 1);
        assert_eq!(record.name, "bulbasaur");
        assert_eq!(
            record.artwork.as_ref().map(Url::as_str),
            Some("https://example.com/artwork/1.png")
        );
        assert_eq!(record.categories, vec![Category::Grass, Category::Poison]);
        assert_eq!(record.height_meters, 0.7);
        assert_eq!(record.weight_kilograms, 6.9);
        assert_eq!(
            record.stats,
            vec![
                Stat { name: "hp".to_string(), value: 45 },
                Stat { name: "attack".to_string(), value: 49 },
            ]
        );
        assert_eq!(record.abilities, vec!["overgrow", "chlorophyll"]);
        assert_eq!(record.species, "bulbasaur");
        assert!(record.evolution_stage.is_none());
        assert!(record.rarity.is_none());
    }

    #[test]
    fn test_missing_artwork_is_not_an_error() {
        let mut payload = bulbasaur();
        payload["sprites"]["other"]["official-artwork"]["front_default"] = Value::Null;
        assert!(map_detail(&payload).unwrap().artwork.is_none());

        payload["sprites"] = json!({});
        assert!(map_detail(&payload).unwrap().artwork.is_none());
    }

    #[test]
    fn test_missing_sprites_is_an_error() {
        let mut payload = bulbasaur();
        payload.as_object_mut().unwrap().remove("sprites");
        assert_eq!(mapping_path(map_detail(&payload).unwrap_err()), "sprites");
    }

    #[test]
    fn test_missing_types_is_an_error() {
        let mut payload = bulbasaur();
        payload.as_object_mut().unwrap().remove("types");
        assert_eq!(mapping_path(map_detail(&payload).unwrap_err()), "types");

        payload["types"] = json!([]);
        assert_eq!(mapping_path(map_detail(&payload).unwrap_err()), "types");
    }

    #[test]
    fn test_nested_path_is_reported() {
        let mut payload = bulbasaur();
        payload["types"][1] = json!({"slot": 2, "type": {}});
        assert_eq!(
            mapping_path(map_detail(&payload).unwrap_err()),
            "types[1].type.name"
        );

        let mut payload = bulbasaur();
        payload["stats"][0]["base_stat"] = json!("high");
        assert_eq!(
            mapping_path(map_detail(&payload).unwrap_err()),
            "stats[0].base_stat"
        );
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut payload = bulbasaur();
        payload["types"][0]["type"]["name"] = json!("stellar");
        assert_eq!(
            mapping_path(map_detail(&payload).unwrap_err()),
            "types[0].type.name"
        );
    }

    #[test]
    fn test_duplicate_abilities_are_kept() {
        let mut payload = bulbasaur();
        payload["abilities"] = json!([
            {"ability": {"name": "overgrow"}},
            {"ability": {"name": "overgrow"}}
        ]);
        assert_eq!(
            map_detail(&payload).unwrap().abilities,
            vec!["overgrow", "overgrow"]
        );
    }

    #[test]
    fn test_decimal_division() {
        let mut payload = bulbasaur();
        payload["height"] = json!(17);
        payload["weight"] = json!(905);
        let record = map_detail(&payload).unwrap();
        assert_eq!(record.height_meters, 1.7);
        assert_eq!(record.weight_kilograms, 90.5);
    }
}
