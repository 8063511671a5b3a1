use crate::domain::model::ListingResponse;
use crate::utils::error::{CatalogError, Result};
use serde_json::Value;
use url::Url;

/// 欄位預期的基本型別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// 可缺少、可為 null，否則必須是字串
    OptionalString,
    Number,
    UnsignedInteger,
    Bool,
    Array,
    Object,
    /// 語法正確的絕對 URI
    Uri,
}

pub const LISTING_FIELDS: &[(&str, FieldKind)] = &[
    ("count", FieldKind::UnsignedInteger),
    ("next", FieldKind::OptionalString),
    ("previous", FieldKind::OptionalString),
    ("results", FieldKind::Array),
];

pub const ENTRY_FIELDS: &[(&str, FieldKind)] =
    &[("name", FieldKind::String), ("url", FieldKind::Uri)];

/// 巢狀結構交給 mapper 檢查，這裡只確認頂層基本欄位
pub const DETAIL_FIELDS: &[(&str, FieldKind)] = &[
    ("id", FieldKind::UnsignedInteger),
    ("name", FieldKind::String),
    ("height", FieldKind::Number),
    ("weight", FieldKind::Number),
];

pub const SPECIES_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::String),
    ("is_legendary", FieldKind::Bool),
    ("is_mythical", FieldKind::Bool),
    ("capture_rate", FieldKind::UnsignedInteger),
    ("evolution_chain.url", FieldKind::Uri),
];

pub const EVOLUTION_CHAIN_FIELDS: &[(&str, FieldKind)] = &[
    ("chain", FieldKind::Object),
    ("chain.species.name", FieldKind::String),
    ("chain.evolves_to", FieldKind::Array),
];

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            FieldKind::String | FieldKind::OptionalString => "string",
            FieldKind::Number => "number",
            FieldKind::UnsignedInteger => "non-negative integer",
            FieldKind::Bool => "boolean",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Uri => "URI string",
        }
    }

    fn check(&self, value: Option<&Value>) -> std::result::Result<(), String> {
        let value = match value {
            Some(v) => v,
            None if *self == FieldKind::OptionalString => return Ok(()),
            None => return Err("required field is missing".to_string()),
        };

        let ok = match self {
            FieldKind::String => value.is_string(),
            FieldKind::OptionalString => value.is_null() || value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::UnsignedInteger => value.as_u64().is_some(),
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Uri => match value.as_str() {
                Some(raw) => {
                    return Url::parse(raw)
                        .map(|_| ())
                        .map_err(|e| format!("invalid URI `{}`: {}", raw, e));
                }
                None => false,
            },
        };

        if ok {
            Ok(())
        } else {
            Err(format!(
                "expected {}, found {}",
                self.describe(),
                json_type_name(value)
            ))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 以 `a.b.c` 路徑取值
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, key| current.get(key))
}

fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else {
        format!("{}.{}", prefix, path)
    }
}

/// 收集所有違規，而不是遇到第一個就停止
#[derive(Debug, Default)]
pub struct SchemaCheck {
    violations: Vec<String>,
}

impl SchemaCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_fields(
        &mut self,
        value: &Value,
        prefix: &str,
        fields: &[(&str, FieldKind)],
    ) -> &mut Self {
        if !value.is_object() {
            let at = if prefix.is_empty() { "payload" } else { prefix };
            self.violations
                .push(format!("{}: expected object, found {}", at, json_type_name(value)));
            return self;
        }

        for (path, kind) in fields {
            if let Err(reason) = kind.check(lookup(value, path)) {
                self.violations
                    .push(format!("{}: {}", join_path(prefix, path), reason));
            }
        }
        self
    }

    pub fn finish(self) -> Result<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::validation(self.violations))
        }
    }
}

/// 驗證清單回應並轉成型別化結構
pub fn validate_listing(payload: &Value) -> Result<ListingResponse> {
    let mut check = SchemaCheck::new();
    check.check_fields(payload, "", LISTING_FIELDS);

    if let Some(results) = payload.get("results").and_then(Value::as_array) {
        for (idx, entry) in results.iter().enumerate() {
            check.check_fields(entry, &format!("results[{}]", idx), ENTRY_FIELDS);
        }
    }

    check.finish()?;
    Ok(serde_json::from_value(payload.clone())?)
}

pub fn validate_detail(payload: &Value) -> Result<()> {
    let mut check = SchemaCheck::new();
    check.check_fields(payload, "", DETAIL_FIELDS);
    check.finish()
}

pub fn validate_species(payload: &Value) -> Result<()> {
    let mut check = SchemaCheck::new();
    check.check_fields(payload, "", SPECIES_FIELDS);
    check.finish()
}

pub fn validate_evolution_chain(payload: &Value) -> Result<()> {
    let mut check = SchemaCheck::new();
    check.check_fields(payload, "", EVOLUTION_CHAIN_FIELDS);
    check.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violations_of(err: CatalogError) -> Vec<String> {
        match err {
            CatalogError::Validation { violations } => violations,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_listing_is_accepted() {
        let payload = json!({
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=2&limit=2",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        });

        let listing = validate_listing(&payload).unwrap();
        assert_eq!(listing.count, 1302);
        assert_eq!(listing.previous, None);
        assert_eq!(listing.results.len(), 2);
        assert_eq!(listing.results[1].name, "ivysaur");
        assert_eq!(
            listing.results[0].reference.as_str(),
            "https://pokeapi.co/api/v2/pokemon/1/"
        );
    }

    #[test]
    fn test_next_and_previous_may_be_absent() {
        let payload = json!({"count": 0, "results": []});
        let listing = validate_listing(&payload).unwrap();
        assert!(listing.next.is_none());
        assert!(listing.results.is_empty());
    }

    #[test]
    fn test_missing_results_is_reported() {
        let payload = json!({"count": 10, "next": null, "previous": null});
        let violations = violations_of(validate_listing(&payload).unwrap_err());
        assert_eq!(violations, vec!["results: required field is missing"]);
    }

    #[test]
    fn test_entry_without_name_is_reported() {
        let payload = json!({
            "count": 2,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        });
        let violations = violations_of(validate_listing(&payload).unwrap_err());
        assert_eq!(violations, vec!["results[1].name: required field is missing"]);
    }

    #[test]
    fn test_all_violations_are_collected() {
        let payload = json!({
            "count": "many",
            "next": 3,
            "results": [
                {"name": 7, "url": "not a uri"},
                "oops"
            ]
        });
        let violations = violations_of(validate_listing(&payload).unwrap_err());

        assert_eq!(violations.len(), 5);
        assert!(violations[0].starts_with("count: expected non-negative integer"));
        assert!(violations[1].starts_with("next: expected string"));
        assert!(violations[2].starts_with("results[0].name: expected string"));
        assert!(violations[3].starts_with("results[0].url: invalid URI"));
        assert!(violations[4].starts_with("results[1]: expected object"));
    }

    #[test]
    fn test_non_object_payload() {
        let violations = violations_of(validate_listing(&json!([1, 2])).unwrap_err());
        assert_eq!(violations, vec!["payload: expected object, found array"]);
    }

    #[test]
    fn test_detail_top_level_fields() {
        let ok = json!({"id": 1, "name": "bulbasaur", "height": 7, "weight": 69});
        assert!(validate_detail(&ok).is_ok());

        let bad = json!({"id": -1, "height": "tall", "weight": 69});
        let violations = violations_of(validate_detail(&bad).unwrap_err());
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().any(|v| v.starts_with("id:")));
        assert!(violations.iter().any(|v| v == "name: required field is missing"));
        assert!(violations.iter().any(|v| v.starts_with("height: expected number")));
    }

    #[test]
    fn test_species_nested_uri() {
        let payload = json!({
            "name": "mew",
            "is_legendary": false,
            "is_mythical": true,
            "capture_rate": 45,
            "evolution_chain": {"url": "https://pokeapi.co/api/v2/evolution-chain/78/"}
        });
        assert!(validate_species(&payload).is_ok());

        let missing = json!({"name": "mew", "is_legendary": false, "is_mythical": true, "capture_rate": 45});
        let violations = violations_of(validate_species(&missing).unwrap_err());
        assert_eq!(
            violations,
            vec!["evolution_chain.url: required field is missing"]
        );
    }
}
