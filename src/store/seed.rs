//! Synthetic row values
//!
//! Value synthesis is an injected collaborator: the reconciler calls it
//! only at table-creation (and reseed) time and never depends on what it
//! produces. [`SampleValues`] is the default implementation — compact
//! name-aware heuristics, not a full locale-flavored content catalog.

use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::{Value as JsonValue, json};
use uuid::Uuid;

use crate::model::Property;

/// Produces one cell value per property per synthetic row.
pub trait RowSynthesizer: Send + Sync {
    fn value(&self, entity_name: &str, prop: &Property, index: usize) -> JsonValue;
}

/// Default synthesizer with name-aware sample values.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleValues;

const FIRST_NAMES: &[&str] = &[
    "James", "Emma", "Oliver", "Sophia", "Liam", "Ava", "Noah", "Isabella", "William", "Mia",
    "Ethan", "Amelia", "Mason", "Harper", "Lucas",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson",
    "Moore", "Taylor", "Anderson", "Thomas", "Jackson", "White",
];
const STATUSES: &[&str] = &[
    "Active",
    "Inactive",
    "Pending",
    "Processing",
    "Shipped",
    "Delivered",
    "Cancelled",
    "Suspended",
    "Archived",
    "Draft",
];

impl RowSynthesizer for SampleValues {
    fn value(&self, entity_name: &str, prop: &Property, index: usize) -> JsonValue {
        let mut rng = rand::thread_rng();
        let name = prop.name.to_lowercase();
        let ty = prop.ty.trim_end_matches('?');
        let idx = index % FIRST_NAMES.len();

        match ty {
            "Guid" => json!(Uuid::new_v4().to_string()),
            "bool" | "Boolean" => json!(idx % 4 != 0),
            "int" | "Int32" | "long" | "Int64" | "short" | "Int16" | "byte" => {
                let n: i64 = if contains_any(&name, &["quantity", "stock", "count", "amount"]) {
                    rng.gen_range(1..=500)
                } else if name.contains("age") {
                    rng.gen_range(18..=65)
                } else if name.contains("year") {
                    rng.gen_range(2018..=2024)
                } else if name.contains("port") {
                    rng.gen_range(3000..=9000)
                } else {
                    rng.gen_range(1..=200)
                };
                json!(n)
            }
            "decimal" | "Decimal" | "float" | "double" | "Double" | "Single" => {
                let f: f64 = if contains_any(
                    &name,
                    &["price", "amount", "cost", "value", "total", "balance"],
                ) {
                    rng.gen_range(9.99..=999.99)
                } else if contains_any(&name, &["rate", "percent", "ratio"]) {
                    rng.gen_range(0.01..=1.0)
                } else {
                    rng.gen_range(1.0..=500.0)
                };
                json!((f * 100.0).round() / 100.0)
            }
            "DateTime" | "DateTimeOffset" | "DateOnly" => {
                let base = Utc::now() - Duration::days(rng.gen_range(1..=730));
                if ty == "DateOnly" {
                    json!(base.format("%Y-%m-%d").to_string())
                } else {
                    json!(base.format("%Y-%m-%dT%H:%M:%S").to_string())
                }
            }
            "string" | "String" => json!(sample_string(entity_name, &name, idx)),
            _ => JsonValue::Null,
        }
    }
}

fn sample_string(entity_name: &str, name: &str, idx: usize) -> String {
    if contains_any(name, &["email", "mail"]) {
        format!(
            "{}.{}@example.com",
            FIRST_NAMES[idx].to_lowercase(),
            LAST_NAMES[idx].to_lowercase()
        )
    } else if name.contains("firstname") || name == "first" {
        FIRST_NAMES[idx].to_string()
    } else if name.contains("lastname") || name == "last" {
        LAST_NAMES[idx].to_string()
    } else if contains_any(name, &["sku", "code"]) {
        format!("SKU-{}{}", (b'A' + (idx % 26) as u8) as char, 1000 + idx)
    } else if contains_any(name, &["description", "notes", "comment"]) {
        format!(
            "Auto-generated {} record {}.",
            entity_name.to_lowercase(),
            idx + 1
        )
    } else if contains_any(name, &["url", "uri", "link"]) {
        format!("https://example.com/{}/{}", entity_name.to_lowercase(), idx + 1)
    } else if contains_any(name, &["status", "state"]) {
        STATUSES[idx % STATUSES.len()].to_string()
    } else if name.contains("name") {
        format!("{} {}", FIRST_NAMES[idx], LAST_NAMES[idx])
    } else if name.contains("slug") {
        format!("{}-{}", entity_name.to_lowercase(), idx + 1)
    } else {
        format!("{}_{:03}", entity_name, idx + 1)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::required_heuristic;

    fn prop(name: &str, ty: &str) -> Property {
        Property {
            name: name.to_string(),
            ty: ty.to_string(),
            nullable: false,
            required: required_heuristic(false, false, ty),
            access: "public".to_string(),
            has_getter: true,
            has_setter: true,
            xml_doc: String::new(),
            attributes: Vec::new(),
            line_number: 1,
        }
    }

    #[test]
    fn values_match_storage_class() {
        let s = SampleValues;
        assert!(s.value("Product", &prop("Id", "Guid"), 0).is_string());
        assert!(s.value("Product", &prop("Price", "decimal"), 0).is_number());
        assert!(s.value("Product", &prop("InStock", "bool"), 1).is_boolean());
        assert!(s.value("Product", &prop("Name", "string"), 2).is_string());
        // unmapped types synthesize as null
        assert!(s.value("Product", &prop("Payload", "byte[]"), 0).is_null());
    }

    #[test]
    fn date_values_are_iso_like() {
        let s = SampleValues;
        let v = s.value("Order", &prop("CreatedAt", "DateTime"), 0);
        let text = v.as_str().expect("string value");
        assert_eq!(text.len(), "2024-01-01T00:00:00".len());
        assert!(text.contains('T'));
    }
}
