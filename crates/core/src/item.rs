use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One stock line as the backend reports it.
///
/// Read-only on the client: fetched, rendered, discarded on the next fetch.
/// No ordering between `date_received` and `best_before_date` is assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub product_name: String,
    pub material: String,
    pub location: String,
    #[serde(deserialize_with = "litres::deserialize")]
    pub total_litres: f64,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub date_received: NaiveDate,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    pub best_before_date: NaiveDate,
}

/// Search hit: the search endpoint only returns a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRecord {
    pub name: String,
}

/// Product volume pair used by the chart panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub product_name: String,
    #[serde(deserialize_with = "litres::deserialize")]
    pub total_litres: f64,
}

/// A list response: either a bare array or an object with an `items` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { items } => items,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Listing::Bare(items) | Listing::Wrapped { items } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// `/get_inventory_by_material` sends the volume as a string; every other
// route sends a number.
mod litres {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid litres value: {s:?}"))),
        }
    }
}

mod calendar_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, de::Error};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw:?}")))
    }

    /// Accepts `YYYY-MM-DD`, ISO date-times, RFC 3339 and the RFC 2822 form
    /// Flask's default JSON encoder emits for dates.
    pub(super) fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        DateTime::parse_from_rfc2822(raw).ok().map(|dt| dt.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn thinner() -> serde_json::Value {
        json!({
            "product_name": "HEMPEL THINNER",
            "material": "Solvent",
            "location": "A1",
            "total_litres": 20,
            "date_received": "2024-01-01",
            "best_before_date": "2025-01-01"
        })
    }

    #[test]
    fn decodes_wrapped_listing() {
        let listing: Listing<InventoryItem> =
            serde_json::from_value(json!({ "items": [thinner()] })).unwrap();
        let items = listing.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "HEMPEL THINNER");
        assert_eq!(items[0].total_litres, 20.0);
        assert_eq!(items[0].date_received, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(items[0].id, None);
    }

    #[test]
    fn decodes_bare_listing() {
        let listing: Listing<InventoryItem> =
            serde_json::from_value(json!([thinner(), thinner()])).unwrap();
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn empty_listing_in_either_shape() {
        let bare: Listing<NamedRecord> = serde_json::from_value(json!([])).unwrap();
        let wrapped: Listing<NamedRecord> = serde_json::from_value(json!({ "items": [] })).unwrap();
        assert!(bare.is_empty());
        assert!(wrapped.is_empty());
    }

    #[test]
    fn litres_accepts_numeric_strings() {
        let mut value = thinner();
        value["total_litres"] = json!("12.5");
        value["id"] = json!(7);
        let item: InventoryItem = serde_json::from_value(value).unwrap();
        assert_eq!(item.total_litres, 12.5);
        assert_eq!(item.id, Some(7));
    }

    #[test]
    fn litres_rejects_garbage() {
        let mut value = thinner();
        value["total_litres"] = json!("lots");
        assert!(serde_json::from_value::<InventoryItem>(value).is_err());
    }

    #[test]
    fn dates_accept_backend_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(calendar_date::parse("2024-01-01"), Some(expected));
        assert_eq!(calendar_date::parse("2024-01-01T00:00:00"), Some(expected));
        assert_eq!(calendar_date::parse("2024-01-01T08:30:00+00:00"), Some(expected));
        assert_eq!(calendar_date::parse("Mon, 01 Jan 2024 00:00:00 GMT"), Some(expected));
        assert_eq!(calendar_date::parse("01/01/2024"), None);
    }

    #[test]
    fn stock_level_ignores_extra_fields() {
        let level: StockLevel = serde_json::from_value(thinner()).unwrap();
        assert_eq!(level.product_name, "HEMPEL THINNER");
        assert_eq!(level.total_litres, 20.0);
    }
}
