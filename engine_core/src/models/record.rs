//! Dynamic records handed to the engine by the storage layer

use crate::models::{OrderedMap, Value};

/// One data item: field name to scalar value, in field order.
///
/// `get` distinguishes an absent field (`None`) from a field that is present
/// and null (`Some(&Value::Null)`).
pub type Record = OrderedMap<Value>;

/// Builds a [`Record`] from `field => value` pairs.
///
/// ```
/// use engine_core::record;
///
/// let product = record! { "name" => "Lamp", "price" => 25, "discontinued" => false };
/// assert_eq!(product.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::models::Record::new()
    };
    ($($field:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::models::Record::new();
        $(
            record.insert($field, $crate::models::Value::from($value));
        )+
        record
    }};
}

/// Reads a record's field the way the search engine sees it: stringified text
/// for present, non-null values.
pub fn field_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_vs_null() {
        let rec = record! { "a" => Value::Null, "b" => 1 };
        assert_eq!(rec.get("a"), Some(&Value::Null));
        assert_eq!(rec.get("missing"), None);
    }

    #[test]
    fn test_record_deserialize() {
        let rec: Record = serde_json::from_str(r#"{"name":"Lamp","price":25.5,"stock":null}"#).unwrap();
        assert_eq!(rec.get("name"), Some(&Value::Text("Lamp".to_string())));
        assert_eq!(rec.get("price"), Some(&Value::Number(25.5)));
        assert_eq!(rec.get("stock"), Some(&Value::Null));
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["name", "price", "stock"]);
    }

    #[test]
    fn test_field_text() {
        let rec = record! { "title" => "Hello", "views" => 3, "note" => Value::Null };
        assert_eq!(field_text(&rec, "title").as_deref(), Some("Hello"));
        assert_eq!(field_text(&rec, "views").as_deref(), Some("3"));
        assert_eq!(field_text(&rec, "note"), None);
        assert_eq!(field_text(&rec, "missing"), None);
    }
}
