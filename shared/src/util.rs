//! Serde and validation helpers shared by the models

use serde::{Deserialize, Deserializer};
use validator::ValidationError;

/// Deserialize an `order_index` that the backend may send as a float
/// (spaced by 1000) or as an integer.
pub fn de_order_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
        Raw::Float(v) => Err(serde::de::Error::custom(format!(
            "order_index must be finite, got {v}"
        ))),
    }
}

/// Reject strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Accept `#RRGGBB` hex colors only.
pub fn hex_color(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let valid = bytes.len() == 7
        && bytes[0] == b'#'
        && bytes[1..].iter().all(|b| b.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "de_order_index")]
        order_index: i64,
    }

    #[test]
    fn test_order_index_accepts_int_and_float() {
        let row: Row = serde_json::from_str(r#"{"order_index": 3}"#).unwrap();
        assert_eq!(row.order_index, 3);

        let row: Row = serde_json::from_str(r#"{"order_index": 2000.0}"#).unwrap();
        assert_eq!(row.order_index, 2000);
    }

    #[test]
    fn test_hex_color() {
        assert!(hex_color("#3B82F6").is_ok());
        assert!(hex_color("#3b82f6").is_ok());
        assert!(hex_color("3B82F6").is_err());
        assert!(hex_color("#3B82F").is_err());
        assert!(hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("write report").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }
}
