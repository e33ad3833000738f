//! Wire record and its JSON encoding.
//!
//! Decoding is deliberately forgiving: a field that is missing, `null`, the
//! wrong length or the wrong type is read as "no update". Only a payload that
//! is not a JSON array at all is rejected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{SimError, SimResult};
use crate::spatial::tiles::{TileKey, CELLS};

/// One tile's replicated fields. Omitted arrays mean "unchanged", never zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeltaRecord {
    pub tile_key: [u32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_floats")]
    pub heat: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_floats")]
    pub fire: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_floats")]
    pub molten: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_bytes")]
    pub scorch: Option<Vec<u8>>,
    /// Cells at zero hit points; merged monotonically like scorch.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_bytes")]
    pub destroyed: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_flag")]
    pub clear: Option<bool>,
}

impl DeltaRecord {
    pub fn new(key: TileKey) -> Self {
        Self {
            tile_key: [key.tx(), key.ty()],
            ..Self::default()
        }
    }

    pub fn clear(key: TileKey) -> Self {
        Self {
            clear: Some(true),
            ..Self::new(key)
        }
    }

    /// `None` when the coordinates do not fit a tile key.
    pub fn key(&self) -> Option<TileKey> {
        let [tx, ty] = self.tile_key;
        TileKey::checked(tx, ty)
    }

    #[inline]
    pub fn is_clear(&self) -> bool {
        self.clear == Some(true)
    }
}

/// Round to two decimals before transmission.
#[inline]
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

pub fn encode_delta(records: &[DeltaRecord]) -> SimResult<String> {
    serde_json::to_string(records).map_err(SimError::DeltaJson)
}

/// Parse a payload. Records without a usable `tileKey` are skipped.
pub fn decode_delta(json: &str) -> SimResult<Vec<DeltaRecord>> {
    let value: Value = serde_json::from_str(json).map_err(SimError::DeltaJson)?;
    let Value::Array(items) = value else {
        return Err(SimError::DeltaNotArray);
    };

    let total = items.len();
    let records: Vec<DeltaRecord> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if records.len() < total {
        log::warn!("skipped {} malformed delta records", total - records.len());
    }
    Ok(records)
}

fn lenient_floats<'de, D>(de: D) -> Result<Option<Vec<f32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    if items.len() != CELLS {
        return Ok(None);
    }
    Ok(items
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32).filter(|f| f.is_finite()))
        .collect())
}

fn lenient_bytes<'de, D>(de: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(de)?;
    let Value::Array(items) = value else {
        return Ok(None);
    };
    if items.len() != CELLS {
        return Ok(None);
    }
    Ok(items
        .iter()
        .map(|v| match v {
            Value::Bool(b) => Some(u8::from(*b)),
            Value::Number(n) => n.as_f64().map(|f| u8::from(f != 0.0)),
            _ => None,
        })
        .collect())
}

fn lenient_flag<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(v: &str) -> String {
        format!("[{}]", vec![v; CELLS].join(","))
    }

    #[test]
    fn rounding_is_two_decimals() {
        assert_eq!(round2(0.123), 0.12);
        assert_eq!(round2(0.876), 0.88);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn omitted_fields_are_not_serialized() {
        let json = encode_delta(&[DeltaRecord::clear(TileKey::new(3, 9))]).unwrap();
        assert_eq!(json, r#"[{"tileKey":[3,9],"clear":true}]"#);
    }

    #[test]
    fn malformed_fields_become_no_update() {
        let json = format!(
            r#"[{{"tileKey":[4,5],"heat":"hot","fire":[1,2,3],"molten":{},"scorch":{},"clear":"yes"}}]"#,
            cells("0.5"),
            cells("true")
        );
        let records = decode_delta(&json).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.key(), Some(TileKey::new(4, 5)));
        assert!(r.heat.is_none());
        assert!(r.fire.is_none());
        assert_eq!(r.molten.as_ref().map(|m| m[7]), Some(0.5));
        assert_eq!(r.scorch.as_ref().map(|s| s[0]), Some(1));
        assert!(!r.is_clear());
    }

    #[test]
    fn records_without_a_tile_key_are_skipped() {
        let records = decode_delta(r#"[{"heat":null},{"tileKey":"x"},{"tileKey":[1,2]}]"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tile_key, [1, 2]);
    }

    #[test]
    fn only_non_arrays_are_errors() {
        assert!(matches!(decode_delta(r#"{"tileKey":[1,2]}"#), Err(SimError::DeltaNotArray)));
        assert!(matches!(decode_delta("nope"), Err(SimError::DeltaJson(_))));
        assert!(decode_delta("[]").unwrap().is_empty());
    }

    #[test]
    fn oversized_coordinates_have_no_key() {
        let mut r = DeltaRecord::new(TileKey::new(1, 1));
        r.tile_key = [70_000, 1];
        assert_eq!(r.key(), None);
    }
}
