use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ScrapeError};

/// Turn a list of same-shaped records into one column per key.
///
/// The first record's keys define the output; every later record must carry
/// them all.
pub fn combine_records<V: Clone>(
    records: &[BTreeMap<String, V>],
) -> Result<BTreeMap<String, Vec<V>>> {
    let Some(first) = records.first() else {
        return Ok(BTreeMap::new());
    };

    let mut combined = BTreeMap::new();
    for key in first.keys() {
        let column = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record.get(key).cloned().ok_or_else(|| ScrapeError::MissingKey {
                    index,
                    key: key.clone(),
                })
            })
            .collect::<Result<Vec<V>>>()?;
        combined.insert(key.clone(), column);
    }
    Ok(combined)
}

/// [`combine_records`] over anything that serializes to a JSON object.
pub fn columns<T: Serialize>(items: &[T]) -> Result<BTreeMap<String, Vec<Value>>> {
    let records = items
        .iter()
        .map(|item| match serde_json::to_value(item) {
            Ok(Value::Object(map)) => Ok(map.into_iter().collect()),
            Ok(other) => Err(ScrapeError::InvalidField {
                field: "record",
                value: other.to_string(),
            }),
            Err(err) => Err(ScrapeError::json("record", err)),
        })
        .collect::<Result<Vec<BTreeMap<String, Value>>>>()?;
    combine_records(&records)
}
