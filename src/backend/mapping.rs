//! Index field mappings per record schema

use serde_json::{json, Map, Value};

use crate::types::{RecordSchema, TimeFieldFormat};

/// Build the `{"properties": {...}}` mapping document for a schema
///
/// `path` is always a geo shape. Time fields follow the schema's
/// [`TimeFieldFormat`] and tag fields are keywords.
pub fn item_mapping(schema: RecordSchema) -> Value {
    let time_field = match schema.time_field_format() {
        TimeFieldFormat::EpochSecondDate => json!({ "type": "date", "format": "epoch_second" }),
        TimeFieldFormat::Integer => json!({ "type": "long" }),
    };

    let mut properties = Map::new();
    if schema.has_indexed() {
        properties.insert("indexed".to_string(), time_field.clone());
    }
    properties.insert("startTime".to_string(), time_field.clone());
    properties.insert("endTime".to_string(), time_field);
    if schema.has_type() {
        properties.insert("type".to_string(), json!({ "type": "keyword" }));
    }
    if schema.has_source() {
        properties.insert("src".to_string(), json!({ "type": "keyword" }));
    }
    properties.insert("path".to_string(), json!({ "type": "geo_shape" }));

    json!({ "properties": properties })
}
