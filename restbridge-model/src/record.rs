use serde::{Deserialize, Serialize};

/// A locally stored object.
///
/// The `values` field holds arbitrary JSON whose keys are the property names
/// of the record's entity. The engine reconciles records against remote
/// representations through the mapper; nothing here knows about REST.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    /// Name of the entity this record belongs to.
    pub entity: String,
    pub values: serde_json::Value,
    pub created_at: i64,
    pub modified_at: i64,
}

impl Record {
    pub fn new(id: &str, entity: &str, values: serde_json::Value) -> Self {
        Self {
            id: id.to_string(),
            entity: entity.to_string(),
            values,
            created_at: 0,
            modified_at: 0,
        }
    }

    /// Extract a string value from `values` using a JSON pointer (e.g., "/name").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.values.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value from `values` using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.values.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value from `values` using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.values.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Top-level property value, by property name.
    pub fn value(&self, property: &str) -> Option<&serde_json::Value> {
        self.values.get(property)
    }

    /// Sets a top-level property value. Turns `values` into an object if it
    /// was not one already.
    pub fn set_value(&mut self, property: &str, value: serde_json::Value) {
        if !self.values.is_object() {
            self.values = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.values.as_object_mut() {
            map.insert(property.to_string(), value);
        }
    }
}
