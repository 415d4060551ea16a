use std::collections::BTreeMap;

use serde::Serialize;

use super::ExportSink;
use crate::error::Result;
use crate::schema::DecodedRecord;

/// In-memory sink: asset type → identity → record
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordStore {
    #[serde(flatten)]
    groups: BTreeMap<String, BTreeMap<String, DecodedRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, asset_type: &str, identity: &str) -> Option<&DecodedRecord> {
        self.groups.get(asset_type)?.get(identity)
    }

    /// All records of one asset type, sorted by identity
    pub fn records(&self, asset_type: &str) -> impl Iterator<Item = (&str, &DecodedRecord)> {
        self.groups
            .get(asset_type)
            .into_iter()
            .flat_map(|group| group.iter().map(|(k, v)| (k.as_str(), v)))
    }

    pub fn asset_types(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ExportSink for RecordStore {
    fn accept(&mut self, asset_type: &str, identity: &str, record: DecodedRecord) -> Result<()> {
        self.groups
            .entry(asset_type.to_string())
            .or_default()
            .insert(identity.to_string(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Value;

    fn record(name: &str) -> DecodedRecord {
        let mut record = DecodedRecord::new();
        record.insert("name", Value::String(name.to_string()));
        record
    }

    #[test]
    fn test_grouping() {
        let mut store = RecordStore::new();
        store.accept("physpreset", "wood", record("wood")).unwrap();
        store.accept("physpreset", "default", record("default")).unwrap();
        store.accept("ttf", "fonts/a.ttf", record("fonts/a.ttf")).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.asset_types().collect::<Vec<_>>(), ["physpreset", "ttf"]);

        let names: Vec<_> = store.records("physpreset").map(|(k, _)| k).collect();
        assert_eq!(names, ["default", "wood"]);
        assert_eq!(store.records("rumble").count(), 0);
    }

    #[test]
    fn test_same_identity_replaces() {
        let mut store = RecordStore::new();
        store.accept("physpreset", "wood", record("old")).unwrap();
        store.accept("physpreset", "wood", record("new")).unwrap();

        assert_eq!(store.len(), 1);
        let name = store.get("physpreset", "wood").and_then(|r| r.get("name"));
        assert_eq!(name, Some(&Value::String("new".into())));
    }

    #[test]
    fn test_to_json() {
        let mut store = RecordStore::new();
        store.accept("physpreset", "wood", record("wood")).unwrap();

        let value: serde_json::Value = serde_json::from_str(&store.to_json().unwrap()).unwrap();
        assert_eq!(value["physpreset"]["wood"]["name"], "wood");
    }
}
