use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::pack::TAGS_FILE_SUBPATH;

/// In-memory form of `data/default.dungeondraft_tags`. Both maps keep
/// insertion order, so the written JSON lists tags in scan order.
#[derive(Debug, Default, Serialize)]
pub struct TagManifest {
    tags: Map<String, Value>,
    sets: Map<String, Value>,
}

impl TagManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add paths under a tag, creating the tag when absent. An existing
    /// tag keeps its position and grows in place.
    pub fn append_tag<I>(&mut self, tag: &str, paths: I)
    where
        I: IntoIterator<Item = String>,
    {
        let entry = self
            .tags
            .entry(tag.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = entry {
            items.extend(paths.into_iter().map(Value::String));
        }
    }

    /// Register a tag set naming the given tags.
    pub fn add_set<I>(&mut self, name: &str, tags: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.sets.insert(
            name.to_string(),
            Value::Array(tags.into_iter().map(Value::String).collect()),
        );
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the manifest to `data/default.dungeondraft_tags` under the
    /// pack root, creating `data/` when missing. An existing manifest is
    /// replaced. Returns the path written.
    pub fn write_to_pack(&self, pack_root: &Path) -> Result<PathBuf> {
        let path = pack_root.join(TAGS_FILE_SUBPATH);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_json_pretty()?)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appending_twice_extends_in_place() {
        let mut manifest = TagManifest::new();
        manifest.append_tag("Bones", vec!["a.png".to_string()]);
        manifest.append_tag("Crypts", vec!["b.png".to_string()]);
        manifest.append_tag("Bones", vec!["c.png".to_string()]);

        let json: Value = serde_json::from_str(&manifest.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["tags"]["Bones"], Value::from(vec!["a.png", "c.png"]));
        assert_eq!(json["tags"]["Crypts"], Value::from(vec!["b.png"]));
    }

    #[test]
    fn keys_serialize_in_insertion_order() {
        let mut manifest = TagManifest::new();
        manifest.append_tag("Zebra", Vec::new());
        manifest.append_tag("Apple", Vec::new());
        manifest.add_set("My Pack", vec!["My Pack".to_string(), "Zebra".to_string()]);

        let text = manifest.to_json_pretty().unwrap();
        let zebra = text.find("\"Zebra\"").unwrap();
        let apple = text.find("\"Apple\"").unwrap();
        assert!(zebra < apple, "tags must keep insertion order:\n{text}");
        assert!(text.find("\"tags\"").unwrap() < text.find("\"sets\"").unwrap());
    }

    #[test]
    fn writes_under_the_data_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut manifest = TagManifest::new();
        manifest.append_tag("My Pack", Vec::new());

        let path = manifest.write_to_pack(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("data/default.dungeondraft_tags"));
        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["tags"]["My Pack"].as_array().unwrap().is_empty());
    }
}
