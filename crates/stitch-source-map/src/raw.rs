//! Serde model of the revision 3 source map document

use serde::{Deserialize, Serialize};

/// A source map document as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub mappings: String,
}

impl Default for RawSourceMap {
    fn default() -> Self {
        RawSourceMap {
            version: 3,
            file: None,
            source_root: None,
            sources: Vec::new(),
            sources_content: None,
            names: Vec::new(),
            mappings: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_fields() {
        let json = r#"{
            "version": 3,
            "file": "min.js",
            "names": ["bar", "baz", "n"],
            "sources": ["one.js", "two.js"],
            "sourceRoot": "http://example.com/www/js/",
            "mappings": "CAAC,IAAI,IAAM,SAAUA,GAClB,OAAOC,IAAID;CCDb,IAAI,IAAM,SAAUE,GAClB,OAAOA"
        }"#;
        let raw: RawSourceMap = serde_json::from_str(json).unwrap();
        assert_eq!(raw.file.as_deref(), Some("min.js"));
        assert_eq!(raw.source_root.as_deref(), Some("http://example.com/www/js/"));
        assert_eq!(raw.sources, vec!["one.js", "two.js"]);
        assert!(raw.sources_content.is_none());
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let raw = RawSourceMap::default();
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(json, r#"{"version":3,"sources":[],"names":[],"mappings":""}"#);
    }
}
