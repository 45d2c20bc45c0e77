//! Page frontmatter record.
//!
//! Frontmatter is an open key/value record owned by the rendering host.
//! Extensions append to it and must leave keys they do not own alone.
//! Values are stored as JSON so any YAML frontmatter round-trips.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key holding the list of search-engine meta tags.
pub const META_KEY: &str = "meta";

/// Key holding the canonical URL.
pub const CANONICAL_URL_KEY: &str = "canonicalUrl";

/// Error returned for frontmatter that cannot be read or extended.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// YAML parsing error.
    #[error("Invalid YAML frontmatter: {0}")]
    Parse(String),
    /// The `meta` key holds something other than a list.
    #[error("frontmatter `meta` must be a list, found {0}")]
    InvalidMeta(&'static str),
}

/// Search-engine meta tag (`<meta name=".." content="..">`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
    /// Tag name.
    pub name: String,
    /// Tag content.
    pub content: String,
}

impl MetaTag {
    /// Create a meta tag.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Mutable key/value metadata of one page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    fields: Map<String, Value>,
}

impl Frontmatter {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse frontmatter from YAML content.
    ///
    /// Empty content returns an empty record.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, FrontmatterError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str::<Map<String, Value>>(trimmed)
            .map(|fields| Self { fields })
            .map_err(|e| FrontmatterError::Parse(e.to_string()))
    }

    /// Split a markdown document into its YAML frontmatter block and body.
    ///
    /// The block must start on the first line with `---` and end with a
    /// line containing only `---`. Without a closed block the whole input
    /// is body.
    pub fn split(source: &str) -> (Option<&str>, &str) {
        let Some(rest) = source
            .strip_prefix("---\n")
            .or_else(|| source.strip_prefix("---\r\n"))
        else {
            return (None, source);
        };

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = &rest[offset + line.len()..];
                return (Some(yaml), body);
            }
            offset += line.len();
        }
        (None, source)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Store `value` under `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Canonical URL, if set to a string.
    pub fn canonical_url(&self) -> Option<&str> {
        self.fields.get(CANONICAL_URL_KEY).and_then(Value::as_str)
    }

    /// Set the canonical URL.
    pub fn set_canonical_url(&mut self, url: impl Into<String>) {
        self.fields
            .insert(CANONICAL_URL_KEY.to_owned(), Value::String(url.into()));
    }

    /// Meta tags with a `name` and `content`, in order.
    ///
    /// Entries of other shapes (owned by other extensions) are skipped.
    pub fn meta_tags(&self) -> Vec<MetaTag> {
        let Some(Value::Array(entries)) = self.fields.get(META_KEY) else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect()
    }

    /// Add `tag` to the `meta` list, replacing entries with the same name.
    ///
    /// The first entry with the tag's name is replaced in place and later
    /// ones are dropped, so the list holds the name exactly once. The list
    /// is created when missing; unrelated entries keep their position. On
    /// error the record is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FrontmatterError::InvalidMeta`] if `meta` is not a list.
    pub fn upsert_meta_tag(&mut self, tag: &MetaTag) -> Result<(), FrontmatterError> {
        let entry = serde_json::json!({ "name": tag.name, "content": tag.content });

        match self.fields.get_mut(META_KEY) {
            None => {
                self.fields
                    .insert(META_KEY.to_owned(), Value::Array(vec![entry]));
            }
            Some(Value::Array(entries)) => {
                let is_same =
                    |e: &Value| e.get("name").and_then(Value::as_str) == Some(tag.name.as_str());
                match entries.iter().position(is_same) {
                    Some(first) => {
                        entries[first] = entry;
                        let mut index = 0;
                        entries.retain(|e| {
                            let keep = index <= first || !is_same(e);
                            index += 1;
                            keep
                        });
                    }
                    None => entries.push(entry),
                }
            }
            Some(other) => return Err(FrontmatterError::InvalidMeta(json_type_name(other))),
        }
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_empty_yaml() {
        let fm = Frontmatter::from_yaml("  \n").unwrap();
        assert!(fm.is_empty());
    }

    #[test]
    fn test_parse_yaml_fields() {
        let yaml = r"
title: Installation
outline: [2, 3]
meta:
  - name: robots
    content: noindex
";
        let fm = Frontmatter::from_yaml(yaml).unwrap();
        assert_eq!(fm.get("title"), Some(&json!("Installation")));
        assert_eq!(fm.get("outline"), Some(&json!([2, 3])));
        assert_eq!(fm.meta_tags(), vec![MetaTag::new("robots", "noindex")]);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(matches!(
            Frontmatter::from_yaml("title: [broken"),
            Err(FrontmatterError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_non_mapping_yaml() {
        assert!(Frontmatter::from_yaml("- a\n- b").is_err());
    }

    #[test]
    fn test_split_with_frontmatter() {
        let source = "---\ntitle: Setup\n---\n# Setup\n";
        let (yaml, body) = Frontmatter::split(source);
        assert_eq!(yaml, Some("title: Setup\n"));
        assert_eq!(body, "# Setup\n");
    }

    #[test]
    fn test_split_crlf() {
        let source = "---\r\ntitle: Setup\r\n---\r\nBody";
        let (yaml, body) = Frontmatter::split(source);
        assert_eq!(yaml, Some("title: Setup\r\n"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_without_frontmatter() {
        let source = "# Setup\n---\n";
        assert_eq!(Frontmatter::split(source), (None, source));
    }

    #[test]
    fn test_split_unclosed_block() {
        let source = "---\ntitle: Setup\n# Setup\n";
        assert_eq!(Frontmatter::split(source), (None, source));
    }

    #[test]
    fn test_split_empty_block() {
        let (yaml, body) = Frontmatter::split("---\n---\nBody");
        assert_eq!(yaml, Some(""));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_canonical_url_roundtrip() {
        let mut fm = Frontmatter::new();
        assert_eq!(fm.canonical_url(), None);
        fm.set_canonical_url("docs/2.0/setup");
        assert_eq!(fm.canonical_url(), Some("docs/2.0/setup"));
    }

    #[test]
    fn test_upsert_creates_list() {
        let mut fm = Frontmatter::new();
        fm.upsert_meta_tag(&MetaTag::new("docsearch:version", "1.0.0"))
            .unwrap();
        assert_eq!(
            fm.get(META_KEY),
            Some(&json!([{ "name": "docsearch:version", "content": "1.0.0" }]))
        );
    }

    #[test]
    fn test_upsert_keeps_other_entries() {
        let mut fm = Frontmatter::new();
        fm.insert(META_KEY, json!([{ "name": "robots", "content": "noindex" }, "raw"]));

        fm.upsert_meta_tag(&MetaTag::new("docsearch:version", "1.0.0"))
            .unwrap();

        assert_eq!(
            fm.get(META_KEY),
            Some(&json!([
                { "name": "robots", "content": "noindex" },
                "raw",
                { "name": "docsearch:version", "content": "1.0.0" }
            ]))
        );
    }

    #[test]
    fn test_upsert_replaces_same_name() {
        let mut fm = Frontmatter::new();
        fm.upsert_meta_tag(&MetaTag::new("docsearch:version", "1.0.0"))
            .unwrap();
        fm.upsert_meta_tag(&MetaTag::new("docsearch:version", "2.0.0"))
            .unwrap();
        assert_eq!(
            fm.meta_tags(),
            vec![MetaTag::new("docsearch:version", "2.0.0")]
        );
    }

    #[test]
    fn test_upsert_collapses_duplicate_names() {
        let mut fm = Frontmatter::new();
        fm.insert(
            META_KEY,
            json!([
                { "name": "docsearch:version", "content": "x" },
                { "name": "robots", "content": "noindex" },
                { "name": "docsearch:version", "content": "y" }
            ]),
        );

        fm.upsert_meta_tag(&MetaTag::new("docsearch:version", "1.0.0"))
            .unwrap();

        assert_eq!(
            fm.meta_tags(),
            vec![
                MetaTag::new("docsearch:version", "1.0.0"),
                MetaTag::new("robots", "noindex"),
            ]
        );
    }

    #[test]
    fn test_upsert_rejects_non_list_meta() {
        let mut fm = Frontmatter::new();
        fm.insert(META_KEY, json!("robots"));
        let before = fm.clone();

        let err = fm
            .upsert_meta_tag(&MetaTag::new("docsearch:version", "1.0.0"))
            .unwrap_err();

        assert!(err.to_string().contains("a string"));
        assert_eq!(fm, before);
    }

    #[test]
    fn test_serialize_transparent() {
        let mut fm = Frontmatter::new();
        fm.insert("title", json!("Setup"));
        assert_eq!(serde_json::to_value(&fm).unwrap(), json!({ "title": "Setup" }));
    }
}
