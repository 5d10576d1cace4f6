// ABOUTME: Serde data models for Qiita Team item responses
// ABOUTME: Typed post records plus the raw JSON kept for the snapshot

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// A post as returned by `/authenticated_user/items`.
///
/// Timestamps stay as the API's strings; they are only ever echoed into
/// frontmatter. Fields not listed here are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    pub private: bool,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<Tag>,
}

/// One fetched record: the typed view and the untouched JSON object.
///
/// Serializing an `Item` writes the raw object back out, so a list of items
/// round-trips into a verbatim snapshot of what the API returned.
#[derive(Debug, Clone)]
pub struct Item {
    pub post: Post,
    pub raw: serde_json::Value,
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = serde_json::Value::deserialize(deserializer)?;
        let post = Post::deserialize(&raw).map_err(serde::de::Error::custom)?;
        Ok(Item { post, raw })
    }
}

impl Serialize for Item {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}
