use serde::{Deserialize, Serialize};

/// A source-text chunk cited by an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub id: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Content kinds present in the chunk (`text`, `image`, `table`, ...).
    #[serde(rename = "type", default)]
    pub kinds: Vec<String>,
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub char_count: u64,
}

impl Chunk {
    /// Whitespace-separated word count of the chunk content.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}
