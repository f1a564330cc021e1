//! Project retrieval settings and the typed updates applied to a draft.
//!
//! [`SettingsUpdate`] is the closed set of fields a client may edit. Each
//! variant carries a value of the field's own type, so a draft can only ever
//! hold well-formed settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Retrieval and generation settings for a project.
///
/// The eleven editable fields are required when decoding; only the row
/// metadata may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub embedding_model: String,
    pub rag_strategy: String,
    pub agent_type: String,
    pub chunks_per_search: u32,
    pub final_context_size: u32,
    pub similarity_threshold: f64,
    pub number_of_queries: u32,
    pub reranking_enabled: bool,
    pub reranking_model: String,
    pub vector_weight: f64,
    pub keyword_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            id: None,
            project_id: None,
            embedding_model: "text-embedding-3-large".into(),
            rag_strategy: "basic".into(),
            agent_type: "agentic".into(),
            chunks_per_search: 10,
            final_context_size: 5,
            similarity_threshold: 0.3,
            number_of_queries: 5,
            reranking_enabled: true,
            reranking_model: "rerank-english-v3.0".into(),
            vector_weight: 0.7,
            keyword_weight: 0.3,
            created_at: None,
            updated_at: None,
        }
    }
}

impl ProjectSettings {
    /// Shallow-merge updates over the current values, in order.
    pub fn apply<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = SettingsUpdate>,
    {
        for update in updates {
            update.apply_to(self);
        }
    }
}

/// A single edit to one recognised settings field.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    EmbeddingModel(String),
    RagStrategy(String),
    AgentType(String),
    ChunksPerSearch(u32),
    FinalContextSize(u32),
    SimilarityThreshold(f64),
    NumberOfQueries(u32),
    RerankingEnabled(bool),
    RerankingModel(String),
    VectorWeight(f64),
    KeywordWeight(f64),
}

impl SettingsUpdate {
    /// Every key accepted by [`SettingsUpdate::parse`].
    pub const KEYS: &'static [&'static str] = &[
        "embedding_model",
        "rag_strategy",
        "agent_type",
        "chunks_per_search",
        "final_context_size",
        "similarity_threshold",
        "number_of_queries",
        "reranking_enabled",
        "reranking_model",
        "vector_weight",
        "keyword_weight",
    ];

    /// Parse a `key=value` assignment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownSetting`] for keys outside [`Self::KEYS`]
    /// and [`CoreError::InvalidValue`] when the value does not parse or is out
    /// of range (weights and the similarity threshold must lie in `0.0..=1.0`,
    /// counts must be at least 1).
    pub fn parse(assignment: &str) -> Result<Self, CoreError> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| CoreError::InvalidValue {
                field: assignment.to_string(),
                reason: "expected key=value".into(),
            })?;
        Self::from_key_value(key.trim(), value.trim())
    }

    /// Build an update from an already split key and value.
    ///
    /// # Errors
    ///
    /// See [`SettingsUpdate::parse`].
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, CoreError> {
        match key {
            "embedding_model" => Ok(Self::EmbeddingModel(non_empty(key, value)?)),
            "rag_strategy" => Ok(Self::RagStrategy(non_empty(key, value)?)),
            "agent_type" => Ok(Self::AgentType(non_empty(key, value)?)),
            "reranking_model" => Ok(Self::RerankingModel(non_empty(key, value)?)),
            "chunks_per_search" => Ok(Self::ChunksPerSearch(count(key, value)?)),
            "final_context_size" => Ok(Self::FinalContextSize(count(key, value)?)),
            "number_of_queries" => Ok(Self::NumberOfQueries(count(key, value)?)),
            "similarity_threshold" => Ok(Self::SimilarityThreshold(unit_interval(key, value)?)),
            "vector_weight" => Ok(Self::VectorWeight(unit_interval(key, value)?)),
            "keyword_weight" => Ok(Self::KeywordWeight(unit_interval(key, value)?)),
            "reranking_enabled" => value
                .parse::<bool>()
                .map(Self::RerankingEnabled)
                .map_err(|e| invalid(key, e)),
            other => Err(CoreError::UnknownSetting(other.to_string())),
        }
    }

    /// Name of the field this update targets.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::EmbeddingModel(_) => "embedding_model",
            Self::RagStrategy(_) => "rag_strategy",
            Self::AgentType(_) => "agent_type",
            Self::ChunksPerSearch(_) => "chunks_per_search",
            Self::FinalContextSize(_) => "final_context_size",
            Self::SimilarityThreshold(_) => "similarity_threshold",
            Self::NumberOfQueries(_) => "number_of_queries",
            Self::RerankingEnabled(_) => "reranking_enabled",
            Self::RerankingModel(_) => "reranking_model",
            Self::VectorWeight(_) => "vector_weight",
            Self::KeywordWeight(_) => "keyword_weight",
        }
    }

    pub fn apply_to(self, settings: &mut ProjectSettings) {
        match self {
            Self::EmbeddingModel(v) => settings.embedding_model = v,
            Self::RagStrategy(v) => settings.rag_strategy = v,
            Self::AgentType(v) => settings.agent_type = v,
            Self::ChunksPerSearch(v) => settings.chunks_per_search = v,
            Self::FinalContextSize(v) => settings.final_context_size = v,
            Self::SimilarityThreshold(v) => settings.similarity_threshold = v,
            Self::NumberOfQueries(v) => settings.number_of_queries = v,
            Self::RerankingEnabled(v) => settings.reranking_enabled = v,
            Self::RerankingModel(v) => settings.reranking_model = v,
            Self::VectorWeight(v) => settings.vector_weight = v,
            Self::KeywordWeight(v) => settings.keyword_weight = v,
        }
    }
}

impl fmt::Display for SettingsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key();
        match self {
            Self::EmbeddingModel(v)
            | Self::RagStrategy(v)
            | Self::AgentType(v)
            | Self::RerankingModel(v) => write!(f, "{key}={v}"),
            Self::ChunksPerSearch(v) | Self::FinalContextSize(v) | Self::NumberOfQueries(v) => {
                write!(f, "{key}={v}")
            }
            Self::SimilarityThreshold(v) | Self::VectorWeight(v) | Self::KeywordWeight(v) => {
                write!(f, "{key}={v}")
            }
            Self::RerankingEnabled(v) => write!(f, "{key}={v}"),
        }
    }
}

fn invalid(field: &str, reason: impl fmt::Display) -> CoreError {
    CoreError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn non_empty(field: &str, value: &str) -> Result<String, CoreError> {
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(value.to_string())
}

fn count(field: &str, value: &str) -> Result<u32, CoreError> {
    let parsed = value.parse::<u32>().map_err(|e| invalid(field, e))?;
    if parsed == 0 {
        return Err(invalid(field, "must be at least 1"));
    }
    Ok(parsed)
}

fn unit_interval(field: &str, value: &str) -> Result<f64, CoreError> {
    let parsed = value.parse::<f64>().map_err(|e| invalid(field, e))?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(invalid(field, format!("{parsed} is outside 0.0..=1.0")));
    }
    Ok(parsed)
}
