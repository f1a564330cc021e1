use serde::{Deserialize, Serialize};

use crate::enums::FeedbackRating;

/// Body of `POST /api/feedback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub message_id: String,
    pub rating: FeedbackRating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omits_empty_optional_fields() {
        let request = FeedbackRequest {
            message_id: "m1".into(),
            rating: FeedbackRating::Dislike,
            comment: None,
            category: Some("inaccurate".into()),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["rating"], "dislike");
        assert_eq!(value["category"], "inaccurate");
        assert!(value.get("comment").is_none());
    }
}
