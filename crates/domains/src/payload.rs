//! Article variants.
//!
//! The variant tag selects which payload fields are mandatory at
//! submission time. A sum type keeps validation as one function per
//! variant instead of a string switch over a dynamic shape.

use serde::{Deserialize, Serialize};

/// One entry of a storyboard article. Order in the vector is the order
/// on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub title: String,
    pub media_url: String,
    pub caption: Option<String>,
}

/// Type-specific payload of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArticlePayload {
    #[default]
    Standard,
    Video {
        video_url: String,
    },
    Debate {
        question: String,
        pro_argument: String,
        con_argument: String,
    },
    Storyboard {
        episodes: Vec<Episode>,
    },
}

impl ArticlePayload {
    /// The closed tag persisted alongside the record.
    pub fn kind(&self) -> &'static str {
        match self {
            ArticlePayload::Standard => "standard",
            ArticlePayload::Video { .. } => "video",
            ArticlePayload::Debate { .. } => "debate",
            ArticlePayload::Storyboard { .. } => "storyboard",
        }
    }

    /// Whether submission requires a cover media reference for this
    /// variant. Debates render from their question and arguments alone.
    pub fn requires_media(&self) -> bool {
        !matches!(self, ArticlePayload::Debate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_matches_kind() {
        let video = ArticlePayload::Video {
            video_url: "https://cdn.example/clip.mp4".into(),
        };
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["type"], "video");
        assert_eq!(video.kind(), "video");
    }

    #[test]
    fn standard_is_the_default() {
        assert_eq!(ArticlePayload::default(), ArticlePayload::Standard);
    }

    #[test]
    fn debate_round_trips() {
        let debate = ArticlePayload::Debate {
            question: "Tabs or spaces?".into(),
            pro_argument: "Tabs are configurable.".into(),
            con_argument: "Spaces render the same everywhere.".into(),
        };
        let json = serde_json::to_string(&debate).unwrap();
        let back: ArticlePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, debate);
    }

    #[test]
    fn only_debate_skips_media() {
        assert!(ArticlePayload::Standard.requires_media());
        assert!(!ArticlePayload::Debate {
            question: String::new(),
            pro_argument: String::new(),
            con_argument: String::new(),
        }
        .requires_media());
    }
}
