//! Field-completeness validation, one function per article variant.
//!
//! Field names in the reported list use the wire casing the rest of the
//! product shows users (`categoryId`, `videoUrl`, ...).

use domains::{ArticlePayload, ArticleRecord, DraftError, Episode, Result};

/// Checks the fields every variant requires, then the variant's own.
/// Returns `ValidationFailed` carrying every offending field at once so
/// the user fixes them in one pass.
pub fn validate_for_submission(record: &ArticleRecord) -> Result<()> {
    let mut missing: Vec<String> = Vec::new();

    if record.title.trim().is_empty() {
        missing.push("title".into());
    }
    if record.content.trim().is_empty() {
        missing.push("content".into());
    }
    if record.category_id.is_none() {
        missing.push("categoryId".into());
    }
    if record.payload.requires_media() && record.media_url.as_deref().unwrap_or("").trim().is_empty()
    {
        missing.push("mediaUrl".into());
    }

    match &record.payload {
        ArticlePayload::Standard => {}
        ArticlePayload::Video { video_url } => validate_video(video_url, &mut missing),
        ArticlePayload::Debate {
            question,
            pro_argument,
            con_argument,
        } => validate_debate(question, pro_argument, con_argument, &mut missing),
        ArticlePayload::Storyboard { episodes } => validate_storyboard(episodes, &mut missing),
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DraftError::ValidationFailed(missing))
    }
}

fn validate_video(video_url: &str, missing: &mut Vec<String>) {
    if video_url.trim().is_empty() {
        missing.push("videoUrl".into());
    }
}

fn validate_debate(question: &str, pro: &str, con: &str, missing: &mut Vec<String>) {
    if question.trim().is_empty() {
        missing.push("question".into());
    }
    if pro.trim().is_empty() {
        missing.push("proArgument".into());
    }
    if con.trim().is_empty() {
        missing.push("conArgument".into());
    }
}

fn validate_storyboard(episodes: &[Episode], missing: &mut Vec<String>) {
    if episodes.is_empty() {
        missing.push("episodes".into());
        return;
    }
    for (idx, episode) in episodes.iter().enumerate() {
        if episode.title.trim().is_empty() {
            missing.push(format!("episodes[{idx}].title"));
        }
        if episode.media_url.trim().is_empty() {
            missing.push(format!("episodes[{idx}].mediaUrl"));
        }
    }
}
