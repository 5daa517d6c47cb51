use blogsmith_rs_protocol::{ContentRecord, ContentType, GeneratedContent, UserIdentity};
use chrono::{TimeZone, Utc};

pub fn user(value: &str) -> UserIdentity {
    UserIdentity::parse(value).expect("valid identity")
}

pub fn content(content_type: ContentType, prompt: &str, generated: &str) -> GeneratedContent {
    GeneratedContent {
        content_type,
        length: "Short".to_string(),
        tone: "Friendly".to_string(),
        prompt: prompt.to_string(),
        generated_content: generated.to_string(),
    }
}

/// Confirmed record with a millisecond timestamp.
pub fn record(
    id: &str,
    content_type: ContentType,
    prompt: &str,
    generated: &str,
    millis: i64,
) -> ContentRecord {
    ContentRecord {
        id: id.to_string(),
        content: content(content_type, prompt, generated),
        timestamp: Utc
            .timestamp_millis_opt(millis)
            .single()
            .expect("valid timestamp"),
    }
}
