use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One scheduled broadcast in the grid.
///
/// `start`, `stop` and the derived `length` are read-only: the length is
/// always the whole number of minutes between them, truncated toward zero.
/// A programme whose timestamps failed to parse carries the Unix epoch in
/// that field, so its length may be negative or very large.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProgrammeRepr")]
pub struct Programme {
    start: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
    #[serde(rename = "duration")]
    length: i64,
    /// Resolved display name; empty when the channel id was not declared
    pub channel: String,
    pub title: String,
    #[serde(rename = "sub-title")]
    pub subtitle: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub credits: String,
    pub date: String,
    #[serde(rename = "category")]
    pub categories: Vec<String>,
    pub rating: String,
}

impl Programme {
    /// Create a programme spanning `start..stop` with empty descriptive fields.
    #[must_use]
    pub fn new(start: DateTime<FixedOffset>, stop: DateTime<FixedOffset>) -> Self {
        Self {
            start,
            stop,
            length: (stop - start).num_minutes(),
            channel: String::new(),
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            credits: String::new(),
            date: String::new(),
            categories: Vec::new(),
            rating: String::new(),
        }
    }

    #[must_use]
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    #[must_use]
    pub fn stop(&self) -> DateTime<FixedOffset> {
        self.stop
    }

    /// Duration in whole minutes.
    #[must_use]
    pub fn length(&self) -> i64 {
        self.length
    }
}

/// `(<channel>) <HH:MM>: <title> - <length>m`, with the start time shown
/// in the offset it was broadcast with.
impl fmt::Display for Programme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {}: {} - {}m",
            self.channel,
            self.start.format("%H:%M"),
            self.title,
            self.length
        )
    }
}

/// Wire form accepted on deserialization. Any `duration` in the input is
/// ignored and recomputed from `start`/`stop`.
#[derive(Deserialize)]
struct ProgrammeRepr {
    start: DateTime<FixedOffset>,
    stop: DateTime<FixedOffset>,
    #[serde(default)]
    channel: String,
    #[serde(default)]
    title: String,
    #[serde(default, rename = "sub-title")]
    subtitle: String,
    #[serde(default, rename = "desc")]
    description: String,
    #[serde(default)]
    credits: String,
    #[serde(default)]
    date: String,
    #[serde(default, rename = "category")]
    categories: Vec<String>,
    #[serde(default)]
    rating: String,
}

impl From<ProgrammeRepr> for Programme {
    fn from(r: ProgrammeRepr) -> Self {
        Self {
            channel: r.channel,
            title: r.title,
            subtitle: r.subtitle,
            description: r.description,
            credits: r.credits,
            date: r.date,
            categories: r.categories,
            rating: r.rating,
            ..Self::new(r.start, r.stop)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_length_truncates_partial_minutes() {
        let p = Programme::new(ts("2023-01-15T14:00:00Z"), ts("2023-01-15T14:30:59Z"));
        assert_eq!(p.length(), 30);
    }

    #[test]
    fn test_length_negative_when_stop_precedes_start() {
        let p = Programme::new(ts("2023-01-15T14:30:00Z"), ts("2023-01-15T14:00:00Z"));
        assert_eq!(p.length(), -30);
    }

    #[test]
    fn test_display_uses_source_offset() {
        let mut p = Programme::new(
            ts("2023-01-15T20:00:00+01:00"),
            ts("2023-01-15T20:30:00+01:00"),
        );
        p.channel = "BBC One".to_string();
        p.title = "News".to_string();
        assert_eq!(p.to_string(), "(BBC One) 20:00: News - 30m");
    }

    #[test]
    fn test_json_field_names() {
        let mut p = Programme::new(ts("2023-01-15T14:00:00Z"), ts("2023-01-15T15:00:00Z"));
        p.subtitle = "Part 1".to_string();
        p.categories = vec!["Drama".to_string()];
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["duration"], 60);
        assert_eq!(json["sub-title"], "Part 1");
        assert_eq!(json["category"][0], "Drama");
        assert!(json.get("length").is_none());
    }

    #[test]
    fn test_deserialize_recomputes_length() {
        let json = r#"{
            "start": "2023-01-15T14:00:00Z",
            "stop": "2023-01-15T14:45:00Z",
            "duration": 999,
            "title": "Film"
        }"#;
        let p: Programme = serde_json::from_str(json).unwrap();
        assert_eq!(p.length(), 45);
        assert_eq!(p.title, "Film");
        assert!(p.channel.is_empty());
    }
}
