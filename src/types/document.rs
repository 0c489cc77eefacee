use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded XMLTV document: the raw channel and programme records in
/// source order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub channels: Vec<ChannelRecord>,
    pub programmes: Vec<ProgrammeRecord>,
}

/// `<channel id="..."><display-name>...</display-name></channel>`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRecord {
    pub id: String,
    pub display_name: String,
}

/// A `<programme>` element with its timestamps still string-encoded.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammeRecord {
    pub start: String,
    pub stop: String,
    /// Channel id reference, resolved against [`ChannelRecord::id`]
    pub channel: String,
    pub title: String,
    pub sub_title: String,
    pub desc: String,
    pub credits: String,
    pub date: String,
    pub categories: Vec<String>,
    /// Text of `<rating><value>`
    pub rating: String,
}

/// Which timestamp attribute of a programme record failed to parse.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimestampField {
    Start,
    Stop,
}

impl fmt::Display for TimestampField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
        }
    }
}
