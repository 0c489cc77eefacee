//! Test fixtures for generating XMLTV documents in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{ProgrammeBuilder, XmltvBuilder};
//!
//! let xml = XmltvBuilder::new()
//!     .channel("1", "BBC One")
//!     .programme(
//!         ProgrammeBuilder::new("1", "20230115200000 +0000", "20230115203000 +0000")
//!             .title("News")
//!             .category("News"),
//!     )
//!     .build();
//!
//! let doc = xmltv_grid::parser::parse(&xml).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use chrono::{DateTime, TimeZone};

// ============================================================================
// Programme Builder
// ============================================================================

/// Builder for a single `<programme>` element.
#[derive(Debug, Clone, Default)]
pub struct ProgrammeBuilder {
    pub channel: String,
    pub start: String,
    pub stop: String,
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub desc: Option<String>,
    pub credits: Option<String>,
    pub date: Option<String>,
    pub categories: Vec<String>,
    pub rating: Option<String>,
}

impl ProgrammeBuilder {
    /// Create a programme with raw `start`/`stop` attribute strings.
    #[must_use]
    pub fn new(channel: &str, start: &str, stop: &str) -> Self {
        Self {
            channel: channel.to_string(),
            start: start.to_string(),
            stop: stop.to_string(),
            ..Self::default()
        }
    }

    /// Create a programme from typed instants, formatted the XMLTV way.
    #[must_use]
    pub fn between<Tz: TimeZone>(channel: &str, start: &DateTime<Tz>, stop: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::new(channel, &xmltv_timestamp(start), &xmltv_timestamp(stop))
    }

    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    #[must_use]
    pub fn sub_title(mut self, sub_title: &str) -> Self {
        self.sub_title = Some(sub_title.to_string());
        self
    }

    #[must_use]
    pub fn desc(mut self, desc: &str) -> Self {
        self.desc = Some(desc.to_string());
        self
    }

    #[must_use]
    pub fn credits(mut self, credits: &str) -> Self {
        self.credits = Some(credits.to_string());
        self
    }

    #[must_use]
    pub fn date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    /// Append a category; may be called repeatedly.
    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.categories.push(category.to_string());
        self
    }

    #[must_use]
    pub fn rating(mut self, rating: &str) -> Self {
        self.rating = Some(rating.to_string());
        self
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(&format!(
            "  <programme start=\"{}\" stop=\"{}\" channel=\"{}\">\n",
            escape(&self.start),
            escape(&self.stop),
            escape(&self.channel)
        ));
        let fields = [
            ("title", &self.title),
            ("sub-title", &self.sub_title),
            ("desc", &self.desc),
            ("credits", &self.credits),
            ("date", &self.date),
        ];
        for (tag, value) in fields {
            if let Some(value) = value {
                out.push_str(&format!("    <{tag}>{}</{tag}>\n", escape(value)));
            }
        }
        for category in &self.categories {
            out.push_str(&format!("    <category>{}</category>\n", escape(category)));
        }
        if let Some(rating) = &self.rating {
            out.push_str(&format!(
                "    <rating system=\"test\"><value>{}</value></rating>\n",
                escape(rating)
            ));
        }
        out.push_str("  </programme>\n");
    }
}

// ============================================================================
// Document Builder
// ============================================================================

/// Builder for a complete XMLTV document.
#[derive(Debug, Clone, Default)]
pub struct XmltvBuilder {
    channels: Vec<(String, String)>,
    programmes: Vec<ProgrammeBuilder>,
}

impl XmltvBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a channel id and its display name.
    #[must_use]
    pub fn channel(mut self, id: &str, display_name: &str) -> Self {
        self.channels
            .push((id.to_string(), display_name.to_string()));
        self
    }

    #[must_use]
    pub fn programme(mut self, programme: ProgrammeBuilder) -> Self {
        self.programmes.push(programme);
        self
    }

    /// Render the document as XML text.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n\
             <tv generator-info-name=\"xmltv-grid tests\">\n",
        );
        for (id, name) in &self.channels {
            out.push_str(&format!(
                "  <channel id=\"{}\">\n    <display-name>{}</display-name>\n  </channel>\n",
                escape(id),
                escape(name)
            ));
        }
        for programme in &self.programmes {
            programme.write_to(&mut out);
        }
        out.push_str("</tv>\n");
        out
    }

    /// Render the document as bytes, ready for `Grid::load`.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }
}

/// Format an instant as `YYYYMMDDHHMMSS ±ZZZZ`.
pub fn xmltv_timestamp<Tz: TimeZone>(t: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%Y%m%d%H%M%S %z").to_string()
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
