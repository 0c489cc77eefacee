//! The hour-bucketed programme grid and its builder.
//!
//! Every programme lives in exactly one bucket, keyed by its start time
//! rounded to the nearest hour (see [`round_to_hour`]). Within a bucket
//! programmes keep their document order.
//!
//! Loading is all-or-nothing: the new bucket map is built on the side and
//! only assigned to the grid once the whole document has been processed,
//! so a failed load leaves the previous grid in place.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::path::Path;

use crate::error::{GridError, Result};
use crate::parser;
use crate::timestamp::{parse_timestamp, round_to_hour, zero_timestamp};
use crate::types::{Document, Programme, ProgrammeRecord, TimestampField};

type Buckets = BTreeMap<DateTime<Utc>, Vec<Programme>>;
type Timestamp = DateTime<FixedOffset>;

/// Options controlling how records are turned into programmes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Fail the load on the first unparsable `start`/`stop` instead of
    /// substituting the Unix epoch.
    pub strict_timestamps: bool,
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn strict_timestamps(mut self, strict: bool) -> Self {
        self.strict_timestamps = strict;
        self
    }
}

/// A per-record problem that was absorbed during a lenient load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LoadWarning {
    /// The timestamp could not be parsed and was replaced by the epoch.
    Timestamp {
        index: usize,
        field: TimestampField,
        value: String,
    },
    /// The programme referenced a channel id that no `<channel>` declares.
    UnknownChannel { index: usize, channel: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timestamp {
                index,
                field,
                value,
            } => write!(f, "programme {index}: invalid {field} timestamp {value:?}"),
            Self::UnknownChannel { index, channel } => {
                write!(f, "programme {index}: unknown channel {channel:?}")
            }
        }
    }
}

/// Summary of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub channels: usize,
    pub programmes: usize,
    pub buckets: usize,
    pub warnings: Vec<LoadWarning>,
}

/// Programmes grouped by the hour their start time rounds to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid {
    buckets: Buckets,
}

impl Grid {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from an already decoded document, absorbing per-record
    /// problems.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        let mut grid = Self::new();
        let _report = grid.load_document(doc);
        grid
    }

    /// Decode `data` as XMLTV and replace the grid's contents with it.
    ///
    /// # Errors
    /// Returns an error if the document is malformed. The grid is unchanged.
    pub fn load(&mut self, data: &[u8]) -> Result<LoadReport> {
        self.load_with(data, &LoadOptions::default())
    }

    /// Like [`Grid::load`], with explicit options.
    ///
    /// # Errors
    /// Returns an error if the document is malformed, or if strict
    /// timestamps are enabled and a timestamp fails to parse. The grid is
    /// unchanged.
    pub fn load_with(&mut self, data: &[u8], options: &LoadOptions) -> Result<LoadReport> {
        let doc = parser::parse(data)?;
        self.load_document_with(&doc, options)
    }

    /// Read and load an XMLTV file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is malformed.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let data = std::fs::read(path)?;
        self.load(&data)
    }

    /// Replace the grid's contents from a decoded document, absorbing
    /// per-record problems.
    #[must_use = "the report lists the records that were absorbed"]
    pub fn load_document(&mut self, doc: &Document) -> LoadReport {
        let lenient =
            |_: usize, _: TimestampField, _: &str| Ok::<_, Infallible>(zero_timestamp());
        let (buckets, warnings) = match build(doc, lenient) {
            Ok(built) => built,
            Err(never) => match never {},
        };
        self.publish(doc, buckets, warnings)
    }

    /// Replace the grid's contents from a decoded document.
    ///
    /// # Errors
    /// Returns an error if strict timestamps are enabled and a timestamp
    /// fails to parse. The grid is unchanged.
    pub fn load_document_with(
        &mut self,
        doc: &Document,
        options: &LoadOptions,
    ) -> Result<LoadReport> {
        if !options.strict_timestamps {
            return Ok(self.load_document(doc));
        }
        let (buckets, warnings) = build(doc, |index, field, value| {
            Err(GridError::Timestamp {
                index,
                field,
                value: value.to_string(),
            })
        })?;
        Ok(self.publish(doc, buckets, warnings))
    }

    fn publish(
        &mut self,
        doc: &Document,
        buckets: Buckets,
        warnings: Vec<LoadWarning>,
    ) -> LoadReport {
        self.buckets = buckets;
        let report = LoadReport {
            channels: doc.channels.len(),
            programmes: doc.programmes.len(),
            buckets: self.buckets.len(),
            warnings,
        };
        log::debug!(
            "built grid: {} channels, {} programmes, {} buckets, {} warnings",
            report.channels,
            report.programmes,
            report.buckets,
            report.warnings.len()
        );
        report
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of programmes across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Programmes in the bucket for the hour `key`, in document order.
    #[must_use]
    pub fn bucket(&self, key: &DateTime<Utc>) -> Option<&[Programme]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Buckets in chronological order.
    pub fn buckets(&self) -> impl Iterator<Item = (&DateTime<Utc>, &[Programme])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// All programmes, bucket by bucket.
    pub fn programmes(&self) -> impl Iterator<Item = &Programme> {
        self.buckets.values().flatten()
    }

    /// Distinct resolved channel names, sorted.
    #[must_use]
    pub fn channels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.programmes().map(|p| p.channel.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Serialize the grid as a JSON object of RFC 3339 bucket keys.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Single pass over the document. `on_invalid` decides what an unparsable
/// timestamp becomes; an `Err` from it aborts the build.
fn build<E>(
    doc: &Document,
    mut on_invalid: impl FnMut(usize, TimestampField, &str) -> std::result::Result<Timestamp, E>,
) -> std::result::Result<(Buckets, Vec<LoadWarning>), E> {
    // Duplicate ids: last one wins
    let mut aliases: HashMap<&str, &str> = HashMap::with_capacity(doc.channels.len());
    for channel in &doc.channels {
        aliases.insert(channel.id.as_str(), channel.display_name.as_str());
    }

    let mut buckets = Buckets::new();
    let mut warnings = Vec::new();

    for (index, record) in doc.programmes.iter().enumerate() {
        let mut timestamp = |field: TimestampField,
                             value: &str|
         -> std::result::Result<Timestamp, E> {
            if let Some(t) = parse_timestamp(value) {
                return Ok(t);
            }
            let substitute = on_invalid(index, field, value)?;
            log::warn!("programme {index}: invalid {field} timestamp {value:?}");
            warnings.push(LoadWarning::Timestamp {
                index,
                field,
                value: value.to_string(),
            });
            Ok(substitute)
        };
        let start = timestamp(TimestampField::Start, &record.start)?;
        let stop = timestamp(TimestampField::Stop, &record.stop)?;

        let channel = match aliases.get(record.channel.as_str()) {
            Some(name) => (*name).to_string(),
            None => {
                log::debug!("programme {index}: unknown channel {:?}", record.channel);
                warnings.push(LoadWarning::UnknownChannel {
                    index,
                    channel: record.channel.clone(),
                });
                String::new()
            }
        };

        let programme = to_programme(record, start, stop, channel);
        buckets
            .entry(round_to_hour(&programme.start()))
            .or_default()
            .push(programme);
    }

    Ok((buckets, warnings))
}

fn to_programme(
    record: &ProgrammeRecord,
    start: Timestamp,
    stop: Timestamp,
    channel: String,
) -> Programme {
    let mut programme = Programme::new(start, stop);
    programme.channel = channel;
    programme.title.clone_from(&record.title);
    programme.subtitle.clone_from(&record.sub_title);
    programme.description.clone_from(&record.desc);
    programme.credits.clone_from(&record.credits);
    programme.date.clone_from(&record.date);
    programme.categories.clone_from(&record.categories);
    programme.rating.clone_from(&record.rating);
    programme
}
