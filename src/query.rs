//! What's-on queries over a built [`Grid`].
//!
//! Both queries look only at the five buckets from two hours before to two
//! hours after the queried instant (see [`window_around`]), visited in that
//! order. At the ends of chrono's range the window is clipped. Results borrow from the grid and are keyed by resolved channel
//! name; channels with nothing to report are left out.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::grid::Grid;
use crate::timestamp::window_around;
use crate::types::Programme;

/// What is on a channel at a given instant, and what starts next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NowNext<'a> {
    pub current: Option<&'a Programme>,
    pub next: Option<&'a Programme>,
}

impl Grid {
    fn window_programmes(&self, keys: Vec<DateTime<Utc>>) -> impl Iterator<Item = &Programme> {
        keys.into_iter()
            .filter_map(|key| self.bucket(&key))
            .flatten()
    }

    /// Every programme in the window around `t`, grouped by channel in
    /// bucket order then document order.
    pub fn playing_around<Tz: TimeZone>(
        &self,
        t: &DateTime<Tz>,
    ) -> BTreeMap<&str, Vec<&Programme>> {
        let mut around: BTreeMap<&str, Vec<&Programme>> = BTreeMap::new();
        for programme in self.window_programmes(window_around(t)) {
            around
                .entry(programme.channel.as_str())
                .or_default()
                .push(programme);
        }
        around
    }

    /// The programme airing at `t` on each channel, plus the earliest one
    /// starting after `t`.
    ///
    /// A programme is current only when `start < t < stop`; both ends are
    /// exclusive. If overlapping programmes are both current, the last one
    /// seen wins. For next, the earliest start wins and ties keep the first
    /// one seen.
    pub fn playing_at<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> BTreeMap<&str, NowNext<'_>> {
        let at = t.with_timezone(&Utc);
        let mut on_air: BTreeMap<&str, NowNext<'_>> = BTreeMap::new();

        for programme in self.window_programmes(window_around(t)) {
            let start = programme.start().with_timezone(&Utc);
            let stop = programme.stop().with_timezone(&Utc);

            if start < at && at < stop {
                on_air
                    .entry(programme.channel.as_str())
                    .or_default()
                    .current = Some(programme);
            } else if at < start {
                let next = &mut on_air.entry(programme.channel.as_str()).or_default().next;
                if next.map_or(true, |earliest| programme.start() < earliest.start()) {
                    *next = Some(programme);
                }
            }
        }

        on_air
    }

    /// [`Grid::playing_around`] for the current wall-clock time.
    #[must_use]
    pub fn playing_around_now(&self) -> BTreeMap<&str, Vec<&Programme>> {
        self.playing_around(&Utc::now())
    }

    /// [`Grid::playing_at`] for the current wall-clock time.
    #[must_use]
    pub fn playing_now(&self) -> BTreeMap<&str, NowNext<'_>> {
        self.playing_at(&Utc::now())
    }
}
