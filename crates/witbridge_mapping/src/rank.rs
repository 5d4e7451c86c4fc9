//! Lexicographic rank decoding.
//!
//! Source trackers express manual ordering as an opaque lexicographic rank:
//! a bucket digit, a base-36 rank, and an optional base-36 sub-rank
//! (`0|hzzzzz:i0009`). The destination wants a plain numeric ordering key,
//! so the codec turns each rank into a decimal and remembers every decode
//! for the lifetime of one migration run, surfacing duplicated and colliding
//! ranks as they appear.

use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{LazyLock, Mutex};
use tracing::warn;

/// Grammar of a well-formed rank: bucket digit, `|`, base-36 rank, optional
/// `:`-separated base-36 sub-rank.
static RANK_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-2]\|[0-9a-zA-Z]*(:[0-9a-zA-Z]*)?$").expect("rank grammar"));

/// Ordering key for items whose rank cannot be decoded. Sorts after every
/// decodable rank, so unrankable items land at the end instead of silently
/// jumping the queue.
pub const RANK_MAX: Decimal = Decimal::MAX;

/// What one decode observed. [`RankCodec::decode`] collapses this to the
/// value alone; the detail stays available for audits and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// First sighting of this rank string.
    Fresh,
    /// The exact rank string was decoded earlier in this run.
    DuplicateRank,
    /// A different rank string already produced the same decimal.
    Collision,
    /// Out-of-grammar or overflowing input; the sentinel was returned.
    Invalid,
}

/// Decodes rank strings into a totally-ordered decimal key.
///
/// One codec instance lives for one migration run and owns the decode cache
/// for that run. Both directions of the cache sit behind a single lock so the
/// check-then-insert sequence stays atomic when the pipeline maps revisions
/// from several workers at once.
#[derive(Debug, Default)]
pub struct RankCodec {
    cache: Mutex<RankCache>,
}

#[derive(Debug, Default)]
struct RankCache {
    forward: HashMap<String, Decimal>,
    reverse: HashMap<Decimal, String>,
}

impl RankCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one rank string.
    ///
    /// Undecodable input yields [`RANK_MAX`]. A rank string seen before
    /// returns its cached value; a decimal collision between two different
    /// rank strings keeps the first writer in the reverse cache. Both
    /// conditions indicate the source ordering needs re-balancing and are
    /// logged, but neither fails the call.
    pub fn decode(&self, rank: &str) -> Decimal {
        self.decode_with_outcome(rank).0
    }

    pub(crate) fn decode_with_outcome(&self, rank: &str) -> (Decimal, DecodeOutcome) {
        if rank.is_empty() || !RANK_FORMAT.is_match(rank) {
            return (RANK_MAX, DecodeOutcome::Invalid);
        }

        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(&cached) = cache.forward.get(rank) {
            warn!(
                "duplicate rank '{}' detected; the source ordering may need re-balancing",
                rank
            );
            return (cached, DecodeOutcome::DuplicateRank);
        }

        let Some(value) = decode_rank_value(rank) else {
            warn!(
                "rank '{}' could not be decoded; treating the item as unranked",
                rank
            );
            return (RANK_MAX, DecodeOutcome::Invalid);
        };

        let outcome = match cache.reverse.get(&value) {
            Some(previous) if previous != rank => {
                warn!(
                    "ranks '{}' and '{}' decode to the same ordering key {}; the source ordering may need re-balancing",
                    previous, rank, value
                );
                DecodeOutcome::Collision
            }
            _ => DecodeOutcome::Fresh,
        };

        // The reverse direction keeps the first writer for a given key; the
        // forward entry is always recorded so repeats hit the cache.
        cache
            .reverse
            .entry(value)
            .or_insert_with(|| rank.to_string());
        cache.forward.insert(rank.to_string(), value);

        (value, outcome)
    }
}

/// Numeric value of a well-formed rank.
///
/// The base-36 rank forms the integer part and the base-36 sub-rank, when
/// present, forms the digits after the decimal point. The sub-rank acts as a
/// decimal-digit tiebreaker rather than a base-36 fraction, and the bucket
/// digit does not participate at all; both properties match the ordering
/// contract of the system being migrated from, so sub-ranks of differing
/// digit lengths can tie (`.1` vs `.10`).
fn decode_rank_value(rank: &str) -> Option<Decimal> {
    let mut segments = rank.split(['|', ':']).filter(|s| !s.is_empty());
    let _bucket = segments.next()?;
    let rank_part = base36_decode(segments.next()?)?;
    let sub_part = match segments.next() {
        Some(segment) => base36_decode(segment)?,
        None => 0,
    };

    Decimal::from_str(&format!("{rank_part}.{sub_part}")).ok()
}

/// Decode one base-36 segment (digits and latin letters, case-insensitive).
fn base36_decode(segment: &str) -> Option<u128> {
    let mut value: u128 = 0;
    for ch in segment.chars() {
        let digit = ch.to_digit(36)?;
        value = value.checked_mul(36)?.checked_add(u128::from(digit))?;
    }
    Some(value)
}
