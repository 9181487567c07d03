//! Fingerprint-addressed summary store with lazy TTL eviction.

use std::collections::HashMap;
use std::time::Duration;

use arkiva_core::{Fingerprint, Timestamp};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::policy::GenerationPolicy;
use super::stats::CacheStats;

/// A cached summary for one document version.
///
/// Callers only ever see clones; the store keeps the authoritative copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Generated text. Empty while a generation is pending or after a failure.
    pub summary: String,
    /// The entry is live while `expires_at > now`.
    pub expires_at: Timestamp,
    /// Generations consumed for this fingerprint so far.
    pub generation_count: u32,
}

impl CacheEntry {
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.expires_at > now
    }

    pub fn has_summary(&self) -> bool {
        !self.summary.is_empty()
    }
}

/// Mapping from fingerprint to [`CacheEntry`].
///
/// Owned explicitly by the session and injected where needed. All mutation
/// goes through `&mut self`, so a check followed by a write can never be
/// interleaved with another caller.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<Fingerprint, CacheEntry>,
    /// Generation counts per fingerprint. Survives the sweep of the entry.
    generations: HashMap<Fingerprint, u32>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a live entry.
    ///
    /// Every entry found expired during the call is swept.
    pub fn get(&mut self, fp: &Fingerprint, now: Timestamp) -> Option<CacheEntry> {
        self.sweep(now);
        match self.entries.get(fp) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Consume one generation credit for `fp`.
    ///
    /// Creates an empty entry when none is live; otherwise only bumps the
    /// count of the live one. Callers must check [`Self::quota_exhausted`]
    /// first.
    pub fn reserve(&mut self, fp: &Fingerprint, now: Timestamp, ttl: Duration) -> CacheEntry {
        let count = self.generations.entry(fp.clone()).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;

        match self.entries.get_mut(fp) {
            Some(entry) if entry.is_live(now) => {
                entry.generation_count = count;
                entry.clone()
            }
            _ => {
                let entry = CacheEntry {
                    summary: String::new(),
                    expires_at: expiry(now, ttl),
                    generation_count: count,
                };
                self.entries.insert(fp.clone(), entry.clone());
                entry
            }
        }
    }

    /// Store a generated summary.
    ///
    /// A surviving entry keeps its expiry and count. An entry that expired
    /// or was swept in the meantime is recreated with a fresh expiry.
    pub fn commit(
        &mut self,
        fp: &Fingerprint,
        summary: impl Into<String>,
        now: Timestamp,
        ttl: Duration,
    ) {
        let summary = summary.into();
        match self.entries.get_mut(fp) {
            Some(entry) if entry.is_live(now) => {
                entry.summary = summary;
            }
            _ => {
                let count = *self.generations.entry(fp.clone()).or_insert(1);
                debug!(fingerprint = %fp, "recreating summary entry on commit");
                self.entries.insert(
                    fp.clone(),
                    CacheEntry {
                        summary,
                        expires_at: expiry(now, ttl),
                        generation_count: count,
                    },
                );
            }
        }
    }

    /// Whether `fp` has used up its generation allowance under `policy`.
    pub fn quota_exhausted(&self, fp: &Fingerprint, policy: &GenerationPolicy) -> bool {
        !policy.allows(self.generation_count(fp))
    }

    /// Generations consumed so far for `fp` (0 if never reserved).
    pub fn generation_count(&self, fp: &Fingerprint) -> u32 {
        self.generations.get(fp).copied().unwrap_or(0)
    }

    /// Read an entry without sweeping or touching the stats.
    pub fn peek(&self, fp: &Fingerprint) -> Option<&CacheEntry> {
        self.entries.get(fp)
    }

    /// Remove every entry with `expires_at <= now`. Returns how many were removed.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            self.evictions += evicted as u64;
            debug!(evicted, "swept expired summary entries");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entry_count: self.entries.len() as u64,
            evictions: self.evictions,
        }
    }
}

fn expiry(now: Timestamp, ttl: Duration) -> Timestamp {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
