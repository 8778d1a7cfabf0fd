//! # Reporter Database Adapter
//!
//! ## Purpose
//! A read-only, optionally-injected lookup from a reporter abbreviation to
//! its canonical editions. The core engine never owns reporter data; callers
//! inject an implementation (or none, in which case candidate reporters pass
//! through unvalidated, per spec.md §6).

use once_cell::sync::OnceCell;
use std::collections::HashMap;

/// One canonical reporter entry a `ReporterDb` may return for an
/// abbreviation lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterEntry {
    pub canonical_name: String,
    pub normalized_abbreviation: String,
    pub editions: Vec<String>,
}

/// Consumed, not owned: `findByAbbreviation(abbr) -> ReporterEntry[]`
/// (spec.md §6). Implementations must be thread-safe — the loader is called
/// at most once per process, behind a lazily-initialized singleton.
pub trait ReporterDb: Send + Sync {
    fn find_by_abbreviation(&self, abbr: &str) -> Vec<ReporterEntry>;
}

/// A small in-memory default covering the common federal reporters, useful
/// for CLI use and tests without requiring callers to supply their own
/// adapter. Abbreviations are matched after stripping spaces and periods,
/// mirroring `extract::case::normalize_reporter_for_lookup`.
#[derive(Debug, Default)]
pub struct StaticReporterDb {
    entries: HashMap<String, Vec<ReporterEntry>>,
}

impl StaticReporterDb {
    pub fn new() -> Self {
        let mut entries: HashMap<String, Vec<ReporterEntry>> = HashMap::new();
        let seed: &[(&str, &str, &[&str])] = &[
            ("F.2d", "Federal Reporter, Second Series", &["2d"]),
            ("F.3d", "Federal Reporter, Third Series", &["3d"]),
            ("U.S.", "United States Reports", &[]),
            ("S.Ct.", "Supreme Court Reporter", &[]),
            ("LEd2d", "Lawyers' Edition, Second Series", &["2d"]),
        ];
        for (abbr, canonical, editions) in seed {
            let key = normalize(abbr);
            entries.insert(
                key.clone(),
                vec![ReporterEntry {
                    canonical_name: canonical.to_string(),
                    normalized_abbreviation: key,
                    editions: editions.iter().map(|s| s.to_string()).collect(),
                }],
            );
        }
        Self { entries }
    }

    pub fn with_entry(mut self, abbr: &str, entry: ReporterEntry) -> Self {
        self.entries.entry(normalize(abbr)).or_default().push(entry);
        self
    }
}

impl ReporterDb for StaticReporterDb {
    fn find_by_abbreviation(&self, abbr: &str) -> Vec<ReporterEntry> {
        self.entries.get(&normalize(abbr)).cloned().unwrap_or_default()
    }
}

fn normalize(abbr: &str) -> String {
    abbr.chars().filter(|c| !c.is_whitespace() && *c != '.').collect::<String>().to_lowercase()
}

static DEFAULT_DB: OnceCell<StaticReporterDb> = OnceCell::new();

/// Process-wide lazily-loaded default adapter. Loaded at most once; the
/// resulting value is immutable, matching spec.md §5's "no other
/// process-wide state" constraint.
pub fn default_reporter_db() -> &'static StaticReporterDb {
    DEFAULT_DB.get_or_init(StaticReporterDb::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_spacing_and_punctuation() {
        let db = StaticReporterDb::new();
        let matches = db.find_by_abbreviation("F. 2d");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].canonical_name, "Federal Reporter, Second Series");
    }

    #[test]
    fn unknown_abbreviation_returns_empty() {
        let db = StaticReporterDb::new();
        assert!(db.find_by_abbreviation("Zzz.").is_empty());
    }

    #[test]
    fn default_db_is_idempotent_across_calls() {
        let a = default_reporter_db() as *const StaticReporterDb;
        let b = default_reporter_db() as *const StaticReporterDb;
        assert_eq!(a, b);
    }
}
