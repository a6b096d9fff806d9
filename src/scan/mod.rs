//! Range driver
//!
//! Walks a half-open range of paper numbers strictly in ascending order,
//! one paper at a time: fetch, extract, match, record. Any per-paper
//! failure is logged and the cursor moves on.

use crate::config::Config;
use crate::extract::TextExtractor;
use crate::fetch::DocumentFetcher;
use crate::matcher::match_terms;
use crate::store::ResultStore;
use serde::Serialize;

/// What happened to a single paper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    FetchFailed,
    ParseFailed,
    Searched { new_matches: usize },
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub attempted: u64,
    pub fetch_failures: u64,
    pub parse_failures: u64,
    pub documents_with_matches: u64,
    pub new_matches: u64,
}

impl ScanReport {
    fn add(&mut self, outcome: Outcome) {
        self.attempted += 1;
        match outcome {
            Outcome::FetchFailed => self.fetch_failures += 1,
            Outcome::ParseFailed => self.parse_failures += 1,
            Outcome::Searched { new_matches } => {
                if new_matches > 0 {
                    self.documents_with_matches += 1;
                    self.new_matches += new_matches as u64;
                }
            }
        }
    }
}

pub struct Scanner<F, E> {
    fetcher: F,
    extractor: E,
    terms: Vec<String>,
    store: ResultStore,
}

impl<F: DocumentFetcher, E: TextExtractor> Scanner<F, E> {
    pub fn new(fetcher: F, extractor: E, terms: Vec<String>, store: ResultStore) -> Self {
        Self {
            fetcher,
            extractor,
            terms,
            store,
        }
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn into_store(self) -> ResultStore {
        self.store
    }

    /// Process every paper in `[start, end)`. An empty or inverted range does nothing.
    pub async fn run(&mut self, start: u64, end: u64) -> ScanReport {
        let mut report = ScanReport::default();
        let mut current = start;

        while current < end {
            let outcome = self.process(current).await;
            report.add(outcome);
            current += 1;
        }

        log::info!(
            "Scanned {} papers in [{}, {}): {} fetch failures, {} unreadable, {} new matches in {} papers",
            report.attempted,
            start,
            end,
            report.fetch_failures,
            report.parse_failures,
            report.new_matches,
            report.documents_with_matches
        );
        report
    }

    /// Fetch, extract and match one paper, recording any new hits.
    pub async fn process(&mut self, id: u64) -> Outcome {
        log::info!("[OPENING URL]: {}", self.fetcher.url_for(id));

        let bytes = match self.fetcher.fetch(id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("[ERROR]: {}", e);
                return Outcome::FetchFailed;
            }
        };

        // Unreadable documents are skipped like failed downloads
        let text = match self.extractor.extract(&bytes) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("[ERROR]: paper {}: {}", id, e);
                return Outcome::ParseFailed;
            }
        };

        log::info!("[SEARCHING]: paper {}", id);
        let mut new_matches = 0;
        for term in match_terms(&text, &self.terms) {
            if self.store.record(term, id) {
                log::info!("[FOUND]: '{}' in paper {}", term, id);
                new_matches += 1;
            }
        }

        Outcome::Searched { new_matches }
    }
}

/// Scan the configured range with a fresh store at the configured output.
pub async fn run_scan<F, E>(config: &Config, fetcher: F, extractor: E) -> (ScanReport, ResultStore)
where
    F: DocumentFetcher,
    E: TextExtractor,
{
    let store = ResultStore::new(&config.terms, &config.output, config.format);
    let mut scanner = Scanner::new(fetcher, extractor, config.terms.clone(), store);
    let report = scanner.run(config.start, config.end).await;
    (report, scanner.into_store())
}
