//! Run configuration
//!
//! Resolves the term list for a scan (command line terms first, then the
//! default word list) and carries the remaining run settings.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Archive host used when no mirror is given
pub const DEFAULT_BASE_URL: &str = "https://www.nber.org";

/// Snapshot file written when no output path is given
pub const DEFAULT_OUTPUT: &str = "pdfsearch_results.bin";

/// File name of the default word list
pub const WORDS_FILE_NAME: &str = "words.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no search terms: none given on the command line and no default word list found")]
    NoTerms,

    #[error("failed to read word list {path}: {source}")]
    WordList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Encoding of the persisted result snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFormat {
    #[default]
    Binary,
    Json,
}

impl SnapshotFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" | "bincode" => Some(Self::Binary),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Json => "json",
        }
    }
}

/// clap value parser for `--format`
pub fn parse_snapshot_format(s: &str) -> Result<SnapshotFormat, String> {
    SnapshotFormat::from_str(s)
        .ok_or_else(|| format!("unknown format '{}' (expected binary or json)", s))
}

/// Fallback term list, supplied from outside the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultTerms {
    Available(Vec<String>),
    Absent,
}

impl DefaultTerms {
    /// Load the default list from the first word list that exists.
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for candidate in default_locations() {
            if candidate.is_file() {
                log::info!("Using default word list {}", candidate.display());
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::Absent)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::WordList {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::Available(parse_word_list(&content)))
    }
}

/// `./words.txt`, then `<config dir>/paper-scan/words.txt`
fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(WORDS_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("paper-scan").join(WORDS_FILE_NAME));
    }
    locations
}

/// One term per line; blank lines and `#` comments are ignored
pub fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

/// Drop blank and repeated terms, keeping first occurrences.
///
/// Terms are kept byte-for-byte: padding such as `" tax "` is part of the term.
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref();
        if term.trim().is_empty() || out.iter().any(|t| t == term) {
            continue;
        }
        out.push(term.to_string());
    }
    out
}

/// Whether the command line supplied at least one non-blank term
pub fn has_cli_terms(cli_terms: Option<&[String]>) -> bool {
    cli_terms.is_some_and(|given| given.iter().any(|t| !t.trim().is_empty()))
}

/// Pick the run's term set. Command line terms win over the default list.
pub fn resolve_terms(
    cli_terms: Option<&[String]>,
    defaults: &DefaultTerms,
) -> Result<Vec<String>, ConfigError> {
    let terms = match (cli_terms, defaults) {
        (Some(given), _) if has_cli_terms(cli_terms) => normalize_terms(given),
        (_, DefaultTerms::Available(list)) => normalize_terms(list),
        _ => Vec::new(),
    };

    if terms.is_empty() {
        return Err(ConfigError::NoTerms);
    }
    Ok(terms)
}

/// Fully resolved settings for one scan
#[derive(Debug, Clone)]
pub struct Config {
    pub start: u64,
    pub end: u64,
    pub terms: Vec<String>,
    pub output: PathBuf,
    pub format: SnapshotFormat,
    pub base_url: String,
}

impl Config {
    pub fn new(
        start: u64,
        end: u64,
        cli_terms: Option<&[String]>,
        defaults: &DefaultTerms,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            start,
            end,
            terms: resolve_terms(cli_terms, defaults)?,
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: SnapshotFormat::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_format(mut self, format: SnapshotFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}
