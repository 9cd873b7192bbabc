use crate::domain::automaton::{Automaton, AutomatonBuilder};
use crate::error::Result;
use crate::interfaces::lossy_lines;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A non-fatal problem found while reading a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A `Transitions` line without exactly three tokens.
    MalformedTransition { line_no: usize, line: String },
    /// Content under a section header the loader does not know.
    UnknownSection { line_no: usize, section: String },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::MalformedTransition { line_no, line } => {
                write!(f, "Invalid transition format in line {line_no}: '{line}'")
            }
            ConfigWarning::UnknownSection { line_no, section } => {
                write!(f, "Unknown section '{section}' at line {line_no}")
            }
        }
    }
}

/// The result of a successful load: the automaton plus any skipped lines.
#[derive(Debug)]
pub struct LoadedConfig {
    pub automaton: Automaton,
    pub warnings: Vec<ConfigWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    States,
    Alphabet,
    Accept,
    Start,
    Transitions,
}

impl Section {
    fn from_header(name: &str) -> Option<Self> {
        match name {
            "States" => Some(Section::States),
            "Alphabet" => Some(Section::Alphabet),
            "Accept" => Some(Section::Accept),
            "Start" => Some(Section::Start),
            "Transitions" => Some(Section::Transitions),
            _ => None,
        }
    }
}

/// Reads an automaton description from a file.
///
/// Only failing to open or read the file is an error; malformed lines are
/// reported through [`LoadedConfig::warnings`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<LoadedConfig> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let loaded = parse(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        states = loaded.automaton.states().len(),
        warnings = loaded.warnings.len(),
        "loaded automaton"
    );
    Ok(loaded)
}

/// Parses the sectioned text format from any buffered source.
pub fn parse<R: BufRead>(source: R) -> Result<LoadedConfig> {
    let mut builder = Automaton::builder();
    let mut warnings = Vec::new();
    // Header text of the current section; `None` before the first header.
    let mut header: Option<String> = None;

    for (idx, line) in lossy_lines(source).enumerate() {
        let line_no = idx + 1;
        let raw = line?;
        let line = raw.trim();

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if let Some(name) = line.strip_suffix(':') {
            header = Some(name.trim().to_string());
            continue;
        }

        let section = header.as_deref().and_then(Section::from_header);
        match section {
            Some(section) => {
                if let Some(warning) = apply_line(&mut builder, section, line, line_no) {
                    warnings.push(warning);
                }
            }
            None => warnings.push(ConfigWarning::UnknownSection {
                line_no,
                section: header.clone().unwrap_or_default(),
            }),
        }
    }

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    Ok(LoadedConfig {
        automaton: builder.build(),
        warnings,
    })
}

fn apply_line(
    builder: &mut AutomatonBuilder,
    section: Section,
    line: &str,
    line_no: usize,
) -> Option<ConfigWarning> {
    match section {
        Section::States => {
            for state in split_list(line) {
                builder.state(state);
            }
        }
        Section::Alphabet => {
            for symbol in split_list(line) {
                builder.symbol(symbol);
            }
        }
        Section::Accept => {
            for state in split_list(line) {
                builder.accept(state);
            }
        }
        Section::Start => {
            builder.start(line);
        }
        Section::Transitions => {
            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts.as_slice() {
                [from, symbol, to] => {
                    builder.transition(*from, *symbol, *to);
                }
                _ => {
                    return Some(ConfigWarning::MalformedTransition {
                        line_no,
                        line: line.to_string(),
                    });
                }
            }
        }
    }
    None
}

fn split_list(line: &str) -> impl Iterator<Item = &str> {
    line.split(',').map(str::trim).filter(|item| !item.is_empty())
}
