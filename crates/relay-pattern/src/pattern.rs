//! Pattern file loading and lookup.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "aliases": { "left": "RB90FJ7SIHYU1F", "right": "RB15H4FVGAZ726" },
//!   "patterns": {
//!     "P1": { "left": { "open": [1, 2], "close": [3] } },
//!     "P2": { "left": { "close": [1] }, "right": { "open": [4] } }
//!   }
//! }
//! ```
//!
//! Aliases map a short name to an encoded serial number. Each pattern maps
//! aliases to the relays that should be opened or closed. Declaration order
//! is preserved.

use std::collections::HashSet;
use std::path::Path;

use relay_cli_protocol::RelayState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{PatternError, PatternResult};

/// Alias used by [`RelayBoardPattern::from_serial_number`].
pub const SINGLE_ALIAS: &str = "A";

/// Pattern name used by [`RelayBoardPattern::from_serial_number`].
pub const SINGLE_PATTERN: &str = "P";

/// Relays to open and close on one board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelayPattern {
    /// Relays to open.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub open: Vec<u32>,
    /// Relays to close.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub close: Vec<u32>,
}

impl From<&RelayPattern> for RelayState {
    fn from(pattern: &RelayPattern) -> Self {
        RelayState {
            open: pattern.open.clone(),
            close: pattern.close.clone(),
        }
    }
}

/// A named serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Alias name.
    pub name: String,
    /// Encoded serial number of the board.
    pub serial_number: String,
}

/// A named set of relay patterns, keyed by alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPattern {
    /// Pattern name.
    pub name: String,
    /// Per-alias relay patterns.
    pub boards: Vec<(String, RelayPattern)>,
}

/// Raw top-level layout, before validation.
#[derive(Debug, Deserialize)]
struct PatternFile {
    aliases: Option<Map<String, Value>>,
    patterns: Option<Map<String, Value>>,
}

/// A validated pattern file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayBoardPattern {
    aliases: Vec<Alias>,
    patterns: Vec<NamedPattern>,
}

impl RelayBoardPattern {
    /// Create a pattern set, validating aliases and patterns.
    ///
    /// Every serial number must decode; codec errors are returned unchanged
    /// inside [`PatternError::SerialNumber`].
    pub fn new(aliases: Vec<Alias>, patterns: Vec<NamedPattern>) -> PatternResult<Self> {
        Self::check_aliases(&aliases)?;
        Self::check_patterns(&aliases, &patterns)?;
        Ok(RelayBoardPattern { aliases, patterns })
    }

    /// Load a pattern file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> PatternResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let pattern = Self::from_json_str(&content)?;
        log::debug!(
            "Loaded {} aliases and {} patterns from {}",
            pattern.aliases.len(),
            pattern.patterns.len(),
            path.display()
        );
        Ok(pattern)
    }

    /// Parse a pattern file from a JSON string.
    pub fn from_json_str(json: &str) -> PatternResult<Self> {
        let file: PatternFile = serde_json::from_str(json)?;
        let raw_aliases = file.aliases.ok_or(PatternError::MissingKey("aliases"))?;
        let raw_patterns = file.patterns.ok_or(PatternError::MissingKey("patterns"))?;

        let aliases = raw_aliases
            .into_iter()
            .map(|(name, value)| -> PatternResult<Alias> {
                let serial_number: String = serde_json::from_value(value)?;
                Ok(Alias {
                    name,
                    serial_number,
                })
            })
            .collect::<PatternResult<Vec<_>>>()?;

        let patterns = raw_patterns
            .into_iter()
            .map(|(name, value)| -> PatternResult<NamedPattern> {
                let boards: Map<String, Value> = serde_json::from_value(value)?;
                let boards = boards
                    .into_iter()
                    .map(|(alias, state)| -> PatternResult<(String, RelayPattern)> {
                        Ok((alias, serde_json::from_value(state)?))
                    })
                    .collect::<PatternResult<Vec<_>>>()?;
                Ok(NamedPattern { name, boards })
            })
            .collect::<PatternResult<Vec<_>>>()?;

        Self::new(aliases, patterns)
    }

    /// Build a single-board pattern set from one serial number.
    pub fn from_serial_number(
        serial_number: &str,
        open: Option<Vec<u32>>,
        close: Option<Vec<u32>>,
    ) -> PatternResult<Self> {
        let aliases = vec![Alias {
            name: SINGLE_ALIAS.to_string(),
            serial_number: serial_number.to_string(),
        }];
        let patterns = vec![NamedPattern {
            name: SINGLE_PATTERN.to_string(),
            boards: vec![(
                SINGLE_ALIAS.to_string(),
                RelayPattern {
                    open: open.unwrap_or_default(),
                    close: close.unwrap_or_default(),
                },
            )],
        }];
        Self::new(aliases, patterns)
    }

    /// Serialize back to the file format.
    pub fn to_json_pretty(&self) -> PatternResult<String> {
        let aliases: Map<String, Value> = self
            .aliases
            .iter()
            .map(|a| (a.name.clone(), Value::String(a.serial_number.clone())))
            .collect();
        let mut patterns = Map::new();
        for pattern in &self.patterns {
            let mut boards = Map::new();
            for (alias, state) in &pattern.boards {
                boards.insert(alias.clone(), serde_json::to_value(state)?);
            }
            patterns.insert(pattern.name.clone(), Value::Object(boards));
        }
        let mut root = Map::new();
        root.insert("aliases".to_string(), Value::Object(aliases));
        root.insert("patterns".to_string(), Value::Object(patterns));
        Ok(serde_json::to_string_pretty(&Value::Object(root))?)
    }

    /// All aliases, in declaration order.
    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// All pattern names, in declaration order.
    pub fn pattern_names(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.name.clone()).collect()
    }

    /// All serial numbers, in alias declaration order.
    pub fn serial_numbers(&self) -> Vec<String> {
        self.aliases.iter().map(|a| a.serial_number.clone()).collect()
    }

    /// Relay state for a serial number in the given (or only) pattern.
    pub fn pattern_for(&self, serial_number: &str, pattern: Option<&str>) -> PatternResult<RelayState> {
        let alias = self.alias_by_serial_number(serial_number)?;
        self.pattern_by_alias(alias, pattern)
    }

    /// Relay state for an alias in the given (or only) pattern.
    ///
    /// An alias the pattern does not mention gets an empty state.
    pub fn pattern_by_alias(&self, alias: &str, pattern: Option<&str>) -> PatternResult<RelayState> {
        let selected = match pattern {
            Some(name) => self
                .patterns
                .iter()
                .find(|p| p.name == name)
                .ok_or_else(|| PatternError::UnknownPattern(name.to_string()))?,
            None => match self.patterns.as_slice() {
                [only] => only,
                _ => return Err(PatternError::Undetermined(self.pattern_names())),
            },
        };
        Ok(selected
            .boards
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, state)| RelayState::from(state))
            .unwrap_or_default())
    }

    /// The alias a serial number is registered under.
    pub fn alias_by_serial_number(&self, serial_number: &str) -> PatternResult<&str> {
        self.aliases
            .iter()
            .find(|a| a.serial_number == serial_number)
            .map(|a| a.name.as_str())
            .ok_or_else(|| PatternError::UnknownSerialNumber(serial_number.to_string()))
    }

    fn check_aliases(aliases: &[Alias]) -> PatternResult<()> {
        if aliases.is_empty() {
            return Err(PatternError::NoAliases);
        }
        let mut seen = HashSet::new();
        for alias in aliases {
            relay_serial::decode(&alias.serial_number).map_err(|source| {
                PatternError::SerialNumber {
                    alias: alias.name.clone(),
                    source,
                }
            })?;
            if !seen.insert(alias.serial_number.as_str()) {
                return Err(PatternError::DuplicateSerialNumber(alias.serial_number.clone()));
            }
        }
        Ok(())
    }

    fn check_patterns(aliases: &[Alias], patterns: &[NamedPattern]) -> PatternResult<()> {
        if patterns.is_empty() {
            return Err(PatternError::NoPatterns);
        }
        for pattern in patterns {
            if pattern.boards.is_empty() {
                return Err(PatternError::EmptyPattern(pattern.name.clone()));
            }
            for (alias, _) in &pattern.boards {
                if !aliases.iter().any(|a| &a.name == alias) {
                    return Err(PatternError::UndefinedAlias {
                        pattern: pattern.name.clone(),
                        alias: alias.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
