use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Configuration for text splitting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters carried over from one chunk into the next
    pub chunk_overlap: usize,

    /// How chunk boundaries are chosen
    pub split_mode: SplitMode,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            split_mode: SplitMode::Character,
        }
    }
}

impl ChunkerConfig {
    /// Create a config with explicit sizes and mode
    #[must_use]
    pub const fn new(chunk_size: usize, chunk_overlap: usize, split_mode: SplitMode) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            split_mode,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size <= self.chunk_overlap {
            return Err(ChunkerError::invalid_config(format!(
                "chunk_size ({}) must be greater than chunk_overlap ({})",
                self.chunk_size, self.chunk_overlap
            )));
        }
        Ok(())
    }

    /// Distance the character window advances per chunk
    #[must_use]
    pub const fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap)
    }
}

/// Strategy for splitting text into chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Fixed-width sliding character window
    #[default]
    Character,

    /// Paragraph-aware greedy packing with character overlap
    Paragraph,
}

impl SplitMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitMode {
    type Err = ChunkerError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "character" => Ok(Self::Character),
            "paragraph" => Ok(Self::Paragraph),
            other => Err(ChunkerError::invalid_config(format!(
                "Unknown split_mode '{other}' (expected 'character' or 'paragraph')"
            ))),
        }
    }
}
