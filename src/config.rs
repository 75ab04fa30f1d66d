//! Parser configuration.
//!
//! [`ParseOptions`] derives serde traits so a host application can keep it in its
//! own configuration file:
//!
//! ```rust
//! use lfs_raf::{LayoutMode, ParseOptions};
//!
//! let options = ParseOptions::default().with_layout(LayoutMode::Declared);
//! assert_eq!(options.layout, LayoutMode::Declared);
//! ```

use serde::{Deserialize, Serialize};

/// Default cap on up-front sample allocation.
pub const DEFAULT_MAX_PREALLOCATED_BLOCKS: usize = 65_536;

/// How the section sizes announced in the header are used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Read the packed layout and ignore announced sizes.
    #[default]
    Packed,
    /// Skip reserved bytes when announced sizes exceed the packed layout.
    Declared,
}

/// Options controlling a single parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub layout: LayoutMode,
    /// Upper bound for `Vec::with_capacity` on the sample list. Never limits how
    /// many samples are read.
    pub max_preallocated_blocks: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            layout: LayoutMode::Packed,
            max_preallocated_blocks: DEFAULT_MAX_PREALLOCATED_BLOCKS,
        }
    }
}

impl ParseOptions {
    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_max_preallocated_blocks(mut self, blocks: usize) -> Self {
        self.max_preallocated_blocks = blocks;
        self
    }

    pub(crate) fn block_capacity(&self, num_blocks: u32) -> usize {
        usize::try_from(num_blocks).unwrap_or(usize::MAX).min(self.max_preallocated_blocks)
    }
}
