//! Type-safe Rust reader for Live for Speed Replay Analyzer Format (RAF) telemetry.
//!
//! A RAF file is a 512-byte header, one 128-byte static record per wheel, and one
//! 64-byte data block per sample, each followed by a 32-byte record per wheel.
//! Parsing is a single synchronous pass over any [`std::io::Read`] source.
//!
//! # Features
//!
//! - **Exact layout**: every field and reserved gap read in file order with a tracked cursor
//! - **Typed errors**: truncation, bad signature and unknown versions are distinct [`RafError`] variants
//! - **Any source**: files, in-memory buffers, or anything implementing `Read`
//!
//! ## Example
//!
//! ```rust,no_run
//! use lfs_raf::Replay;
//!
//! fn main() -> lfs_raf::Result<()> {
//!     let replay = Replay::from_path("hotlap.raf")?;
//!     println!("{} on {} ({} samples)", replay.player, replay.track, replay.data.len());
//!
//!     for block in &replay.data {
//!         println!("{:.1} m/s heading {:.3}", block.speed, block.heading);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;

pub mod raf;

pub use config::{DEFAULT_MAX_PREALLOCATED_BLOCKS, LayoutMode, ParseOptions};
pub use error::*;

pub use raf::{
    DataBlock, DynamicWheelInfo, GearLabel, HlvcStatus, RafReader, Replay, StaticWheelInfo,
    parse_replay, parse_replay_with,
};
