//! RAF file reading and parsing
//!
//! This module reads Live for Speed Replay Analyzer Format files from any
//! [`Read`](std::io::Read) source. Records are parsed bottom-up: the byte
//! [`stream`] feeds the [`wheel`] and [`block`] readers, which the [`replay`]
//! reader drives once per wheel and once per sample.

pub mod block;
pub mod format;
pub mod replay;
pub mod stream;
pub mod wheel;

pub use block::{DataBlock, GearLabel};
pub use replay::{HlvcStatus, Replay, parse_replay, parse_replay_with};
pub use stream::RafReader;
pub use wheel::{DynamicWheelInfo, StaticWheelInfo};
