//! Replay (root record) reader
//!
//! A single forward pass over the byte stream: header, session metadata, one
//! static record per wheel, then `num_blocks` samples each followed by one
//! dynamic record per wheel. The signature and version are the only validation
//! gates; anything else that is wrong shows up as [`RafError::StreamExhausted`].

use super::block::DataBlock;
use super::format::{
    CAR_LEN, CONFIG_LEN, DATA_BLOCK_SIZE, DYNAMIC_WHEEL_SIZE, GAME_VERSION_SKIP, GEAR_RATIO_SLOTS,
    HEADER_TAIL_SKIP, LFS_VERSION_LEN, MAX_RAF_VERSION, PLAYER_LEN, POST_GEARS_SKIP,
    POST_VERSION_SKIP, SHORT_TRACK_NAME_LEN, SIGNATURE, SPLIT_SLOTS, SectionSizes, TRACK_LEN,
    WEATHER_LEN,
};
use super::stream::RafReader;
use super::wheel::{DynamicWheelInfo, StaticWheelInfo};
use crate::{LayoutMode, ParseOptions, RafError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Hotlap validity check (HLVC) result recorded with the replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HlvcStatus {
    #[default]
    Unknown,
    Legal,
    Illegal,
}

impl HlvcStatus {
    /// Decode the header byte: 0 = unknown, 1 = legal, anything else = illegal.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => HlvcStatus::Unknown,
            1 => HlvcStatus::Legal,
            _ => HlvcStatus::Illegal,
        }
    }

    pub fn is_legal(self) -> Option<bool> {
        match self {
            HlvcStatus::Unknown => None,
            HlvcStatus::Legal => Some(true),
            HlvcStatus::Illegal => Some(false),
        }
    }
}

/// A Live for Speed Replay Analyzer Format recording.
///
/// ```rust,no_run
/// use lfs_raf::Replay;
///
/// fn summary() -> lfs_raf::Result<()> {
///     let replay = Replay::from_path("hotlap.raf")?;
///     println!("{replay}: {} samples", replay.data.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub raf_version: u8,
    pub lfs_version: String,
    /// Milliseconds between samples
    pub update_interval: u8,
    /// e.g. BL2R
    pub short_track_name: String,
    /// Total index distance
    pub track_ruler_length: f32,
    pub player: String,
    pub car: String,
    pub track: String,
    pub config: String,
    pub weather: String,
    /// Driver aids
    pub player_flags: u8,
    pub num_wheels: u8,
    pub hlvc_legal: HlvcStatus,
    /// Includes the lap time
    pub num_splits: u8,
    pub splits: Vec<i32>,
    /// kg
    pub mass: f32,
    /// kg
    pub sprung_mass: f32,
    /// N/m
    pub antiroll_rear: f32,
    /// N/m
    pub antiroll_front: f32,
    pub final_drive: f32,
    /// Forward gears
    pub num_gears: u8,
    /// One entry holding all seven stored forward ratio slots
    pub gear_ratios: Vec<[f32; GEAR_RATIO_SLOTS]>,
    pub static_wheel_info: Vec<StaticWheelInfo>,
    pub data: Vec<DataBlock>,
}

impl Replay {
    /// Open and parse a RAF file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path_with(path, &ParseOptions::default())
    }

    /// Open and parse a RAF file with explicit options.
    pub fn from_path_with<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening RAF file: {}", path.display());
        let file = File::open(path).map_err(|e| RafError::file_error(path.to_path_buf(), e))?;
        parse_replay_with(BufReader::new(file), options)
    }

    /// Parse a replay from any byte source positioned at offset 0.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        parse_replay(reader)
    }

    /// Parse a replay held in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        parse_replay(data)
    }

    /// Session length covered by the samples.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.data.len() as u64 * u64::from(self.update_interval))
    }

    /// The last recorded split, which is the lap time in milliseconds.
    pub fn lap_time(&self) -> Option<i32> {
        self.splits.last().copied()
    }

    /// Whether the replay passed the hotlap validity check, if known.
    pub fn is_hotlap_legal(&self) -> Option<bool> {
        self.hlvc_legal.is_legal()
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.player, self.car, self.track, self.config)
    }
}

/// Parse a replay with default options.
pub fn parse_replay<R: Read>(reader: R) -> Result<Replay> {
    parse_replay_with(reader, &ParseOptions::default())
}

/// Parse a replay from a byte source positioned at offset 0.
pub fn parse_replay_with<R: Read>(reader: R, options: &ParseOptions) -> Result<Replay> {
    let mut reader = RafReader::new(reader);
    let mut replay = Replay::default();

    let signature: [u8; 6] = reader.read_array("signature")?;
    if &signature != SIGNATURE {
        return Err(RafError::InvalidSignature { found: signature });
    }

    reader.skip(GAME_VERSION_SKIP, "game version")?;

    replay.raf_version = reader.read_u8_be("raf version")?;
    replay.update_interval = reader.read_u8_be("update interval")?;
    if replay.raf_version > MAX_RAF_VERSION {
        return Err(RafError::UnsupportedVersion {
            found: replay.raf_version,
            max_supported: MAX_RAF_VERSION,
        });
    }

    reader.skip(POST_VERSION_SKIP, "reserved")?;

    let sizes = SectionSizes {
        header_size: reader.read_u16_le("header size")?,
        block_size: reader.read_u16_le("block size")?,
        wheel_block_size: reader.read_u16_le("wheel block size")?,
        wheel_block_offset: reader.read_u16_le("wheel block offset")?,
        num_blocks: reader.read_u32_le("number of blocks")?,
    };
    debug!(
        "Parsed RAF header: version={}, interval={}ms, header_size={}, block_size={}, num_blocks={}",
        replay.raf_version,
        replay.update_interval,
        sizes.header_size,
        sizes.block_size,
        sizes.num_blocks
    );

    replay.short_track_name = reader.read_fixed_string(SHORT_TRACK_NAME_LEN, "short track name")?;
    replay.track_ruler_length = reader.read_f32_le("track ruler length")?;
    replay.player = reader.read_fixed_string(PLAYER_LEN, "player name")?;
    replay.car = reader.read_fixed_string(CAR_LEN, "car name")?;
    replay.track = reader.read_fixed_string(TRACK_LEN, "track name")?;
    replay.config = reader.read_fixed_string(CONFIG_LEN, "track config")?;
    replay.weather = reader.read_fixed_string(WEATHER_LEN, "weather")?;
    replay.lfs_version = reader.read_fixed_string(LFS_VERSION_LEN, "lfs version")?;

    replay.player_flags = reader.read_u8_be("player flags")?;
    replay.num_wheels = reader.read_u8_be("number of wheels")?;
    replay.hlvc_legal = HlvcStatus::from_code(reader.read_u8_be("hlvc legal")?);
    replay.num_splits = reader.read_u8_be("number of splits")?;

    let mut splits = Vec::with_capacity(SPLIT_SLOTS);
    for _ in 0..SPLIT_SLOTS {
        splits.push(reader.read_i32_le("split time")?);
    }
    splits.truncate(usize::from(replay.num_splits));
    replay.splits = splits;

    replay.mass = reader.read_f32_le("mass")?;
    replay.sprung_mass = reader.read_f32_le("sprung mass")?;
    replay.antiroll_rear = reader.read_f32_le("rear anti-roll")?;
    replay.antiroll_front = reader.read_f32_le("front anti-roll")?;
    replay.final_drive = reader.read_f32_le("final drive")?;

    replay.num_gears = reader.read_u8_be("number of gears")?;
    reader.skip(POST_GEARS_SKIP, "reserved")?;

    let mut ratios = [0f32; GEAR_RATIO_SLOTS];
    for ratio in ratios.iter_mut() {
        *ratio = reader.read_f32_le("gear ratio")?;
    }
    replay.gear_ratios.push(ratios);

    reader.skip(HEADER_TAIL_SKIP, "header padding")?;

    debug!(
        "Session: player={:?}, car={:?}, track={:?} {:?}, wheels={}, splits={:?}",
        replay.player,
        replay.car,
        replay.track,
        replay.config,
        replay.num_wheels,
        replay.splits
    );

    let declared = declared_layout(options, &sizes, replay.num_wheels);

    replay.static_wheel_info.reserve(usize::from(replay.num_wheels));
    for _ in 0..replay.num_wheels {
        replay.static_wheel_info.push(StaticWheelInfo::parse_from_reader(&mut reader)?);
    }

    if declared {
        let surplus = sizes.header_surplus(reader.position());
        if surplus > 0 {
            trace!("Skipping {} declared header bytes", surplus);
            reader.skip(surplus as usize, "declared header padding")?;
        }
    }

    replay.data.reserve(options.block_capacity(sizes.num_blocks));
    for index in 0..sizes.num_blocks {
        trace!("Reading data block {} at offset {}", index, reader.position());
        let mut block = DataBlock::parse_from_reader(&mut reader)?;

        if declared {
            reader.skip(sizes.wheel_offset_surplus(), "declared wheel block offset")?;
        }

        block.wheels.reserve(usize::from(replay.num_wheels));
        for _ in 0..replay.num_wheels {
            block.wheels.push(DynamicWheelInfo::parse_from_reader(&mut reader)?);
            if declared {
                reader.skip(sizes.wheel_block_surplus(), "declared wheel block padding")?;
            }
        }

        if declared {
            let consumed = DATA_BLOCK_SIZE.max(usize::from(sizes.wheel_block_offset))
                + usize::from(replay.num_wheels)
                    * DYNAMIC_WHEEL_SIZE.max(usize::from(sizes.wheel_block_size));
            reader.skip(sizes.block_surplus(consumed), "declared block padding")?;
        }

        replay.data.push(block);
    }

    debug!("Parsed {} data blocks ending at offset {}", replay.data.len(), reader.position());
    Ok(replay)
}

fn declared_layout(options: &ParseOptions, sizes: &SectionSizes, num_wheels: u8) -> bool {
    if options.layout != LayoutMode::Declared {
        return false;
    }
    if sizes.undersized(num_wheels) {
        warn!(
            "Declared RAF sizes are smaller than the packed layout (header={}, block={}, wheel_offset={}, wheel_size={}); using packed layout",
            sizes.header_size, sizes.block_size, sizes.wheel_block_offset, sizes.wheel_block_size
        );
        return false;
    }
    true
}
