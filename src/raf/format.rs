//! RAF file layout constants
//!
//! ## RAF File Structure
//!
//! 1. **Header** (512 bytes) - signature, version, section sizes, session metadata
//! 2. **Static Wheel Info** (128 bytes per wheel) - geometry and suspension constants
//! 3. **Data Blocks** (one per sample) - 64 bytes of car state, then 32 bytes per wheel
//!
//! Numeric telemetry is little-endian. The signature and the single-byte header
//! groups are documented as big-endian, which only matters for the signature text.

// Type widths as named by the RAF documentation
pub const CHAR: usize = 1;
pub const BYTE: usize = 1;
pub const WORD: usize = 2;
pub const INT: usize = 4;
pub const FLOAT: usize = 4;
pub const SHORT: usize = 2;

/// File signature at offset 0.
pub const SIGNATURE: &[u8; 6] = b"LFSRAF";

/// Highest RAF version this crate understands.
pub const MAX_RAF_VERSION: u8 = 2;

/// Packed header size, up to the first static wheel record.
pub const HEADER_SIZE: usize = 512;
pub const STATIC_WHEEL_SIZE: usize = 128;
pub const DYNAMIC_WHEEL_SIZE: usize = 32;
pub const DATA_BLOCK_SIZE: usize = 64;

// Fixed string widths
pub const SHORT_TRACK_NAME_LEN: usize = 4;
pub const PLAYER_LEN: usize = 32;
pub const CAR_LEN: usize = 32;
pub const TRACK_LEN: usize = 32;
pub const CONFIG_LEN: usize = 16;
pub const WEATHER_LEN: usize = 16;
pub const LFS_VERSION_LEN: usize = 8;

/// Split slots stored in the header regardless of the split count.
pub const SPLIT_SLOTS: usize = 4;
/// Gear ratio slots stored in the header regardless of the gear count.
pub const GEAR_RATIO_SLOTS: usize = 7;

// Reserved regions
pub const GAME_VERSION_SKIP: usize = 2 * BYTE;
pub const POST_VERSION_SKIP: usize = 2 * BYTE;
pub const POST_GEARS_SKIP: usize = 3 * BYTE;
pub const HEADER_TAIL_SKIP: usize = 272 * BYTE;
pub const STATIC_WHEEL_TAIL_SKIP: usize = 80 * BYTE;

/// Section sizes announced in the header.
///
/// The packed reader only needs `num_blocks`; the other fields are consulted in
/// [`LayoutMode::Declared`](crate::LayoutMode::Declared).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSizes {
    pub header_size: u16,
    pub block_size: u16,
    pub wheel_block_size: u16,
    pub wheel_block_offset: u16,
    pub num_blocks: u32,
}

impl SectionSizes {
    /// Bytes between the end of the packed header plus wheels and the first block.
    pub fn header_surplus(&self, position: u64) -> u64 {
        u64::from(self.header_size).saturating_sub(position)
    }

    /// Bytes between the 64 fixed block bytes and the first wheel record.
    pub fn wheel_offset_surplus(&self) -> usize {
        usize::from(self.wheel_block_offset).saturating_sub(DATA_BLOCK_SIZE)
    }

    /// Bytes following each 32-byte dynamic wheel record.
    pub fn wheel_block_surplus(&self) -> usize {
        usize::from(self.wheel_block_size).saturating_sub(DYNAMIC_WHEEL_SIZE)
    }

    /// Bytes following the last wheel record of a block, given the bytes already consumed.
    pub fn block_surplus(&self, consumed: usize) -> usize {
        usize::from(self.block_size).saturating_sub(consumed)
    }

    /// Whether any announced size is smaller than the packed layout needs.
    pub fn undersized(&self, num_wheels: u8) -> bool {
        let packed_block = DATA_BLOCK_SIZE + usize::from(num_wheels) * DYNAMIC_WHEEL_SIZE;
        let packed_header = HEADER_SIZE + usize::from(num_wheels) * STATIC_WHEEL_SIZE;
        usize::from(self.header_size) < packed_header
            || usize::from(self.block_size) < packed_block
            || usize::from(self.wheel_block_offset) < DATA_BLOCK_SIZE
            || usize::from(self.wheel_block_size) < DYNAMIC_WHEEL_SIZE
    }
}
