//! Per-sample data block
//!
//! One [`DataBlock`] is recorded every `update_interval` milliseconds. The fixed
//! part is 64 packed bytes; the per-wheel records that follow it are read by the
//! replay reader because their count lives in the header.
//!
//! | offset | type    | field |
//! |-------:|---------|-------|
//! | 0      | f32 x5  | throttle, brake, input_steer, clutch, handbrake |
//! | 20     | i8 x4   | gear, lateral_g, forward_g, upwards_g |
//! | 24     | f32 x2  | speed, car_distance |
//! | 32     | i32 x3  | position_x, position_y, position_z |
//! | 44     | f32 x2  | engine_speed, index_distance |
//! | 52     | i16 x6  | rx, ry, rz, fx, fy, fz |

use super::format::DATA_BLOCK_SIZE;
use super::stream::RafReader;
use super::wheel::DynamicWheelInfo;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// Fixed-point units per metre for map positions.
pub const POSITION_UNITS_PER_METRE: f64 = 65536.0;
/// Full-scale value of the right and forward unit vectors.
pub const VECTOR_FULL_SCALE: f32 = 32767.0;
/// Encoded acceleration units per g (-120..120 covers -6..6 g).
pub const G_UNITS_PER_G: f32 = 20.0;

/// Human-readable gear, decoded from the raw gear byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearLabel {
    Reverse,
    Neutral,
    Forward(u8),
    /// Negative raw values never occur in valid recordings.
    Invalid(i8),
}

/// A single sampled telemetry block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataBlock {
    /// 0 to 1
    pub throttle: f32,
    /// 0 to 1
    pub brake: f32,
    /// radians
    pub input_steer: f32,
    /// 0 to 1
    pub clutch: f32,
    /// 0 to 1
    pub handbrake: f32,
    /// 0 = reverse, 1 = neutral, 2 = first gear
    pub gear: i8,
    pub lateral_g: i8,
    pub forward_g: i8,
    pub upwards_g: i8,
    /// m/s
    pub speed: f32,
    /// Metres travelled by the car
    pub car_distance: f32,
    pub position_x: i32,
    pub position_y: i32,
    pub position_z: i32,
    /// radians/s
    pub engine_speed: f32,
    /// Track ruler distance in metres
    pub index_distance: f32,
    pub rx: i16,
    pub ry: i16,
    pub rz: i16,
    pub fx: i16,
    pub fy: i16,
    pub fz: i16,
    /// Anti-clockwise from above, derived from `fx`/`fy`
    pub heading: f64,
    pub wheels: Vec<DynamicWheelInfo>,
}

impl DataBlock {
    /// Size of the fixed on-disk fields in bytes
    pub const SIZE: usize = DATA_BLOCK_SIZE;

    /// Read the fixed fields and derive the heading. `wheels` is left empty.
    pub fn parse_from_reader<R: Read>(reader: &mut RafReader<R>) -> Result<Self> {
        let throttle = reader.read_f32_le("block throttle")?;
        let brake = reader.read_f32_le("block brake")?;
        let input_steer = reader.read_f32_le("block input steer")?;
        let clutch = reader.read_f32_le("block clutch")?;
        let handbrake = reader.read_f32_le("block handbrake")?;
        let gear = reader.read_i8("block gear")?;
        let lateral_g = reader.read_i8("block lateral g")?;
        let forward_g = reader.read_i8("block forward g")?;
        let upwards_g = reader.read_i8("block upwards g")?;
        let speed = reader.read_f32_le("block speed")?;
        let car_distance = reader.read_f32_le("block car distance")?;
        let position_x = reader.read_i32_le("block position x")?;
        let position_y = reader.read_i32_le("block position y")?;
        let position_z = reader.read_i32_le("block position z")?;
        let engine_speed = reader.read_f32_le("block engine speed")?;
        let index_distance = reader.read_f32_le("block index distance")?;
        let rx = reader.read_i16_le("block right vector x")?;
        let ry = reader.read_i16_le("block right vector y")?;
        let rz = reader.read_i16_le("block right vector z")?;
        let fx = reader.read_i16_le("block forward vector x")?;
        let fy = reader.read_i16_le("block forward vector y")?;
        let fz = reader.read_i16_le("block forward vector z")?;

        Ok(Self {
            throttle,
            brake,
            input_steer,
            clutch,
            handbrake,
            gear,
            lateral_g,
            forward_g,
            upwards_g,
            speed,
            car_distance,
            position_x,
            position_y,
            position_z,
            engine_speed,
            index_distance,
            rx,
            ry,
            rz,
            fx,
            fy,
            fz,
            heading: heading_from_forward(fx, fy),
            wheels: Vec::new(),
        })
    }

    /// Map position in metres.
    pub fn position_metres(&self) -> [f64; 3] {
        [
            f64::from(self.position_x) / POSITION_UNITS_PER_METRE,
            f64::from(self.position_y) / POSITION_UNITS_PER_METRE,
            f64::from(self.position_z) / POSITION_UNITS_PER_METRE,
        ]
    }

    /// Right vector normalised to [-1, 1].
    pub fn right_vector(&self) -> [f32; 3] {
        [self.rx, self.ry, self.rz].map(|v| f32::from(v) / VECTOR_FULL_SCALE)
    }

    /// Forward vector normalised to [-1, 1].
    pub fn forward_vector(&self) -> [f32; 3] {
        [self.fx, self.fy, self.fz].map(|v| f32::from(v) / VECTOR_FULL_SCALE)
    }

    /// Lateral, forward and upwards acceleration in g.
    pub fn g_forces(&self) -> [f32; 3] {
        [self.lateral_g, self.forward_g, self.upwards_g].map(|v| f32::from(v) / G_UNITS_PER_G)
    }

    pub fn gear_label(&self) -> GearLabel {
        match self.gear {
            0 => GearLabel::Reverse,
            1 => GearLabel::Neutral,
            g if g > 1 => GearLabel::Forward((g - 1) as u8),
            g => GearLabel::Invalid(g),
        }
    }
}

/// Heading in radians from the fixed-point forward vector components.
pub fn heading_from_forward(fx: i16, fy: i16) -> f64 {
    let b = f64::from(fx) / 32767.0;
    let e = f64::from(fy) / 32767.0;
    (-b).atan2(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::encode_block_fields;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};
    use std::io::Cursor;

    fn parse(bytes: Vec<u8>) -> (DataBlock, u64) {
        let mut reader = RafReader::new(Cursor::new(bytes));
        let block = DataBlock::parse_from_reader(&mut reader).unwrap();
        (block, reader.position())
    }

    #[test]
    fn block_fields_land_at_documented_offsets() {
        let mut bytes = vec![0u8; DataBlock::SIZE];
        bytes[16..20].copy_from_slice(&0.5f32.to_le_bytes()); // handbrake
        bytes[20] = 3; // gear
        bytes[21] = 0x88; // lateral g -120
        bytes[23] = 20; // upwards g
        bytes[24..28].copy_from_slice(&41.0f32.to_le_bytes());
        bytes[32..36].copy_from_slice(&(-65536i32).to_le_bytes());
        bytes[48..52].copy_from_slice(&1234.5f32.to_le_bytes());
        bytes[58..60].copy_from_slice(&32767i16.to_le_bytes()); // fx
        bytes[62..64].copy_from_slice(&(-1i16).to_le_bytes()); // fz

        let (block, consumed) = parse(bytes);
        assert_eq!(consumed, 64);
        assert_eq!(block.handbrake, 0.5);
        assert_eq!(block.gear, 3);
        assert_eq!(block.lateral_g, -120);
        assert_eq!(block.upwards_g, 20);
        assert_eq!(block.speed, 41.0);
        assert_eq!(block.position_x, -65536);
        assert_eq!(block.index_distance, 1234.5);
        assert_eq!(block.fx, 32767);
        assert_eq!(block.fz, -1);
        assert!(block.wheels.is_empty());
    }

    #[test]
    fn heading_points_along_forward_vector() {
        assert!((heading_from_forward(32767, 0) + FRAC_PI_2).abs() < 1e-6);
        assert!((heading_from_forward(-32767, 0) - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(heading_from_forward(0, 32767), 0.0);
        assert!((heading_from_forward(0, -32767).abs() - PI).abs() < 1e-6);
    }

    #[test]
    fn derived_values_use_documented_scales() {
        let block = DataBlock {
            gear: 0,
            lateral_g: -120,
            forward_g: 20,
            upwards_g: 0,
            position_x: 65536,
            position_y: -32768,
            position_z: 0,
            fy: 32767,
            rx: -32767,
            ..Default::default()
        };
        assert_eq!(block.g_forces(), [-6.0, 1.0, 0.0]);
        assert_eq!(block.position_metres(), [1.0, -0.5, 0.0]);
        assert_eq!(block.forward_vector(), [0.0, 1.0, 0.0]);
        assert_eq!(block.right_vector(), [-1.0, 0.0, 0.0]);
        assert_eq!(block.gear_label(), GearLabel::Reverse);
    }

    #[test]
    fn gear_labels() {
        let label = |gear| DataBlock { gear, ..Default::default() }.gear_label();
        assert_eq!(label(1), GearLabel::Neutral);
        assert_eq!(label(2), GearLabel::Forward(1));
        assert_eq!(label(7), GearLabel::Forward(6));
        assert_eq!(label(-1), GearLabel::Invalid(-1));
    }

    #[test]
    fn truncated_block_is_exhaustion() {
        let mut reader = RafReader::new(Cursor::new(vec![0u8; DataBlock::SIZE - 1]));
        let err = DataBlock::parse_from_reader(&mut reader).unwrap_err();
        assert!(err.is_truncation());
    }

    proptest! {
        #[test]
        fn prop_heading_is_recomputed_from_own_vector(
            fx in any::<i16>(),
            fy in any::<i16>(),
            speed in -100.0f32..100.0f32,
        ) {
            let source = DataBlock { fx, fy, speed, ..Default::default() };
            let (block, _) = parse(encode_block_fields(&source));
            let expected = (-(f64::from(fx) / 32767.0)).atan2(f64::from(fy) / 32767.0);
            prop_assert_eq!(block.heading, expected);
            prop_assert_eq!(block.speed, speed);
        }
    }
}
