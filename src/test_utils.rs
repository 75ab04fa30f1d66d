//! Test utilities for building synthetic RAF streams
//!
//! The crate only reads RAF files. These helpers write the same layout back out
//! so tests and benchmarks can work from known values instead of recorded files.

#![cfg(any(test, feature = "benchmark"))]

use crate::raf::block::heading_from_forward;
use crate::raf::format::{
    CAR_LEN, CONFIG_LEN, DATA_BLOCK_SIZE, DYNAMIC_WHEEL_SIZE, GEAR_RATIO_SLOTS, HEADER_SIZE,
    HEADER_TAIL_SKIP, LFS_VERSION_LEN, PLAYER_LEN, SHORT_TRACK_NAME_LEN, SIGNATURE, SPLIT_SLOTS,
    STATIC_WHEEL_SIZE, STATIC_WHEEL_TAIL_SKIP, TRACK_LEN, WEATHER_LEN,
};
use crate::{DataBlock, DynamicWheelInfo, HlvcStatus, Replay, StaticWheelInfo};

/// Writes a [`Replay`] in RAF layout, optionally padded to declared section sizes.
#[derive(Debug, Clone)]
pub struct RafFixture {
    replay: Replay,
    header_size: u16,
    block_size: u16,
    wheel_block_size: u16,
    wheel_block_offset: u16,
}

impl RafFixture {
    /// Fixture announcing zero for every section size.
    pub fn new(replay: Replay) -> Self {
        Self { replay, header_size: 0, block_size: 0, wheel_block_size: 0, wheel_block_offset: 0 }
    }

    pub fn with_header_size(mut self, size: u16) -> Self {
        self.header_size = size;
        self
    }

    pub fn with_block_size(mut self, size: u16) -> Self {
        self.block_size = size;
        self
    }

    pub fn with_wheel_block_size(mut self, size: u16) -> Self {
        self.wheel_block_size = size;
        self
    }

    pub fn with_wheel_block_offset(mut self, offset: u16) -> Self {
        self.wheel_block_offset = offset;
        self
    }

    /// Packed layout; announced sizes are written but not honoured.
    pub fn encode(&self) -> Vec<u8> {
        self.write(false)
    }

    /// Layout padded out to the announced sizes wherever they exceed the packed sizes.
    pub fn encode_padded(&self) -> Vec<u8> {
        self.write(true)
    }

    fn write(&self, padded: bool) -> Vec<u8> {
        let r = &self.replay;
        let mut out = Vec::with_capacity(HEADER_SIZE);

        out.extend_from_slice(SIGNATURE);
        out.extend_from_slice(&[0, 0]);
        out.push(r.raf_version);
        out.push(r.update_interval);
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&self.block_size.to_le_bytes());
        out.extend_from_slice(&self.wheel_block_size.to_le_bytes());
        out.extend_from_slice(&self.wheel_block_offset.to_le_bytes());
        out.extend_from_slice(&(r.data.len() as u32).to_le_bytes());

        put_string(&mut out, &r.short_track_name, SHORT_TRACK_NAME_LEN);
        out.extend_from_slice(&r.track_ruler_length.to_le_bytes());
        put_string(&mut out, &r.player, PLAYER_LEN);
        put_string(&mut out, &r.car, CAR_LEN);
        put_string(&mut out, &r.track, TRACK_LEN);
        put_string(&mut out, &r.config, CONFIG_LEN);
        put_string(&mut out, &r.weather, WEATHER_LEN);
        put_string(&mut out, &r.lfs_version, LFS_VERSION_LEN);

        out.push(r.player_flags);
        out.push(r.num_wheels);
        out.push(hlvc_code(r.hlvc_legal));
        out.push(r.num_splits);

        for slot in 0..SPLIT_SLOTS {
            let split = r.splits.get(slot).copied().unwrap_or(0);
            out.extend_from_slice(&split.to_le_bytes());
        }

        for value in [r.mass, r.sprung_mass, r.antiroll_rear, r.antiroll_front, r.final_drive] {
            out.extend_from_slice(&value.to_le_bytes());
        }

        out.push(r.num_gears);
        out.extend_from_slice(&[0, 0, 0]);

        let ratios = r.gear_ratios.first().copied().unwrap_or([0.0; GEAR_RATIO_SLOTS]);
        for ratio in ratios {
            out.extend_from_slice(&ratio.to_le_bytes());
        }

        out.resize(out.len() + HEADER_TAIL_SKIP, 0);
        debug_assert_eq!(out.len(), HEADER_SIZE);

        for wheel in &r.static_wheel_info {
            out.extend_from_slice(&encode_static_wheel(wheel));
        }
        if padded {
            pad_to(&mut out, usize::from(self.header_size));
        }

        for block in &r.data {
            let start = out.len();
            out.extend_from_slice(&encode_block_fields(block));
            if padded {
                pad_to(&mut out, start + usize::from(self.wheel_block_offset));
            }
            for wheel in &block.wheels {
                let wheel_start = out.len();
                out.extend_from_slice(&encode_dynamic_wheel(wheel));
                if padded {
                    pad_to(&mut out, wheel_start + usize::from(self.wheel_block_size));
                }
            }
            if padded {
                pad_to(&mut out, start + usize::from(self.block_size));
            }
        }

        out
    }
}

/// Packed encoding with zero section sizes.
pub fn encode_replay(replay: &Replay) -> Vec<u8> {
    RafFixture::new(replay.clone()).encode()
}

pub fn encode_static_wheel(wheel: &StaticWheelInfo) -> Vec<u8> {
    let mut out = Vec::with_capacity(STATIC_WHEEL_SIZE);
    for value in [wheel.x, wheel.y, wheel.z, wheel.radius, wheel.width, wheel.maximum_deflect] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&[0; 5]);
    out.push(wheel.tyre_type);
    out.extend_from_slice(&[0; 2]);
    for value in [wheel.spring_constant, wheel.damping_c, wheel.damping_r, wheel.max_brake_torque] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.resize(out.len() + STATIC_WHEEL_TAIL_SKIP, 0);
    out
}

pub fn encode_dynamic_wheel(wheel: &DynamicWheelInfo) -> Vec<u8> {
    let mut out = Vec::with_capacity(DYNAMIC_WHEEL_SIZE);
    for value in [
        wheel.suspension_deflect,
        wheel.steer,
        wheel.x_force,
        wheel.y_force,
        wheel.vertical_load,
        wheel.angular_velocity,
        wheel.lean,
    ] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.push(wheel.air_temp as u8);
    out.push(wheel.slip_fraction as u8);
    out.extend_from_slice(&[0; 2]);
    out
}

/// The 64 fixed bytes of a block; wheels are not included.
pub fn encode_block_fields(block: &DataBlock) -> Vec<u8> {
    let mut out = Vec::with_capacity(DATA_BLOCK_SIZE);
    for value in [block.throttle, block.brake, block.input_steer, block.clutch, block.handbrake] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    for value in [block.gear, block.lateral_g, block.forward_g, block.upwards_g] {
        out.push(value as u8);
    }
    out.extend_from_slice(&block.speed.to_le_bytes());
    out.extend_from_slice(&block.car_distance.to_le_bytes());
    for value in [block.position_x, block.position_y, block.position_z] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&block.engine_speed.to_le_bytes());
    out.extend_from_slice(&block.index_distance.to_le_bytes());
    for value in [block.rx, block.ry, block.rz, block.fx, block.fy, block.fz] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

/// Deterministic replay with distinct values in every field.
pub fn sample_replay(num_wheels: u8, num_blocks: usize) -> Replay {
    let static_wheel_info = (0..num_wheels)
        .map(|w| {
            let side = if w % 2 == 0 { -1.0 } else { 1.0 };
            StaticWheelInfo {
                x: side * 0.74,
                y: if w < 2 { -1.2 } else { 1.3 },
                z: 0.3,
                radius: 0.29 + f32::from(w) * 0.001,
                width: 0.195,
                maximum_deflect: 0.12,
                tyre_type: w % 3,
                spring_constant: 52_000.0 + f32::from(w) * 100.0,
                damping_c: 3_100.0,
                damping_r: 4_200.0,
                max_brake_torque: 1_450.0,
            }
        })
        .collect();

    let data = (0..num_blocks)
        .map(|i| {
            let t = i as f32;
            let fx = (i as i16).wrapping_mul(1_201);
            let fy = 32_000i16.wrapping_sub((i as i16).wrapping_mul(13));
            DataBlock {
                throttle: 1.0 - t * 0.01,
                brake: t * 0.02,
                input_steer: -0.05 * t,
                clutch: 0.0,
                handbrake: 0.0,
                gear: 2 + (i % 5) as i8,
                lateral_g: (i % 120) as i8 - 60,
                forward_g: 12,
                upwards_g: -3,
                speed: 20.0 + t,
                car_distance: 15.5 * t,
                position_x: (i as i32).wrapping_mul(65_536),
                position_y: (i as i32).wrapping_sub(131_072),
                position_z: 4_096,
                engine_speed: 600.0 + t * 3.0,
                index_distance: 10.0 * t,
                rx: 32_000,
                ry: fx.wrapping_neg(),
                rz: 0,
                fx,
                fy,
                fz: -7,
                heading: heading_from_forward(fx, fy),
                wheels: (0..num_wheels)
                    .map(|w| DynamicWheelInfo {
                        suspension_deflect: 0.01 * f32::from(w),
                        steer: -0.02 * t,
                        x_force: 100.0 * t,
                        y_force: -50.0,
                        vertical_load: 3_000.0 + f32::from(w),
                        angular_velocity: 70.0 + t,
                        lean: 0.001,
                        air_temp: 22,
                        slip_fraction: -(w as i8) - 1,
                    })
                    .collect(),
            }
        })
        .collect();

    Replay {
        raf_version: 2,
        lfs_version: "0.6H".to_string(),
        update_interval: 10,
        short_track_name: "BL1".to_string(),
        track_ruler_length: 3_307.5,
        player: "Tester".to_string(),
        car: "XRT".to_string(),
        track: "Blackwood".to_string(),
        config: "GP Track".to_string(),
        weather: "Sunny".to_string(),
        player_flags: 8,
        num_wheels,
        hlvc_legal: HlvcStatus::Legal,
        num_splits: 2,
        splits: vec![31_250, 61_230],
        mass: 1_223.0,
        sprung_mass: 1_100.0,
        antiroll_rear: 22_000.0,
        antiroll_front: 28_000.0,
        final_drive: 4.1,
        num_gears: 5,
        gear_ratios: vec![[3.2, 2.1, 1.5, 1.15, 0.92, 0.0, 0.0]],
        static_wheel_info,
        data,
    }
}

fn put_string(out: &mut Vec<u8>, value: &str, width: usize) {
    let mut bytes: Vec<u8> = value.chars().map(|c| c as u32 as u8).take(width).collect();
    bytes.resize(width, 0);
    out.extend_from_slice(&bytes);
}

fn pad_to(out: &mut Vec<u8>, len: usize) {
    if out.len() < len {
        out.resize(len, 0);
    }
}

fn hlvc_code(status: HlvcStatus) -> u8 {
    match status {
        HlvcStatus::Unknown => 0,
        HlvcStatus::Legal => 1,
        HlvcStatus::Illegal => 2,
    }
}
