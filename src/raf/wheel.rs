//! Static and dynamic wheel records

use super::format::{DYNAMIC_WHEEL_SIZE, STATIC_WHEEL_SIZE, STATIC_WHEEL_TAIL_SKIP};
use super::stream::RafReader;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Read;
use tracing::trace;

/// Static wheel information, one per wheel, constant for the whole replay.
///
/// Positions are relative to the car's reference point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticWheelInfo {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Unloaded radius
    pub radius: f32,
    /// Width at the widest point
    pub width: f32,
    /// Suspension travel
    pub maximum_deflect: f32,
    pub tyre_type: u8,
    /// N/m
    pub spring_constant: f32,
    /// Compression damping, Ns/m
    pub damping_c: f32,
    /// Rebound damping, Ns/m
    pub damping_r: f32,
    /// Nm
    pub max_brake_torque: f32,
}

impl StaticWheelInfo {
    /// Size of the on-disk record in bytes
    pub const SIZE: usize = STATIC_WHEEL_SIZE;

    pub fn parse_from_reader<R: Read>(reader: &mut RafReader<R>) -> Result<Self> {
        trace!("Reading static wheel info at offset {}", reader.position());

        let x = reader.read_f32_le("static wheel x")?;
        let y = reader.read_f32_le("static wheel y")?;
        let z = reader.read_f32_le("static wheel z")?;
        let radius = reader.read_f32_le("static wheel radius")?;
        let width = reader.read_f32_le("static wheel width")?;
        let maximum_deflect = reader.read_f32_le("static wheel maximum deflect")?;
        reader.skip(5, "static wheel reserved")?;
        let tyre_type = reader.read_u8("static wheel tyre type")?;
        reader.skip(2, "static wheel reserved")?;
        let spring_constant = reader.read_f32_le("static wheel spring constant")?;
        let damping_c = reader.read_f32_le("static wheel compression damping")?;
        let damping_r = reader.read_f32_le("static wheel rebound damping")?;
        let max_brake_torque = reader.read_f32_le("static wheel max brake torque")?;

        reader.skip(STATIC_WHEEL_TAIL_SKIP, "static wheel padding")?;

        Ok(Self {
            x,
            y,
            z,
            radius,
            width,
            maximum_deflect,
            tyre_type,
            spring_constant,
            damping_c,
            damping_r,
            max_brake_torque,
        })
    }
}

/// Dynamic wheel information, one per wheel per sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicWheelInfo {
    /// Compression from unloaded
    pub suspension_deflect: f32,
    /// Including Ackermann and toe
    pub steer: f32,
    /// Force right
    pub x_force: f32,
    /// Force forward
    pub y_force: f32,
    /// Perpendicular to the surface
    pub vertical_load: f32,
    /// radians/s
    pub angular_velocity: f32,
    /// Relative to the road, viewed from the rear (radians)
    pub lean: f32,
    /// Degrees C
    pub air_temp: i8,
    /// Documented as 0-255 but stored in a signed byte; see [`Self::slip_fraction_raw`].
    pub slip_fraction: i8,
}

impl DynamicWheelInfo {
    /// Size of the on-disk record in bytes
    pub const SIZE: usize = DYNAMIC_WHEEL_SIZE;

    pub fn parse_from_reader<R: Read>(reader: &mut RafReader<R>) -> Result<Self> {
        let suspension_deflect = reader.read_f32_le("dynamic wheel suspension deflect")?;
        let steer = reader.read_f32_le("dynamic wheel steer")?;
        let x_force = reader.read_f32_le("dynamic wheel x force")?;
        let y_force = reader.read_f32_le("dynamic wheel y force")?;
        let vertical_load = reader.read_f32_le("dynamic wheel vertical load")?;
        let angular_velocity = reader.read_f32_le("dynamic wheel angular velocity")?;
        let lean = reader.read_f32_le("dynamic wheel lean")?;
        let air_temp = reader.read_i8("dynamic wheel air temp")?;
        let slip_fraction = reader.read_i8("dynamic wheel slip fraction")?;
        reader.skip(2, "dynamic wheel reserved")?;

        Ok(Self {
            suspension_deflect,
            steer,
            x_force,
            y_force,
            vertical_load,
            angular_velocity,
            lean,
            air_temp,
            slip_fraction,
        })
    }

    /// The slip fraction byte read as unsigned, matching the documented 0-255 range.
    pub fn slip_fraction_raw(&self) -> u8 {
        self.slip_fraction as u8
    }
}
