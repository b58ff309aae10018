//! Translation between AirTouch vocabulary and the platform's climate vocabulary.
//!
//! Each direction is its own table. The mode mapping is many-to-one going
//! forward (`AutoHeat`, `AutoCool` and `Auto` all read as `HeatCool`), so the
//! reverse table is written out rather than derived. `HeatCool` writes back as
//! `Auto`, which lets the console choose between heating and cooling.

use crate::types::{AcFanSpeed, AcMode, FanMode, HvacMode};

const AC_TO_HVAC: &[(AcMode, HvacMode)] = &[
    (AcMode::Heat, HvacMode::Heat),
    (AcMode::Cool, HvacMode::Cool),
    (AcMode::AutoHeat, HvacMode::HeatCool),
    (AcMode::AutoCool, HvacMode::HeatCool),
    (AcMode::Auto, HvacMode::HeatCool),
    (AcMode::Dry, HvacMode::Dry),
    (AcMode::Fan, HvacMode::FanOnly),
];

// `Off` has no vendor equivalent; it is power, not mode.
const HVAC_TO_AC: &[(HvacMode, AcMode)] = &[
    (HvacMode::Heat, AcMode::Heat),
    (HvacMode::Cool, AcMode::Cool),
    (HvacMode::HeatCool, AcMode::Auto),
    (HvacMode::Dry, AcMode::Dry),
    (HvacMode::FanOnly, AcMode::Fan),
];

const AC_TO_FAN: &[(AcFanSpeed, FanMode)] = &[
    (AcFanSpeed::Quiet, FanMode::Diffuse),
    (AcFanSpeed::Low, FanMode::Low),
    (AcFanSpeed::Medium, FanMode::Medium),
    (AcFanSpeed::High, FanMode::High),
    (AcFanSpeed::Powerful, FanMode::Focus),
    (AcFanSpeed::Auto, FanMode::Auto),
    (AcFanSpeed::Turbo, FanMode::Turbo),
];

const FAN_TO_AC: &[(FanMode, AcFanSpeed)] = &[
    (FanMode::Diffuse, AcFanSpeed::Quiet),
    (FanMode::Low, AcFanSpeed::Low),
    (FanMode::Medium, AcFanSpeed::Medium),
    (FanMode::High, AcFanSpeed::High),
    (FanMode::Focus, AcFanSpeed::Powerful),
    (FanMode::Auto, AcFanSpeed::Auto),
    (FanMode::Turbo, AcFanSpeed::Turbo),
];

fn lookup<K: PartialEq + Copy, V: Copy>(table: &[(K, V)], key: K) -> Option<V> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Total over the vendor domain.
pub fn hvac_mode_from_ac(mode: AcMode) -> HvacMode {
    lookup(AC_TO_HVAC, mode).unwrap_or(HvacMode::HeatCool)
}

/// `None` for `Off`.
pub fn ac_mode_from_hvac(mode: HvacMode) -> Option<AcMode> {
    lookup(HVAC_TO_AC, mode)
}

pub fn fan_mode_from_ac(speed: AcFanSpeed) -> FanMode {
    lookup(AC_TO_FAN, speed).unwrap_or(FanMode::Auto)
}

pub fn ac_fan_speed_from_fan(mode: FanMode) -> Option<AcFanSpeed> {
    lookup(FAN_TO_AC, mode)
}

/// Selectable modes for a zone: the AC's modes translated, deduplicated, then `Off`.
pub fn hvac_modes_for(ac_modes: &[AcMode]) -> Vec<HvacMode> {
    let mut modes = Vec::with_capacity(ac_modes.len() + 1);
    for mode in ac_modes {
        let hvac = hvac_mode_from_ac(*mode);
        if !modes.contains(&hvac) {
            modes.push(hvac);
        }
    }
    modes.push(HvacMode::Off);
    modes
}

pub fn fan_modes_for(speeds: &[AcFanSpeed]) -> Vec<FanMode> {
    speeds.iter().map(|s| fan_mode_from_ac(*s)).collect()
}
