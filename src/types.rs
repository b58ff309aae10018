use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating mode as reported and accepted by the AirTouch console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcMode {
    Heat,
    Cool,
    AutoHeat,
    AutoCool,
    Auto,
    Dry,
    Fan,
}

impl AcMode {
    pub const ALL: [AcMode; 7] = [
        AcMode::Heat,
        AcMode::Cool,
        AcMode::AutoHeat,
        AcMode::AutoCool,
        AcMode::Auto,
        AcMode::Dry,
        AcMode::Fan,
    ];

    pub fn as_airtouch_str(&self) -> &'static str {
        match self {
            AcMode::Heat => "Heat",
            AcMode::Cool => "Cool",
            AcMode::AutoHeat => "AutoHeat",
            AcMode::AutoCool => "AutoCool",
            AcMode::Auto => "Auto",
            AcMode::Dry => "Dry",
            AcMode::Fan => "Fan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcFanSpeed {
    Quiet,
    Low,
    Medium,
    High,
    Powerful,
    Auto,
    Turbo,
}

impl AcFanSpeed {
    pub const ALL: [AcFanSpeed; 7] = [
        AcFanSpeed::Quiet,
        AcFanSpeed::Low,
        AcFanSpeed::Medium,
        AcFanSpeed::High,
        AcFanSpeed::Powerful,
        AcFanSpeed::Auto,
        AcFanSpeed::Turbo,
    ];

    pub fn as_airtouch_str(&self) -> &'static str {
        match self {
            AcFanSpeed::Quiet => "Quiet",
            AcFanSpeed::Low => "Low",
            AcFanSpeed::Medium => "Medium",
            AcFanSpeed::High => "High",
            AcFanSpeed::Powerful => "Powerful",
            AcFanSpeed::Auto => "Auto",
            AcFanSpeed::Turbo => "Turbo",
        }
    }
}

impl fmt::Display for AcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_airtouch_str())
    }
}

impl fmt::Display for AcFanSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_airtouch_str())
    }
}

/// Platform-level HVAC mode vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
    HeatCool,
    Dry,
    FanOnly,
}

impl HvacMode {
    pub const ALL: [HvacMode; 6] = [
        HvacMode::Off,
        HvacMode::Heat,
        HvacMode::Cool,
        HvacMode::HeatCool,
        HvacMode::Dry,
        HvacMode::FanOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HvacMode::Off => "off",
            HvacMode::Heat => "heat",
            HvacMode::Cool => "cool",
            HvacMode::HeatCool => "heat_cool",
            HvacMode::Dry => "dry",
            HvacMode::FanOnly => "fan_only",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        HvacMode::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// Platform-level fan mode vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanMode {
    Diffuse,
    Low,
    Medium,
    High,
    Focus,
    Auto,
    Turbo,
}

impl FanMode {
    pub const ALL: [FanMode; 7] = [
        FanMode::Diffuse,
        FanMode::Low,
        FanMode::Medium,
        FanMode::High,
        FanMode::Focus,
        FanMode::Auto,
        FanMode::Turbo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FanMode::Diffuse => "diffuse",
            FanMode::Low => "low",
            FanMode::Medium => "medium",
            FanMode::High => "high",
            FanMode::Focus => "focus",
            FanMode::Auto => "auto",
            FanMode::Turbo => "turbo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        FanMode::ALL.into_iter().find(|m| m.as_str() == s)
    }
}

/// An air-conditioning unit behind the console. Setpoints are whole degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ac {
    pub number: u8,
    pub mode: AcMode,
    pub fan_speed: AcFanSpeed,
    pub min_setpoint: i32,
    pub max_setpoint: i32,
    pub is_on: bool,
}

/// A zone ("group") fed by exactly one AC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub number: u8,
    pub name: String,
    pub temperature: f64,
    pub target_setpoint: i32,
    pub is_on: bool,
    pub belongs_to_ac: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcSummary {
    pub id: u8,
    pub is_on: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: u8,
    pub name: String,
    pub is_on: bool,
}

/// Discovery-time listing captured after a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub acs: Vec<AcSummary>,
    pub groups: Vec<GroupSummary>,
}

impl Snapshot {
    pub fn capture(acs: &[Ac], groups: &[Group]) -> Self {
        Self {
            acs: acs
                .iter()
                .map(|ac| AcSummary {
                    id: ac.number,
                    is_on: ac.is_on,
                })
                .collect(),
            groups: groups
                .iter()
                .map(|g| GroupSummary {
                    id: g.number,
                    name: g.name.clone(),
                    is_on: g.is_on,
                })
                .collect(),
        }
    }
}

pub const TEMP_CELSIUS: &str = "°C";

/// Feature bits advertised by a climate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    pub const TARGET_TEMPERATURE: SupportedFeatures = SupportedFeatures(1);
    pub const FAN_MODE: SupportedFeatures = SupportedFeatures(8);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: SupportedFeatures) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for SupportedFeatures {
    type Output = SupportedFeatures;

    fn bitor(self, rhs: Self) -> Self {
        SupportedFeatures(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub identifiers: (String, u8),
    pub name: String,
    pub manufacturer: String,
    pub model: String,
}

/// Everything a zone entity publishes in one write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateState {
    pub name: String,
    pub available: bool,
    pub temperature_unit: String,
    pub current_temperature: f64,
    pub target_temperature: i32,
    pub min_temp: i32,
    pub max_temp: i32,
    pub hvac_mode: HvacMode,
    pub hvac_modes: Vec<HvacMode>,
    pub fan_mode: Option<FanMode>,
    pub fan_modes: Vec<FanMode>,
}
