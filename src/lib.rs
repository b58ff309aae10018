mod api;
mod climate;
mod config;
mod config_flow;
mod coordinator;
mod error;
mod mapping;
mod setup;
mod types;

pub const DOMAIN: &str = "airtouch4";

pub use api::{AirTouchApi, Connector};
pub use climate::ZoneEntity;
pub use config::{ConfigEntry, EntryData, CONFIG_VERSION};
pub use config_flow::{ConfigFlow, FlowResult, UserInput, ERROR_CANNOT_CONNECT, ERROR_NO_UNITS};
pub use coordinator::{
    Coordinator, CoordinatorBuilder, CoordinatorUpdate, UpdateReceiver, SCAN_INTERVAL,
};
pub use error::{Error, Result};
pub use mapping::{
    ac_fan_speed_from_fan, ac_mode_from_hvac, fan_mode_from_ac, fan_modes_for, hvac_mode_from_ac,
    hvac_modes_for,
};
pub use setup::{EntryContext, Integration};
pub use types::*;
