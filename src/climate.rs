use std::sync::Arc;

use tracing::debug;

use crate::api::AirTouchApi;
use crate::coordinator::{Coordinator, UpdateReceiver};
use crate::mapping::{
    ac_fan_speed_from_fan, ac_mode_from_hvac, fan_mode_from_ac, fan_modes_for, hvac_mode_from_ac,
    hvac_modes_for,
};
use crate::setup::EntryContext;
use crate::types::*;
use crate::{Error, Result};

// Console limits, used only if the owning AC has vanished from the client.
const FALLBACK_MIN_TEMP: i32 = 16;
const FALLBACK_MAX_TEMP: i32 = 30;

type StateCallback = Box<dyn Fn(&ClimateState) + Send + Sync>;

/// Climate entity for one AirTouch group.
///
/// Mode, fan speed and setpoint limits belong to the owning AC, so they are
/// read live from the client rather than from the coordinator's snapshot.
pub struct ZoneEntity {
    group_number: u8,
    client: Arc<dyn AirTouchApi>,
    coordinator: Arc<Coordinator>,
    unit: Group,
    state_callbacks: Vec<StateCallback>,
}

impl ZoneEntity {
    pub fn new(context: &EntryContext, group_number: u8) -> Result<Self> {
        let client = Arc::clone(context.client());
        let unit = client
            .group(group_number)
            .ok_or(Error::UnknownGroup(group_number))?;
        debug!(group = group_number, name = %unit.name, "found device");
        Ok(Self {
            group_number,
            client,
            coordinator: Arc::clone(context.coordinator()),
            unit,
            state_callbacks: Vec::new(),
        })
    }

    /// Register a sink for published state.
    pub fn on_state(mut self, f: impl Fn(&ClimateState) + Send + Sync + 'static) -> Self {
        self.state_callbacks.push(Box::new(f));
        self
    }

    pub fn group_number(&self) -> u8 {
        self.group_number
    }

    pub fn unique_id(&self) -> String {
        self.group_number.to_string()
    }

    pub fn name(&self) -> &str {
        &self.unit.name
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: (crate::DOMAIN.to_string(), self.group_number),
            name: self.unit.name.clone(),
            manufacturer: "Airtouch".to_string(),
            model: "Airtouch 4".to_string(),
        }
    }

    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::TARGET_TEMPERATURE | SupportedFeatures::FAN_MODE
    }

    pub fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }

    pub fn temperature_unit(&self) -> &'static str {
        TEMP_CELSIUS
    }

    pub fn current_temperature(&self) -> f64 {
        self.unit.temperature
    }

    pub fn target_temperature(&self) -> i32 {
        self.unit.target_setpoint
    }

    pub fn min_temp(&self) -> i32 {
        self.owning_ac()
            .map(|ac| ac.min_setpoint)
            .unwrap_or(FALLBACK_MIN_TEMP)
    }

    pub fn max_temp(&self) -> i32 {
        self.owning_ac()
            .map(|ac| ac.max_setpoint)
            .unwrap_or(FALLBACK_MAX_TEMP)
    }

    pub fn hvac_mode(&self) -> HvacMode {
        if !self.unit.is_on {
            return HvacMode::Off;
        }
        self.owning_ac()
            .map(|ac| hvac_mode_from_ac(ac.mode))
            .unwrap_or(HvacMode::Off)
    }

    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        hvac_modes_for(&self.client.supported_modes_for_group(self.group_number))
    }

    pub fn fan_mode(&self) -> Option<FanMode> {
        self.owning_ac().map(|ac| fan_mode_from_ac(ac.fan_speed))
    }

    pub fn fan_modes(&self) -> Vec<FanMode> {
        fan_modes_for(&self.client.supported_fan_speeds_for_group(self.group_number))
    }

    pub fn state(&self) -> ClimateState {
        ClimateState {
            name: self.unit.name.clone(),
            available: self.available(),
            temperature_unit: self.temperature_unit().to_string(),
            current_temperature: self.current_temperature(),
            target_temperature: self.target_temperature(),
            min_temp: self.min_temp(),
            max_temp: self.max_temp(),
            hvac_mode: self.hvac_mode(),
            hvac_modes: self.hvac_modes(),
            fan_mode: self.fan_mode(),
            fan_modes: self.fan_modes(),
        }
    }

    /// Re-read this group from the client after the coordinator ticked.
    pub fn handle_coordinator_update(&mut self) {
        match self.client.group(self.group_number) {
            Some(unit) => self.unit = unit,
            None => debug!(group = self.group_number, "group missing after refresh"),
        }
        self.write_state();
    }

    /// Follow coordinator updates until the coordinator shuts down, which
    /// happens when the entry is unloaded.
    pub async fn track(&mut self, mut updates: UpdateReceiver) {
        while updates.recv().await.is_some() {
            self.handle_coordinator_update();
        }
    }

    pub async fn set_temperature(&mut self, temperature: Option<f64>) -> Result<()> {
        let Some(temp) = temperature else {
            return Ok(());
        };
        let target = setpoint_from(temp)?;
        debug!(group = self.group_number, target, "setting temperature");
        self.unit = self
            .client
            .set_group_temperature(self.group_number, target)
            .await?;
        self.write_state();
        Ok(())
    }

    pub async fn set_fan_mode(&mut self, fan_mode: &str) -> Result<()> {
        let speed = FanMode::parse(fan_mode)
            .filter(|mode| self.fan_modes().contains(mode))
            .and_then(ac_fan_speed_from_fan)
            .ok_or_else(|| Error::UnsupportedFanMode(fan_mode.to_string()))?;

        debug!(group = self.group_number, fan_mode, speed = %speed, "setting fan mode");
        self.unit = self
            .client
            .set_fan_speed_for_group(self.group_number, speed)
            .await?;
        self.write_state();
        Ok(())
    }

    pub async fn set_hvac_mode(&mut self, hvac_mode: &str) -> Result<()> {
        let mode = HvacMode::parse(hvac_mode)
            .ok_or_else(|| Error::UnsupportedHvacMode(hvac_mode.to_string()))?;

        let Some(ac_mode) = ac_mode_from_hvac(mode) else {
            return self.turn_off().await;
        };

        if self.hvac_mode() == HvacMode::Off {
            self.turn_on().await?;
        }
        debug!(group = self.group_number, hvac_mode, ac_mode = %ac_mode, "setting operation mode");
        self.unit = self
            .client
            .set_mode_for_group(self.group_number, ac_mode)
            .await?;
        self.write_state();
        Ok(())
    }

    pub async fn turn_on(&mut self) -> Result<()> {
        debug!(group = self.group_number, "turning on");
        self.unit = self.client.activate_group(self.group_number).await?;
        self.write_state();
        Ok(())
    }

    pub async fn turn_off(&mut self) -> Result<()> {
        debug!(group = self.group_number, "turning off");
        self.unit = self.client.turn_group_off(self.group_number).await?;
        self.write_state();
        Ok(())
    }

    fn owning_ac(&self) -> Option<Ac> {
        self.client.ac(self.unit.belongs_to_ac)
    }

    fn write_state(&self) {
        if self.state_callbacks.is_empty() {
            return;
        }
        let state = self.state();
        for cb in &self.state_callbacks {
            cb(&state);
        }
    }
}

/// Whole-degree setpoint for the console. Non-finite or out-of-range input is rejected.
fn setpoint_from(temp: f64) -> Result<i32> {
    let rounded = temp.round();
    if !rounded.is_finite() || rounded < i32::MIN as f64 || rounded > i32::MAX as f64 {
        return Err(Error::InvalidTemperature(temp));
    }
    Ok(rounded as i32)
}
