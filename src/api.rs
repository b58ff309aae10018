use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::types::{Ac, AcFanSpeed, AcMode, Group};
use crate::Result;

/// Session to one AirTouch 4 console.
///
/// Plain getters read the client's cached object graph and never touch the
/// network. Async methods talk to the console; commands return the group as
/// the console reports it afterwards.
#[async_trait]
pub trait AirTouchApi: Send + Sync {
    fn acs(&self) -> Vec<Ac>;

    fn groups(&self) -> Vec<Group>;

    fn ac(&self, number: u8) -> Option<Ac> {
        self.acs().into_iter().find(|ac| ac.number == number)
    }

    fn group(&self, number: u8) -> Option<Group> {
        self.groups().into_iter().find(|g| g.number == number)
    }

    fn supported_modes_for_group(&self, group: u8) -> Vec<AcMode>;

    fn supported_fan_speeds_for_group(&self, group: u8) -> Vec<AcFanSpeed>;

    /// Pull fresh AC and group state from the console.
    async fn refresh_state(&self) -> Result<()>;

    async fn set_group_temperature(&self, group: u8, value: i32) -> Result<Group>;

    async fn set_fan_speed_for_group(&self, group: u8, speed: AcFanSpeed) -> Result<Group>;

    async fn set_mode_for_group(&self, group: u8, mode: AcMode) -> Result<Group>;

    async fn turn_group_on(&self, group: u8) -> Result<Group>;

    async fn turn_group_off(&self, group: u8) -> Result<Group>;

    async fn turn_ac_on(&self, ac: u8) -> Result<()>;

    /// Turn a group on and re-assert power on its AC.
    ///
    /// The console powers an AC down once all of its groups are off and does
    /// not always bring it back when a group is switched on again, so the AC
    /// command is sent every time, even if the AC already reads as on.
    async fn activate_group(&self, group: u8) -> Result<Group> {
        let unit = self.turn_group_on(group).await?;
        let ac = unit.belongs_to_ac;
        debug!(group, ac, "re-asserting AC power");
        self.turn_ac_on(ac).await?;
        Ok(unit)
    }
}

/// Opens a client session for a configured host.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, host: &str) -> Result<Arc<dyn AirTouchApi>>;
}
