#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use airtouch4::{
    Ac, AcFanSpeed, AcMode, AirTouchApi, Connector, EntryContext, Error, Group, Result, Snapshot,
    ZoneEntity,
};
use airtouch4::{ConfigEntry, Coordinator};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Timeout,
    Refused,
    Protocol,
}

impl Fault {
    fn to_error(self) -> Error {
        match self {
            Fault::Timeout => Error::Timeout,
            Fault::Refused => {
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into()
            }
            Fault::Protocol => Error::Protocol("checksum mismatch".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RefreshState,
    SetGroupTemperature(u8, i32),
    SetFanSpeed(u8, AcFanSpeed),
    SetMode(u8, AcMode),
    TurnGroupOn(u8),
    TurnGroupOff(u8),
    TurnAcOn(u8),
}

struct MockState {
    acs: Vec<Ac>,
    groups: Vec<Group>,
    modes: Vec<AcMode>,
    fan_speeds: Vec<AcFanSpeed>,
    calls: Vec<Call>,
    refresh_fault: Option<Fault>,
    command_fault: Option<Fault>,
}

/// In-memory console that records every network call.
pub struct MockAirTouch {
    state: Mutex<MockState>,
}

impl MockAirTouch {
    pub fn new(acs: Vec<Ac>, groups: Vec<Group>) -> Self {
        Self {
            state: Mutex::new(MockState {
                acs,
                groups,
                modes: vec![AcMode::Heat, AcMode::Cool, AcMode::Auto, AcMode::Dry, AcMode::Fan],
                fan_speeds: vec![
                    AcFanSpeed::Low,
                    AcFanSpeed::Medium,
                    AcFanSpeed::High,
                    AcFanSpeed::Auto,
                ],
                calls: Vec::new(),
                refresh_fault: None,
                command_fault: None,
            }),
        }
    }

    /// AC 0 cooling, "Lounge" (group 1) on, "Bedroom" (group 2) off.
    pub fn lounge() -> Self {
        Self::new(
            vec![Ac {
                number: 0,
                mode: AcMode::Cool,
                fan_speed: AcFanSpeed::Auto,
                min_setpoint: 16,
                max_setpoint: 30,
                is_on: true,
            }],
            vec![
                Group {
                    number: 1,
                    name: "Lounge".to_string(),
                    temperature: 22.5,
                    target_setpoint: 23,
                    is_on: true,
                    belongs_to_ac: 0,
                },
                Group {
                    number: 2,
                    name: "Bedroom".to_string(),
                    temperature: 19.0,
                    target_setpoint: 21,
                    is_on: false,
                    belongs_to_ac: 0,
                },
            ],
        )
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn fail_refresh(&self, fault: Option<Fault>) {
        self.lock().refresh_fault = fault;
    }

    pub fn fail_commands(&self, fault: Option<Fault>) {
        self.lock().command_fault = fault;
    }

    pub fn set_fan_speeds(&self, speeds: Vec<AcFanSpeed>) {
        self.lock().fan_speeds = speeds;
    }

    pub fn set_modes(&self, modes: Vec<AcMode>) {
        self.lock().modes = modes;
    }

    pub fn update_ac(&self, number: u8, f: impl FnOnce(&mut Ac)) {
        let mut state = self.lock();
        let ac = state.acs.iter_mut().find(|a| a.number == number).unwrap();
        f(ac);
    }

    pub fn update_group(&self, number: u8, f: impl FnOnce(&mut Group)) {
        let mut state = self.lock();
        let group = state.groups.iter_mut().find(|g| g.number == number).unwrap();
        f(group);
    }

    fn command(&self, call: Call) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if let Some(fault) = state.command_fault {
            return Err(fault.to_error());
        }
        Ok(state)
    }
}

fn group_mut(state: &mut MockState, number: u8) -> Result<&mut Group> {
    state
        .groups
        .iter_mut()
        .find(|g| g.number == number)
        .ok_or(Error::UnknownGroup(number))
}

fn owning_ac_mut(state: &mut MockState, group: u8) -> Result<&mut Ac> {
    let ac = group_mut(state, group)?.belongs_to_ac;
    state
        .acs
        .iter_mut()
        .find(|a| a.number == ac)
        .ok_or(Error::UnknownAc(ac))
}

#[async_trait]
impl AirTouchApi for MockAirTouch {
    fn acs(&self) -> Vec<Ac> {
        self.lock().acs.clone()
    }

    fn groups(&self) -> Vec<Group> {
        self.lock().groups.clone()
    }

    fn supported_modes_for_group(&self, _group: u8) -> Vec<AcMode> {
        self.lock().modes.clone()
    }

    fn supported_fan_speeds_for_group(&self, _group: u8) -> Vec<AcFanSpeed> {
        self.lock().fan_speeds.clone()
    }

    async fn refresh_state(&self) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(Call::RefreshState);
        match state.refresh_fault {
            Some(fault) => Err(fault.to_error()),
            None => Ok(()),
        }
    }

    async fn set_group_temperature(&self, group: u8, value: i32) -> Result<Group> {
        let mut state = self.command(Call::SetGroupTemperature(group, value))?;
        let g = group_mut(&mut state, group)?;
        g.target_setpoint = value;
        Ok(g.clone())
    }

    async fn set_fan_speed_for_group(&self, group: u8, speed: AcFanSpeed) -> Result<Group> {
        let mut state = self.command(Call::SetFanSpeed(group, speed))?;
        owning_ac_mut(&mut state, group)?.fan_speed = speed;
        Ok(group_mut(&mut state, group)?.clone())
    }

    async fn set_mode_for_group(&self, group: u8, mode: AcMode) -> Result<Group> {
        let mut state = self.command(Call::SetMode(group, mode))?;
        owning_ac_mut(&mut state, group)?.mode = mode;
        Ok(group_mut(&mut state, group)?.clone())
    }

    async fn turn_group_on(&self, group: u8) -> Result<Group> {
        let mut state = self.command(Call::TurnGroupOn(group))?;
        let g = group_mut(&mut state, group)?;
        g.is_on = true;
        Ok(g.clone())
    }

    async fn turn_group_off(&self, group: u8) -> Result<Group> {
        let mut state = self.command(Call::TurnGroupOff(group))?;
        let g = group_mut(&mut state, group)?;
        g.is_on = false;
        let updated = g.clone();
        // The console drops the AC once its last group goes off.
        let ac = updated.belongs_to_ac;
        if !state.groups.iter().any(|g| g.belongs_to_ac == ac && g.is_on)
            && let Some(unit) = state.acs.iter_mut().find(|a| a.number == ac)
        {
            unit.is_on = false;
        }
        Ok(updated)
    }

    async fn turn_ac_on(&self, ac: u8) -> Result<()> {
        let mut state = self.command(Call::TurnAcOn(ac))?;
        let unit = state
            .acs
            .iter_mut()
            .find(|a| a.number == ac)
            .ok_or(Error::UnknownAc(ac))?;
        unit.is_on = true;
        Ok(())
    }
}

pub struct MockConnector {
    client: Arc<MockAirTouch>,
    fault: Mutex<Option<Fault>>,
    hosts: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(client: Arc<MockAirTouch>) -> Self {
        Self {
            client,
            fault: Mutex::new(None),
            hosts: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_with(&self, fault: Option<Fault>) {
        *self.fault.lock().unwrap() = fault;
    }

    pub fn hosts(&self) -> Vec<String> {
        self.hosts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, host: &str) -> Result<Arc<dyn AirTouchApi>> {
        self.hosts.lock().unwrap().push(host.to_string());
        if let Some(fault) = *self.fault.lock().unwrap() {
            return Err(fault.to_error());
        }
        let client: Arc<dyn AirTouchApi> = self.client.clone();
        Ok(client)
    }
}

/// Context with a coordinator that has refreshed once.
pub async fn context_for(client: Arc<MockAirTouch>) -> EntryContext {
    let api: Arc<dyn AirTouchApi> = client.clone();
    let coordinator = Arc::new(Coordinator::builder(api.clone()).build());
    coordinator.refresh().await.unwrap();
    let info = Snapshot::capture(&api.acs(), &api.groups());
    EntryContext::new(ConfigEntry::new("10.0.0.5"), api, coordinator, info)
}

/// Zone entity plus a shared log of everything it published.
pub async fn zone(
    client: Arc<MockAirTouch>,
    group: u8,
) -> (ZoneEntity, Arc<Mutex<Vec<airtouch4::ClimateState>>>) {
    let context = context_for(client.clone()).await;
    let published = Arc::new(Mutex::new(Vec::new()));
    let sink = published.clone();
    let entity = ZoneEntity::new(&context, group)
        .unwrap()
        .on_state(move |state| sink.lock().unwrap().push(state.clone()));
    client.clear_calls();
    (entity, published)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
