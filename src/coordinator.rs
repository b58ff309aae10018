use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::api::AirTouchApi;
use crate::types::Snapshot;
use crate::{Error, Result};

/// Default climate polling cadence of the host platform.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(60);

const DEFAULT_CHANNEL_CAPACITY: usize = 16;

type UpdateCallback = Box<dyn Fn(&CoordinatorUpdate) + Send + Sync>;

/// Published after every refresh attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinatorUpdate {
    Refreshed(Snapshot),
    Failed,
}

pub struct CoordinatorBuilder {
    client: Arc<dyn AirTouchApi>,
    name: String,
    update_interval: Duration,
    channel_capacity: usize,
    update_callbacks: Vec<UpdateCallback>,
}

impl CoordinatorBuilder {
    pub fn new(client: Arc<dyn AirTouchApi>) -> Self {
        Self {
            client,
            name: crate::DOMAIN.to_string(),
            update_interval: SCAN_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            update_callbacks: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub fn on_update(mut self, f: impl Fn(&CoordinatorUpdate) + Send + Sync + 'static) -> Self {
        self.update_callbacks.push(Box::new(f));
        self
    }

    pub fn build(self) -> Coordinator {
        let (tx, _) = broadcast::channel(self.channel_capacity);
        Coordinator {
            client: self.client,
            name: self.name,
            update_interval: self.update_interval,
            state: Mutex::new(CoordinatorState {
                data: None,
                last_update_success: true,
                last_updated: None,
                last_error: None,
            }),
            tx: Mutex::new(Some(tx)),
            update_callbacks: self.update_callbacks,
        }
    }
}

struct CoordinatorState {
    data: Option<Snapshot>,
    last_update_success: bool,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Single poller per console, shared by every zone entity of that console.
pub struct Coordinator {
    client: Arc<dyn AirTouchApi>,
    name: String,
    update_interval: Duration,
    state: Mutex<CoordinatorState>,
    // Taken on shutdown so receivers see the channel close.
    tx: Mutex<Option<broadcast::Sender<CoordinatorUpdate>>>,
    update_callbacks: Vec<UpdateCallback>,
}

impl Coordinator {
    pub fn builder(client: Arc<dyn AirTouchApi>) -> CoordinatorBuilder {
        CoordinatorBuilder::new(client)
    }

    pub fn client(&self) -> &Arc<dyn AirTouchApi> {
        &self.client
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Last good snapshot. Survives failed refreshes.
    pub fn data(&self) -> Option<Snapshot> {
        self.state().data.clone()
    }

    pub fn last_update_success(&self) -> bool {
        self.state().last_update_success
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state().last_updated
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().last_error.clone()
    }

    /// Subscribe to refresh outcomes. After [`shutdown`](Self::shutdown) the
    /// receiver is already closed.
    pub fn subscribe(&self) -> UpdateReceiver {
        let rx = match self.sender().as_ref() {
            Some(tx) => tx.subscribe(),
            None => broadcast::channel(1).1,
        };
        UpdateReceiver { rx }
    }

    /// Close the update channel. Receivers drain what is queued and then get
    /// `None`; later refreshes only reach the `on_update` callbacks.
    pub fn shutdown(&self) {
        if self.sender().take().is_some() {
            debug!(coordinator = %self.name, "update channel closed");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender().is_none()
    }

    /// Pull fresh state and fan it out.
    ///
    /// Failures never reach subscribers as raw errors: they see
    /// [`CoordinatorUpdate::Failed`] and the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Snapshot> {
        match self.fetch().await {
            Ok(snapshot) => {
                let recovered = {
                    let mut state = self.state();
                    let recovered = !state.last_update_success;
                    state.data = Some(snapshot.clone());
                    state.last_update_success = true;
                    state.last_updated = Some(Utc::now());
                    state.last_error = None;
                    recovered
                };
                if recovered {
                    info!(coordinator = %self.name, "fetching data recovered");
                }
                debug!(
                    coordinator = %self.name,
                    acs = snapshot.acs.len(),
                    groups = snapshot.groups.len(),
                    "refresh complete"
                );
                self.notify(CoordinatorUpdate::Refreshed(snapshot.clone()));
                Ok(snapshot)
            }
            Err(e) => {
                if e.is_connectivity() {
                    warn!(coordinator = %self.name, error = %e, "error fetching data");
                } else {
                    error!(coordinator = %self.name, error = %e, "unexpected error fetching data");
                }
                {
                    let mut state = self.state();
                    state.last_update_success = false;
                    state.last_error = Some(e.to_string());
                }
                self.notify(CoordinatorUpdate::Failed);
                Err(Error::UpdateFailed(e.to_string()))
            }
        }
    }

    /// Start ticking on the current runtime. The first tick lands one full
    /// interval from now; callers refresh once themselves before that.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let period = self.update_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // Failure is already recorded and logged; the next tick retries.
                let _ = coordinator.refresh().await;
            }
        })
    }

    async fn fetch(&self) -> Result<Snapshot> {
        self.client.refresh_state().await?;
        Ok(Snapshot::capture(&self.client.acs(), &self.client.groups()))
    }

    fn notify(&self, update: CoordinatorUpdate) {
        for cb in &self.update_callbacks {
            cb(&update);
        }
        // No receivers is fine.
        if let Some(tx) = self.sender().as_ref() {
            let _ = tx.send(update);
        }
    }

    fn state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn sender(&self) -> MutexGuard<'_, Option<broadcast::Sender<CoordinatorUpdate>>> {
        self.tx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Subscription to a coordinator's refresh outcomes.
pub struct UpdateReceiver {
    rx: broadcast::Receiver<CoordinatorUpdate>,
}

impl UpdateReceiver {
    /// Next update, or `None` once the coordinator is shut down or gone.
    ///
    /// Lagging is harmless because consumers re-read live state anyway, so
    /// skipped updates are dropped silently.
    pub async fn recv(&mut self) -> Option<CoordinatorUpdate> {
        loop {
            match self.rx.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    debug!(skipped = n, "update receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn try_recv(&mut self) -> Option<CoordinatorUpdate> {
        loop {
            match self.rx.try_recv() {
                Ok(update) => return Some(update),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
