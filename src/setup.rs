use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{AirTouchApi, Connector};
use crate::climate::ZoneEntity;
use crate::config::ConfigEntry;
use crate::coordinator::{Coordinator, SCAN_INTERVAL};
use crate::types::Snapshot;
use crate::{Error, Result};

/// Everything the entities of one config entry share.
pub struct EntryContext {
    entry: ConfigEntry,
    client: Arc<dyn AirTouchApi>,
    coordinator: Arc<Coordinator>,
    info: Snapshot,
}

impl EntryContext {
    pub fn new(
        entry: ConfigEntry,
        client: Arc<dyn AirTouchApi>,
        coordinator: Arc<Coordinator>,
        info: Snapshot,
    ) -> Self {
        Self {
            entry,
            client,
            coordinator,
            info,
        }
    }

    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    pub fn client(&self) -> &Arc<dyn AirTouchApi> {
        &self.client
    }

    pub fn coordinator(&self) -> &Arc<Coordinator> {
        &self.coordinator
    }

    /// Listing taken at setup time; drives which entities exist.
    pub fn info(&self) -> &Snapshot {
        &self.info
    }

    /// One entity per group discovered at setup.
    pub fn build_entities(&self) -> Result<Vec<ZoneEntity>> {
        self.info
            .groups
            .iter()
            .map(|group| ZoneEntity::new(self, group.id))
            .collect()
    }
}

struct LoadedEntry {
    context: Arc<EntryContext>,
    ticker: JoinHandle<()>,
}

impl LoadedEntry {
    /// Stop ticking and close the update channel so tracking entities return.
    fn stop(&self) {
        self.ticker.abort();
        self.context.coordinator().shutdown();
    }
}

/// Loaded config entries of the integration.
pub struct Integration {
    connector: Arc<dyn Connector>,
    update_interval: Duration,
    entries: HashMap<Uuid, LoadedEntry>,
}

impl Integration {
    pub fn setup(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            update_interval: SCAN_INTERVAL,
            entries: HashMap::new(),
        }
    }

    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Connect, validate, run the first refresh and build the zone entities.
    ///
    /// Connectivity problems and a console reporting no ACs come back as
    /// [`Error::NotReady`] so the host can retry later.
    pub async fn setup_entry(&mut self, entry: ConfigEntry) -> Result<Vec<ZoneEntity>> {
        let host = entry.host().to_string();
        let client = self
            .connector
            .connect(&host)
            .await
            .map_err(|e| not_ready(&host, e))?;
        client
            .refresh_state()
            .await
            .map_err(|e| not_ready(&host, e))?;
        if client.acs().is_empty() {
            return Err(Error::NotReady(format!("{host} reported no ACs")));
        }

        let coordinator = Arc::new(
            Coordinator::builder(Arc::clone(&client))
                .update_interval(self.update_interval)
                .build(),
        );
        // A failed first refresh is recorded on the coordinator; entities
        // still come up and show as unavailable until the next tick.
        if let Err(e) = coordinator.refresh().await {
            warn!(host = %host, error = %e, "initial refresh failed");
        }

        let info = Snapshot::capture(&client.acs(), &client.groups());
        let entry_id = entry.entry_id;
        let context = Arc::new(EntryContext::new(entry, client, Arc::clone(&coordinator), info));
        let entities = context.build_entities()?;

        if let Some(previous) = self.entries.remove(&entry_id) {
            debug!(%entry_id, "replacing loaded entry");
            previous.stop();
        }
        let ticker = coordinator.spawn();
        self.entries.insert(entry_id, LoadedEntry { context, ticker });

        info!(host = %host, zones = entities.len(), "AirTouch 4 entry set up");
        Ok(entities)
    }

    /// Stop polling, close the entry's update channel and forget the entry.
    /// `false` if it was not loaded.
    pub fn unload_entry(&mut self, entry_id: Uuid) -> bool {
        match self.entries.remove(&entry_id) {
            Some(loaded) => {
                loaded.stop();
                debug!(%entry_id, "entry unloaded");
                true
            }
            None => false,
        }
    }

    pub fn context(&self, entry_id: Uuid) -> Result<Arc<EntryContext>> {
        self.entries
            .get(&entry_id)
            .map(|loaded| Arc::clone(&loaded.context))
            .ok_or(Error::EntryNotLoaded(entry_id))
    }

    pub fn is_loaded(&self, entry_id: Uuid) -> bool {
        self.entries.contains_key(&entry_id)
    }
}

impl Drop for Integration {
    fn drop(&mut self) {
        for loaded in self.entries.values() {
            loaded.stop();
        }
    }
}

fn not_ready(host: &str, e: Error) -> Error {
    if e.is_connectivity() {
        Error::NotReady(format!("{host}: {e}"))
    } else {
        e
    }
}
