use crate::conf::{MonitorConfig, RetentionConfig};
use crate::scenario::Scenario;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type ScenarioHandle = Arc<RwLock<Scenario>>;

/// Registry of scenarios.
///
/// Each scenario sits behind its own lock: writers to one scenario are
/// serialized, writers to different scenarios never contend. Scenarios are
/// never removed.
#[derive(Debug)]
pub struct ScenarioStore {
    scenarios: DashMap<String, ScenarioHandle>,

    /// Registration order, for listing.
    order: RwLock<Vec<String>>,

    default_scenario: ArcSwap<String>,
    retention: RetentionConfig,
}

impl ScenarioStore {
    /// Create an empty store.
    pub fn new(default_scenario: &str, retention: RetentionConfig) -> Self {
        Self {
            scenarios: DashMap::new(),
            order: RwLock::new(Vec::new()),
            default_scenario: ArcSwap::from_pointee(default_scenario.to_string()),
            retention,
        }
    }

    /// Create a store holding every scenario declared in `cfg`.
    pub fn from_config(cfg: &MonitorConfig, now: DateTime<Utc>) -> Self {
        let store = Self::new(&cfg.default_scenario, cfg.retention);

        for scenario in &cfg.scenarios {
            store.register(&scenario.id, scenario.display_name(), now);
        }
        store.register(&cfg.default_scenario, &cfg.default_scenario, now);

        store
    }

    /// Get the scenario `id`, creating it with `display_name` if it is new.
    pub fn register(&self, id: &str, display_name: &str, now: DateTime<Utc>) -> ScenarioHandle {
        if let Some(existing) = self.scenarios.get(id) {
            return existing.value().clone();
        }

        self.scenarios
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(scenario = id, "scenario created");
                self.order
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(id.to_string());
                Arc::new(RwLock::new(Scenario::new(
                    id,
                    display_name,
                    &self.retention,
                    now,
                )))
            })
            .value()
            .clone()
    }

    /// Get the scenario `id`, creating it on first reference.
    pub fn get_or_create(&self, id: &str, now: DateTime<Utc>) -> ScenarioHandle {
        self.register(id, id, now)
    }

    pub fn get(&self, id: &str) -> Option<ScenarioHandle> {
        self.scenarios.get(id).map(|entry| entry.value().clone())
    }

    /// Scenario ids in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.order
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenario for lines no classification rule claims.
    pub fn default_scenario(&self) -> Arc<String> {
        self.default_scenario.load_full()
    }

    pub fn set_default_scenario(&self, id: &str, now: DateTime<Utc>) {
        self.get_or_create(id, now);
        self.default_scenario.store(Arc::new(id.to_string()));
        tracing::info!(scenario = id, "default scenario changed");
    }
}

/// Lock a scenario for reading, recovering from a poisoned lock.
pub fn read_scenario(handle: &RwLock<Scenario>) -> RwLockReadGuard<'_, Scenario> {
    handle.read().unwrap_or_else(|poisoned| {
        tracing::warn!("scenario lock poisoned; continuing with last written state");
        poisoned.into_inner()
    })
}

/// Lock a scenario for writing, recovering from a poisoned lock.
pub fn write_scenario(handle: &RwLock<Scenario>) -> RwLockWriteGuard<'_, Scenario> {
    handle.write().unwrap_or_else(|poisoned| {
        tracing::warn!("scenario lock poisoned; continuing with last written state");
        poisoned.into_inner()
    })
}
