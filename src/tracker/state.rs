//! Typed tracker state on top of the key-value store.

use log::{debug, info};
use serde_json::{Value, json};

use crate::{
    store::JsonStore,
    tracker::counter::{Counter, MAX_ADJUSTED},
};

/// Store key of the active scene.
const SCENE_KEY: &str = "scene";

/// Change applied to a counter by `set`, `add` or `use`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterChange {
    pub counter: Counter,
    pub previous: i64,
    pub current: i64,
}

/// Outcome of ending a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEnd {
    /// Name of the scene that was active, if there was one
    pub ended: Option<String>,
    /// Momentum spent by ending the scene
    pub momentum: CounterChange,
}

/// Outcome of starting a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneStart {
    /// Implicit end of the previously active scene
    pub previous: Option<SceneEnd>,
    /// Name of the new scene
    pub name: String,
}

/// Momentum, threat and the current scene of the table.
///
/// All mutations go through [`JsonStore::set`], so each one is on disk when
/// the method returns.
#[derive(Debug)]
pub struct Tracker {
    store: JsonStore,
}

impl Tracker {
    /// Wraps a loaded store.
    pub fn new(store: JsonStore) -> Self {
        Tracker { store }
    }

    /// Current value of a counter, 0 when unset.
    pub fn counter(&self, counter: Counter) -> i64 {
        self.store.get_i64(counter.key(), 0)
    }

    /// Name of the active scene. An empty name counts as no scene.
    pub fn scene(&self) -> Option<&str> {
        self.store.get_str(SCENE_KEY).filter(|name| !name.is_empty())
    }

    /// Sets a counter, clamped to the counter's range.
    pub async fn set_counter(
        &mut self,
        counter: Counter,
        value: i64,
    ) -> Result<CounterChange, anyhow::Error> {
        let previous = self.counter(counter);
        let current = counter.clamp(value);

        self.store.set(counter.key(), json!(current)).await?;
        info!("{} set to {} (was {})", counter, current, previous);

        Ok(CounterChange {
            counter,
            previous,
            current,
        })
    }

    /// Adds `delta` to a counter.
    ///
    /// The sum saturates at the `i64` bounds and is capped at [`MAX_ADJUSTED`],
    /// then stored through [`Tracker::set_counter`], whose clamps still apply.
    pub async fn adjust_counter(
        &mut self,
        counter: Counter,
        delta: i64,
    ) -> Result<CounterChange, anyhow::Error> {
        let target = self.counter(counter).saturating_add(delta).min(MAX_ADJUSTED);
        debug!("adjust {} by {} to {}", counter, delta, target);
        self.set_counter(counter, target).await
    }

    /// Starts a scene, ending the active one first if any.
    pub async fn start_scene(&mut self, name: &str) -> Result<SceneStart, anyhow::Error> {
        let previous = match self.scene() {
            Some(_) => Some(self.end_scene().await?),
            None => None,
        };

        self.store.set(SCENE_KEY, json!(name)).await?;
        info!("scene started: {}", name);

        Ok(SceneStart {
            previous,
            name: name.to_owned(),
        })
    }

    /// Ends the active scene and spends one momentum.
    ///
    /// The momentum is spent even when no scene was active.
    pub async fn end_scene(&mut self) -> Result<SceneEnd, anyhow::Error> {
        let ended = self.scene().map(str::to_owned);

        if let Some(name) = &ended {
            self.store.set(SCENE_KEY, Value::Null).await?;
            info!("scene ended: {}", name);
        }

        let momentum = self.adjust_counter(Counter::Momentum, -1).await?;

        Ok(SceneEnd { ended, momentum })
    }
}
