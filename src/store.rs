//! Typed meal and glucose collections over a [`KeyValueStore`].
//!
//! Each collection lives whole in one slot as a JSON array. Every operation
//! reads the slot, edits the list and writes it back; there is no locking, so
//! two writers racing on the same slot lose one of the updates. A missing or
//! malformed slot reads as an empty collection.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::glucose::GlucoseReading;
use crate::meals::MealEntry;
use crate::storage::KeyValueStore;

pub const MEAL_ENTRIES_KEY: &str = "meal_entries";
pub const GLUCOSE_READINGS_KEY: &str = "glucose_readings";

trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for MealEntry {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for GlucoseReading {
    fn key(&self) -> Uuid {
        self.id
    }
}

#[derive(Clone)]
pub struct EntryStore {
    kv: Arc<dyn KeyValueStore>,
}

impl EntryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub async fn list_meals(&self) -> Result<Vec<MealEntry>, StoreError> {
        self.read(MEAL_ENTRIES_KEY).await
    }

    /// Appends `entry`, or replaces the entry that already has its id.
    pub async fn save_meal(&self, entry: MealEntry) -> Result<(), StoreError> {
        self.save(MEAL_ENTRIES_KEY, entry).await
    }

    pub async fn delete_meal(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete::<MealEntry>(MEAL_ENTRIES_KEY, id).await
    }

    /// Returns `false` when no entry has `id`, or when `entry` carries the id
    /// of a different stored entry.
    pub async fn update_meal(&self, id: Uuid, entry: MealEntry) -> Result<bool, StoreError> {
        self.update(MEAL_ENTRIES_KEY, id, entry).await
    }

    pub async fn list_readings(&self) -> Result<Vec<GlucoseReading>, StoreError> {
        self.read(GLUCOSE_READINGS_KEY).await
    }

    pub async fn save_reading(&self, reading: GlucoseReading) -> Result<(), StoreError> {
        self.save(GLUCOSE_READINGS_KEY, reading).await
    }

    pub async fn delete_reading(&self, id: Uuid) -> Result<(), StoreError> {
        self.delete::<GlucoseReading>(GLUCOSE_READINGS_KEY, id).await
    }

    pub async fn update_reading(
        &self,
        id: Uuid,
        reading: GlucoseReading,
    ) -> Result<bool, StoreError> {
        self.update(GLUCOSE_READINGS_KEY, id, reading).await
    }

    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.kv.remove(MEAL_ENTRIES_KEY).await?;
        self.kv.remove(GLUCOSE_READINGS_KEY).await?;
        debug!("entry store cleared");
        Ok(())
    }

    async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!(error = %e, key, "malformed slot data; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn write<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(items).map_err(|e| {
            StoreError(anyhow::Error::new(e).context(format!("encode slot {}", key)))
        })?;
        self.kv.put(key, &raw).await?;
        debug!(key, len = items.len(), "slot written");
        Ok(())
    }

    async fn save<T>(&self, key: &str, item: T) -> Result<(), StoreError>
    where
        T: Keyed + Serialize + DeserializeOwned,
    {
        let id = item.key();
        let mut items: Vec<T> = self.read(key).await?;
        match items.iter_mut().find(|i| i.key() == id) {
            Some(existing) => *existing = item,
            None => items.push(item),
        }
        self.write(key, &items).await
    }

    async fn delete<T>(&self, key: &str, id: Uuid) -> Result<(), StoreError>
    where
        T: Keyed + Serialize + DeserializeOwned,
    {
        let mut items: Vec<T> = self.read(key).await?;
        items.retain(|i| i.key() != id);
        self.write(key, &items).await
    }

    async fn update<T>(&self, key: &str, id: Uuid, item: T) -> Result<bool, StoreError>
    where
        T: Keyed + Serialize + DeserializeOwned,
    {
        let new_id = item.key();
        let mut items: Vec<T> = self.read(key).await?;
        if new_id != id && items.iter().any(|i| i.key() == new_id) {
            debug!(key, %id, %new_id, "update skipped; replacement id already stored");
            return Ok(false);
        }
        let Some(slot) = items.iter_mut().find(|i| i.key() == id) else {
            debug!(key, %id, "update skipped; id not found");
            return Ok(false);
        };
        *slot = item;
        self.write(key, &items).await?;
        Ok(true)
    }
}
