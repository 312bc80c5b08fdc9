//! Namespaced access to daily records and configuration over a [`KeyValueStore`].
//!
//! Keys follow `<namespace>-<YYYY-MM-DD>` for records and
//! `<namespace>-workout-template`, `<namespace>-nutrition-targets`,
//! `<namespace>-sleep-target` for the configuration parts. A value that no
//! longer parses is logged and treated as absent.

use crate::config::{Configuration, validate_sleep_target, validate_targets, validate_template};
use crate::models::{DailyRecord, NutritionTargets, SleepTarget, WorkoutTemplate};
use crate::storage::{KeyValueStore, StoreError};
use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_NAMESPACE: &str = "tracker";

pub struct Repository<'a, S: KeyValueStore> {
    store: &'a mut S,
    namespace: &'a str,
}

impl<'a, S: KeyValueStore> Repository<'a, S> {
    pub fn new(store: &'a mut S, namespace: &'a str) -> Self {
        Self { store, namespace }
    }

    pub fn record_key(&self, date: NaiveDate) -> String {
        format!("{}-{}", self.namespace, date.format("%Y-%m-%d"))
    }

    fn template_key(&self) -> String {
        format!("{}-workout-template", self.namespace)
    }

    fn targets_key(&self) -> String {
        format!("{}-nutrition-targets", self.namespace)
    }

    fn sleep_key(&self) -> String {
        format!("{}-sleep-target", self.namespace)
    }

    /// Stored record for `date`, or `None` if absent or unreadable.
    pub fn find_record(&self, date: NaiveDate) -> Option<DailyRecord> {
        self.read(&self.record_key(date))
    }

    /// Stored record for `date`, or a zeroed one when nothing usable is stored.
    pub fn load_record(&self, date: NaiveDate) -> DailyRecord {
        self.find_record(date)
            .unwrap_or_else(|| DailyRecord::empty(date.format("%Y-%m-%d").to_string()))
    }

    /// Overwrites whatever was stored for the record's date.
    pub fn save_record(&mut self, date: NaiveDate, record: &DailyRecord) -> Result<(), StoreError> {
        let key = self.record_key(date);
        self.write(&key, record)?;
        debug!(%key, fitness = record.scores.fitness, tasks = record.scores.tasks,
            food = record.scores.food, sleep = record.scores.sleep, "saved daily record");
        Ok(())
    }

    /// Each part falls back to its built-in default independently.
    pub fn load_configuration(&self) -> Configuration {
        let defaults = Configuration::default();

        let template = self
            .read::<WorkoutTemplate>(&self.template_key())
            .filter(|template| self.accept(&self.template_key(), validate_template(template)))
            .unwrap_or(defaults.template);
        let nutrition_targets = self
            .read::<NutritionTargets>(&self.targets_key())
            .filter(|targets| self.accept(&self.targets_key(), validate_targets(targets)))
            .unwrap_or(defaults.nutrition_targets);
        let sleep_target = self
            .read::<SleepTarget>(&self.sleep_key())
            .filter(|target| self.accept(&self.sleep_key(), validate_sleep_target(target)))
            .unwrap_or(defaults.sleep_target);

        Configuration {
            template,
            nutrition_targets,
            sleep_target,
        }
    }

    pub fn save_configuration(&mut self, config: &Configuration) -> Result<(), StoreError> {
        let (template_key, targets_key, sleep_key) =
            (self.template_key(), self.targets_key(), self.sleep_key());
        self.write(&template_key, &config.template)?;
        self.write(&targets_key, &config.nutrition_targets)?;
        self.write(&sleep_key, &config.sleep_target)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.store.get(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(%key, "ignoring malformed stored value: {err}");
                None
            }
        }
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, encoded)
    }

    fn accept<E: std::fmt::Display>(&self, key: &str, result: Result<(), E>) -> bool {
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(%key, "ignoring invalid stored configuration: {err}");
                false
            }
        }
    }
}
