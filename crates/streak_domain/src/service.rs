use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use streak_core::{day::days_before, StreakMetrics};
use tracing::{debug, info, instrument};

use crate::{
    clock::{Clock, SystemClock},
    habit::{Habit, HabitDetail, HabitId, NewHabit, OwnerId},
    store::{HabitStore, JsonHabitStore, MemoryHabitStore},
};

/// Application-facing operations over habits. Every call names the owner it
/// acts for; the service itself carries no user state.
pub struct HabitService {
    store: Arc<dyn HabitStore>,
    clock: Arc<dyn Clock>,
}

pub struct HabitServiceBuilder {
    store: Option<Arc<dyn HabitStore>>,
    clock: Arc<dyn Clock>,
}

impl HabitServiceBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn HabitStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_json_store(self, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let store = JsonHabitStore::open(dir)
            .with_context(|| format!("failed to open habit store at {}", dir.display()))?;
        Ok(self.with_store(Arc::new(store)))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> HabitService {
        let store: Arc<dyn HabitStore> = match self.store {
            Some(store) => store,
            None => Arc::new(MemoryHabitStore::new()),
        };
        HabitService {
            store,
            clock: self.clock,
        }
    }
}

impl Default for HabitServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitService {
    pub fn builder() -> HabitServiceBuilder {
        HabitServiceBuilder::new()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn habits(&self, owner: &OwnerId) -> Result<Vec<Habit>> {
        self.store
            .list(owner)
            .with_context(|| format!("failed to list habits of `{owner}`"))
    }

    #[instrument(skip(self, new_habit), fields(name = %new_habit.name))]
    pub fn add_habit(&self, owner: &OwnerId, new_habit: NewHabit) -> Result<Habit> {
        let habit = Habit::create(owner.clone(), new_habit, self.today());
        info!(id = %habit.id, days = habit.ledger.len(), "created habit");
        self.store
            .insert(habit.clone())
            .context("failed to store new habit")?;
        Ok(habit)
    }

    pub fn show_habit(&self, owner: &OwnerId, id: HabitId) -> Result<HabitDetail> {
        let habit = self
            .store
            .get(owner, id)
            .with_context(|| format!("unable to load habit {id}"))?;
        let last_days = habit.window(self.today());
        Ok(HabitDetail { habit, last_days })
    }

    /// Toggles the day `days_before_today` days before today and stores the
    /// recomputed metrics in the same write.
    #[instrument(skip(self))]
    pub fn toggle_day(
        &self,
        owner: &OwnerId,
        id: HabitId,
        days_before_today: i64,
    ) -> Result<StreakMetrics> {
        let today = self.today();
        let day = days_before(today, days_before_today)
            .ok_or_else(|| anyhow!("{days_before_today} days before {today} is out of range"))?;
        let mut metrics = StreakMetrics::default();
        self.store
            .update(owner, id, &mut |habit: &mut Habit| {
                metrics = habit.toggle(day, today)
            })
            .with_context(|| format!("unable to toggle habit {id}"))?;
        debug!(%day, ?metrics, "recomputed streaks");
        Ok(metrics)
    }

    #[instrument(skip(self))]
    pub fn delete_habit(&self, owner: &OwnerId, id: HabitId) -> Result<Habit> {
        let removed = self
            .store
            .remove(owner, id)
            .with_context(|| format!("unable to delete habit {id}"))?;
        info!(name = %removed.name, "deleted habit");
        Ok(removed)
    }
}
