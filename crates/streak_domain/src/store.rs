use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::debug;

use crate::habit::{Habit, HabitId, OwnerId};

const STORE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("habit {0} not found")]
    NotFound(HabitId),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Persistence for habits, partitioned by owner.
///
/// `update` runs the mutation while holding the store's write lock, so a
/// toggle and the recomputation that follows it land as one write.
pub trait HabitStore: Send + Sync {
    fn insert(&self, habit: Habit) -> Result<(), StoreError>;
    fn get(&self, owner: &OwnerId, id: HabitId) -> Result<Habit, StoreError>;
    /// Habits of `owner` in creation order.
    fn list(&self, owner: &OwnerId) -> Result<Vec<Habit>, StoreError>;
    fn update(
        &self,
        owner: &OwnerId,
        id: HabitId,
        mutate: &mut dyn FnMut(&mut Habit),
    ) -> Result<Habit, StoreError>;
    fn remove(&self, owner: &OwnerId, id: HabitId) -> Result<Habit, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryHabitStore {
    habits: RwLock<HashMap<OwnerId, Vec<Habit>>>,
}

impl MemoryHabitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HabitStore for MemoryHabitStore {
    fn insert(&self, habit: Habit) -> Result<(), StoreError> {
        self.habits
            .write()
            .entry(habit.owner.clone())
            .or_default()
            .push(habit);
        Ok(())
    }

    fn get(&self, owner: &OwnerId, id: HabitId) -> Result<Habit, StoreError> {
        self.habits
            .read()
            .get(owner)
            .and_then(|habits| habits.iter().find(|habit| habit.id == id))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Habit>, StoreError> {
        Ok(self.habits.read().get(owner).cloned().unwrap_or_default())
    }

    fn update(
        &self,
        owner: &OwnerId,
        id: HabitId,
        mutate: &mut dyn FnMut(&mut Habit),
    ) -> Result<Habit, StoreError> {
        let mut habits = self.habits.write();
        let habit = habits
            .get_mut(owner)
            .and_then(|habits| habits.iter_mut().find(|habit| habit.id == id))
            .ok_or(StoreError::NotFound(id))?;
        mutate(habit);
        Ok(habit.clone())
    }

    fn remove(&self, owner: &OwnerId, id: HabitId) -> Result<Habit, StoreError> {
        let mut habits = self.habits.write();
        let owned = habits.get_mut(owner).ok_or(StoreError::NotFound(id))?;
        let index = owned
            .iter()
            .position(|habit| habit.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(owned.remove(index))
    }
}

/// One JSON file per owner under `dir`, holding that owner's habits.
///
/// Every lookup also matches `Habit::owner`, so a file only ever yields the
/// habits of the owner it was opened for.
#[derive(Debug)]
pub struct JsonHabitStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonHabitStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn owner_path(&self, owner: &OwnerId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", owner_file_stem(owner.as_str()), STORE_EXTENSION))
    }

    fn load(&self, owner: &OwnerId) -> Result<Vec<Habit>, StoreError> {
        let path = self.owner_path(owner);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, owner: &OwnerId, habits: &[Habit]) -> Result<(), StoreError> {
        let path = self.owner_path(owner);
        let data = serde_json::to_string_pretty(habits)?;
        write_atomic(&path, &data)?;
        debug!(path = %path.display(), count = habits.len(), "saved habits");
        Ok(())
    }
}

impl HabitStore for JsonHabitStore {
    fn insert(&self, habit: Habit) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let owner = habit.owner.clone();
        let mut habits = self.load(&owner)?;
        habits.push(habit);
        self.save(&owner, &habits)
    }

    fn get(&self, owner: &OwnerId, id: HabitId) -> Result<Habit, StoreError> {
        let _guard = self.lock.lock();
        self.load(owner)?
            .into_iter()
            .find(|habit| habit.id == id && habit.owner == *owner)
            .ok_or(StoreError::NotFound(id))
    }

    fn list(&self, owner: &OwnerId) -> Result<Vec<Habit>, StoreError> {
        let _guard = self.lock.lock();
        let mut habits = self.load(owner)?;
        habits.retain(|habit| habit.owner == *owner);
        Ok(habits)
    }

    fn update(
        &self,
        owner: &OwnerId,
        id: HabitId,
        mutate: &mut dyn FnMut(&mut Habit),
    ) -> Result<Habit, StoreError> {
        let _guard = self.lock.lock();
        let mut habits = self.load(owner)?;
        let habit = habits
            .iter_mut()
            .find(|habit| habit.id == id && habit.owner == *owner)
            .ok_or(StoreError::NotFound(id))?;
        mutate(habit);
        let updated = habit.clone();
        self.save(owner, &habits)?;
        Ok(updated)
    }

    fn remove(&self, owner: &OwnerId, id: HabitId) -> Result<Habit, StoreError> {
        let _guard = self.lock.lock();
        let mut habits = self.load(owner)?;
        let index = habits
            .iter()
            .position(|habit| habit.id == id && habit.owner == *owner)
            .ok_or(StoreError::NotFound(id))?;
        let removed = habits.remove(index);
        self.save(owner, &habits)?;
        Ok(removed)
    }
}

/// File-safe and one-to-one: ASCII alphanumerics and `-` are kept, every
/// other byte becomes `_xx` in lowercase hex.
fn owner_file_stem(owner: &str) -> String {
    if owner.is_empty() {
        return "_".into();
    }
    let mut stem = String::with_capacity(owner.len());
    for byte in owner.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{byte:02x}"));
        }
    }
    stem
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)
}
