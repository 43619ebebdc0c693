use super::{sort_newest_first, CreationStore};
use crate::models::Creation;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Clone)]
pub struct MemoryCreationStore {
    creations: Arc<Mutex<Vec<Creation>>>,
    insert_count: Arc<Mutex<usize>>,
    fail_inserts: Arc<Mutex<bool>>,
}

impl MemoryCreationStore {
    pub fn new() -> Self {
        Self {
            creations: Arc::new(Mutex::new(Vec::new())),
            insert_count: Arc::new(Mutex::new(0)),
            fail_inserts: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_creation(self, creation: Creation) -> Self {
        self.creations.lock().unwrap().push(creation);
        self
    }

    /// Make every insert fail as an unavailable database would.
    pub fn with_insert_failure(self, should_fail: bool) -> Self {
        *self.fail_inserts.lock().unwrap() = should_fail;
        self
    }

    pub fn get_insert_count(&self) -> usize {
        *self.insert_count.lock().unwrap()
    }

    pub fn get_creations(&self) -> Vec<Creation> {
        self.creations.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.creations.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<Creation>>> {
        self.creations
            .lock()
            .map_err(|_| Error::Persistence("In-memory store lock poisoned".to_string()))
    }
}

impl Default for MemoryCreationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CreationStore for MemoryCreationStore {
    async fn insert(&self, creation: &Creation) -> Result<()> {
        if let Ok(mut count) = self.insert_count.lock() {
            *count += 1;
        }

        if self.fail_inserts.lock().map(|fail| *fail).unwrap_or(false) {
            return Err(Error::Persistence("Store unavailable".to_string()));
        }

        let mut creations = self.records()?;
        if creations.iter().any(|existing| existing.id == creation.id) {
            return Err(Error::Persistence(format!(
                "Creation {} already exists",
                creation.id
            )));
        }
        creations.push(creation.clone());
        Ok(())
    }

    async fn find_by_id_and_owner(&self, id: Uuid, owner: &str) -> Result<Option<Creation>> {
        Ok(self
            .records()?
            .iter()
            .find(|creation| creation.id == id && creation.owner == owner)
            .cloned())
    }

    async fn update_journal(&self, id: Uuid, owner: &str, text: &str) -> Result<bool> {
        let mut creations = self.records()?;
        match creations
            .iter_mut()
            .find(|creation| creation.id == id && creation.owner == owner)
        {
            Some(creation) => {
                creation.journal_entry = Some(text.to_string());
                creation.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Creation>> {
        let mut owned: Vec<Creation> = self
            .records()?
            .iter()
            .rev()
            .filter(|creation| creation.owner == owner)
            .cloned()
            .collect();
        sort_newest_first(&mut owned);
        Ok(owned)
    }
}
