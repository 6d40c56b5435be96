use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::database::models::Resource;
use crate::database::store::{generate_id, PageSlice, ResourceStore, StoreError};
use crate::types::{CreateInput, Page, UpdateInput};

/// In-process store used when no database is configured and in tests.
///
/// Every write holds the table's write lock for the whole check-and-mutate,
/// which is what makes the name check atomic.
pub struct MemoryStore<E> {
    table: RwLock<Table<E>>,
}

struct Table<E> {
    next_seq: u64,
    rows: BTreeMap<u64, E>,
    seq_by_id: HashMap<String, u64>,
    id_by_name: HashMap<String, String>,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_seq: 1,
                rows: BTreeMap::new(),
                seq_by_id: HashMap::new(),
                id_by_name: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl<E: Resource> ResourceStore<E> for MemoryStore<E> {
    async fn insert(&self, input: CreateInput) -> Result<E, StoreError> {
        let mut table = self.table.write().await;
        if table.id_by_name.contains_key(&input.name) {
            return Err(StoreError::duplicate_name::<E>(&input.name));
        }

        let id = generate_id();
        let seq = table.next_seq;
        table.next_seq += 1;

        let record = E::from_parts(id.clone(), input.name.clone(), input.description);
        table.rows.insert(seq, record.clone());
        table.seq_by_id.insert(id.clone(), seq);
        table.id_by_name.insert(input.name, id);
        Ok(record)
    }

    async fn find(&self, id: &str) -> Result<E, StoreError> {
        let table = self.table.read().await;
        table
            .seq_by_id
            .get(id)
            .and_then(|seq| table.rows.get(seq))
            .cloned()
            .ok_or_else(|| StoreError::not_found::<E>(id))
    }

    async fn patch(&self, id: &str, input: UpdateInput) -> Result<E, StoreError> {
        let mut table = self.table.write().await;
        let seq = *table
            .seq_by_id
            .get(id)
            .ok_or_else(|| StoreError::not_found::<E>(id))?;
        let current = table
            .rows
            .get(&seq)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<E>(id))?;

        let (name, description) = input.apply(current.name(), current.description());
        if name != current.name() {
            if let Some(owner) = table.id_by_name.get(&name) {
                if owner != id {
                    return Err(StoreError::duplicate_name::<E>(&name));
                }
            }
            table.id_by_name.remove(current.name());
            table.id_by_name.insert(name.clone(), id.to_string());
        }

        let record = E::from_parts(id.to_string(), name, description);
        table.rows.insert(seq, record.clone());
        Ok(record)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut table = self.table.write().await;
        let seq = table
            .seq_by_id
            .remove(id)
            .ok_or_else(|| StoreError::not_found::<E>(id))?;
        if let Some(record) = table.rows.remove(&seq) {
            table.id_by_name.remove(record.name());
        }
        Ok(())
    }

    async fn page(&self, page: Page) -> Result<PageSlice<E>, StoreError> {
        let table = self.table.read().await;
        let items = table
            .rows
            .values()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.page_size as usize)
            .cloned()
            .collect();
        Ok(PageSlice {
            items,
            total: table.rows.len() as u64,
        })
    }
}
