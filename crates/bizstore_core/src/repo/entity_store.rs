//! Generic entity repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide uniform CRUD and field-equality search over any [`Entity`].
//! - Own identifier allocation for the entities it stores.
//!
//! # Invariants
//! - Identifiers start at 1, grow by 1 per successful insert and are never
//!   reissued, even after delete.
//! - Absent identifiers are reported as `Ok(None)`, never as errors.
//! - `find_by_field` treats unknown fields and absent values as non-matching.
//! - Listing and search results come back in ascending identifier order.

use crate::config::StoreConfig;
use crate::model::entity::{check_schema, Entity, EntityId, FieldValue, SchemaError};
use log::{debug, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type StoreResult<T> = Result<T, StoreError>;

/// Entity store error.
///
/// Not-found is deliberately absent: lookups return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The entity type does not satisfy the store's structural requirements.
    UnsupportedEntityType {
        kind: &'static str,
        reason: SchemaError,
    },
    /// A previous holder of the store lock panicked.
    LockPoisoned(&'static str),
    /// Every `u64` identifier has been issued.
    IdSpaceExhausted { kind: &'static str },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedEntityType { kind, reason } => {
                write!(f, "unsupported entity type `{kind}`: {reason}")
            }
            Self::LockPoisoned(context) => write!(f, "entity store lock poisoned: {context}"),
            Self::IdSpaceExhausted { kind } => {
                write!(f, "identifier space exhausted for `{kind}` store")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnsupportedEntityType { reason, .. } => Some(reason),
            Self::LockPoisoned(_) => None,
            Self::IdSpaceExhausted { .. } => None,
        }
    }
}

/// Repository interface shared by every entity type.
pub trait EntityRepository<T: Entity> {
    /// Assigns the next identifier to `entity`, stores it and returns it.
    fn insert(&self, entity: T) -> StoreResult<T>;
    fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>>;
    fn find_all(&self) -> StoreResult<Vec<T>>;
    /// Fully replaces the entity stored under `id`; `None` when absent.
    fn update(&self, id: EntityId, entity: T) -> StoreResult<Option<T>>;
    /// Removes and returns the entity stored under `id`; `None` when absent.
    fn delete(&self, id: EntityId) -> StoreResult<Option<T>>;
    /// Returns entities whose `field_name` equals `value`.
    fn find_by_field(&self, field_name: &str, value: &FieldValue) -> StoreResult<Vec<T>>;
}

/// Thread-safe in-memory entity store.
///
/// Only constructible through [`InMemoryEntityStore::try_new`], so a store for
/// a structurally broken entity type never exists.
#[derive(Debug)]
pub struct InMemoryEntityStore<T: Entity> {
    entries: RwLock<BTreeMap<EntityId, T>>,
    last_id: AtomicU64,
    config: StoreConfig,
}

impl<T: Entity> InMemoryEntityStore<T> {
    /// Creates an empty store with default [`StoreConfig`].
    ///
    /// # Errors
    /// - `UnsupportedEntityType` when `T` fails [`check_schema`].
    pub fn try_new() -> StoreResult<Self> {
        Self::try_with_config(StoreConfig::default())
    }

    pub fn try_with_config(config: StoreConfig) -> StoreResult<Self> {
        check_schema::<T>().map_err(|reason| StoreError::UnsupportedEntityType {
            kind: T::KIND,
            reason,
        })?;

        debug!("event=store_created module=repo kind={}", T::KIND);

        Ok(Self {
            entries: RwLock::new(BTreeMap::new()),
            last_id: AtomicU64::new(0),
            config,
        })
    }

    /// Returns entities accepted by `predicate`, in identifier order.
    ///
    /// Typed counterpart of [`EntityRepository::find_by_field`].
    pub fn find_by<P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self
            .read("find_by")?
            .values()
            .filter(|entity| predicate(*entity))
            .cloned()
            .collect())
    }

    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.read("count")?.len())
    }

    pub fn contains(&self, id: EntityId) -> StoreResult<bool> {
        Ok(self.read("contains")?.contains_key(&id))
    }

    /// Returns the most recently issued identifier, deleted or not.
    pub fn last_issued_id(&self) -> Option<EntityId> {
        match self.last_id.load(Ordering::SeqCst) {
            0 => None,
            id => Some(id),
        }
    }

    /// Borrows the store for lookups only.
    pub fn view(&self) -> StoreView<'_, T> {
        StoreView { store: self }
    }

    fn read(
        &self,
        context: &'static str,
    ) -> StoreResult<RwLockReadGuard<'_, BTreeMap<EntityId, T>>> {
        self.entries
            .read()
            .map_err(|_| StoreError::LockPoisoned(context))
    }

    fn write(
        &self,
        context: &'static str,
    ) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<EntityId, T>>> {
        self.entries
            .write()
            .map_err(|_| StoreError::LockPoisoned(context))
    }

    // Peeks only; `insert` commits the counter once the entity is in the map.
    fn next_id(&self) -> StoreResult<EntityId> {
        self.last_id
            .load(Ordering::SeqCst)
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted { kind: T::KIND })
    }

    fn log_mutation(&self, event: &str, id: EntityId) {
        if self.config.log_operations {
            info!("event={event} module=repo kind={} id={id}", T::KIND);
        }
    }
}

impl<T: Entity> EntityRepository<T> for InMemoryEntityStore<T> {
    fn insert(&self, mut entity: T) -> StoreResult<T> {
        let mut entries = self.write("insert")?;
        let id = self.next_id()?;

        entity.set_id(id);
        entries.insert(id, entity.clone());
        self.last_id.store(id, Ordering::SeqCst);
        drop(entries);

        self.log_mutation("entity_saved", id);
        Ok(entity)
    }

    fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        Ok(self.read("find_by_id")?.get(&id).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<T>> {
        Ok(self.read("find_all")?.values().cloned().collect())
    }

    fn update(&self, id: EntityId, mut entity: T) -> StoreResult<Option<T>> {
        let mut entries = self.write("update")?;
        let Some(slot) = entries.get_mut(&id) else {
            debug!("event=entity_update_skipped module=repo kind={} id={id}", T::KIND);
            return Ok(None);
        };

        entity.set_id(id);
        *slot = entity.clone();
        drop(entries);

        self.log_mutation("entity_updated", id);
        Ok(Some(entity))
    }

    fn delete(&self, id: EntityId) -> StoreResult<Option<T>> {
        let removed = self.write("delete")?.remove(&id);
        match removed {
            Some(entity) => {
                self.log_mutation("entity_deleted", id);
                Ok(Some(entity))
            }
            None => {
                debug!("event=entity_delete_skipped module=repo kind={} id={id}", T::KIND);
                Ok(None)
            }
        }
    }

    fn find_by_field(&self, field_name: &str, value: &FieldValue) -> StoreResult<Vec<T>> {
        if !T::FIELDS.contains(&field_name) {
            debug!(
                "event=unknown_field_search module=repo kind={} field={field_name}",
                T::KIND
            );
        }

        self.find_by(|entity| entity.field(field_name).as_ref() == Some(value))
    }
}

/// Read-only handle over an [`InMemoryEntityStore`].
///
/// Hands out lookups without `insert`/`update`/`delete`, so an owner that
/// guards writes (foreign keys, validation) can still expose its stores.
#[derive(Debug)]
pub struct StoreView<'a, T: Entity> {
    store: &'a InMemoryEntityStore<T>,
}

impl<T: Entity> Clone for StoreView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Entity> Copy for StoreView<'_, T> {}

impl<T: Entity> StoreView<'_, T> {
    pub fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        self.store.find_by_id(id)
    }

    pub fn find_all(&self) -> StoreResult<Vec<T>> {
        self.store.find_all()
    }

    pub fn find_by_field(&self, field_name: &str, value: &FieldValue) -> StoreResult<Vec<T>> {
        self.store.find_by_field(field_name, value)
    }

    pub fn find_by<P>(&self, predicate: P) -> StoreResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        self.store.find_by(predicate)
    }

    pub fn count(&self) -> StoreResult<usize> {
        self.store.count()
    }

    pub fn contains(&self, id: EntityId) -> StoreResult<bool> {
        self.store.contains(id)
    }

    pub fn last_issued_id(&self) -> Option<EntityId> {
        self.store.last_issued_id()
    }
}
