//! In-memory [`ImportStore`] for tests and local tooling.
//!
//! Records every call it receives and can be told to fail or panic on a
//! given operation, which is how the compensation and failure-policy paths
//! are exercised without a database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use langmap_core::types::DbId;

use crate::store::{ImportStore, LanguageMetadata, NewLanguage, StoreError};

/// Store operations, used for failure injection and the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ResolveTenant,
    FindLanguage,
    InsertLanguage,
    UpdateLanguage,
    DeleteLanguage,
    InsertTranslation,
    UpdateTranslation,
    DeleteTaxonomies,
    InsertTaxonomies,
    LanguageExists,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResolveTenant => "resolve_tenant",
            Self::FindLanguage => "find_language",
            Self::InsertLanguage => "insert_language",
            Self::UpdateLanguage => "update_language",
            Self::DeleteLanguage => "delete_language",
            Self::InsertTranslation => "insert_translation",
            Self::UpdateTranslation => "update_translation",
            Self::DeleteTaxonomies => "delete_taxonomies",
            Self::InsertTaxonomies => "insert_taxonomies",
            Self::LanguageExists => "language_exists",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded store call. `detail` holds the call's most identifying
/// argument (a name, key, or ID).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub operation: Operation,
    pub detail: String,
}

/// A language as held by the memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLanguage {
    pub id: DbId,
    pub tenant_id: DbId,
    pub endonym: Option<String>,
    pub iso_code: Option<String>,
    /// Incremented on every update.
    pub revision: u32,
}

#[derive(Debug, Default)]
struct State {
    next_id: DbId,
    tenants: HashMap<String, DbId>,
    languages: BTreeMap<DbId, StoredLanguage>,
    /// (language_id, locale) -> name
    translations: HashMap<(DbId, String), String>,
    taxonomies: HashMap<DbId, Vec<DbId>>,
    failing: HashSet<Operation>,
    panicking: HashSet<Operation>,
    calls: Vec<StoreCall>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Mutex-guarded in-memory implementation of [`ImportStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Setup ────────────────────────────────────────────────────────

    /// Register a tenant and return its ID.
    pub fn seed_tenant(&self, key: &str) -> DbId {
        let mut state = self.state();
        let id = state.next_id();
        state.tenants.insert(key.to_string(), id);
        id
    }

    /// Insert a language with one translation, bypassing the call log.
    pub fn seed_language(&self, tenant_id: DbId, locale: &str, name: &str) -> DbId {
        let mut state = self.state();
        let id = state.next_id();
        state.languages.insert(
            id,
            StoredLanguage {
                id,
                tenant_id,
                endonym: None,
                iso_code: None,
                revision: 0,
            },
        );
        state
            .translations
            .insert((id, locale.to_string()), name.to_string());
        id
    }

    /// Make every subsequent call of `operation` return an error.
    pub fn fail_on(&self, operation: Operation) {
        self.state().failing.insert(operation);
    }

    /// Make every subsequent call of `operation` panic.
    pub fn panic_on(&self, operation: Operation) {
        self.state().panicking.insert(operation);
    }

    /// Stop injecting failures and panics.
    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.failing.clear();
        state.panicking.clear();
    }

    // ── Inspection ───────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Recorded calls of one operation.
    pub fn calls_of(&self, operation: Operation) -> Vec<StoreCall> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    pub fn language(&self, id: DbId) -> Option<StoredLanguage> {
        self.state().languages.get(&id).cloned()
    }

    pub fn languages_for_tenant(&self, tenant_id: DbId) -> Vec<StoredLanguage> {
        self.state()
            .languages
            .values()
            .filter(|l| l.tenant_id == tenant_id)
            .cloned()
            .collect()
    }

    pub fn translation(&self, language_id: DbId, locale: &str) -> Option<String> {
        self.state()
            .translations
            .get(&(language_id, locale.to_string()))
            .cloned()
    }

    /// Assigned taxonomy value IDs, in insertion order.
    pub fn taxonomies(&self, language_id: DbId) -> Vec<DbId> {
        self.state()
            .taxonomies
            .get(&language_id)
            .cloned()
            .unwrap_or_default()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Record a call and apply any injected failure for it.
    fn enter(
        &self,
        operation: Operation,
        detail: impl Into<String>,
    ) -> Result<MutexGuard<'_, State>, StoreError> {
        let mut state = self.state();
        state.calls.push(StoreCall {
            operation,
            detail: detail.into(),
        });

        if state.panicking.contains(&operation) {
            drop(state);
            panic!("injected panic in {operation}");
        }
        if state.failing.contains(&operation) {
            return Err(StoreError::Backend(format!("injected failure in {operation}")));
        }
        Ok(state)
    }
}

#[async_trait]
impl ImportStore for MemoryStore {
    async fn resolve_tenant(&self, tenant_key: &str) -> Result<Option<DbId>, StoreError> {
        let state = self.enter(Operation::ResolveTenant, tenant_key)?;
        Ok(state.tenants.get(tenant_key).copied())
    }

    async fn find_language_by_name(
        &self,
        tenant_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<Option<DbId>, StoreError> {
        let state = self.enter(Operation::FindLanguage, name)?;
        let found = state
            .languages
            .values()
            .filter(|l| l.tenant_id == tenant_id)
            .find(|l| {
                state
                    .translations
                    .get(&(l.id, locale.to_string()))
                    .is_some_and(|n| n == name)
            })
            .map(|l| l.id);
        Ok(found)
    }

    async fn insert_language(&self, input: &NewLanguage) -> Result<DbId, StoreError> {
        let detail = input.endonym.clone().unwrap_or_default();
        let mut state = self.enter(Operation::InsertLanguage, detail)?;
        let id = state.next_id();
        state.languages.insert(
            id,
            StoredLanguage {
                id,
                tenant_id: input.tenant_id,
                endonym: input.endonym.clone(),
                iso_code: input.iso_code.clone(),
                revision: 0,
            },
        );
        Ok(id)
    }

    async fn update_language(
        &self,
        language_id: DbId,
        metadata: &LanguageMetadata,
    ) -> Result<(), StoreError> {
        let mut state = self.enter(Operation::UpdateLanguage, language_id.to_string())?;
        let language = state
            .languages
            .get_mut(&language_id)
            .ok_or(StoreError::NotFound {
                entity: "Language",
                id: language_id,
            })?;
        language.endonym = metadata.endonym.clone();
        language.iso_code = metadata.iso_code.clone();
        language.revision += 1;
        Ok(())
    }

    async fn delete_language(&self, language_id: DbId) -> Result<(), StoreError> {
        let mut state = self.enter(Operation::DeleteLanguage, language_id.to_string())?;
        if state.languages.remove(&language_id).is_none() {
            return Err(StoreError::NotFound {
                entity: "Language",
                id: language_id,
            });
        }
        state.translations.retain(|(id, _), _| *id != language_id);
        state.taxonomies.remove(&language_id);
        Ok(())
    }

    async fn insert_translation(
        &self,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.enter(Operation::InsertTranslation, name)?;
        let key = (language_id, locale.to_string());
        if state.translations.contains_key(&key) {
            return Err(StoreError::Backend(format!(
                "translation for language {language_id} in locale {locale} already exists"
            )));
        }
        state.translations.insert(key, name.to_string());
        Ok(())
    }

    async fn update_translation(
        &self,
        language_id: DbId,
        locale: &str,
        name: &str,
    ) -> Result<(), StoreError> {
        let mut state = self.enter(Operation::UpdateTranslation, name)?;
        match state.translations.get_mut(&(language_id, locale.to_string())) {
            Some(existing) => {
                *existing = name.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "LanguageTranslation",
                id: language_id,
            }),
        }
    }

    async fn delete_taxonomies(&self, language_id: DbId) -> Result<(), StoreError> {
        let mut state = self.enter(Operation::DeleteTaxonomies, language_id.to_string())?;
        state.taxonomies.remove(&language_id);
        Ok(())
    }

    async fn insert_taxonomies(
        &self,
        language_id: DbId,
        value_ids: &[DbId],
    ) -> Result<(), StoreError> {
        let mut state = self.enter(Operation::InsertTaxonomies, language_id.to_string())?;
        let assigned = state.taxonomies.entry(language_id).or_default();
        for id in value_ids {
            if !assigned.contains(id) {
                assigned.push(*id);
            }
        }
        Ok(())
    }

    async fn language_exists(&self, language_id: DbId) -> Result<bool, StoreError> {
        let state = self.enter(Operation::LanguageExists, language_id.to_string())?;
        Ok(state.languages.contains_key(&language_id))
    }
}
