use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use fincycle_domain::{Settings, Transaction};

use crate::CoreError;

/// Persistence for the full, unordered transaction collection.
///
/// The engine always reloads and resaves the whole collection; no incremental
/// append contract exists at this layer. A save either fully succeeds or fails.
pub trait TransactionStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<Transaction>, CoreError>;
    fn save_all(&self, transactions: &[Transaction]) -> Result<(), CoreError>;
}

/// Persistence for the [`Settings`] snapshot.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<Settings, CoreError>;
    fn save(&self, settings: &Settings) -> Result<(), CoreError>;
}

/// In-memory transaction store. Saves can be forced to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    transactions: Mutex<Vec<Transaction>>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemoryTransactionStore {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `save_all` calls.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.load_all().unwrap_or_default()
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn load_all(&self) -> Result<Vec<Transaction>, CoreError> {
        let guard = self
            .transactions
            .lock()
            .map_err(|_| CoreError::Storage("transaction store lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save_all(&self, transactions: &[Transaction]) -> Result<(), CoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("transaction save rejected".into()));
        }
        let mut guard = self
            .transactions
            .lock()
            .map_err(|_| CoreError::Storage("transaction store lock poisoned".into()))?;
        *guard = transactions.to_vec();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<Settings>,
    fail_saves: AtomicBool,
    save_count: AtomicUsize,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Settings {
        self.load().unwrap_or_default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, CoreError> {
        let guard = self
            .settings
            .lock()
            .map_err(|_| CoreError::Storage("settings store lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("settings save rejected".into()));
        }
        let mut guard = self
            .settings
            .lock()
            .map_err(|_| CoreError::Storage("settings store lock poisoned".into()))?;
        *guard = settings.clone();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<T: TransactionStore + ?Sized> TransactionStore for std::sync::Arc<T> {
    fn load_all(&self) -> Result<Vec<Transaction>, CoreError> {
        (**self).load_all()
    }

    fn save_all(&self, transactions: &[Transaction]) -> Result<(), CoreError> {
        (**self).save_all(transactions)
    }
}

impl<S: SettingsStore + ?Sized> SettingsStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Settings, CoreError> {
        (**self).load()
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        (**self).save(settings)
    }
}
