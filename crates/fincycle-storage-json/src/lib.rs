//! fincycle-storage-json
//!
//! Filesystem-backed JSON implementations of the engine's persistence traits.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use fincycle_core::{CoreError, SettingsStore, TransactionStore};
use fincycle_domain::{Settings, Transaction};

const TRANSACTIONS_FILE: &str = "transactions.json";
const SETTINGS_FILE: &str = "settings.json";
const TMP_SUFFIX: &str = "tmp";
pub const TRANSACTIONS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone)]
/// Locations for the stored files.
pub struct StoragePaths {
    pub transactions: PathBuf,
    pub settings: PathBuf,
}

impl StoragePaths {
    pub fn in_dir(base: &Path) -> Self {
        Self {
            transactions: base.join(TRANSACTIONS_FILE),
            settings: base.join(SETTINGS_FILE),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TransactionsFile {
    schema_version: u32,
    transactions: Vec<Transaction>,
}

/// Keeps the whole transaction collection in one JSON document.
#[derive(Debug, Clone)]
pub struct JsonTransactionStore {
    path: PathBuf,
}

impl JsonTransactionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionStore for JsonTransactionStore {
    fn load_all(&self) -> Result<Vec<Transaction>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        // Bare arrays predate the versioned envelope.
        if raw.trim_start().starts_with('[') {
            return parse(&raw);
        }
        let file: TransactionsFile = parse(&raw)?;
        Ok(file.transactions)
    }

    fn save_all(&self, transactions: &[Transaction]) -> Result<(), CoreError> {
        for txn in transactions {
            txn.validate()?;
        }
        let file = TransactionsFile {
            schema_version: TRANSACTIONS_SCHEMA_VERSION,
            transactions: transactions.to_vec(),
        };
        write_json(&self.path, &file)
    }
}

/// Stores [`Settings`] as a single JSON document, validated on load.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings, CoreError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let settings: Settings = parse(&raw)?;
        settings.validate()?;
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<(), CoreError> {
        settings.validate()?;
        write_json(&self.path, settings)
    }
}

/// Builds both stores rooted in `base`, creating the directory if needed.
pub fn open_dir(base: &Path) -> Result<(JsonTransactionStore, JsonSettingsStore), CoreError> {
    fs::create_dir_all(base)?;
    let paths = StoragePaths::in_dir(base);
    Ok((
        JsonTransactionStore::new(paths.transactions),
        JsonSettingsStore::new(paths.settings),
    ))
}

fn parse<T: DeserializeOwned>(raw: &str) -> Result<T, CoreError> {
    serde_json::from_str(raw).map_err(|err| CoreError::Serde(err.to_string()))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(value).map_err(|err| CoreError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
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
