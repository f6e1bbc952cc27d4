use crate::error::{LedgerError, Result};
use crate::schema::{
    ClientIdentity, Depense, ExpenseCategory, LedgerDocument, Prestation, ServiceCategory,
};
use crate::utils::parse_amount;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Form input for a new prestation; `amount` is the raw typed text.
#[derive(Debug, Clone, Default)]
pub struct PrestationDraft {
    pub date: DateTime<Utc>,
    pub category: ServiceCategory,
    pub amount: String,
    pub note: String,
    pub client: ClientIdentity,
}

impl PrestationDraft {
    fn into_record(self, id: String) -> Prestation {
        Prestation {
            id,
            date: self.date,
            category: self.category,
            amount: parse_amount(&self.amount),
            client: (!self.client.is_blank()).then_some(self.client),
            note: non_empty(self.note),
        }
    }
}

/// Form input for a new expense; `amount` is the raw typed text.
#[derive(Debug, Clone)]
pub struct DepenseDraft {
    pub date: DateTime<Utc>,
    pub category: ExpenseCategory,
    pub amount: String,
    pub note: String,
    pub variable: bool,
}

impl Default for DepenseDraft {
    fn default() -> Self {
        Self {
            date: DateTime::<Utc>::default(),
            category: ExpenseCategory::default(),
            amount: String::new(),
            note: String::new(),
            variable: true,
        }
    }
}

impl DepenseDraft {
    fn into_record(self, id: String) -> Depense {
        Depense {
            id,
            date: self.date,
            category: self.category,
            amount: parse_amount(&self.amount),
            note: non_empty(self.note),
            variable: self.variable,
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Random version 4 UUID in its hyphenated lowercase form.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// In-memory record collection. New records go to the front; records are only
/// ever added or removed, never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    document: LedgerDocument,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_document(document: LedgerDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &LedgerDocument {
        &self.document
    }

    pub fn into_document(self) -> LedgerDocument {
        self.document
    }

    pub fn prestations(&self) -> &[Prestation] {
        &self.document.prestations
    }

    pub fn depenses(&self) -> &[Depense] {
        &self.document.depenses
    }

    pub fn add_prestation(&mut self, draft: PrestationDraft) -> String {
        let id = new_record_id();
        let record = draft.into_record(id.clone());
        debug!("Adding prestation {} ({:.2})", id, record.amount);
        self.document.prestations.insert(0, record);
        id
    }

    pub fn add_depense(&mut self, draft: DepenseDraft) -> String {
        let id = new_record_id();
        let record = draft.into_record(id.clone());
        debug!("Adding depense {} ({:.2})", id, record.amount);
        self.document.depenses.insert(0, record);
        id
    }

    pub fn delete_prestation(&mut self, id: &str) -> Result<Prestation> {
        match self.document.prestations.iter().position(|p| p.id == id) {
            Some(idx) => Ok(self.document.prestations.remove(idx)),
            None => {
                warn!("Cannot delete unknown prestation {}", id);
                Err(LedgerError::RecordNotFound(id.to_string()))
            }
        }
    }

    pub fn delete_depense(&mut self, id: &str) -> Result<Depense> {
        match self.document.depenses.iter().position(|d| d.id == id) {
            Some(idx) => Ok(self.document.depenses.remove(idx)),
            None => {
                warn!("Cannot delete unknown depense {}", id);
                Err(LedgerError::RecordNotFound(id.to_string()))
            }
        }
    }
}

/// Where the ledger document lives between runs.
pub trait Storage {
    /// Returns the stored document, or an empty one when nothing usable is stored.
    fn load(&self) -> LedgerDocument;

    fn save(&mut self, document: &LedgerDocument) -> Result<()>;
}

fn parse_document(raw: &str, origin: &str) -> LedgerDocument {
    match serde_json::from_str(raw) {
        Ok(document) => document,
        Err(e) => {
            warn!("Ignoring unreadable ledger data in {}: {}", origin, e);
            LedgerDocument::default()
        }
    }
}

/// Ledger stored as one pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> LedgerDocument {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_document(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No ledger at {}, starting empty", self.path.display());
                LedgerDocument::default()
            }
            Err(e) => {
                warn!("Cannot read ledger at {}: {}", self.path.display(), e);
                LedgerDocument::default()
            }
        }
    }

    fn save(&mut self, document: &LedgerDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Ledger stored as a JSON string held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: impl Into<String>) -> Self {
        Self {
            contents: Some(raw.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> LedgerDocument {
        match &self.contents {
            Some(raw) => parse_document(raw, "memory"),
            None => LedgerDocument::default(),
        }
    }

    fn save(&mut self, document: &LedgerDocument) -> Result<()> {
        self.contents = Some(serde_json::to_string(document)?);
        Ok(())
    }
}

/// A ledger loaded from storage once and written back after every change.
#[derive(Debug)]
pub struct PersistentLedger<S: Storage> {
    ledger: Ledger,
    storage: S,
}

impl<S: Storage> PersistentLedger<S> {
    pub fn open(storage: S) -> Self {
        let ledger = Ledger::from_document(storage.load());
        info!(
            "Loaded ledger with {} prestations and {} depenses",
            ledger.prestations().len(),
            ledger.depenses().len()
        );
        Self { ledger, storage }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn document(&self) -> &LedgerDocument {
        self.ledger.document()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_parts(self) -> (Ledger, S) {
        (self.ledger, self.storage)
    }

    pub fn add_prestation(&mut self, draft: PrestationDraft) -> Result<String> {
        let id = self.ledger.add_prestation(draft);
        self.persist()?;
        Ok(id)
    }

    pub fn add_depense(&mut self, draft: DepenseDraft) -> Result<String> {
        let id = self.ledger.add_depense(draft);
        self.persist()?;
        Ok(id)
    }

    pub fn delete_prestation(&mut self, id: &str) -> Result<Prestation> {
        let removed = self.ledger.delete_prestation(id)?;
        self.persist()?;
        Ok(removed)
    }

    pub fn delete_depense(&mut self, id: &str) -> Result<Depense> {
        let removed = self.ledger.delete_depense(id)?;
        self.persist()?;
        Ok(removed)
    }

    fn persist(&mut self) -> Result<()> {
        self.storage.save(self.ledger.document())?;
        info!(
            "Saved ledger ({} prestations, {} depenses)",
            self.ledger.prestations().len(),
            self.ledger.depenses().len()
        );
        Ok(())
    }
}
