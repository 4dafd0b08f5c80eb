use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::StoreError;

/// How downstream editing tools should interpret stored text. This governs
/// rendering of the record, not how translation behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    Html,
}

impl TextFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFormat::Plain => "plain",
            TextFormat::Html => "html",
        }
    }

    fn from_db(value: &str) -> Self {
        if value == "html" {
            TextFormat::Html
        } else {
            TextFormat::Plain
        }
    }
}

/// Provenance of a stored translation. Manual edits are authoritative: the
/// automatic path only refreshes `last_access` on them and never overwrites
/// the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Automatic,
    Manual,
}

#[derive(Debug, Clone)]
pub struct TranslationRecord {
    pub id: i64,
    pub hashkey: String,
    pub lang: String,
    pub source_text: String,
    pub translation: String,
    pub format: TextFormat,
    pub origin: Origin,
    pub source_url: String,
    pub time_created: i64,
    pub last_access: i64,
    /// True when no real translation occurred (`translation` equals
    /// `source_text`); such records are noise in a management view.
    pub hidden: bool,
}

/// Fields for a fresh automatic record. The store assigns `id`,
/// `time_created` and `last_access`; `origin` is always automatic here.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub hashkey: String,
    pub lang: String,
    pub source_text: String,
    pub translation: String,
    pub format: TextFormat,
    pub source_url: String,
    pub hidden: bool,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS fulltranslate (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hashkey TEXT NOT NULL,
    lang TEXT NOT NULL,
    sourcetext TEXT NOT NULL,
    translation TEXT NOT NULL,
    textformat TEXT NOT NULL,
    automatic INTEGER NOT NULL,
    url TEXT NOT NULL,
    timecreated INTEGER NOT NULL,
    lastaccess INTEGER NOT NULL,
    hidefromtable INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS fulltranslate_key_lang ON fulltranslate (hashkey, lang);
";

/// Persistent store of translation records, one row per cached translation.
///
/// Uniqueness of (hashkey, lang) is a caller-side convention, not a schema
/// constraint: two concurrent misses for the same fragment may both insert,
/// and `lookup`'s oldest-wins tie-break keeps the outcome consistent.
pub struct TranslationStore {
    conn: Mutex<Connection>,
}

impl TranslationStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Point lookup for the active record of a (key, language) pair. When
    /// duplicates exist the oldest row wins.
    pub fn lookup(
        &self,
        hashkey: &str,
        lang: &str,
    ) -> Result<Option<TranslationRecord>, StoreError> {
        let record = self
            .conn()
            .query_row(
                "SELECT id, hashkey, lang, sourcetext, translation, textformat, automatic,
                        url, timecreated, lastaccess, hidefromtable
                 FROM fulltranslate
                 WHERE hashkey = ?1 AND lang = ?2
                 ORDER BY id ASC LIMIT 1",
                params![hashkey, lang],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Refreshes `last_access` on every matching record. A no-op when none
    /// exists; callers treat failures as best-effort.
    pub fn touch(&self, hashkey: &str, lang: &str) -> Result<(), StoreError> {
        self.conn().execute(
            "UPDATE fulltranslate SET lastaccess = ?1 WHERE hashkey = ?2 AND lang = ?3",
            params![unix_now(), hashkey, lang],
        )?;
        Ok(())
    }

    /// Appends a record and returns its id. No uniqueness check.
    pub fn insert(&self, record: NewRecord) -> Result<i64, StoreError> {
        let now = unix_now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO fulltranslate (hashkey, lang, sourcetext, translation, textformat,
                                        automatic, url, timecreated, lastaccess, hidefromtable)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?7, ?8)",
            params![
                record.hashkey,
                record.lang,
                record.source_text,
                record.translation,
                record.format.as_str(),
                record.source_url,
                now,
                record.hidden,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Out-of-band manual edit, as performed by a management tool. Marks
    /// the record manual and visible; the automatic path will serve the
    /// edited text from then on.
    pub fn update_translation(&self, id: i64, translation: &str) -> Result<(), StoreError> {
        self.conn().execute(
            "UPDATE fulltranslate SET translation = ?1, automatic = 0, hidefromtable = 0
             WHERE id = ?2",
            params![translation, id],
        )?;
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TranslationRecord> {
    let format: String = row.get(5)?;
    let automatic: bool = row.get(6)?;
    Ok(TranslationRecord {
        id: row.get(0)?,
        hashkey: row.get(1)?,
        lang: row.get(2)?,
        source_text: row.get(3)?,
        translation: row.get(4)?,
        format: TextFormat::from_db(&format),
        origin: if automatic {
            Origin::Automatic
        } else {
            Origin::Manual
        },
        source_url: row.get(7)?,
        time_created: row.get(8)?,
        last_access: row.get(9)?,
        hidden: row.get(10)?,
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
