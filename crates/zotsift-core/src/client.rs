use crate::config::AppConfig;
use crate::error::{Result, ZotsiftError};
use crate::index::LibraryIndex;
use crate::launcher::{LaunchAction, Launcher, ZoteroUri};
use crate::models::{Candidate, Item, ResolvedAttachment};
use crate::query::{Query, QueryEngine};
use crate::snapshot::DatabaseSnapshot;
use crate::source::SqliteRowSource;

/// One loaded Zotero library.
///
/// Fields drop in declaration order: the connection closes before the
/// snapshot directory is removed.
pub struct Zotsift {
    config: AppConfig,
    source: SqliteRowSource,
    index: LibraryIndex,
    engine: QueryEngine,
    launcher: Launcher,
    _snapshot: Option<DatabaseSnapshot>,
}

impl std::fmt::Debug for Zotsift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zotsift")
            .field("database", &self.config.database_path())
            .field("items", &self.index.item_count())
            .finish_non_exhaustive()
    }
}

impl Zotsift {
    pub fn open(config: AppConfig) -> Result<Self> {
        let database = config.database_path();
        let (source, snapshot) = if config.snapshot {
            let snapshot = DatabaseSnapshot::capture(&database)?;
            (snapshot.open()?, Some(snapshot))
        } else {
            (SqliteRowSource::open(&database)?, None)
        };
        let index = LibraryIndex::build(&source)?;
        let launcher = Launcher::from_config(&config);

        Ok(Self {
            config,
            source,
            index,
            engine: QueryEngine::new(),
            launcher,
            _snapshot: snapshot,
        })
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: Launcher) -> Self {
        self.launcher = launcher;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub const fn index(&self) -> &LibraryIndex {
        &self.index
    }

    #[must_use]
    pub const fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    pub fn search(&self, query: &Query) -> Result<Vec<Candidate>> {
        self.engine.run(&self.index, query)
    }

    pub fn item_by_key(&self, key: &str) -> Result<Item> {
        self.index
            .get_item_by_key(key)
            .ok_or_else(|| ZotsiftError::NotFound(format!("item {key}")))
    }

    /// PDF attachments of an item with paths resolved against the storage dir.
    pub fn attachments(&self, item_id: i64) -> Result<Vec<ResolvedAttachment>> {
        let storage = self.config.storage_path();
        Ok(self
            .index
            .get_attachments(&self.source, item_id)?
            .into_iter()
            .map(|attachment| ResolvedAttachment::new(attachment, &storage))
            .collect())
    }

    /// `Open` targets the item's first PDF and falls back to selecting the
    /// item when it has none.
    pub fn uri_for(&self, action: LaunchAction, item_key: &str) -> Result<ZoteroUri> {
        let item = self.item_by_key(item_key)?;
        if action == LaunchAction::Open
            && let Some(pdf) = self.index.get_attachments(&self.source, item.id)?.first()
        {
            return Ok(ZoteroUri::OpenPdf(pdf.key.clone()));
        }
        Ok(ZoteroUri::Select(item.key))
    }

    pub fn launch(&self, uri: &ZoteroUri) -> Result<()> {
        self.launcher.launch(uri)
    }

    pub fn open_pdf(&self, attachment_key: &str) -> Result<ZoteroUri> {
        let uri = ZoteroUri::OpenPdf(attachment_key.to_string());
        self.launch(&uri)?;
        Ok(uri)
    }

    pub fn select(&self, item_key: &str) -> Result<ZoteroUri> {
        let uri = ZoteroUri::Select(self.item_by_key(item_key)?.key);
        self.launch(&uri)?;
        Ok(uri)
    }
}
