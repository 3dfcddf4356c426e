use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ZotsiftError};

mod env;


pub(crate) use env::parse_toggle;

pub const ENV_CONFIG: &str = "ZOTSIFT_CONFIG";
pub const ENV_ZOTERO_DIR: &str = "ZOTSIFT_ZOTERO_DIR";
pub const ENV_DATABASE: &str = "ZOTSIFT_DATABASE";
pub const ENV_OPENER: &str = "ZOTSIFT_OPENER";
pub const ENV_SNAPSHOT: &str = "ZOTSIFT_SNAPSHOT";

const ENV_HOME: &str = "HOME";
const ENV_XDG_CONFIG_HOME: &str = "XDG_CONFIG_HOME";
const DEFAULT_ZOTERO_DIR_NAME: &str = "Zotero";
const DATABASE_FILE_NAME: &str = "zotero.sqlite";
const STORAGE_DIR_NAME: &str = "storage";
const CONFIG_DIR_NAME: &str = "zotsift";
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for OpenerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_OPENER.to_string(),
            args: Vec::new(),
        }
    }
}

/// Resolved runtime configuration.
///
/// Precedence, lowest first: built-in defaults, the TOML config file,
/// `ZOTSIFT_*` environment variables, then CLI overrides applied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub zotero_dir: PathBuf,
    database: Option<PathBuf>,
    storage_dir: Option<PathBuf>,
    pub opener: OpenerConfig,
    pub snapshot: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    zotero_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    storage_dir: Option<PathBuf>,
    opener: Option<String>,
    opener_args: Option<Vec<String>>,
    snapshot: Option<bool>,
}

impl AppConfig {
    #[must_use]
    pub fn new(zotero_dir: impl Into<PathBuf>) -> Self {
        Self {
            zotero_dir: zotero_dir.into(),
            database: None,
            storage_dir: None,
            opener: OpenerConfig::default(),
            snapshot: true,
        }
    }

    pub fn load() -> Result<Self> {
        Self::resolve(env::read_non_empty_env)
    }

    pub(crate) fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let home = lookup(ENV_HOME).map(PathBuf::from);
        let default_dir = match &home {
            Some(home) => home.join(DEFAULT_ZOTERO_DIR_NAME),
            None => PathBuf::from(DEFAULT_ZOTERO_DIR_NAME),
        };
        let mut config = Self::new(default_dir);

        if let Some(path) = config_file_path(&lookup, home.as_deref())? {
            let raw = fs::read_to_string(&path)?;
            let file: FileConfig = toml::from_str(&raw)?;
            config.apply_file(file, home.as_deref());
        }
        config.apply_env(&lookup)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig, home: Option<&Path>) {
        if let Some(dir) = file.zotero_dir {
            self.zotero_dir = expand_home(dir, home);
        }
        if let Some(database) = file.database {
            self.database = Some(expand_home(database, home));
        }
        if let Some(storage_dir) = file.storage_dir {
            self.storage_dir = Some(expand_home(storage_dir, home));
        }
        if let Some(program) = file.opener {
            self.opener.program = program;
        }
        if let Some(args) = file.opener_args {
            self.opener.args = args;
        }
        if let Some(snapshot) = file.snapshot {
            self.snapshot = snapshot;
        }
    }

    fn apply_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(dir) = lookup(ENV_ZOTERO_DIR) {
            self.zotero_dir = PathBuf::from(dir);
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            self.database = Some(PathBuf::from(database));
        }
        if let Some(program) = lookup(ENV_OPENER) {
            self.opener = OpenerConfig {
                program,
                args: Vec::new(),
            };
        }
        if let Some(raw) = lookup(ENV_SNAPSHOT) {
            self.snapshot = parse_toggle(&raw).ok_or_else(|| {
                ZotsiftError::Config(format!("invalid {ENV_SNAPSHOT}: {raw} (expected on|off)"))
            })?;
        }
        Ok(())
    }

    /// Points at another Zotero data directory. Explicit database and storage
    /// overrides are dropped so both follow the new directory.
    #[must_use]
    pub fn with_zotero_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.zotero_dir = dir.into();
        self.database = None;
        self.storage_dir = None;
        self
    }

    #[must_use]
    pub const fn with_snapshot(mut self, snapshot: bool) -> Self {
        self.snapshot = snapshot;
        self
    }

    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| self.zotero_dir.join(DATABASE_FILE_NAME))
    }

    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| self.zotero_dir.join(STORAGE_DIR_NAME))
    }
}

fn config_file_path(
    lookup: &impl Fn(&str) -> Option<String>,
    home: Option<&Path>,
) -> Result<Option<PathBuf>> {
    if let Some(explicit) = lookup(ENV_CONFIG) {
        let path = PathBuf::from(explicit);
        if !path.is_file() {
            return Err(ZotsiftError::Config(format!(
                "{ENV_CONFIG} points at missing file {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    let config_home = lookup(ENV_XDG_CONFIG_HOME)
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(".config")));
    Ok(config_home
        .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file()))
}

fn expand_home(path: PathBuf, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}
