use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{Result, ZotsiftError};
use crate::host_tools::{HostCommandResult, HostCommandSpec, HostToolsPolicy, run_host_command};

const OPEN_PDF_PREFIX: &str = "zotero://open-pdf/library/items/";
const SELECT_PREFIX: &str = "zotero://select/library/items/";

/// Deep link understood by a running Zotero instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoteroUri {
    /// Opens an attachment, addressed by the attachment item's key.
    OpenPdf(String),
    /// Selects an item in the Zotero pane.
    Select(String),
}

impl ZoteroUri {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::OpenPdf(key) | Self::Select(key) => key,
        }
    }
}

impl fmt::Display for ZoteroUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenPdf(key) => write!(f, "{OPEN_PDF_PREFIX}{key}"),
            Self::Select(key) => write!(f, "{SELECT_PREFIX}{key}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchAction {
    #[default]
    Open,
    Select,
}

impl FromStr for LaunchAction {
    type Err = ZotsiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "select" => Ok(Self::Select),
            other => Err(ZotsiftError::Config(format!(
                "unknown action '{other}' (expected open|select)"
            ))),
        }
    }
}

/// Hands `zotero://` links to the platform opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    program: String,
    args: Vec<String>,
    policy: HostToolsPolicy,
}

impl Launcher {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            policy: HostToolsPolicy::from_env(),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.opener.program.clone(), config.opener.args.clone())
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: HostToolsPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs `<program> <args..> <uri>` and waits for it to exit.
    pub fn launch(&self, uri: &ZoteroUri) -> Result<()> {
        let rendered = uri.to_string();
        let mut args = self.args.clone();
        args.push(rendered.clone());
        debug!(program = %self.program, uri = %rendered, "launching opener");

        let spec = HostCommandSpec::new("launch", &self.program, &args);
        match run_host_command(spec, self.policy) {
            HostCommandResult::Blocked { reason } => Err(ZotsiftError::HostToolsBlocked(reason)),
            HostCommandResult::SpawnError { error } => Err(ZotsiftError::Launch {
                uri: rendered,
                detail: format!("{}: {error}", self.program),
            }),
            HostCommandResult::Completed {
                success: false,
                code,
                stderr,
                ..
            } => {
                let status = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                Err(ZotsiftError::Launch {
                    uri: rendered,
                    detail: format!("{} exited with {status}: {}", self.program, stderr.trim()),
                })
            }
            HostCommandResult::Completed { success: true, .. } => {
                info!(uri = %rendered, "launched");
                Ok(())
            }
        }
    }
}
