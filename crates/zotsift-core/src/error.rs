use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZotsiftError>;

#[derive(Debug, Error)]
pub enum ZotsiftError {
    #[error("malformed date '{input}': {reason}")]
    MalformedDate { input: String, reason: String },

    #[error("failed to load library ({stage}): {source}")]
    Load {
        stage: &'static str,
        #[source]
        source: Box<ZotsiftError>,
    },

    #[error("item {item_id} references unknown author {author_id}")]
    DanglingAuthorReference { item_id: i64, author_id: i64 },

    #[error("item {item_id} has unexpected field kind {field_id}")]
    UnexpectedFieldKind { item_id: i64, field_id: i64 },

    #[error("malformed row: {0}")]
    MalformedRow(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("host tools blocked: {0}")]
    HostToolsBlocked(String),

    #[error("failed to launch {uri}: {detail}")]
    Launch { uri: String, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl ZotsiftError {
    pub fn malformed_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn load(stage: &'static str, err: Self) -> Self {
        Self::Load {
            stage,
            source: Box::new(err),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedDate { .. } => "MALFORMED_DATE",
            Self::Load { .. } => "LOAD_ERROR",
            Self::DanglingAuthorReference { .. } => "DANGLING_AUTHOR_REFERENCE",
            Self::UnexpectedFieldKind { .. } => "UNEXPECTED_FIELD_KIND",
            Self::MalformedRow(_) => "MALFORMED_ROW",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Config(_) => "CONFIG_ERROR",
            Self::HostToolsBlocked(_) => "HOST_TOOLS_BLOCKED",
            Self::Launch { .. } => "LAUNCH_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Sqlite(_) => "SQLITE_ERROR",
            Self::Toml(_) => "TOML_ERROR",
        }
    }

    /// Innermost error once `Load` wrappers are peeled off.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Load { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
