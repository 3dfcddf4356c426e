#[cfg(feature = "host-tools")]
use std::process::Command;

use crate::config::parse_toggle;

pub const ZOTSIFT_HOST_TOOLS_ENV: &str = "ZOTSIFT_HOST_TOOLS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostToolsMode {
    Enabled,
    Disabled,
}

impl HostToolsMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    Environment,
    Default,
    Explicit,
}

impl PolicySource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "env",
            Self::Default => "default",
            Self::Explicit => "explicit",
        }
    }
}

/// Whether zotsift may spawn processes on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostToolsPolicy {
    pub mode: HostToolsMode,
    pub source: PolicySource,
}

impl HostToolsPolicy {
    #[must_use]
    pub const fn enabled() -> Self {
        Self {
            mode: HostToolsMode::Enabled,
            source: PolicySource::Explicit,
        }
    }

    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            mode: HostToolsMode::Disabled,
            source: PolicySource::Explicit,
        }
    }

    /// Reads `ZOTSIFT_HOST_TOOLS`; unset or unrecognized values keep the
    /// default of enabled.
    #[must_use]
    pub fn from_env() -> Self {
        let raw = std::env::var(ZOTSIFT_HOST_TOOLS_ENV).ok();
        Self::from_env_value(raw.as_deref())
    }

    fn from_env_value(raw: Option<&str>) -> Self {
        match raw.and_then(parse_toggle) {
            Some(true) => Self {
                mode: HostToolsMode::Enabled,
                source: PolicySource::Environment,
            },
            Some(false) => Self {
                mode: HostToolsMode::Disabled,
                source: PolicySource::Environment,
            },
            None => Self {
                mode: HostToolsMode::Enabled,
                source: PolicySource::Default,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCommandSpec<'a> {
    pub operation: &'a str,
    pub program: &'a str,
    pub args: &'a [String],
}

impl<'a> HostCommandSpec<'a> {
    #[must_use]
    pub const fn new(operation: &'a str, program: &'a str, args: &'a [String]) -> Self {
        Self {
            operation,
            program,
            args,
        }
    }
}

#[cfg_attr(
    not(feature = "host-tools"),
    allow(
        dead_code,
        reason = "result shape stays stable across feature profiles"
    )
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommandResult {
    Blocked {
        reason: String,
    },
    SpawnError {
        error: String,
    },
    Completed {
        success: bool,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

#[must_use]
pub fn run_host_command(spec: HostCommandSpec<'_>, policy: HostToolsPolicy) -> HostCommandResult {
    if policy.mode == HostToolsMode::Disabled {
        return HostCommandResult::Blocked {
            reason: format!(
                "operation={} mode={} source={} (set {ZOTSIFT_HOST_TOOLS_ENV}=on to allow)",
                spec.operation,
                policy.mode.as_str(),
                policy.source.as_str(),
            ),
        };
    }

    #[cfg(feature = "host-tools")]
    {
        match Command::new(spec.program).args(spec.args).output() {
            Ok(output) => HostCommandResult::Completed {
                success: output.status.success(),
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            },
            Err(err) => HostCommandResult::SpawnError {
                error: err.to_string(),
            },
        }
    }

    #[cfg(not(feature = "host-tools"))]
    {
        HostCommandResult::Blocked {
            reason: format!(
                "operation={} feature=host-tools (rebuild zotsift-core with `host-tools`)",
                spec.operation
            ),
        }
    }
}
