use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{DEFAULT_CHOMP_PROGRAM, DEFAULT_EXTERNAL_TOOL_ATTEMPTS};
use crate::error::{FilterError, Result};

/// How to invoke the cubical homology tool on a coordinate file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChompConfig {
    /// Executable name or path.
    #[serde(default = "default_program")]
    pub program: String,
    /// Arguments placed before the coordinate file path.
    #[serde(default)]
    pub args: Vec<String>,
    /// Total attempts per file, including the first.
    #[serde(default = "default_attempts")]
    pub attempts: u32,
}

fn default_program() -> String {
    DEFAULT_CHOMP_PROGRAM.to_string()
}
fn default_attempts() -> u32 {
    DEFAULT_EXTERNAL_TOOL_ATTEMPTS
}

impl Default for ChompConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: Vec::new(),
            attempts: DEFAULT_EXTERNAL_TOOL_ATTEMPTS,
        }
    }
}

/// Runs the external tool synchronously, one coordinate file at a time.
#[derive(Clone, Debug)]
pub struct ChompRunner {
    config: ChompConfig,
}

impl ChompRunner {
    pub fn new(config: ChompConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    /// Run `program [args] <coords>` with stdout written to `report`.
    ///
    /// A spawn failure or non-zero exit is retried until the configured
    /// attempts are used up.
    pub fn run(&self, coords: &Path, report: &Path) -> Result<()> {
        let attempts = self.config.attempts.max(1);
        let mut last_reason = String::new();

        for attempt in 1..=attempts {
            match self.run_once(coords, report) {
                Ok(()) => {
                    debug!(program = %self.config.program, attempt, "External tool finished");
                    return Ok(());
                }
                Err(reason) => {
                    warn!(
                        program = %self.config.program,
                        coords = %coords.display(),
                        attempt,
                        %reason,
                        "External tool failed"
                    );
                    last_reason = reason;
                }
            }
        }

        Err(FilterError::ExternalTool {
            program: self.config.program.clone(),
            attempts,
            reason: last_reason,
        })
    }

    fn run_once(&self, coords: &Path, report: &Path) -> std::result::Result<(), String> {
        let out = File::create(report)
            .map_err(|e| format!("cannot create {}: {}", report.display(), e))?;
        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(coords)
            .stdin(Stdio::null())
            .stdout(Stdio::from(out))
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("cannot start: {}", e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("{} ({})", output.status, stderr.trim()))
        }
    }
}
