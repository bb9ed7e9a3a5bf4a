//! External HTML→PDF renderer (e.g. `weasyprint`).
//!
//! Invocation: `<program> [args...] <input.html> <output.pdf>`, run from the
//! upload folder inside a scratch directory that is removed afterwards.
//! The child is killed if the render future is dropped (deadline or client gone).

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::layout::DocumentDescription;
use crate::render::{markup, DocumentRenderer, RenderError};

const INPUT_NAME: &str = "document.html";
const OUTPUT_NAME: &str = "document.pdf";

#[derive(Debug, Clone)]
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parses a whitespace-separated command line such as `"weasyprint -q"`.
    /// Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl DocumentRenderer for CommandRenderer {
    fn media_type(&self) -> &'static str {
        "application/pdf"
    }

    fn file_extension(&self) -> &'static str {
        "pdf"
    }

    async fn render(
        &self,
        document: &DocumentDescription,
        base_dir: &Path,
    ) -> Result<Bytes, RenderError> {
        let scratch = tempfile::tempdir()?;
        let input = scratch.path().join(INPUT_NAME);
        let output = scratch.path().join(OUTPUT_NAME);

        tokio::fs::write(&input, markup::to_html(document)).await?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(&input)
            .arg(&output)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if base_dir.is_dir() {
            command.current_dir(base_dir);
        }

        debug!("Running renderer: {} {:?}", self.program, self.args);

        let result = command.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RenderError::ProgramNotFound(self.program.clone())
            } else {
                RenderError::Io(e)
            }
        })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            warn!(error = %stderr, "{} failed", self.program);
            return Err(RenderError::CommandFailed {
                status: result.status.to_string(),
                stderr,
            });
        }

        match tokio::fs::read(&output).await {
            Ok(bytes) if !bytes.is_empty() => Ok(Bytes::from(bytes)),
            Ok(_) => Err(RenderError::MissingOutput),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(RenderError::MissingOutput),
            Err(e) => Err(RenderError::Io(e)),
        }
    }
}
