//! Markdown to HTML renderers

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use crate::config::{RendererBackend, RendererConfig};
use crate::error::RenderError;

use super::MarkdownRenderer;

/// Turns one markdown document into an HTML fragment
pub trait HtmlRenderer: Send + Sync {
    /// Render markdown text to HTML
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// Build the renderer selected in the config
pub fn from_config(config: &RendererConfig) -> Box<dyn HtmlRenderer> {
    match config.backend {
        RendererBackend::Pandoc => Box::new(CommandRenderer::new(&config.command, &config.args)),
        RendererBackend::Builtin => Box::new(MarkdownRenderer::new()),
    }
}

/// Runs an external converter, markdown on stdin and HTML on stdout
pub struct CommandRenderer {
    program: String,
    args: Vec<String>,
}

impl CommandRenderer {
    /// Create a renderer for a program and its arguments
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            program: program.to_string(),
            args: args.to_vec(),
        }
    }

    /// `pandoc -f markdown -t html`
    pub fn pandoc() -> Self {
        let config = RendererConfig::default();
        Self::new(&config.command, &config.args)
    }

    fn unavailable(&self, source: std::io::Error) -> RenderError {
        RenderError::Unavailable {
            program: self.program.clone(),
            source,
        }
    }
}

impl HtmlRenderer for CommandRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(e))?;

        // Feed stdin from its own thread; a streaming converter fills
        // stdout before it has read all of its input.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = markdown.as_bytes().to_vec();
            let program = self.program.clone();
            thread::spawn(move || {
                // A converter that exits early closes its end of the pipe;
                // its exit status carries the real error.
                if let Err(e) = stdin.write_all(&input) {
                    tracing::debug!("{} closed stdin early: {}", program, e);
                }
            })
        });

        let output = child.wait_with_output().map_err(|e| self.unavailable(e))?;
        if let Some(writer) = writer {
            if writer.join().is_err() {
                tracing::debug!("stdin writer for {} panicked", self.program);
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(RenderError::Failed(message));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RenderError::Failed(format!("{} produced invalid UTF-8: {}", self.program, e)))
    }
}
