//! Out-of-process engines launched from a plugin manifest.
//!
//! The command is spawned once per generation. Template text is written to
//! stdin and the host configuration is passed through the environment:
//!
//! - `SPYGLASS_LANGUAGE`: selected language id
//! - `SPYGLASS_DESIGN_TIME`: `"true"` or `"false"`
//!
//! The process prints either `null` (no result) or a JSON `GenerationResult`
//! on stdout and exits 0. Any other exit status is an engine fault.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use spyglass_core::{
    CompilationHost, EngineError, GenerationResult, LanguageDescriptor, TemplateEngine,
};

pub(crate) const LANGUAGE_ENV: &str = "SPYGLASS_LANGUAGE";
pub(crate) const DESIGN_TIME_ENV: &str = "SPYGLASS_DESIGN_TIME";

#[derive(Debug, Clone)]
pub(crate) struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
    languages: Vec<LanguageDescriptor>,
}

impl CommandEngine {
    pub fn new(
        program: PathBuf,
        args: Vec<String>,
        working_dir: PathBuf,
        languages: Vec<LanguageDescriptor>,
    ) -> Self {
        Self {
            program,
            args,
            working_dir,
            languages,
        }
    }

    /// Check that an explicitly located program exists before first use.
    pub fn ensure_available(&self) -> Result<(), EngineError> {
        if self.program.components().count() > 1 && !self.program.is_file() {
            return Err(EngineError::Instantiation(format!(
                "engine command {} not found",
                self.program.display()
            )));
        }
        Ok(())
    }
}

impl TemplateEngine for CommandEngine {
    fn generate(
        &self,
        source: &str,
        host: &CompilationHost,
    ) -> Result<Option<GenerationResult>, EngineError> {
        let language = host.require_supported(&self.languages)?;

        tracing::debug!(
            program = %self.program.display(),
            language = %language.id(),
            "Spawning engine process"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env(LANGUAGE_ENV, language.id())
            .env(DESIGN_TIME_ENV, host.design_time_mode().to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is written concurrently with draining stdout/stderr.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = source.as_bytes().to_vec();
            std::thread::spawn(move || stdin.write_all(&input))
        });

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The engine may legitimately stop reading early.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(EngineError::Io(e)),
                Err(_) => {
                    return Err(EngineError::Generation(
                        "stdin writer thread panicked".to_string(),
                    ))
                }
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Generation(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        serde_json::from_slice::<Option<GenerationResult>>(&output.stdout)
            .map_err(|e| EngineError::Protocol(e.to_string()))
    }
}
