//! Command-backed speech-to-text.
//!
//! Runs an external recognizer (e.g. a whisper.cpp wrapper) that records one
//! utterance and prints the transcript on stdout.

use std::path::{Path, PathBuf};

use coach_core::dictation::{BoxDictation, Dictation, DictationError};
use coach_types::config::DictationConfig;

/// Dictation through an external program.
#[derive(Debug, Clone)]
pub struct CommandDictation {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandDictation {
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Dictation for CommandDictation {
    fn is_supported(&self) -> bool {
        true
    }

    async fn listen(&self) -> Result<String, DictationError> {
        tracing::debug!(program = %self.program.display(), "starting dictation");

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DictationError::Launch(format!("{}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DictationError::Failed(if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            }));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(DictationError::NoSpeech);
        }
        Ok(transcript)
    }
}

/// Pick the dictation backend for this environment.
///
/// Returns [`CommandDictation`] when a command is configured and can be found,
/// otherwise the unsupported null object.
pub fn create_dictation(config: Option<&DictationConfig>) -> BoxDictation {
    let Some(config) = config else {
        return BoxDictation::unsupported();
    };

    match find_program(&config.command) {
        Some(program) => BoxDictation::new(CommandDictation::new(program, config.args.clone())),
        None => {
            tracing::warn!(command = %config.command, "dictation command not found, dictation disabled");
            BoxDictation::unsupported()
        }
    }
}

/// Resolve `command` to an existing file, searching `PATH` for bare names.
fn find_program(command: &str) -> Option<PathBuf> {
    let command = command.trim();
    if command.is_empty() {
        return None;
    }

    let candidate = Path::new(command);
    if candidate.components().count() > 1 || candidate.is_absolute() {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(command))
        .find(|full| full.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_config_is_unsupported() {
        assert!(!create_dictation(None).is_supported());
    }

    #[test]
    fn test_missing_command_is_unsupported() {
        let config = DictationConfig {
            command: "definitely-not-a-real-dictation-binary".to_string(),
            args: Vec::new(),
        };
        assert!(!create_dictation(Some(&config)).is_supported());
    }

    #[test]
    fn test_blank_command_is_unsupported() {
        let config = DictationConfig {
            command: "  ".to_string(),
            args: Vec::new(),
        };
        assert!(!create_dictation(Some(&config)).is_supported());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_echo_command_returns_trimmed_transcript() {
        let config = DictationConfig {
            command: "echo".to_string(),
            args: vec!["  use a hash map  ".to_string()],
        };
        let dictation = create_dictation(Some(&config));
        assert!(dictation.is_supported());
        assert_eq!(dictation.listen().await.unwrap(), "use a hash map");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_empty_output_is_no_speech() {
        let dictation = CommandDictation::new(PathBuf::from("true"), Vec::new());
        assert!(matches!(
            dictation.listen().await,
            Err(DictationError::NoSpeech)
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_failed() {
        let dictation = CommandDictation::new(PathBuf::from("false"), Vec::new());
        assert!(matches!(
            dictation.listen().await,
            Err(DictationError::Failed(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dropped_listen_stops_recognizer() {
        let dictation = CommandDictation::new(PathBuf::from("sleep"), vec!["30".to_string()]);
        let started = std::time::Instant::now();
        let stopped =
            tokio::time::timeout(std::time::Duration::from_millis(100), dictation.listen()).await;
        assert!(stopped.is_err());
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unspawnable_program_is_launch_error() {
        let dictation =
            CommandDictation::new(PathBuf::from("/nonexistent/coach-dictation"), Vec::new());
        assert!(matches!(
            dictation.listen().await,
            Err(DictationError::Launch(_))
        ));
    }
}
