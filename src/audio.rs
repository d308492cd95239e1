//! Sound-effect cues.
//!
//! Cues are played by an external command (`afplay`, `mpg123`, `paplay`,
//! ...) given as `KBC_AUDIO_PLAYER`. The player owns the handle of the cue
//! that is currently sounding: starting a new cue replaces it and `stop()`
//! silences it. Failures are logged and never interrupt the game.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::{Child, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Lock,
    Correct,
    Wrong,
}

impl AudioCue {
    pub fn name(self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Correct => "correct",
            Self::Wrong => "wrong",
        }
    }
}

pub trait AudioPlayer: Send {
    fn play(&mut self, cue: AudioCue);

    fn stop(&mut self);
}

/// Logs cues without making a sound.
#[derive(Debug, Default)]
pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play(&mut self, cue: AudioCue) {
        tracing::debug!(cue = cue.name(), "audio cue (silent)");
    }

    fn stop(&mut self) {}
}

/// Plays `<dir>/<cue>.mp3` through an external program.
#[derive(Debug)]
pub struct CommandPlayer {
    program: String,
    dir: PathBuf,
    current: Option<Child>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dir: dir.into(),
            current: None,
        }
    }

    pub fn cue_path(&self, cue: AudioCue) -> PathBuf {
        self.dir.join(format!("{}.mp3", cue.name()))
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&mut self, cue: AudioCue) {
        self.stop();

        let path = self.cue_path(cue);
        if !path.exists() {
            tracing::warn!(path = %path.display(), "audio file missing");
            return;
        }

        match Command::new(&self.program)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => {
                tracing::debug!(cue = cue.name(), "playing audio cue");
                self.current = Some(child);
            }
            Err(err) => {
                tracing::warn!(program = %self.program, error = %err, "audio playback failed");
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Err(err) = child.start_kill() {
                tracing::debug!(error = %err, "audio process already finished");
            }
            // Dropping the handle leaves reaping to the runtime.
            if let Ok(Some(status)) = child.try_wait() {
                tracing::debug!(%status, "audio process exited");
            }
        }
    }
}

impl Drop for CommandPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_paths() {
        let player = CommandPlayer::new("true", "/srv/audio");
        assert_eq!(
            player.cue_path(AudioCue::Lock),
            PathBuf::from("/srv/audio/lock.mp3")
        );
        assert_eq!(
            player.cue_path(AudioCue::Wrong),
            PathBuf::from("/srv/audio/wrong.mp3")
        );
    }

    #[tokio::test]
    async fn test_missing_file_does_not_start_a_process() {
        let dir = std::env::temp_dir().join(format!("kbc-audio-{}", uuid::Uuid::new_v4()));
        let mut player = CommandPlayer::new("true", &dir);
        player.play(AudioCue::Correct);
        assert!(player.current.is_none());
        player.stop();
    }

    #[tokio::test]
    async fn test_unknown_program_is_not_fatal() {
        let dir = std::env::temp_dir().join(format!("kbc-audio-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("lock.mp3"), b"").unwrap();

        let mut player = CommandPlayer::new("kbc-no-such-player-binary", &dir);
        player.play(AudioCue::Lock);
        assert!(player.current.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stop_silences_a_running_cue() {
        let dir = std::env::temp_dir().join(format!("kbc-audio-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("lock.mp3"), b"sleep 30\n").unwrap();

        let mut player = CommandPlayer::new("sh", &dir);
        player.play(AudioCue::Lock);
        assert!(player.current.is_some());

        let started = std::time::Instant::now();
        player.stop();
        assert!(player.current.is_none());
        assert!(started.elapsed() < std::time::Duration::from_secs(5));

        std::fs::remove_dir_all(&dir).ok();
    }
}
