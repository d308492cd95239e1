use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::DEFAULT_LOCK_GRACE;
use crate::provider::GeminiConfig;

const DEFAULT_STORE_PATH: &str = ".kbc-quiz/store.json";
const DEFAULT_AUDIO_DIR: &str = "audio";

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` puts the game in fallback-only mode.
    pub gemini: Option<GeminiConfig>,
    pub store_path: PathBuf,
    pub audio_player: Option<String>,
    pub audio_dir: PathBuf,
    pub fetch_lock_grace: Duration,
}

impl Config {
    /// Build the configuration from the process environment, after loading
    /// a `.env` file from the working directory if one exists.
    pub fn from_env() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "ignoring unreadable .env file");
            }
        }

        let gemini = GeminiConfig::from_env();
        if gemini.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set, only bundled questions will be used");
        }

        let store_path = env::var("KBC_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));
        let audio_player = env::var("KBC_AUDIO_PLAYER")
            .ok()
            .filter(|player| !player.trim().is_empty());
        let audio_dir = env::var("KBC_AUDIO_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_AUDIO_DIR));
        let fetch_lock_grace = env::var("KBC_FETCH_LOCK_GRACE_MS")
            .ok()
            .and_then(|ms| ms.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOCK_GRACE);

        Self {
            gemini,
            store_path,
            audio_player,
            audio_dir,
            fetch_lock_grace,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            audio_player: None,
            audio_dir: PathBuf::from(DEFAULT_AUDIO_DIR),
            fetch_lock_grace: DEFAULT_LOCK_GRACE,
        }
    }
}
