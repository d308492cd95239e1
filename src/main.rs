use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use clap::Parser;
use kbc_quiz::{
    AcquisitionPipeline, AudioPlayer, CommandPlayer, Config, FallbackSet, FileStore, Game,
    GameError, GeminiProvider, OfflineProvider, QuestionCache, QuestionProvider, SilentPlayer,
    SystemClock, load_fallback_from_json,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file holding the local question cache
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// JSON file with replacement fallback questions
    #[arg(short, long)]
    fallback: Option<PathBuf>,

    /// Where to write logs (the terminal belongs to the game)
    #[arg(long, default_value = "kbc-quiz.log")]
    log_file: PathBuf,

    /// Never call the question API, even if a key is configured
    #[arg(long)]
    offline: bool,

    /// Remove every cached question and exit
    #[arg(long)]
    clear_cache: bool,

    /// Print what is cached and exit
    #[arg(long)]
    cache_stats: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_file);

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "game exited with an error");
        eprintln!("Error running game: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(path: &Path) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kbc_quiz=info"));

    match File::create(path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init(),
        Err(e) => eprintln!("Logging disabled, cannot open {}: {}", path.display(), e),
    }
}

async fn run(args: Args) -> Result<(), GameError> {
    let config = Config::from_env();
    tracing::info!("starting kbc-quiz");

    let store_path = args.store.unwrap_or(config.store_path.clone());
    let store = FileStore::open(&store_path)?;
    let cache = QuestionCache::new(Box::new(store), Arc::new(SystemClock));

    if args.clear_cache || args.cache_stats {
        return maintenance(cache, args.clear_cache);
    }

    let fallback = match &args.fallback {
        Some(path) => load_fallback_from_json(path)?,
        None => FallbackSet::builtin(),
    };

    let provider: Arc<dyn QuestionProvider> = match config.gemini.clone() {
        Some(gemini) if !args.offline => Arc::new(GeminiProvider::new(Some(gemini))),
        _ => {
            tracing::info!("running with bundled questions only");
            Arc::new(OfflineProvider)
        }
    };

    let audio: Box<dyn AudioPlayer> = match &config.audio_player {
        Some(program) => Box::new(CommandPlayer::new(program, &config.audio_dir)),
        None => Box::new(SilentPlayer),
    };

    let pipeline = AcquisitionPipeline::new(cache, provider, fallback)
        .with_lock_grace(config.fetch_lock_grace);

    Game::new(pipeline, audio).run().await
}

fn maintenance(mut cache: QuestionCache, clear: bool) -> Result<(), GameError> {
    if clear {
        cache.clear_all();
        cache.clear_quota_status();
        println!("Question cache cleared");
        return Ok(());
    }

    let stats = cache.stats();
    println!("{} cached question(s)", stats.total_cached);
    for level in &stats.levels {
        println!(
            "  level {:>2}  cached {}  expires {}{}",
            level.level,
            level.cached_at.format("%Y-%m-%d %H:%M"),
            level.expires_at.format("%Y-%m-%d %H:%M"),
            if level.is_expired { "  (expired)" } else { "" }
        );
    }
    match stats.quota_reset_at {
        Some(reset_at) => println!("API quota exhausted until {}", reset_at.format("%Y-%m-%d %H:%M")),
        None => println!("API quota available"),
    }
    Ok(())
}
