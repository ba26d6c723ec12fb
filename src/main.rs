//! Bullet Hell headless runner
//!
//! Plays one session with a dodging autopilot at a simulated 60 Hz, records
//! the result in a JSON score file and prints the leaderboard.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;

use bullet_hell::highscores::MAX_HIGH_SCORES;
use bullet_hell::persistence::{JsonFileStore, ScoreStore};
use bullet_hell::platform::InputEvent;
use bullet_hell::renderer::DrawList;
use bullet_hell::sim::{GameEvent, GameState, Player};
use bullet_hell::{Game, Millis, Settings, Tuning, Viewport};

/// Simulated display refresh
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Frames the autopilot looks ahead along each shot's path
const LOOKAHEAD_FRAMES: f32 = 8.0;

#[derive(Parser, Debug)]
#[command(name = "bullet-hell", about = "Headless bullet-hell session with an autopilot")]
struct Args {
    /// Settings JSON file
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Tuning JSON file
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// High score file
    #[arg(long, default_value = "highscores.json")]
    scores: PathBuf,
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Name recorded on the leaderboard
    #[arg(long, default_value = "autopilot")]
    name: String,
    /// Stop after this many seconds of survival
    #[arg(long, default_value_t = 300)]
    max_seconds: u64,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("failed to load tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let mut store = JsonFileStore::open(&args.scores)
        .with_context(|| format!("failed to open score file {}", args.scores.display()))?;

    let viewport = Viewport::new(args.width, args.height);
    let mut game = Game::new(viewport, args.seed, settings, tuning);
    game.load_high_scores(&store)?;
    log::info!("Bullet Hell (headless) starting, seed {}", args.seed);

    let score = run_autopilot(&mut game, args.max_seconds);
    println!("Survived {}s", score);

    if game.qualifies(score) {
        let rank = game
            .record_score(&args.name, score, &mut store)
            .context("failed to record score")?;
        println!("New high score! Rank #{}", rank);
    }

    println!("\nHigh scores");
    for (i, entry) in store.top(MAX_HIGH_SCORES)?.iter().enumerate() {
        println!("{:>2}. {:<16} {:>5}s", i + 1, entry.name, entry.score);
    }
    Ok(())
}

/// Play until the player is hit or the time limit passes. Returns the score.
fn run_autopilot(game: &mut Game, max_seconds: u64) -> u64 {
    let mut draw_list = DrawList::new();
    let limit = max_seconds * 1000;
    game.handle(InputEvent::Start, 0);

    let mut frame = 0u64;
    loop {
        frame += 1;
        let now = (frame as f64 * FRAME_MS) as Millis;
        let target = dodge(&game.state);
        game.handle(InputEvent::PointerMoved(target), now);

        for event in game.frame(now, &mut draw_list) {
            match event {
                GameEvent::GameOver { score, .. } => return score,
                GameEvent::Difficulty(change) => log::debug!("{:?}", change),
                _ => {}
            }
        }
        if game.state.settings.total_time >= limit {
            log::info!("Time limit reached");
            return game.state.settings.score();
        }
    }
}

/// Steer away from shots about to pass close by, drifting back home otherwise
fn dodge(state: &GameState) -> Vec2 {
    let vp = state.viewport;
    let player = state.player.body.pos;
    let home = Player::spawn_point(&vp);
    let danger = vp.vh(0.12);

    let mut push = (home - player) * 0.02;
    for shot in state
        .objects
        .radial_projectiles
        .iter()
        .chain(&state.objects.aimed_projectiles)
    {
        let ahead = shot.body.pos + shot.body.vel * LOOKAHEAD_FRAMES;
        let away = player - ahead;
        let dist = away.length();
        if dist < danger {
            push += away.normalize_or_zero() * (danger - dist) * 0.5;
        }
    }

    let margin = Vec2::splat(state.player.body.radius);
    let next = player + push.clamp_length_max(vp.vh(0.02));
    next.clamp(margin, Vec2::new(vp.width, vp.height) - margin)
}
