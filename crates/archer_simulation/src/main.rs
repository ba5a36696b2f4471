//! Headless симуляция Archer
//!
//! Крутит App без рендера: либо скрипт клавиш (`--keys "jjjc"`), либо autoplay
//! (Fire каждый раз, когда снаряда нет). HUD печатается в лог.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bevy::ecs::event::Events;
use clap::Parser;

use archer_simulation::{
    create_game_app, log_info, log_warning, set_log_level, GameConfig, LogLevel, MaterialHandle, PlayerAction,
    RenderQueue, RenderSink, RoundResolved, RoundState, SessionEnded, ShotOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "archer_simulation", about = "Headless archer vs target simulation")]
struct Args {
    /// RON конфиг игры
    #[arg(long, default_value = "assets/config/game.ron")]
    config: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Сколько кадров симулировать
    #[arg(long, default_value_t = 3600)]
    frames: u32,

    /// Скрипт клавиш, по одной на кадр (c j l u o q w; любой другой символ = пустой кадр)
    #[arg(long)]
    keys: Option<String>,

    /// HUD каждые N кадров
    #[arg(long, default_value_t = 120)]
    hud_every: u32,

    /// Debug лог (траектория снаряда каждый тик)
    #[arg(long)]
    verbose: bool,
}

/// RenderSink для консоли: считает draw calls по материалам
#[derive(Default)]
struct ConsoleRenderSink {
    draws: BTreeMap<&'static str, usize>,
}

impl RenderSink for ConsoleRenderSink {
    fn draw_primitive(&mut self, _transform: &bevy::math::Mat4, material: MaterialHandle) {
        *self.draws.entry(material.color_hex()).or_default() += 1;
    }
}

fn main() {
    let args = Args::parse();
    set_log_level(if args.verbose { LogLevel::Debug } else { LogLevel::Info });

    let (config, fallback) = GameConfig::load_or_default(&args.config);
    let mut app = create_game_app(args.seed, config);
    if let Some(err) = fallback {
        log_warning(&format!("Config fallback to defaults: {}", err));
    }

    log_info(&format!(
        "Starting Archer headless simulation (seed: {}, frames: {})",
        args.seed, args.frames
    ));

    let script: Vec<PlayerAction> = args
        .keys
        .as_deref()
        .map(|keys| keys.chars().filter_map(PlayerAction::from_key).collect())
        .unwrap_or_default();
    let autoplay = args.keys.is_none();

    let mut resolved_cursor = app.world().resource::<Events<RoundResolved>>().get_cursor();
    let mut ended_cursor = app.world().resource::<Events<SessionEnded>>().get_cursor();
    let (mut hits, mut misses, mut games) = (0u32, 0u32, 0u32);

    for frame in 0..args.frames {
        if autoplay {
            let aiming = app
                .world()
                .get_resource::<RoundState>()
                .is_some_and(|state| state.can_fire());
            if aiming {
                app.world_mut().send_event(PlayerAction::Fire);
            }
        } else if let Some(action) = script.get(frame as usize) {
            app.world_mut().send_event(*action);
        }

        app.update();

        let world = app.world();
        for resolved in resolved_cursor.read(world.resource::<Events<RoundResolved>>()) {
            match resolved.outcome {
                ShotOutcome::Hit => hits += 1,
                ShotOutcome::Miss => misses += 1,
            }
        }
        games += ended_cursor.read(world.resource::<Events<SessionEnded>>()).count() as u32;

        if args.hud_every > 0 && frame % args.hud_every == 0 {
            let mut sink = ConsoleRenderSink::default();
            world.resource::<RenderQueue>().submit(&mut sink);

            if let Some(state) = world.get_resource::<RoundState>() {
                log_info(&format!("Frame {}: {} | draws {:?}", frame, state.hud(), sink.draws));
            }
        }
    }

    let high_score = app
        .world()
        .get_resource::<RoundState>()
        .map(|state| state.high_score)
        .unwrap_or_default();
    log_info(&format!(
        "Simulation complete: {} hits, {} misses, {} games over, high score {}",
        hits, misses, games, high_score
    ));
}
