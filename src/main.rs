//! Lane Dash headless runner
//!
//! Plays one session with a simple autopilot at 60 Hz and prints the run
//! summary as JSON.
//!
//! Usage: `lane-dash [tuning.json] [seed]`

#![cfg_attr(target_arch = "wasm32", allow(dead_code, unused_imports))]

use lane_dash::sim::{EntityKind, ObstacleKind, World};
use lane_dash::{InputKind, Lane, Session, SessionListener, Tuning};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Simulated seconds before the demo gives up
const TIME_LIMIT: f32 = 300.0;
/// How far ahead (in seconds of travel) the autopilot reacts
const REACTION_TIME: f32 = 0.35;

/// Logs milestones as they happen
struct ConsoleListener;

impl SessionListener for ConsoleListener {
    fn on_power_up_activated(&mut self, kind: lane_dash::sim::PowerUpKind) {
        log::info!("Picked up {}", kind.as_str());
    }

    fn on_difficulty_changed(&mut self, level: u32, speed: f32) {
        log::info!("Level {} (speed {:.1})", level, speed);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `Session` directly; nothing to run headless
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    log::info!("Lane Dash (headless) starting, seed {}", seed);
    let mut session = Session::new(tuning, seed);
    session.add_listener(Box::new(ConsoleListener));
    if let Err(e) = session.start_session() {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let mut elapsed = 0.0;
    while session.world().game_over.is_none() && elapsed < TIME_LIMIT {
        if let Some(input) = autopilot(session.world(), session.tuning()) {
            session.on_directional_input(input);
        }
        session.on_tick(FRAME_DT);
        elapsed += FRAME_DT;
    }
    // Let the death sequence play out
    let mut tail = 0.0;
    while session.world().game_over.is_some() && tail < 3.0 {
        session.on_tick(FRAME_DT);
        tail += FRAME_DT;
    }

    let snapshot = session.snapshot();
    let report = serde_json::json!({
        "seed": seed,
        "phase": snapshot.phase,
        "score": snapshot.score,
        "distance": snapshot.distance,
        "level": snapshot.difficulty_level,
        "summary": snapshot.summary,
    });
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize run summary: {}", e),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json_str(&json)?)
}

/// Pick an evasive move for the nearest obstacle in the actor's lane
fn autopilot(world: &World, tuning: &Tuning) -> Option<InputKind> {
    let actor = &world.actor;
    let lane = actor.lane();
    let reach = world.game_speed() * REACTION_TIME + 2.0;

    let threat = world
        .spawner
        .obstacles
        .iter()
        .filter(|o| o.alive)
        .filter(|o| (o.position().x - lane.x(tuning.lane_width)).abs() < 0.5)
        .filter(|o| {
            let z = o.position().z;
            z < 0.0 && z > -reach
        })
        .max_by(|a, b| a.position().z.total_cmp(&b.position().z))?;

    match threat.kind {
        EntityKind::Obstacle(ObstacleKind::Barrier) => Some(InputKind::RollOrCrouch),
        EntityKind::Obstacle(ObstacleKind::Barrel) => Some(InputKind::Jump),
        EntityKind::Obstacle(ObstacleKind::Wall) => {
            let free = |candidate: Lane| {
                !world.spawner.obstacles.iter().any(|o| {
                    o.alive
                        && (o.position().x - candidate.x(tuning.lane_width)).abs() < 0.5
                        && o.position().z > -reach * 1.5
                        && o.position().z < 3.0
                })
            };
            [lane.offset(-1), lane.offset(1)]
                .into_iter()
                .find(|&c| c != lane && free(c))
                .map(|c| {
                    if c < lane {
                        InputKind::StrafeLeft
                    } else {
                        InputKind::StrafeRight
                    }
                })
        }
        _ => None,
    }
}
