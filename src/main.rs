/// Entry point and game loop.
///
/// Screen flow: Title → Playing → (next level …) → Result → Title.
/// R restarts the current level with the score it started with. ESC on
/// the title screen or Ctrl+C anywhere quits; the terminal is
/// restored on every exit path that returns normally.

mod logging;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use tracing::{error, info};

use girder::config::GameConfig;
use girder::domain::player::FrameInput;
use girder::sim::campaign::{Advance, Campaign};
use girder::sim::level::load_levels;
use girder::sim::step::step;
use girder::sim::world::WorldState;
use ui::gamepad::{self, GamepadState};
use ui::input::InputState;
use ui::renderer::{Renderer, View};
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Ticks the final frame of a level stays on screen before moving on.
const OUTRO_TICKS: u32 = 90;

const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_ESC: &[KeyCode] = &[KeyCode::Esc];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];

enum Screen {
    Title { selected: usize },
    Playing { world: WorldState, outro: u32 },
    Result { won: bool, score: u32, seconds_left: u32 },
}

fn main() {
    let _log_guard = logging::init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "girder starting");

    let config = GameConfig::load();
    let levels = load_levels(&config.levels_file);
    let mut campaign = match Campaign::new(levels, config.tuning.clone()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "no playable levels");
            eprintln!("No playable levels: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    let result = game_loop(&mut campaign, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        error!(error = %e, "game loop failed");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Girder: Barrel Panic!");
}

fn game_loop(
    campaign: &mut Campaign,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);

    let level_names: Vec<String> = campaign.level_names().map(str::to_owned).collect();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut last_tick = Instant::now();
    let mut screen = Screen::Title { selected: 0 };

    // Edge-triggered actions seen between two ticks
    let mut latched = FrameInput::default();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let confirm = kb.any_pressed(KEYS_CONFIRM) || gp.confirm_pressed();
        let cancel = kb.any_pressed(KEYS_ESC) || gp.cancel_pressed();

        match &mut screen {
            Screen::Title { selected } => {
                if cancel { break; }
                if kb.any_pressed(KEYS_UP) {
                    *selected = selected.saturating_sub(1);
                }
                if kb.any_pressed(KEYS_DOWN) {
                    *selected = (*selected + 1).min(level_names.len().saturating_sub(1));
                }
                if let Some(n) = digit_pressed(&kb).filter(|&n| n < level_names.len()) {
                    *selected = n;
                }
                if confirm {
                    let world = campaign.start(*selected);
                    latched = FrameInput::default();
                    screen = Screen::Playing { world, outro: 0 };
                    last_tick = Instant::now();
                }
            }

            Screen::Playing { world, outro } => {
                if cancel {
                    info!(level = %world.level_name, score = world.score(), "abandoned level");
                    screen = Screen::Title { selected: campaign.current_index() };
                } else if kb.any_pressed(KEYS_RESTART) {
                    info!(level = %world.level_name, "level restarted");
                    *world = campaign.restart();
                    *outro = 0;
                    latched = FrameInput::default();
                } else {
                    let sampled = gamepad::merge(kb.frame_input(), gp.frame_input());
                    latched.jump |= sampled.jump;
                    latched.fire |= sampled.fire;

                    if last_tick.elapsed() >= tick_rate {
                        last_tick = Instant::now();
                        let input = FrameInput { jump: latched.jump, fire: latched.fire, ..sampled };
                        latched = FrameInput::default();

                        if !world.is_finished() {
                            let events = step(world, input);
                            if let Some(sfx) = sound {
                                sfx.play_events(&events);
                            }
                        } else {
                            *outro += 1;
                            if *outro >= OUTRO_TICKS {
                                screen = match campaign.advance(world) {
                                    Advance::NextLevel(next) => Screen::Playing { world: next, outro: 0 },
                                    Advance::Finished { won, score, seconds_left } => {
                                        Screen::Result { won, score, seconds_left }
                                    }
                                };
                            }
                        }
                    }
                }
            }

            Screen::Result { .. } => {
                if cancel { break; }
                if confirm {
                    screen = Screen::Title { selected: 0 };
                }
            }
        }

        let view = match &screen {
            Screen::Title { selected } => View::Title { level_names: &level_names, selected: *selected },
            Screen::Playing { world, .. } => View::Playing(world),
            Screen::Result { won, score, seconds_left } => View::Result {
                won: *won,
                score: *score,
                seconds_left: *seconds_left,
            },
        };
        renderer.render(&view)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// `1`..`9` on the title screen, as a zero-based level index.
fn digit_pressed(kb: &InputState) -> Option<usize> {
    ('1'..='9')
        .position(|c| kb.was_pressed(KeyCode::Char(c)))
}
