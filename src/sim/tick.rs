//! Per-tick orchestration
//!
//! One call per display refresh. The mode state machine gates whether
//! anything simulates; while playing the flow is fixed: input, physics,
//! world scroll, spawners, entity kinematics, collision resolution, score,
//! terminal checks.

use crate::consts::*;

use super::collide;
use super::physics;
use super::spawn;
use super::state::{GamePhase, TimeScale, World};

/// Held actions and one-shot events for a single tick. Edge detection for
/// the one-shots (pause, restart, start, speed select) happens in the input
/// collaborator; the host clears them after every tick.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub down: bool,
    /// Start the run from the title screen
    pub start: bool,
    /// Toggle pause
    pub pause: bool,
    /// Full reset into a fresh run, honored from any mode
    pub restart: bool,
    /// Select the simulation speed multiplier
    pub select_scale: Option<TimeScale>,
}

/// Advance the world by one frame of real time.
///
/// The raw delta is clamped to `MAX_FRAME_DT` first (a stall is never a
/// time jump), then scaled by the selected multiplier while playing and
/// clamped again to `MAX_SIM_DT`, bounding the physics step regardless of
/// display hiccups or multiplier choice.
pub fn tick(world: &mut World, input: &TickInput, real_dt: f32) {
    let frame_dt = real_dt.clamp(0.0, MAX_FRAME_DT);

    if let Some(scale) = input.select_scale {
        world.set_time_scale(scale);
    }

    if input.restart {
        world.restart();
    } else {
        match world.phase {
            GamePhase::Title => {
                if input.start {
                    world.start_run();
                }
            }
            GamePhase::Playing => {
                if input.pause {
                    world.phase = GamePhase::Paused;
                }
            }
            GamePhase::Paused => {
                if input.pause {
                    world.phase = GamePhase::Playing;
                }
            }
            GamePhase::GameOver => {}
        }
    }

    // Health-bar smoothing and shake decay keep running in every mode
    world.smooth_display(frame_dt);
    world.shake *= crate::decay_factor(SHAKE_DECAY, frame_dt);
    if world.shake < 0.01 {
        world.shake = 0.0;
    }

    if world.phase != GamePhase::Playing {
        return;
    }

    let dt = (frame_dt * world.time_scale.factor()).min(MAX_SIM_DT);

    world.play_time += dt;
    world.difficulty = (world.play_time / DIFFICULTY_RAMP_SECS).min(1.0);
    let speed = world.scroll_speed();

    physics::step_player(world, input, dt);
    world.scroll_x += speed * dt;
    spawn::run_spawners(world, dt);
    world.advance_entities(dt, speed);
    collide::resolve(world);

    world.score += (speed * dt) as f64 * SCORE_RATE;

    // Safety net: falling out of the world ends the run like losing the
    // last heart would
    if world.player.pos.y > VIEW_H + FALL_OUT_MARGIN {
        log::warn!("player fell out of bounds, ending run");
        world.game_over();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameEvent;

    const DT: f32 = 1.0 / 60.0;

    fn started_world(seed: u64) -> World {
        let mut world = World::new(seed);
        let start = TickInput {
            start: true,
            ..TickInput::default()
        };
        tick(&mut world, &start, DT);
        world
    }

    #[test]
    fn test_title_freezes_simulation() {
        let mut world = World::new(1);
        let before = world.player.pos;
        for _ in 0..60 {
            tick(&mut world, &TickInput::default(), DT);
        }
        assert_eq!(world.phase, GamePhase::Title);
        assert_eq!(world.player.pos, before);
        assert_eq!(world.play_time, 0.0);
        assert_eq!(world.scroll_x, 0.0);
    }

    #[test]
    fn test_start_action_begins_the_run() {
        let mut world = World::new(1);
        let start = TickInput {
            start: true,
            ..TickInput::default()
        };
        tick(&mut world, &start, DT);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.take_events().contains(&GameEvent::RunStart));
        assert!(world.play_time > 0.0);
    }

    #[test]
    fn test_pause_toggles_and_freezes() {
        let mut world = started_world(2);
        for _ in 0..30 {
            tick(&mut world, &TickInput::default(), DT);
        }
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut world, &pause, DT);
        assert_eq!(world.phase, GamePhase::Paused);

        let time = world.play_time;
        let scroll = world.scroll_x;
        let pos = world.player.pos;
        for _ in 0..120 {
            tick(&mut world, &TickInput::default(), DT);
        }
        assert_eq!(world.play_time, time);
        assert_eq!(world.scroll_x, scroll);
        assert_eq!(world.player.pos, pos);

        tick(&mut world, &pause, DT);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut world = started_world(3);
        let time = world.play_time;
        // A five second hitch advances the sim by at most the step ceiling
        tick(&mut world, &TickInput::default(), 5.0);
        assert!(world.play_time - time <= MAX_SIM_DT + 1e-6);
    }

    #[test]
    fn test_fast_scale_hits_the_tighter_ceiling() {
        let mut world = started_world(4);
        world.set_time_scale(TimeScale::Fast);
        let time = world.play_time;
        tick(&mut world, &TickInput::default(), 1.0);
        // MAX_FRAME_DT * 1.25 would exceed MAX_SIM_DT; the clamp holds
        assert!((world.play_time - time - MAX_SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_slow_scale_shrinks_the_step() {
        let mut world = started_world(5);
        world.set_time_scale(TimeScale::Slow);
        let time = world.play_time;
        tick(&mut world, &TickInput::default(), DT);
        assert!((world.play_time - time - DT * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_ramps_monotonically() {
        let mut world = started_world(6);
        let mut last = world.difficulty;
        for _ in 0..600 {
            tick(&mut world, &TickInput::default(), DT);
            assert!(world.difficulty >= last);
            assert!(world.difficulty <= 1.0);
            last = world.difficulty;
        }
        assert!(world.difficulty > 0.0);
    }

    #[test]
    fn test_score_increases_while_playing() {
        let mut world = started_world(7);
        let mut last = world.score;
        for _ in 0..120 {
            tick(&mut world, &TickInput::default(), DT);
            assert!(world.score > last);
            last = world.score;
        }
    }

    #[test]
    fn test_fell_out_of_bounds_ends_the_run() {
        let mut world = started_world(8);
        world.player.pos.y = VIEW_H + FALL_OUT_MARGIN + 10.0;
        world.player.prev_pos = world.player.pos;
        // Keep it below the floor check by clearing support mid-air
        world.player.grounded = false;
        tick(&mut world, &TickInput::default(), DT);
        assert_eq!(world.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_from_pause_and_gameover() {
        let mut world = started_world(9);
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut world, &pause, DT);
        assert_eq!(world.phase, GamePhase::Paused);

        let restart = TickInput {
            restart: true,
            ..TickInput::default()
        };
        tick(&mut world, &restart, DT);
        assert_eq!(world.phase, GamePhase::Playing);
        assert!(world.play_time < 2.0 * DT + 1e-6);

        world.game_over();
        tick(&mut world, &restart, DT);
        assert_eq!(world.phase, GamePhase::Playing);
    }

    #[test]
    fn test_display_health_smooths_while_paused() {
        let mut world = started_world(10);
        world.hearts[0] = 20.0;
        let pause = TickInput {
            pause: true,
            ..TickInput::default()
        };
        tick(&mut world, &pause, DT);

        let before = world.display_hearts[0];
        for _ in 0..60 {
            tick(&mut world, &TickInput::default(), DT);
        }
        assert!(world.display_hearts[0] < before);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = World::new(123);
        let mut b = World::new(123);
        let start = TickInput {
            start: true,
            ..TickInput::default()
        };
        tick(&mut a, &start, DT);
        tick(&mut b, &start, DT);

        let inputs = [
            TickInput::default(),
            TickInput {
                jump: true,
                ..TickInput::default()
            },
            TickInput {
                right: true,
                ..TickInput::default()
            },
        ];
        for i in 0..900 {
            let input = &inputs[i % inputs.len()];
            tick(&mut a, input, DT);
            tick(&mut b, input, DT);
        }

        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.corn, b.corn);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.scroll_x, b.scroll_x);
    }

    #[test]
    fn test_long_run_holds_invariants() {
        let mut world = started_world(42);
        let inputs = [
            TickInput::default(),
            TickInput {
                jump: true,
                ..TickInput::default()
            },
            TickInput {
                down: true,
                ..TickInput::default()
            },
        ];
        for i in 0..3600 {
            let input = &inputs[(i / 17) % inputs.len()];
            tick(&mut world, input, DT);

            for h in world.hearts {
                assert!((0.0..=HEART_HEALTH).contains(&h));
            }
            assert!(world.heart_index < HEARTS_MAX);
            assert!((0.0..=1.0).contains(&world.difficulty));
            assert!(world.fuel >= 0.0 && world.fuel <= FLIGHT_FUEL_MAX);
            // Pools never leak off-screen entities
            for o in &world.obstacles {
                assert!(o.rect().right() > -OFFSCREEN_MARGIN);
            }
            if world.phase == GamePhase::GameOver {
                break;
            }
        }
    }
}
