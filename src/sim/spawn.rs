//! Procedural course generation
//!
//! Three independently clocked generators inject entities ahead of the
//! visible frame: obstacle runs, platform/stair terrain, and floor eggs.
//! Each keeps its own countdown and re-enters within a tick through a
//! bounded catch-up loop, never recursion. All randomness comes from the
//! world's injected `Pcg32`, so courses are reproducible from the seed.
//!
//! The fairness contract lives in `landing_gap`: between obstacle runs the
//! spacing is derived from the kinematic jump-travel distance at the current
//! scroll speed plus a reaction buffer, so the course is always clearable.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::lerp;

use super::state::{Obstacle, ObstacleKind, Pickup, Platform, PlatformKind, World};

/// Cadence interval bounds (seconds) at difficulty 0 and 1
const OBSTACLE_CADENCE_MAX: f32 = 1.15;
const OBSTACLE_CADENCE_MIN: f32 = 0.55;
const TERRAIN_CADENCE_MAX: f32 = 2.4;
const TERRAIN_CADENCE_MIN: f32 = 1.6;
const EGG_CADENCE_MAX: f32 = 1.7;
const EGG_CADENCE_MIN: f32 = 1.05;
/// Jitter added to every re-arm so cadences never feel metronomic
const CADENCE_JITTER: f32 = 0.25;
/// Flat egg probability per cadence tick during breaks
const EGG_CHANCE: f64 = 0.35;
/// Terrain spacing at base speed: looser lead-in, tighter interior
const TERRAIN_LEAD_GAP: f32 = 150.0;
const TERRAIN_CHUNK_GAP: f32 = 70.0;

/// Horizontal distance covered during a full jump arc at the given speed:
/// airtime `2*|v_jump|/g` times scroll speed
pub fn jump_travel_distance(speed: f32) -> f32 {
    speed * (2.0 * JUMP_VELOCITY.abs() / GRAVITY)
}

/// Minimum spacing owed between obstacle runs. The reaction buffer tightens
/// with difficulty but keeps a strictly positive floor, so the kinematic
/// clearability bound holds at every difficulty.
pub fn landing_gap(speed: f32, difficulty: f32) -> f32 {
    jump_travel_distance(speed) + lerp(REACTION_BUFFER_MAX, REACTION_BUFFER_MIN, difficulty)
}

/// Spacing between chunks inside a run (no full landing required)
pub fn chunk_gap(difficulty: f32) -> f32 {
    lerp(CHUNK_GAP_MAX, CHUNK_GAP_MIN, difficulty)
}

/// Per-generator cadence and layout bookkeeping. Mutated only by the
/// spawner; anchors are view-space x positions and scroll with the world.
#[derive(Debug, Clone)]
pub struct SpawnState {
    pub obstacle_timer: f32,
    pub terrain_timer: f32,
    pub egg_timer: f32,
    /// Chunks still owed in the current obstacle run
    pub chunks_left: u32,
    /// The next obstacle gap must be a full landing gap
    pub owe_landing_gap: bool,
    /// Right edge of the most recent obstacle
    pub last_obstacle_end: f32,
    /// Terrain level: 0 = floor, 1 = plateau
    pub terrain_level: u32,
    /// Segments still owed in the current terrain run
    pub segments_left: u32,
    /// Segments emitted so far in this terrain run
    pub segments_done: u32,
    /// Right edge of the most recent terrain piece
    pub last_terrain_end: f32,
    /// Right edge of the most recent threat of any kind (egg spacing)
    pub last_threat_end: f32,
}

impl SpawnState {
    pub fn new() -> Self {
        Self {
            // Staggered so the three generators never fire in lockstep
            obstacle_timer: 0.9,
            terrain_timer: 2.2,
            egg_timer: 1.5,
            chunks_left: 0,
            // A fresh course owes the player room before the first threat
            owe_landing_gap: true,
            last_obstacle_end: 0.0,
            terrain_level: 0,
            segments_left: 0,
            segments_done: 0,
            last_terrain_end: 0.0,
            last_threat_end: 0.0,
        }
    }

    /// Shift all anchors left with the world scroll
    pub fn scroll(&mut self, dx: f32) {
        self.last_obstacle_end -= dx;
        self.last_terrain_end -= dx;
        self.last_threat_end -= dx;
    }

    /// A "break": no obstacle run in progress and the owed landing gap has
    /// already cleared the spawn edge. Terrain and eggs only appear here.
    pub fn in_break(&self, spawn_edge: f32, speed: f32, difficulty: f32) -> bool {
        self.chunks_left == 0 && spawn_edge >= self.last_obstacle_end + landing_gap(speed, difficulty)
    }
}

impl Default for SpawnState {
    fn default() -> Self {
        Self::new()
    }
}

/// Run all three generators for one tick. Each counts down by `dt` and
/// catches up at most `SPAWN_CATCHUP_MAX` times, so accumulated cadence debt
/// never floods a single tick.
pub fn run_spawners(world: &mut World, dt: f32) {
    let speed = world.scroll_speed();
    let difficulty = world.difficulty;
    let spawn_edge = VIEW_W + SPAWN_MARGIN;

    world.spawn.obstacle_timer -= dt;
    let mut iters = 0;
    while world.spawn.obstacle_timer <= 0.0 && iters < SPAWN_CATCHUP_MAX {
        spawn_obstacle_chunk(world, spawn_edge, speed, difficulty);
        let interval = lerp(OBSTACLE_CADENCE_MAX, OBSTACLE_CADENCE_MIN, difficulty);
        let jitter = world.rng.random_range(-CADENCE_JITTER..CADENCE_JITTER);
        world.spawn.obstacle_timer += (interval + jitter).max(0.2);
        iters += 1;
    }

    world.spawn.terrain_timer -= dt;
    let mut iters = 0;
    while world.spawn.terrain_timer <= 0.0 && iters < SPAWN_CATCHUP_MAX {
        spawn_terrain_segment(world, spawn_edge, speed, difficulty);
        let interval = lerp(TERRAIN_CADENCE_MAX, TERRAIN_CADENCE_MIN, difficulty);
        let jitter = world.rng.random_range(-CADENCE_JITTER..CADENCE_JITTER);
        world.spawn.terrain_timer += (interval + jitter).max(0.3);
        iters += 1;
    }

    world.spawn.egg_timer -= dt;
    let mut iters = 0;
    while world.spawn.egg_timer <= 0.0 && iters < SPAWN_CATCHUP_MAX {
        spawn_egg(world, spawn_edge, speed, difficulty);
        let interval = lerp(EGG_CADENCE_MAX, EGG_CADENCE_MIN, difficulty);
        let jitter = world.rng.random_range(-CADENCE_JITTER..CADENCE_JITTER);
        world.spawn.egg_timer += (interval + jitter).max(0.3);
        iters += 1;
    }
}

/// One obstacle cadence tick: maybe start a run, then emit a chunk of 1-2
/// adjacent obstacles with fairness spacing, plus trailing corn.
fn spawn_obstacle_chunk(world: &mut World, spawn_edge: f32, speed: f32, difficulty: f32) {
    if world.spawn.chunks_left == 0 {
        let p_run = lerp(0.55, 0.85, difficulty) as f64;
        if !world.rng.random_bool(p_run) {
            return;
        }
        let max_extra = 1 + (difficulty * 2.0) as u32;
        world.spawn.chunks_left = 1 + world.rng.random_range(0..=max_extra);
        log::debug!(
            "obstacle run: {} chunks at difficulty {:.2}",
            world.spawn.chunks_left,
            difficulty
        );
    }

    let gap = if world.spawn.owe_landing_gap {
        landing_gap(speed, difficulty)
    } else {
        chunk_gap(difficulty)
    };
    let x = (world.spawn.last_obstacle_end + gap).max(spawn_edge);

    // Chunk size 2 only appears past very low difficulty; big variant rarely
    // at high difficulty
    let pair = difficulty > 0.15 && world.rng.random_bool(lerp(0.0, 0.55, difficulty) as f64);
    let big = difficulty > 0.5 && world.rng.random_bool((0.12 * difficulty) as f64);
    let kind = if big {
        ObstacleKind::Big
    } else {
        match world.rng.random_range(0..3) {
            0 => ObstacleKind::Crate,
            1 => ObstacleKind::Rock,
            _ => ObstacleKind::Stump,
        }
    };
    let size = kind.size();

    let count = if pair { 2 } else { 1 };
    let mut end = x;
    for i in 0..count {
        let id = world.next_entity_id();
        let bob_phase = world.rng.random_range(0.0..std::f32::consts::TAU);
        let pos = Vec2::new(x + i as f32 * size.x, FLOOR_Y - size.y);
        end = pos.x + size.x;
        world.obstacles.push(Obstacle {
            id,
            pos,
            kind,
            bob_phase,
        });
    }

    world.spawn.last_obstacle_end = end;
    world.spawn.last_threat_end = world.spawn.last_threat_end.max(end);
    world.spawn.chunks_left -= 1;
    world.spawn.owe_landing_gap = world.spawn.chunks_left == 0;

    // Corn just past the chunk; pairs reward a little more often
    let p_corn = if pair { 0.65 } else { 0.40 };
    if world.rng.random_bool(p_corn) {
        let y = FLOOR_Y - world.rng.random_range(44.0..90.0);
        spawn_corn(world, Vec2::new(end + 30.0, y), 1);
    }
    // Rare giant corn, further past and up high
    if world.rng.random_bool((0.04 + 0.10 * difficulty) as f64) {
        spawn_corn(world, Vec2::new(end + 140.0, FLOOR_Y - 150.0), 3);
    }
}

/// One terrain cadence tick during a break: ascend to the plateau via a
/// staircase, hold the plateau, or descend back and end the run.
fn spawn_terrain_segment(world: &mut World, spawn_edge: f32, speed: f32, difficulty: f32) {
    if !world.spawn.in_break(spawn_edge, speed, difficulty) {
        return;
    }

    if world.spawn.segments_left == 0 && world.spawn.terrain_level == 0 {
        if !world.rng.random_bool(0.5) {
            return;
        }
        world.spawn.segments_left = world.rng.random_range(2..=4);
        world.spawn.segments_done = 0;
    }

    let speed_factor = speed / BASE_SPEED;
    let gap = if world.spawn.segments_done == 0 {
        TERRAIN_LEAD_GAP * speed_factor
    } else {
        TERRAIN_CHUNK_GAP * speed_factor
    };
    let mut x = (world.spawn.last_terrain_end + gap).max(spawn_edge);

    if world.spawn.terrain_level == 0 {
        // Ascend: staircase up, then the first plateau shelf
        x = push_staircase(world, x, true);
        x = push_shelf(world, x);
        world.spawn.terrain_level = 1;
    } else {
        // Run-length-aware descent decision: the longer the plateau has
        // lasted, the likelier the run ends
        let ratio = world.spawn.segments_done as f32 / 4.0;
        let p_descend = lerp(0.25, 0.85, ratio.min(1.0)) as f64;
        let descend = world.spawn.segments_left <= 1 || world.rng.random_bool(p_descend);
        if descend {
            x = push_staircase(world, x, false);
            world.spawn.terrain_level = 0;
            world.spawn.segments_left = 0;
            world.spawn.segments_done = 0;
            world.spawn.last_terrain_end = x;
            world.spawn.last_threat_end = world.spawn.last_threat_end.max(x);
            return;
        }
        x = push_shelf(world, x);
    }

    world.spawn.segments_left = world.spawn.segments_left.saturating_sub(1);
    world.spawn.segments_done += 1;
    world.spawn.last_terrain_end = x;
    world.spawn.last_threat_end = world.spawn.last_threat_end.max(x);
}

/// Emit a 3-7 step staircase bridging floor and plateau; equal rises summing
/// to the full lift. Returns the x just past the last step.
fn push_staircase(world: &mut World, start_x: f32, ascending: bool) -> f32 {
    let steps = world.rng.random_range(3..=7u32);
    let rise = PLATEAU_LIFT / steps as f32;
    let mut x = start_x;
    for i in 0..steps {
        let height = if ascending {
            rise * (i + 1) as f32
        } else {
            PLATEAU_LIFT - rise * (i + 1) as f32
        };
        if height < 1.0 {
            // The final descending step would sit on the floor itself
            x += STEP_W;
            continue;
        }
        let id = world.next_entity_id();
        world.platforms.push(Platform {
            id,
            pos: Vec2::new(x, FLOOR_Y - height),
            width: STEP_W,
            kind: PlatformKind::Step,
        });
        x += STEP_W;
    }
    x
}

/// Emit one plateau shelf, with corn on top sometimes and giant corn rarely.
/// Returns the x just past the shelf.
fn push_shelf(world: &mut World, start_x: f32) -> f32 {
    let width = world.rng.random_range(SHELF_MIN_W..SHELF_MAX_W);
    let top = FLOOR_Y - PLATEAU_LIFT;
    let id = world.next_entity_id();
    world.platforms.push(Platform {
        id,
        pos: Vec2::new(start_x, top),
        width,
        kind: PlatformKind::Shelf,
    });

    if world.rng.random_bool(0.5) {
        spawn_corn(world, Vec2::new(start_x + width / 2.0, top - 28.0), 1);
    } else if world.rng.random_bool(0.08) {
        spawn_corn(world, Vec2::new(start_x + width / 2.0, top - 34.0), 3);
    }

    start_x + width
}

/// One egg cadence tick during a break: flat chance, placed past the landing
/// zone of whatever spawned last.
fn spawn_egg(world: &mut World, spawn_edge: f32, speed: f32, difficulty: f32) {
    if !world.spawn.in_break(spawn_edge, speed, difficulty) {
        return;
    }
    if !world.rng.random_bool(EGG_CHANCE) {
        return;
    }

    let clearance = jump_travel_distance(speed) * 0.5 + 48.0;
    let x = (world.spawn.last_threat_end + clearance).max(spawn_edge);
    let id = world.next_entity_id();
    world.hazards.push(super::state::Hazard {
        id,
        pos: Vec2::new(x, FLOOR_Y - EGG_RADIUS),
        radius: EGG_RADIUS,
        smashed: false,
        fade: 0.0,
    });
    world.spawn.last_threat_end = x + EGG_RADIUS;
}

fn spawn_corn(world: &mut World, pos: Vec2, value: u32) {
    let id = world.next_entity_id();
    let radius = if value >= 3 {
        GIANT_PICKUP_RADIUS
    } else {
        PICKUP_RADIUS
    };
    world.pickups.push(Pickup {
        id,
        pos,
        radius,
        value,
        taken: false,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn playing_world(seed: u64) -> World {
        let mut world = World::new(seed);
        world.phase = GamePhase::Playing;
        world
    }

    #[test]
    fn test_landing_gap_matches_kinematics_at_difficulty_zero() {
        // speed 360, jump -760, gravity 2400: travel = 360 * (2*760/2400) = 228
        let travel = jump_travel_distance(360.0);
        assert!((travel - 228.0).abs() < 0.5);
        assert!(landing_gap(360.0, 0.0) >= travel + REACTION_BUFFER_MIN);
    }

    #[test]
    fn test_gap_thresholds_tighten_with_difficulty() {
        assert!(chunk_gap(1.0) < chunk_gap(0.0));
        // At fixed speed the reaction buffer shrinks with difficulty
        assert!(landing_gap(400.0, 1.0) < landing_gap(400.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_landing_gap_always_clearable(
            difficulty in 0.0f32..=1.0,
            speed in BASE_SPEED..=MAX_SPEED,
        ) {
            let gap = landing_gap(speed, difficulty);
            prop_assert!(gap >= jump_travel_distance(speed) + REACTION_BUFFER_MIN);
        }
    }

    #[test]
    fn test_owed_landing_gap_is_honored_by_generator() {
        for seed in 0..20u64 {
            for difficulty in [0.0, 0.3, 0.6, 1.0] {
                let mut world = playing_world(seed);
                world.difficulty = difficulty;
                let speed = world.scroll_speed();

                // Pretend the previous run ended just past the spawn edge so
                // the spacing term, not the edge clamp, decides placement
                world.spawn.chunks_left = 1;
                world.spawn.owe_landing_gap = true;
                world.spawn.last_obstacle_end = VIEW_W + SPAWN_MARGIN + 10.0;
                let last_end = world.spawn.last_obstacle_end;

                spawn_obstacle_chunk(&mut world, VIEW_W + SPAWN_MARGIN, speed, difficulty);

                let first_x = world
                    .obstacles
                    .iter()
                    .map(|o| o.pos.x)
                    .fold(f32::INFINITY, f32::min);
                assert!(
                    first_x >= last_end + landing_gap(speed, difficulty) - 0.01,
                    "seed {seed} difficulty {difficulty}: gap {} too tight",
                    first_x - last_end
                );
            }
        }
    }

    #[test]
    fn test_chunk_gap_used_inside_a_run() {
        let mut world = playing_world(3);
        world.difficulty = 0.5;
        let speed = world.scroll_speed();

        world.spawn.chunks_left = 2;
        world.spawn.owe_landing_gap = false;
        world.spawn.last_obstacle_end = VIEW_W + SPAWN_MARGIN + 10.0;
        let last_end = world.spawn.last_obstacle_end;

        spawn_obstacle_chunk(&mut world, VIEW_W + SPAWN_MARGIN, speed, 0.5);

        let first_x = world
            .obstacles
            .iter()
            .map(|o| o.pos.x)
            .fold(f32::INFINITY, f32::min);
        let gap = first_x - last_end;
        assert!(gap >= chunk_gap(0.5) - 0.01);
        // Interior spacing is tighter than a full landing gap
        assert!(gap < landing_gap(speed, 0.5));
    }

    #[test]
    fn test_catchup_loop_is_bounded() {
        let mut world = playing_world(5);
        world.difficulty = 1.0;
        // Huge accumulated debt, and runs always have chunks owed
        world.spawn.obstacle_timer = -100.0;
        world.spawn.terrain_timer = 100.0;
        world.spawn.egg_timer = 100.0;
        world.spawn.chunks_left = 1000;

        run_spawners(&mut world, 0.0);

        // Each catch-up iteration emits at most one chunk of two obstacles
        assert!(world.obstacles.len() <= 2 * SPAWN_CATCHUP_MAX as usize);
    }

    #[test]
    fn test_low_difficulty_chunks_are_single() {
        let mut world = playing_world(9);
        world.difficulty = 0.0;
        let speed = world.scroll_speed();
        for _ in 0..40 {
            world.spawn.chunks_left = 1;
            world.spawn.owe_landing_gap = true;
            spawn_obstacle_chunk(&mut world, VIEW_W + SPAWN_MARGIN, speed, 0.0);
        }
        // No pairs and no big variant at difficulty zero
        let mut sorted: Vec<f32> = world.obstacles.iter().map(|o| o.pos.x).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for pair in sorted.windows(2) {
            assert!(pair[1] - pair[0] > OBSTACLE_W);
        }
        assert!(
            world
                .obstacles
                .iter()
                .all(|o| o.kind != ObstacleKind::Big)
        );
    }

    #[test]
    fn test_staircase_rises_evenly_to_the_plateau() {
        for seed in 0..10u64 {
            let mut world = playing_world(seed);
            // Force an ascent directly
            let end_x = push_staircase(&mut world, 1100.0, true);
            assert!(end_x > 1100.0);

            let mut tops: Vec<f32> = world.platforms.iter().map(|p| p.top()).collect();
            tops.sort_by(|a, b| b.partial_cmp(a).unwrap());
            let steps = tops.len();
            assert!((3..=7).contains(&steps));

            let rise = PLATEAU_LIFT / steps as f32;
            for (i, top) in tops.iter().enumerate() {
                let expected = FLOOR_Y - rise * (i + 1) as f32;
                assert!((top - expected).abs() < 0.01);
            }
            // Final step reaches the plateau level
            assert!((tops.last().unwrap() - (FLOOR_Y - PLATEAU_LIFT)).abs() < 0.01);
        }
    }

    #[test]
    fn test_terrain_run_reaches_plateau_and_returns() {
        let mut world = playing_world(13);
        let speed = world.scroll_speed();

        // Drive cadence ticks until a run has gone up and come back down
        let mut ascended = false;
        for _ in 0..200 {
            spawn_terrain_segment(&mut world, VIEW_W + SPAWN_MARGIN, speed, 0.0);
            if world.spawn.terrain_level == 1 {
                ascended = true;
            }
            if ascended && world.spawn.terrain_level == 0 {
                break;
            }
        }
        assert!(ascended);
        assert_eq!(world.spawn.terrain_level, 0);
        assert!(
            world
                .platforms
                .iter()
                .any(|p| p.kind == PlatformKind::Shelf)
        );
        assert!(world.platforms.iter().any(|p| p.kind == PlatformKind::Step));
    }

    #[test]
    fn test_terrain_waits_for_a_break() {
        let mut world = playing_world(17);
        let speed = world.scroll_speed();
        // A run is mid-flight: no terrain may appear
        world.spawn.chunks_left = 2;
        for _ in 0..50 {
            spawn_terrain_segment(&mut world, VIEW_W + SPAWN_MARGIN, speed, 0.0);
        }
        assert!(world.platforms.is_empty());
    }

    #[test]
    fn test_eggs_spawn_past_the_landing_zone() {
        let mut world = playing_world(21);
        let speed = world.scroll_speed();
        world.spawn.last_threat_end = VIEW_W + SPAWN_MARGIN + 5.0;
        let threat_end = world.spawn.last_threat_end;

        for _ in 0..100 {
            spawn_egg(&mut world, VIEW_W + SPAWN_MARGIN, speed, 0.0);
        }
        assert!(!world.hazards.is_empty());
        let first = &world.hazards[0];
        assert!(first.pos.x >= threat_end + jump_travel_distance(speed) * 0.5);
    }

    #[test]
    fn test_eggs_respect_breaks() {
        let mut world = playing_world(23);
        let speed = world.scroll_speed();
        world.spawn.chunks_left = 3;
        for _ in 0..100 {
            spawn_egg(&mut world, VIEW_W + SPAWN_MARGIN, speed, 0.0);
        }
        assert!(world.hazards.is_empty());
    }

    #[test]
    fn test_same_seed_same_course() {
        let mut a = playing_world(99);
        let mut b = playing_world(99);
        for _ in 0..600 {
            a.difficulty = (a.difficulty + 0.001).min(1.0);
            b.difficulty = (b.difficulty + 0.001).min(1.0);
            run_spawners(&mut a, 1.0 / 60.0);
            run_spawners(&mut b, 1.0 / 60.0);
        }
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.platforms.len(), b.platforms.len());
        assert_eq!(a.hazards.len(), b.hazards.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.pos, ob.pos);
            assert_eq!(oa.kind, ob.kind);
        }
    }
}
