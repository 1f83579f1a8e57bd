//! Game state and core simulation types
//!
//! The whole run lives in a single owned `World` aggregate; every subsystem
//! takes it by `&mut` once per tick. No subsystem keeps copies of shared
//! entities, and entity back-references are id handles, never indices.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geom::Rect;
use super::spawn::SpawnState;
use crate::consts::*;

/// Current mode of the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Attract screen, nothing simulates
    Title,
    /// Active gameplay
    Playing,
    /// Frozen mid-run
    Paused,
    /// Run ended
    GameOver,
}

/// User-selectable simulation speed multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeScale {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl TimeScale {
    pub fn factor(self) -> f32 {
        match self {
            TimeScale::Slow => 0.75,
            TimeScale::Normal => 1.0,
            TimeScale::Fast => 1.25,
        }
    }
}

/// Discrete gameplay events, drained by the host each frame and forwarded to
/// the audio collaborator. Delivery is best-effort and never awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    Land,
    Corn,
    Ouch,
    EggSmash,
    CluckFast,
    CluckSlow,
    Bonk,
    RunStart,
}

/// Obstacle variants (visual kind drives size and damage)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleKind {
    Crate,
    Rock,
    Stump,
    /// Taller/wider variant, appears at higher difficulty
    Big,
}

impl ObstacleKind {
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Crate | ObstacleKind::Rock | ObstacleKind::Stump => {
                Vec2::new(OBSTACLE_W, OBSTACLE_H)
            }
            ObstacleKind::Big => Vec2::new(BIG_OBSTACLE_W, BIG_OBSTACLE_H),
        }
    }

    pub fn damage(self) -> f32 {
        match self {
            ObstacleKind::Crate | ObstacleKind::Rock | ObstacleKind::Stump => OBSTACLE_DAMAGE,
            ObstacleKind::Big => BIG_OBSTACLE_DAMAGE,
        }
    }
}

/// A ground obstacle. Spawned ahead of the view, scrolled left every tick,
/// pruned once fully off-screen.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub kind: ObstacleKind,
    /// Decorative bob phase (render-facing)
    pub bob_phase: f32,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        let size = self.kind.size();
        Rect::new(self.pos.x, self.pos.y, size.x, size.y)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// Plateau shelf segment
    Shelf,
    /// One stair of a generated staircase
    Step,
}

/// A one-way platform: supports landing from above, never blocks movement
#[derive(Debug, Clone)]
pub struct Platform {
    pub id: u32,
    /// Top-left corner; `pos.y` is the landing surface
    pub pos: Vec2,
    pub width: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, PLATFORM_THICKNESS)
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }
}

/// Collectible corn. `value` is 1 for regular, 3 for giant.
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub value: u32,
    pub taken: bool,
}

impl Pickup {
    /// Circular footprint approximated by its bounding square
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.radius)
    }
}

/// A floor egg. Smashing one costs corn, never health.
#[derive(Debug, Clone)]
pub struct Hazard {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    pub radius: f32,
    pub smashed: bool,
    /// Post-smash fade countdown (render-facing splat)
    pub fade: f32,
}

impl Hazard {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.radius)
    }
}

/// Cosmetic particle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Feather,
    Dust,
    Yolk,
    Glint,
}

/// A cosmetic particle; never affects gameplay
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life fraction, 1.0 down to 0.0
    pub life: f32,
    pub kind: ParticleKind,
}

/// What the player currently stands on. Entity references are id handles so
/// a pruned entity is a detected support loss, never a dangling access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Support {
    #[default]
    None,
    /// The implicit floor line (not an entity)
    Floor,
    Platform(u32),
    Obstacle(u32),
}

/// The player chicken. Reset at run start, mutated every tick, never
/// destroyed mid-run.
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    /// Position before this tick's integration, for swept landing checks
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    pub support: Support,
    pub jump_buffer: f32,
    pub coyote: f32,
    pub invuln: f32,
    pub drop_through: f32,
    /// How long jump has been held while airborne
    pub flight_hold: f32,
    pub jump_was_down: bool,
    /// Run-cycle counter (render-facing)
    pub run_cycle: f32,
}

impl Player {
    pub fn new() -> Self {
        let pos = Vec2::new(PLAYER_START_X, FLOOR_Y - PLAYER_H);
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            grounded: true,
            support: Support::Floor,
            jump_buffer: 0.0,
            coyote: 0.0,
            invuln: 0.0,
            drop_through: 0.0,
            flight_hold: 0.0,
            jump_was_down: false,
            run_cycle: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_W, PLAYER_H)
    }

    /// Reduced inner hitbox used for damage and collection
    pub fn hitbox(&self) -> Rect {
        self.rect().inset(HITBOX_INSET_X, HITBOX_INSET_Y)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + PLAYER_H
    }

    #[inline]
    pub fn prev_bottom(&self) -> f32 {
        self.prev_pos.y + PLAYER_H
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + PLAYER_W / 2.0
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete run/world state, exclusively owned and mutated by the tick driver
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Injected deterministic RNG; the only source of randomness
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub time_scale: TimeScale,
    /// Simulated seconds spent in Playing this run
    pub play_time: f32,
    /// [0,1], linear ramp over play time; monotonic within a run
    pub difficulty: f32,
    pub score: f64,
    /// Monotonic max across runs; seeded from the persisted profile
    pub best_score: f64,
    pub corn: u32,
    /// Independent health pools, each 0..=100
    pub hearts: [f32; HEARTS_MAX],
    /// Index of the heart currently taking damage
    pub heart_index: usize,
    /// Smoothed health values the health bar renders
    pub display_hearts: [f32; HEARTS_MAX],
    pub fuel: f32,
    pub fuel_cooldown: f32,
    /// Total ground covered; consumed by the renderer for parallax
    pub scroll_x: f32,
    /// Screen shake intensity 0..=1 (render-facing)
    pub shake: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub platforms: Vec<Platform>,
    pub pickups: Vec<Pickup>,
    pub hazards: Vec<Hazard>,
    pub particles: Vec<Particle>,
    pub spawn: SpawnState,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    /// Create a fresh world on the title screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            time_scale: TimeScale::Normal,
            play_time: 0.0,
            difficulty: 0.0,
            score: 0.0,
            best_score: 0.0,
            corn: 0,
            hearts: [HEART_HEALTH; HEARTS_MAX],
            heart_index: 0,
            display_hearts: [HEART_HEALTH; HEARTS_MAX],
            fuel: FLIGHT_FUEL_MAX,
            fuel_cooldown: 0.0,
            scroll_x: 0.0,
            shake: 0.0,
            player: Player::new(),
            obstacles: Vec::new(),
            platforms: Vec::new(),
            pickups: Vec::new(),
            hazards: Vec::new(),
            particles: Vec::new(),
            spawn: SpawnState::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current scroll speed, interpolated by difficulty
    pub fn scroll_speed(&self) -> f32 {
        crate::lerp(BASE_SPEED, MAX_SPEED, self.difficulty)
    }

    /// Health of the heart currently in play
    pub fn active_health(&self) -> f32 {
        self.hearts[self.heart_index]
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events (host forwards them to audio, fire-and-forget)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Title -> Playing on the explicit start action
    pub fn start_run(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::RunStart);
        log::info!("run started (seed {})", self.seed);
    }

    /// Full atomic reset into Playing, honored from any mode
    pub fn restart(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::RunStart);
        log::info!("run restarted");
    }

    /// Reset all run state. Best score, time scale selection, and the RNG
    /// stream survive; everything else starts over.
    fn reset_run(&mut self) {
        self.play_time = 0.0;
        self.difficulty = 0.0;
        self.score = 0.0;
        self.corn = 0;
        self.hearts = [HEART_HEALTH; HEARTS_MAX];
        self.heart_index = 0;
        self.display_hearts = [HEART_HEALTH; HEARTS_MAX];
        self.fuel = FLIGHT_FUEL_MAX;
        self.fuel_cooldown = 0.0;
        self.scroll_x = 0.0;
        self.shake = 0.0;
        self.player = Player::new();
        self.obstacles.clear();
        self.platforms.clear();
        self.pickups.clear();
        self.hazards.clear();
        self.particles.clear();
        self.spawn = SpawnState::new();
        self.events.clear();
    }

    /// Change the time multiplier; clucks acknowledge the selection
    pub fn set_time_scale(&mut self, scale: TimeScale) {
        if scale == self.time_scale {
            return;
        }
        self.time_scale = scale;
        match scale {
            TimeScale::Fast => self.push_event(GameEvent::CluckFast),
            TimeScale::Slow => self.push_event(GameEvent::CluckSlow),
            TimeScale::Normal => {}
        }
    }

    /// Apply obstacle damage with knockback and invulnerability.
    ///
    /// The knockback side comes from comparing horizontal centers; the rule
    /// is kept exactly as documented even though a fast hit can visually
    /// read as damage-from-behind.
    pub fn hurt(&mut self, obstacle: Rect, amount: f32) {
        if self.phase != GamePhase::Playing || self.player.invuln > 0.0 {
            return;
        }

        let i = self.heart_index;
        self.hearts[i] = (self.hearts[i] - amount).clamp(0.0, HEART_HEALTH);
        self.player.invuln = INVULN_TIME;

        let dir = if self.player.center_x() <= obstacle.center_x() {
            -1.0
        } else {
            1.0
        };
        self.player.vel.x = dir * KNOCKBACK_VX;
        if self.player.vel.y > KNOCKBACK_VY {
            self.player.vel.y = KNOCKBACK_VY;
        }
        self.player.grounded = false;
        self.player.support = Support::None;

        // Reposition just outside the obstacle to prevent immediate
        // re-collision, then re-clamp to the lane
        if dir < 0.0 {
            self.player.pos.x = obstacle.x - PLAYER_W - 1.0;
        } else {
            self.player.pos.x = obstacle.right() + 1.0;
        }
        self.player.pos.x = self.player.pos.x.clamp(LANE_MIN_X, LANE_MAX_X - PLAYER_W);

        self.shake = (self.shake + 0.5).min(1.0);
        let burst_at = Vec2::new(self.player.center_x(), self.player.pos.y + PLAYER_H / 2.0);
        self.burst(burst_at, ParticleKind::Feather, 10);
        self.push_event(GameEvent::Ouch);

        if self.hearts[i] <= 0.0 {
            if i + 1 < HEARTS_MAX {
                self.hearts[i] = 0.0;
                self.heart_index = i + 1;
                self.hearts[i + 1] = HEART_HEALTH;
                self.player.invuln = HEART_GRACE_TIME;
                self.shake = 1.0;
                log::info!("heart {} spent, {} remaining", i + 1, HEARTS_MAX - i - 1);
            } else {
                self.game_over();
            }
        }
    }

    /// Terminal transition: fold the run score into the best score
    pub fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        if self.score > self.best_score {
            self.best_score = self.score;
            log::info!("new best score: {:.0}", self.best_score);
        }
    }

    /// Ease the displayed health toward the true values. Runs in every mode,
    /// framerate-independent via `decay.powf(dt)`.
    pub fn smooth_display(&mut self, dt: f32) {
        let k = crate::decay_factor(HEALTH_DISPLAY_DECAY, dt);
        for i in 0..HEARTS_MAX {
            let target = self.hearts[i];
            self.display_hearts[i] = target + (self.display_hearts[i] - target) * k;
        }
    }

    /// Scroll, animate, and prune every entity pool, and shift the spawner
    /// anchors by the same distance
    pub fn advance_entities(&mut self, dt: f32, speed: f32) {
        let dx = speed * dt;

        for o in &mut self.obstacles {
            o.pos.x -= dx;
            o.bob_phase += OBSTACLE_BOB_RATE * dt;
        }
        self.obstacles
            .retain(|o| o.rect().right() > -OFFSCREEN_MARGIN);

        for p in &mut self.platforms {
            p.pos.x -= dx;
        }
        self.platforms
            .retain(|p| p.pos.x + p.width > -OFFSCREEN_MARGIN);

        for k in &mut self.pickups {
            k.pos.x -= dx;
        }
        self.pickups
            .retain(|k| !k.taken && k.pos.x + k.radius > -OFFSCREEN_MARGIN);

        for h in &mut self.hazards {
            h.pos.x -= dx;
            if h.smashed {
                h.fade -= dt;
            }
        }
        self.hazards
            .retain(|h| h.pos.x + h.radius > -OFFSCREEN_MARGIN && (!h.smashed || h.fade > 0.0));

        for pt in &mut self.particles {
            pt.pos += pt.vel * dt;
            let (gravity, drag, fade) = match pt.kind {
                ParticleKind::Feather => (90.0, 0.25, 1.1),
                ParticleKind::Dust => (0.0, 0.05, 2.2),
                ParticleKind::Yolk => (900.0, 0.6, 1.4),
                ParticleKind::Glint => (-40.0, 0.3, 2.0),
            };
            pt.vel.y += gravity * dt;
            let k = crate::decay_factor(drag, dt);
            pt.vel *= k;
            pt.life -= fade * dt;
        }
        self.particles.retain(|p| p.life > 0.0);

        self.spawn.scroll(dx);
    }

    /// Spawn a cosmetic burst at `pos`. Oldest particles make room when the
    /// pool is full.
    pub fn burst(&mut self, pos: Vec2, kind: ParticleKind, count: usize) {
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let vel = match kind {
                ParticleKind::Feather => Vec2::new(
                    self.rng.random_range(-70.0..70.0),
                    self.rng.random_range(-120.0..-20.0),
                ),
                ParticleKind::Dust => Vec2::new(
                    self.rng.random_range(-60.0..20.0),
                    self.rng.random_range(-50.0..-8.0),
                ),
                ParticleKind::Yolk => Vec2::new(
                    self.rng.random_range(-110.0..110.0),
                    self.rng.random_range(-180.0..-40.0),
                ),
                ParticleKind::Glint => Vec2::new(
                    self.rng.random_range(-40.0..40.0),
                    self.rng.random_range(-90.0..-30.0),
                ),
            };
            let life = self.rng.random_range(0.6..1.0);
            self.particles.push(Particle {
                pos,
                vel,
                life,
                kind,
            });
        }
    }
}
