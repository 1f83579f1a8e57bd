//! Cluck Dash - a side-scrolling chicken runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `profile`: Persisted best score and cosmetic selections
//! - `audio`: Web Audio trigger surface (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod profile;
pub mod sim;

pub use profile::Profile;

/// Game configuration constants
pub mod consts {
    /// Fixed view rectangle the simulation reasons about (world units = pixels)
    pub const VIEW_W: f32 = 960.0;
    pub const VIEW_H: f32 = 540.0;
    /// Floor line: entity bottoms rest here
    pub const FLOOR_Y: f32 = 470.0;
    /// Top of the play area (ceiling clamp)
    pub const CEILING_Y: f32 = 24.0;
    /// Horizontal lane the player may occupy
    pub const LANE_MIN_X: f32 = 16.0;
    pub const LANE_MAX_X: f32 = 620.0;

    /// Raw frame delta clamp: a multi-second stall never becomes a
    /// multi-second simulation jump
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;
    /// Post-time-scale ceiling on a single simulated step (anti-tunneling)
    pub const MAX_SIM_DT: f32 = 0.04;

    /// Scroll speed at difficulty 0 and 1
    pub const BASE_SPEED: f32 = 360.0;
    pub const MAX_SPEED: f32 = 560.0;
    /// Seconds of play to reach full difficulty
    pub const DIFFICULTY_RAMP_SECS: f32 = 150.0;
    /// Score per pixel of ground covered
    pub const SCORE_RATE: f64 = 0.02;
    /// Score per unit of corn value collected
    pub const SCORE_PER_CORN: f64 = 60.0;

    /// Player collision box
    pub const PLAYER_W: f32 = 34.0;
    pub const PLAYER_H: f32 = 40.0;
    pub const PLAYER_START_X: f32 = 120.0;
    /// Inner damage/collect hitbox inset from the full box
    pub const HITBOX_INSET_X: f32 = 7.0;
    pub const HITBOX_INSET_Y: f32 = 5.0;

    /// Player movement
    pub const MOVE_ACCEL: f32 = 2600.0;
    pub const MOVE_MAX_SPEED: f32 = 340.0;
    /// Per-second velocity retention when no direction is held
    pub const FRICTION_BASE: f32 = 0.0005;
    pub const GRAVITY: f32 = 2400.0;
    pub const JUMP_VELOCITY: f32 = -760.0;
    pub const JUMP_BUFFER: f32 = 0.12;
    pub const COYOTE_TIME: f32 = 0.10;
    /// Platform landing checks suppressed for this long after dropping through
    pub const DROP_THROUGH_TIME: f32 = 0.25;
    /// Downward nudge applied when a supporting entity scrolls away
    pub const SUPPORT_LOSS_NUDGE: f32 = 40.0;

    /// Flight engages after holding jump airborne this long
    pub const FLIGHT_HOLD: f32 = 0.14;
    pub const FLIGHT_FUEL_MAX: f32 = 2.5;
    /// Fuel units drained per second of flight
    pub const FLIGHT_FUEL_DRAIN: f32 = 1.0;
    /// Upward velocity flight eases toward
    pub const FLIGHT_TARGET_VY: f32 = -520.0;
    /// Exponential approach rate toward the flight target velocity
    pub const FLIGHT_EASE_RATE: f32 = 12.0;
    /// Fuel refills only after landing plus this long without flight use
    pub const FUEL_REFILL_COOLDOWN: f32 = 1.1;

    /// Lives model: independent health pools
    pub const HEARTS_MAX: usize = 2;
    pub const HEART_HEALTH: f32 = 100.0;
    pub const OBSTACLE_DAMAGE: f32 = 12.0;
    pub const BIG_OBSTACLE_DAMAGE: f32 = 18.0;
    pub const INVULN_TIME: f32 = 1.2;
    /// Longer grace window granted when a heart breaks
    pub const HEART_GRACE_TIME: f32 = 2.0;
    pub const KNOCKBACK_VX: f32 = 320.0;
    pub const KNOCKBACK_VY: f32 = -360.0;
    /// Per-second retention for the smoothed health-bar display value
    pub const HEALTH_DISPLAY_DECAY: f32 = 0.002;
    /// Per-second retention for screen shake intensity
    pub const SHAKE_DECAY: f32 = 0.002;

    /// Obstacle sizes
    pub const OBSTACLE_W: f32 = 38.0;
    pub const OBSTACLE_H: f32 = 46.0;
    pub const BIG_OBSTACLE_W: f32 = 46.0;
    pub const BIG_OBSTACLE_H: f32 = 70.0;
    pub const OBSTACLE_BOB_RATE: f32 = 2.4;

    /// Platforms
    pub const STEP_W: f32 = 56.0;
    pub const PLATFORM_THICKNESS: f32 = 12.0;
    pub const SHELF_MIN_W: f32 = 150.0;
    pub const SHELF_MAX_W: f32 = 230.0;
    /// Height of the single elevated terrain level above the floor
    pub const PLATEAU_LIFT: f32 = 120.0;

    /// Pickups and hazards
    pub const PICKUP_RADIUS: f32 = 12.0;
    pub const GIANT_PICKUP_RADIUS: f32 = 17.0;
    pub const EGG_RADIUS: f32 = 11.0;
    pub const EGG_FADE_TIME: f32 = 0.5;

    /// Entities are pruned once fully this far past the left edge
    pub const OFFSCREEN_MARGIN: f32 = 80.0;
    /// New entities appear this far past the right edge
    pub const SPAWN_MARGIN: f32 = 60.0;
    /// Player is lost after falling this far below the view
    pub const FALL_OUT_MARGIN: f32 = 80.0;

    /// Hard cap on spawner catch-up iterations within one tick
    pub const SPAWN_CATCHUP_MAX: u32 = 4;
    /// Reaction buffer added to the kinematic landing gap; tightens with
    /// difficulty but never reaches zero
    pub const REACTION_BUFFER_MAX: f32 = 110.0;
    pub const REACTION_BUFFER_MIN: f32 = 60.0;
    /// Spacing between chunks inside an obstacle run
    pub const CHUNK_GAP_MAX: f32 = 96.0;
    pub const CHUNK_GAP_MIN: f32 = 58.0;

    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Framerate-independent exponential decay: `value *= decay_factor(base, dt)`
/// where `base` is the fraction retained after one second
#[inline]
pub fn decay_factor(base: f32, dt: f32) -> f32 {
    base.powf(dt)
}

/// Exponential approach of `current` toward `target` at `rate` per second
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    }

    #[test]
    fn test_decay_factor_composes() {
        // Two half-steps must equal one full step
        let whole = decay_factor(0.1, 1.0);
        let halves = decay_factor(0.1, 0.5) * decay_factor(0.1, 0.5);
        assert!((whole - halves).abs() < 1e-6);
    }

    #[test]
    fn test_approach_converges() {
        let mut v = 0.0;
        for _ in 0..600 {
            v = approach(v, -520.0, 12.0, 1.0 / 120.0);
        }
        assert!((v - -520.0).abs() < 1.0);
    }
}
