//! Player physics and controller
//!
//! Integrates the player's velocity and position once per tick and handles
//! the feel mechanics: jump buffering, coyote time, limited-fuel flight,
//! drop-through, friction, and bounds clamping. Landing itself is resolved
//! afterwards in `collide`; gravity integrates every tick regardless and is
//! only zeroed by an explicit landing.

use crate::consts::*;
use crate::{approach, decay_factor};

use super::state::{GameEvent, Support, World};
use super::tick::TickInput;

/// Advance the player one step from the currently held actions
pub fn step_player(world: &mut World, input: &TickInput, dt: f32) {
    let speed = world.scroll_speed();
    world.player.prev_pos = world.player.pos;

    // Timers
    world.player.jump_buffer = (world.player.jump_buffer - dt).max(0.0);
    world.player.coyote = (world.player.coyote - dt).max(0.0);
    world.player.invuln = (world.player.invuln - dt).max(0.0);
    world.player.drop_through = (world.player.drop_through - dt).max(0.0);

    // Horizontal: accelerate while held, exponential friction otherwise
    if input.left && !input.right {
        world.player.vel.x -= MOVE_ACCEL * dt;
    } else if input.right && !input.left {
        world.player.vel.x += MOVE_ACCEL * dt;
    } else {
        world.player.vel.x *= decay_factor(FRICTION_BASE, dt);
    }
    world.player.vel.x = world.player.vel.x.clamp(-MOVE_MAX_SPEED, MOVE_MAX_SPEED);

    // A jump press opens the buffer window; being grounded opens coyote
    if input.jump && !world.player.jump_was_down {
        world.player.jump_buffer = JUMP_BUFFER;
    }
    world.player.jump_was_down = input.jump;
    if world.player.grounded {
        world.player.coyote = COYOTE_TIME;
    }

    // Drop-through: release a one-way platform on command. The timer
    // suppresses platform landing checks so the fall actually happens.
    if input.down && world.player.grounded && matches!(world.player.support, Support::Platform(_))
    {
        world.player.grounded = false;
        world.player.support = Support::None;
        world.player.drop_through = DROP_THROUGH_TIME;
    }

    // Jump fires only while both windows are open, which lets an input
    // register slightly before landing or slightly after leaving a ledge
    if world.player.jump_buffer > 0.0 && world.player.coyote > 0.0 {
        world.player.vel.y = JUMP_VELOCITY;
        world.player.jump_buffer = 0.0;
        world.player.coyote = 0.0;
        world.player.grounded = false;
        world.player.support = Support::None;
        world.push_event(GameEvent::Jump);
    }

    // Flight: hold jump airborne past the threshold, spend fuel
    if !world.player.grounded && input.jump {
        world.player.flight_hold += dt;
    } else {
        world.player.flight_hold = 0.0;
    }
    let flying = world.player.flight_hold > FLIGHT_HOLD && world.fuel > 0.0;
    if flying {
        world.player.vel.y = approach(world.player.vel.y, FLIGHT_TARGET_VY, FLIGHT_EASE_RATE, dt);
        world.fuel = (world.fuel - FLIGHT_FUEL_DRAIN * dt).max(0.0);
        world.fuel_cooldown = FUEL_REFILL_COOLDOWN;
    } else {
        world.fuel_cooldown = (world.fuel_cooldown - dt).max(0.0);
        if world.player.grounded && world.fuel_cooldown == 0.0 {
            world.fuel = FLIGHT_FUEL_MAX;
        }
    }

    // Gravity integrates every tick; landings in the resolver zero it
    world.player.vel.y += GRAVITY * dt;

    world.player.pos += world.player.vel * dt;

    // Ceiling clamp: the chicken never leaves the top of the play area
    if world.player.pos.y < CEILING_Y {
        world.player.pos.y = CEILING_Y;
        if world.player.vel.y < 0.0 {
            world.player.vel.y = 0.0;
            world.push_event(GameEvent::Bonk);
        }
    }

    // Lane clamp runs every tick, before collision resolution
    world.player.pos.x = world.player.pos.x.clamp(LANE_MIN_X, LANE_MAX_X - PLAYER_W);

    // Run cycle: proportional to ground speed, fixed slow rate in the air
    if world.player.grounded {
        world.player.run_cycle += (speed + world.player.vel.x).abs() * dt * 0.02;
    } else {
        world.player.run_cycle += 1.5 * dt;
    }
}
