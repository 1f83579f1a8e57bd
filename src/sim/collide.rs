//! Ordered collision resolution
//!
//! One pass sequence per tick; later passes assume earlier passes already
//! finalized grounding. Landing checks are swept against the player's
//! previous bottom edge so thin one-way surfaces cannot be tunneled through
//! at high speed or low frame rate.

use glam::Vec2;

use crate::consts::*;

use super::state::{GameEvent, ParticleKind, Support, World};

/// Slack when comparing the previous bottom edge against a surface top
const LANDING_EPS: f32 = 0.5;
/// Horizontal footprint inset required for a landing to count
const FOOT_INSET: f32 = 4.0;

/// Run the full resolver. Order matters and is part of the contract:
/// support re-check, platform landing, obstacle-top landing, floor landing,
/// obstacle damage, pickup collection, hazard collection.
pub fn resolve(world: &mut World) {
    let was_airborne = !world.player.grounded;

    sticky_support(world);
    let mut landed = platform_landing(world, was_airborne);
    if !landed {
        landed = obstacle_top_landing(world, was_airborne);
    }
    floor_landing(world, landed, was_airborne);
    obstacle_damage(world);
    collect_pickups(world);
    collect_hazards(world);
}

/// Pass 1: the supporting entity scrolls, so horizontal overlap must be
/// re-verified every tick. Lost support releases grounding with a small
/// downward nudge; held support re-pins the player to the surface.
fn sticky_support(world: &mut World) {
    if !world.player.grounded {
        return;
    }
    let rect = world.player.rect();

    let surface = match world.player.support {
        Support::Platform(id) => world
            .platforms
            .iter()
            .find(|p| p.id == id)
            .filter(|p| rect.overlaps_x(&p.rect(), FOOT_INSET))
            .map(|p| p.top()),
        Support::Obstacle(id) => world
            .obstacles
            .iter()
            .find(|o| o.id == id)
            .filter(|o| rect.overlaps_x(&o.rect(), FOOT_INSET))
            .map(|o| o.top()),
        Support::Floor | Support::None => return,
    };

    match surface {
        Some(top) => {
            world.player.pos.y = top - PLAYER_H;
            world.player.vel.y = 0.0;
        }
        None => {
            world.player.grounded = false;
            world.player.support = Support::None;
            world.player.vel.y = world.player.vel.y.max(SUPPORT_LOSS_NUDGE);
        }
    }
}

/// Pass 2: one-way platform landing via swept bottom-edge crossing
fn platform_landing(world: &mut World, was_airborne: bool) -> bool {
    if world.player.vel.y < 0.0 || world.player.drop_through > 0.0 {
        return false;
    }
    let rect = world.player.rect();
    let prev_bottom = world.player.prev_bottom();
    let bottom = world.player.bottom();

    let hit = world
        .platforms
        .iter()
        .find(|p| {
            let top = p.top();
            prev_bottom <= top + LANDING_EPS
                && bottom >= top
                && rect.overlaps_x(&p.rect(), FOOT_INSET)
        })
        .map(|p| (p.top(), p.id));

    if let Some((top, id)) = hit {
        land(world, top, Support::Platform(id), was_airborne);
        return true;
    }
    false
}

/// Pass 3: obstacle tops are safe one-way support, identical in effect to a
/// platform landing
fn obstacle_top_landing(world: &mut World, was_airborne: bool) -> bool {
    if world.player.vel.y < 0.0 {
        return false;
    }
    let rect = world.player.rect();
    let prev_bottom = world.player.prev_bottom();
    let bottom = world.player.bottom();

    let hit = world
        .obstacles
        .iter()
        .find(|o| {
            let top = o.top();
            prev_bottom <= top + LANDING_EPS
                && bottom >= top
                && rect.overlaps_x(&o.rect(), FOOT_INSET)
        })
        .map(|o| (o.top(), o.id));

    if let Some((top, id)) = hit {
        land(world, top, Support::Obstacle(id), was_airborne);
        return true;
    }
    false
}

/// Pass 4: the floor is implicit, not an entity. Without a surface landing
/// and without a held support handle, the player is airborne.
fn floor_landing(world: &mut World, landed_on_entity: bool, was_airborne: bool) {
    if landed_on_entity {
        return;
    }
    // Swept like the entity passes; a player already far below the floor
    // line is falling out of the world, not landing on it
    if world.player.bottom() >= FLOOR_Y && world.player.prev_bottom() <= FLOOR_Y + LANDING_EPS {
        land(world, FLOOR_Y, Support::Floor, was_airborne);
    } else if !matches!(
        world.player.support,
        Support::Platform(_) | Support::Obstacle(_)
    ) {
        world.player.grounded = false;
        world.player.support = Support::None;
    }
}

fn land(world: &mut World, top: f32, support: Support, was_airborne: bool) {
    world.player.pos.y = top - PLAYER_H;
    world.player.vel.y = 0.0;
    world.player.grounded = true;
    world.player.support = support;
    if was_airborne {
        let feet = Vec2::new(world.player.center_x(), top);
        world.burst(feet, ParticleKind::Dust, 6);
        world.push_event(GameEvent::Land);
    }
}

/// Pass 5: front-only obstacle damage against the inner hitbox. Skips the
/// current support obstacle, grazes from above, and rear contact; the rule
/// for "front-on" is a horizontal center comparison (the player runs right).
fn obstacle_damage(world: &mut World) {
    let hitbox = world.player.hitbox();
    let center_x = world.player.center_x();

    let mut hit = None;
    for o in &world.obstacles {
        let rect = o.rect();
        if !hitbox.intersects(&rect) {
            continue;
        }
        if world.player.support == Support::Obstacle(o.id) {
            continue;
        }
        if hitbox.bottom() <= rect.y {
            continue;
        }
        if center_x > rect.center_x() {
            continue;
        }
        hit = Some((rect, o.kind.damage()));
        break;
    }

    if let Some((rect, damage)) = hit {
        world.hurt(rect, damage);
    }
}

/// Pass 6: corn collection
fn collect_pickups(world: &mut World) {
    let hitbox = world.player.hitbox();

    let mut collected = Vec::new();
    for pickup in world.pickups.iter_mut() {
        if pickup.taken {
            continue;
        }
        if pickup.rect().intersects(&hitbox) {
            pickup.taken = true;
            collected.push((pickup.pos, pickup.value));
        }
    }

    for (pos, value) in collected {
        world.corn += value;
        world.score += value as f64 * SCORE_PER_CORN;
        world.burst(pos, ParticleKind::Glint, 5);
        world.push_event(GameEvent::Corn);
    }
}

/// Pass 7: egg smashing costs corn (floor-clamped), never health
fn collect_hazards(world: &mut World) {
    let hitbox = world.player.hitbox();

    let mut smashed = Vec::new();
    for hazard in world.hazards.iter_mut() {
        if hazard.smashed {
            continue;
        }
        if hazard.rect().intersects(&hitbox) {
            hazard.smashed = true;
            hazard.fade = EGG_FADE_TIME;
            smashed.push(hazard.pos);
        }
    }

    for pos in smashed {
        world.corn = world.corn.saturating_sub(1);
        world.burst(pos, ParticleKind::Yolk, 8);
        world.push_event(GameEvent::EggSmash);
    }
}
