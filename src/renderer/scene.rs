//! Scene building
//!
//! Turns a `GameState` into a flat triangle list in canvas pixels
//! (origin top-left, y down). The pipeline maps pixels to clip space.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use super::shapes;
use super::vertex::{Vertex, colors, rgb_hex, with_alpha};
use crate::consts::*;
use crate::grid_to_pixels;
use crate::settings::Settings;
use crate::sim::{AttackPhase, Avatar, Dimension, GameState, Portal, Prey, PreyKind, RockAttack};

/// Side length of the square canvas in pixels
pub const CANVAS_PX: f32 = GRID_SIZE as f32 * CELL_PX;

/// Local-to-canvas mapping for shapes drawn around an anchor point.
///
/// Applied as `origin + scale * rotate(p + offset)`.
#[derive(Debug, Clone, Copy)]
struct Placement {
    origin: Vec2,
    rotation: Vec2,
    scale: Vec2,
    offset: Vec2,
}

impl Placement {
    fn at(origin: Vec2) -> Self {
        Self {
            origin,
            rotation: Vec2::X,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
        }
    }

    fn rotated(mut self, angle: f32) -> Self {
        self.rotation = Vec2::from_angle(angle);
        self
    }

    fn scaled(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    fn shifted(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    fn apply(&self, p: Vec2) -> Vec2 {
        self.origin + self.scale * self.rotation.rotate(p + self.offset)
    }

    fn place(&self, local: Vec<Vertex>) -> impl Iterator<Item = Vertex> + '_ {
        local.into_iter().map(move |v| {
            let p = self.apply(Vec2::from(v.position));
            Vertex::new(p.x, p.y, v.color)
        })
    }
}

/// Build every vertex for one frame
pub fn build_scene(state: &GameState, settings: &Settings, time_secs: f32) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);
    let segments = settings.circle_segments();

    if state.dimension == Dimension::Finale {
        finale_scene(&mut out, &state.avatar, segments, time_secs);
        return out;
    }

    if settings.grid_lines {
        grid(&mut out);
    }

    // Newest splats win when over the cap
    let skip = state.splats.len().saturating_sub(settings.max_splats());
    for splat in state.splats.iter().skip(skip) {
        web_splat(
            &mut out,
            grid_to_pixels(splat.pos),
            splat.size * CELL_PX,
            splat.rays,
            splat.opacity,
        );
    }

    for web in &state.webs {
        let color = with_alpha(colors::WEB, web.opacity);
        out.extend(shapes::dashed_line(
            grid_to_pixels(web.origin),
            grid_to_pixels(web.tip()),
            2.0,
            5.0,
            color,
        ));
    }

    for attack in &state.attacks {
        rock_attack(&mut out, attack, segments);
    }

    if state.dimension == Dimension::Hunting {
        for prey in state.prey.iter().filter(|p| p.alive) {
            match prey.kind {
                PreyKind::Common => fly(&mut out, prey, segments),
                PreyKind::Rare => golden_bug(&mut out, prey, segments),
            }
        }
    }

    if let Some(portal) = &state.portal {
        portal_swirl(&mut out, portal, segments);
    }

    if settings.target_marker && state.avatar.area_unlocked {
        target_marker(&mut out, grid_to_pixels(state.avatar.target), segments);
    }

    spider(&mut out, &state.avatar, settings, segments, time_secs);

    if settings.health_bars && !state.avatar.dead {
        bars(&mut out, &state.avatar);
    }

    out
}

fn grid(out: &mut Vec<Vertex>) {
    for i in 0..=GRID_SIZE {
        let offset = i as f32 * CELL_PX;
        out.extend(shapes::line(
            Vec2::new(offset, 0.0),
            Vec2::new(offset, CANVAS_PX),
            1.0,
            colors::GRID,
        ));
        out.extend(shapes::line(
            Vec2::new(0.0, offset),
            Vec2::new(CANVAS_PX, offset),
            1.0,
            colors::GRID,
        ));
    }
}

/// Spokes plus three concentric polygons
fn web_splat(out: &mut Vec<Vertex>, center: Vec2, size: f32, rays: u8, opacity: f32) {
    let color = with_alpha(colors::SPLAT, opacity);
    let rays = rays.max(3) as usize;
    let spoke = |i: usize| Vec2::from_angle(i as f32 / rays as f32 * TAU);

    for i in 0..rays {
        out.extend(shapes::line(center, center + spoke(i) * size, 1.0, color));
    }
    for ring in 1..=3 {
        let r = ring as f32 / 3.0 * size;
        let points: Vec<Vec2> = (0..rays).map(|i| center + spoke(i) * r).collect();
        out.extend(shapes::polyline(&points, true, 1.0, color));
    }
}

fn rock_attack(out: &mut Vec<Vertex>, attack: &RockAttack, segments: u32) {
    let ground = grid_to_pixels(attack.target);

    match attack.phase {
        AttackPhase::Warning { elapsed } => {
            let progress = elapsed as f32 / ATTACK_WARNING_FRAMES as f32;
            out.extend(shapes::ring(
                ground,
                28.5,
                31.5,
                with_alpha(colors::WARNING_RING, 0.4 + progress * 0.6),
                segments,
            ));
            out.extend(shapes::circle(
                ground,
                40.0 * (1.0 - progress),
                with_alpha(colors::WARNING_FILL, 0.2 + progress * 0.3),
                segments,
            ));
        }
        AttackPhase::Falling { altitude } => {
            let shadow_scale = (1.0 - altitude / ROCK_START_ALTITUDE).max(0.0);
            out.extend(shapes::ellipse(
                ground,
                Vec2::new(25.0, 15.0) * shadow_scale,
                0.0,
                with_alpha(colors::ROCK_SHADOW, shadow_scale),
                segments,
            ));
            rock(out, attack, ground - Vec2::new(0.0, altitude * CELL_PX), 1.0);
        }
        AttackPhase::Grounded { elapsed } => {
            let fade = 1.0 - elapsed as f32 / ATTACK_GROUNDED_FRAMES as f32;
            rock(out, attack, ground, (fade * 2.0).min(1.0));
        }
    }
}

fn rock(out: &mut Vec<Vertex>, attack: &RockAttack, center: Vec2, alpha: f32) {
    let points: Vec<Vec2> = attack
        .shape
        .iter()
        .enumerate()
        .map(|(i, radius)| {
            let angle = i as f32 / attack.shape.len() as f32 * TAU;
            center + Vec2::from_angle(angle) * (radius * CELL_PX)
        })
        .collect();

    out.extend(shapes::polygon(&points, with_alpha(colors::ROCK_BODY, alpha)));
    out.extend(shapes::polyline(
        &points,
        true,
        2.0,
        with_alpha(colors::ROCK_OUTLINE, alpha),
    ));
}

fn fly(out: &mut Vec<Vertex>, prey: &Prey, segments: u32) {
    let place = Placement::at(grid_to_pixels(prey.cell.as_vec2()))
        .rotated((prey.pulse * 0.5).sin() * 0.2);
    let spread = (prey.pulse * 5.0).sin() * 5.0 + 8.0;

    for (x, tilt) in [(-3.0, -FRAC_PI_4), (3.0, FRAC_PI_4)] {
        out.extend(place.place(shapes::ellipse_outline(
            Vec2::new(x, 0.0),
            Vec2::new(spread, 4.0),
            tilt,
            1.0,
            colors::FLY_WINGS,
            segments,
        )));
    }

    // Outline first, body on top
    out.extend(place.place(shapes::ellipse(
        Vec2::new(0.0, 2.0),
        Vec2::new(4.0, 6.0),
        0.0,
        colors::FLY_OUTLINE,
        segments,
    )));
    out.extend(place.place(shapes::ellipse(
        Vec2::new(0.0, 2.0),
        Vec2::new(3.0, 5.0),
        0.0,
        colors::FLY_BODY,
        segments,
    )));
    out.extend(place.place(shapes::circle(
        Vec2::new(0.0, -3.0),
        3.0,
        colors::FLY_OUTLINE,
        segments,
    )));
    out.extend(place.place(shapes::circle(
        Vec2::new(0.0, -3.0),
        2.5,
        colors::FLY_BODY,
        segments,
    )));
    for x in [-1.0, 1.0] {
        out.extend(place.place(shapes::circle(Vec2::new(x, -4.0), 0.8, colors::FLY_EYES, 8)));
    }
}

fn golden_bug(out: &mut Vec<Vertex>, prey: &Prey, segments: u32) {
    let center = grid_to_pixels(prey.cell.as_vec2());
    let place = Placement::at(center).rotated((prey.pulse * 0.8).sin() * 0.3);
    let spread = (prey.pulse * 8.0).sin() * 3.0 + 4.0;

    // Glow
    let glow = prey.pulse.sin() * 0.5 + 0.5;
    out.extend(shapes::circle(
        center,
        6.0 + glow * 4.0,
        with_alpha(colors::BUG_WINGS, 0.15 + glow * 0.15),
        segments,
    ));

    for (x, tilt) in [(-2.0, -FRAC_PI_4), (2.0, FRAC_PI_4)] {
        out.extend(place.place(shapes::ellipse_outline(
            Vec2::new(x, 0.0),
            Vec2::new(spread, 2.0),
            tilt,
            1.0,
            colors::BUG_WINGS,
            segments,
        )));
    }

    out.extend(place.place(shapes::ellipse(
        Vec2::new(0.0, 1.0),
        Vec2::new(2.0, 3.5),
        0.0,
        colors::BUG_BODY,
        segments,
    )));
    out.extend(place.place(shapes::circle(
        Vec2::new(0.0, -2.0),
        1.8,
        colors::BUG_BODY,
        segments,
    )));
    for x in [-0.8, 0.8] {
        out.extend(place.place(shapes::circle(Vec2::new(x, -2.5), 0.5, colors::BUG_EYES, 8)));
    }
}

fn portal_swirl(out: &mut Vec<Vertex>, portal: &Portal, segments: u32) {
    let base = match portal.destination {
        Dimension::Finale => colors::PORTAL_FINALE,
        _ => colors::PORTAL_SURVIVAL,
    };
    let center = grid_to_pixels(portal.pos);
    let radius = PORTAL_RADIUS * CELL_PX;

    for i in 1..=3 {
        let spin = portal.pulse + i as f32 * (PI / 1.5);
        out.extend(shapes::ellipse_outline(
            center,
            Vec2::new(radius, radius * 0.4),
            spin,
            3.0,
            base,
            segments,
        ));
    }

    let breathe = 0.8 + (portal.pulse * 2.0).sin() * 0.2;
    out.extend(shapes::circle(
        center,
        radius * breathe,
        with_alpha(base, 0.2),
        segments,
    ));
}

fn target_marker(out: &mut Vec<Vertex>, center: Vec2, segments: u32) {
    for i in 0..8 {
        let dir = Vec2::from_angle(i as f32 / 8.0 * TAU);
        out.extend(shapes::line(center, center + dir * 40.0, 1.0, colors::TARGET_MARKER));
    }
    for ring in 1..=2 {
        let r = ring as f32 * 20.0;
        out.extend(shapes::ring(center, r - 0.5, r + 0.5, colors::TARGET_MARKER, segments));
    }
}

fn spider(out: &mut Vec<Vertex>, avatar: &Avatar, settings: &Settings, segments: u32, time_secs: f32) {
    let center = grid_to_pixels(avatar.pos);
    let body = rgb_hex(avatar.body_color, 1.0);
    let accent = rgb_hex(avatar.accent_color, 1.0);

    let place = if avatar.dead {
        if !settings.effective_death_tumble() {
            return;
        }
        // Flip, spin and fly off over one second
        let t = avatar.death_ticks as f32;
        let shrink = (1.0 - t / 60.0).max(0.0);
        if shrink <= 0.0 {
            return;
        }
        Placement::at(center)
            .scaled(Vec2::new(shrink * (t * 0.2).cos(), shrink))
            .rotated(t * 0.1)
            .shifted(Vec2::new(t * 2.0, -t * 3.0))
    } else {
        Placement::at(center).rotated(avatar.angle + FRAC_PI_2)
    };

    let flashing = avatar.is_invulnerable()
        && settings.effective_damage_flash()
        && (time_secs * 20.0).floor() as i64 % 2 == 0;
    if !avatar.dead && !flashing {
        out.extend(shapes::circle(center, 16.0, with_alpha(body, 0.25), segments));
    }

    // Legs, jointed, four per side
    for i in 0..4 {
        let row = i as f32 - 1.5;
        for side in [1.0, -1.0] {
            let joints = [
                Vec2::new(8.0 * side, row * 4.0),
                Vec2::new(18.0 * side, row * 8.0),
                Vec2::new(24.0 * side, row * 15.0),
            ];
            out.extend(place.place(shapes::polyline(&joints, false, 1.8, accent)));
        }
    }

    // Shell, then the radioactive abdomen on top
    out.extend(place.place(shapes::ellipse(
        Vec2::ZERO,
        Vec2::new(11.0, 13.0),
        0.0,
        body,
        segments,
    )));
    out.extend(place.place(shapes::ellipse(
        Vec2::ZERO,
        Vec2::new(10.0, 12.0),
        0.0,
        colors::SPIDER_SHELL,
        segments,
    )));
    out.extend(place.place(shapes::ellipse_outline(
        Vec2::ZERO,
        Vec2::new(10.0, 14.0),
        0.0,
        2.0,
        accent,
        segments,
    )));
    out.extend(place.place(shapes::circle(Vec2::ZERO, 6.0, with_alpha(body, 0.8), segments)));

    for (pos, r) in [
        (Vec2::new(0.0, 4.0), 2.0),
        (Vec2::new(-3.0, 8.0), 1.5),
        (Vec2::new(3.0, 8.0), 1.5),
    ] {
        out.extend(place.place(shapes::circle(pos, r, accent, 8)));
    }
    for x in [-4.0, 4.0] {
        out.extend(place.place(shapes::circle(Vec2::new(x, -8.0), 2.5, colors::SPIDER_EYES, 8)));
    }
}

/// Health and ammo bars floating above the avatar
fn bars(out: &mut Vec<Vertex>, avatar: &Avatar) {
    const WIDTH: f32 = 40.0;
    const HEIGHT: f32 = 4.0;
    let center = grid_to_pixels(avatar.pos);
    let left = center.x - WIDTH / 2.0;

    let health = Vec2::new(left, center.y - 38.0);
    out.extend(shapes::rect(health, Vec2::new(WIDTH, HEIGHT), colors::HEALTH_BACK));
    out.extend(shapes::rect(
        health,
        Vec2::new(WIDTH * avatar.health_fraction(), HEIGHT),
        colors::HEALTH_FILL,
    ));

    let ammo = Vec2::new(left, center.y - 45.0);
    out.extend(shapes::rect(ammo, Vec2::new(WIDTH, HEIGHT), colors::AMMO_BACK));
    out.extend(shapes::rect(
        ammo,
        Vec2::new(WIDTH * avatar.ammo_fraction(), HEIGHT),
        rgb_hex(avatar.body_color, 1.0),
    ));
}

/// The closing screen: a big spider spinning in the dark
fn finale_scene(out: &mut Vec<Vertex>, avatar: &Avatar, segments: u32, time_secs: f32) {
    out.extend(shapes::rect(
        Vec2::ZERO,
        Vec2::splat(CANVAS_PX),
        colors::FINALE_BACKDROP,
    ));

    let zoom = 2.0 + time_secs.sin();
    let place = Placement::at(Vec2::splat(CANVAS_PX / 2.0))
        .rotated(time_secs)
        .scaled(Vec2::splat(zoom));
    let body = rgb_hex(avatar.body_color, 1.0);
    let accent = rgb_hex(avatar.accent_color, 1.0);

    out.extend(place.place(shapes::circle(Vec2::ZERO, 45.0, with_alpha(body, 0.2), segments)));
    for i in 0..8 {
        let dir = Vec2::from_angle(i as f32 / 8.0 * TAU);
        out.extend(place.place(shapes::line(dir * 20.0, dir * 60.0, 5.0, accent)));
    }
    out.extend(place.place(shapes::ellipse(
        Vec2::ZERO,
        Vec2::new(30.0, 40.0),
        0.0,
        body,
        segments,
    )));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dimension;

    fn in_canvas(v: &Vertex) -> bool {
        let margin = 400.0;
        v.position
            .iter()
            .all(|c| c.is_finite() && *c > -margin && *c < CANVAS_PX + margin)
    }

    #[test]
    fn test_fresh_state_draws_something_on_canvas() {
        let state = GameState::new(3);
        let verts = build_scene(&state, &Settings::default(), 0.0);
        assert!(!verts.is_empty());
        assert_eq!(verts.len() % 3, 0, "triangle list");
        assert!(verts.iter().all(in_canvas));
    }

    #[test]
    fn test_grid_toggle() {
        let state = GameState::new(3);
        let with_grid = build_scene(&state, &Settings::default(), 0.0).len();
        let settings = Settings {
            grid_lines: false,
            ..Default::default()
        };
        let without = build_scene(&state, &settings, 0.0).len();
        // Two lines per index, six vertices per line
        assert_eq!(with_grid - without, (GRID_SIZE as usize + 1) * 2 * 6);
    }

    #[test]
    fn test_splat_cap_respected() {
        let mut state = GameState::new(3);
        state.prey.clear();
        let settings = Settings {
            grid_lines: false,
            ..Settings::from_preset(crate::QualityPreset::Low)
        };
        for _ in 0..settings.max_splats() + 10 {
            let splat = crate::sim::WebSplat::new(Vec2::new(20.0, 20.0), &mut state.rng);
            state.splats.push(splat);
        }
        let capped = build_scene(&state, &settings, 0.0);

        // Dropping the ten oldest must not change the frame
        state.splats.drain(..10);
        let newest = build_scene(&state, &settings, 0.0);
        assert_eq!(capped.len(), newest.len());
        assert!(
            capped
                .iter()
                .zip(&newest)
                .all(|(a, b)| a.position == b.position && a.color == b.color)
        );
    }

    #[test]
    fn test_dead_spider_vanishes_after_tumble() {
        let mut state = GameState::new(3);
        state.prey.clear();
        state.avatar.dead = true;
        state.avatar.death_ticks = 10;
        let settings = Settings {
            grid_lines: false,
            ..Default::default()
        };
        let tumbling = build_scene(&state, &settings, 0.0).len();
        state.avatar.death_ticks = 60;
        let gone = build_scene(&state, &settings, 0.0).len();
        assert!(tumbling > 0);
        assert_eq!(gone, 0);
    }

    #[test]
    fn test_finale_replaces_world() {
        let mut state = GameState::new(3);
        dimension::enter(&mut state, Dimension::Survival);
        dimension::enter(&mut state, Dimension::Finale);
        let verts = build_scene(&state, &Settings::default(), 1.5);
        // Backdrop covers the canvas first
        assert_eq!(verts[0].color, colors::FINALE_BACKDROP);
        assert!(verts.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_rock_phases_draw() {
        let mut state = GameState::new(3);
        state.prey.clear();
        let settings = Settings {
            grid_lines: false,
            ..Default::default()
        };
        let base = build_scene(&state, &settings, 0.0).len();

        crate::sim::attack::launch_attack(&mut state);
        for _ in 0..40 {
            let before = build_scene(&state, &settings, 0.0).len();
            assert!(before > base);
            state.attacks[0].update();
        }
    }
}
