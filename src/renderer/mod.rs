//! Draw-list generation
//!
//! The simulation draws into a CPU-side `DrawList`: a screen-space triangle
//! list plus text labels. Uploading it to a GPU or canvas is the host's job.

pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use vertex::{Vertex, colors};
pub use viewport::{Projected, Viewport};

use glam::{Vec2, Vec3};

use crate::consts::*;
use crate::sim::GameState;
use crate::sim::entity::Entity;

/// A text draw request
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub pos: Vec2,
    pub text: String,
    pub color: [f32; 4],
    pub size: f32,
}

/// One frame of geometry
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub vertices: Vec<Vertex>,
    pub labels: Vec<Label>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.labels.clear();
    }

    /// Vertex data ready for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::circle(
            center,
            radius,
            color,
            shapes::segments_for(radius),
        ));
    }

    pub fn ring(&mut self, center: Vec2, inner: f32, outer: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::ring(
            center,
            inner,
            outer,
            color,
            shapes::segments_for(outer),
        ));
    }

    pub fn rect(&mut self, center: Vec2, half_extents: Vec2, color: [f32; 4]) {
        self.vertices
            .extend(shapes::quad(center, half_extents, color));
    }

    pub fn line(&mut self, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::line(a, b, width, color));
    }

    /// Horizontal fill bar centered on `center`
    pub fn bar(&mut self, center: Vec2, size: Vec2, fraction: f32, fg: [f32; 4], bg: [f32; 4]) {
        let half = size * 0.5;
        self.rect(center, half, bg);
        let fill = size.x * fraction.clamp(0.0, 1.0);
        if fill > 0.0 {
            let left = center.x - half.x;
            self.rect(
                Vec2::new(left + fill * 0.5, center.y),
                Vec2::new(fill * 0.5, half.y),
                fg,
            );
        }
    }

    pub fn label(&mut self, pos: Vec2, text: String, color: [f32; 4], size: f32) {
        self.labels.push(Label {
            pos,
            text,
            color,
            size,
        });
    }
}

/// Compose a full frame: world, effects, then HUD
pub fn render_world(state: &GameState, viewport: &Viewport) -> DrawList {
    let mut list = DrawList::new();
    let screen = Vec2::new(viewport.width, viewport.height);
    list.rect(screen * 0.5, screen * 0.5, colors::BACKGROUND);

    // Rails converge on the horizon
    for x in [-WORLD_HALF_WIDTH, WORLD_HALF_WIDTH] {
        let near = viewport.project(Vec3::new(x, 0.0, PLAYER_Z));
        let far = viewport.project(Vec3::new(x, 0.0, WORLD_MIN_Z));
        if let (Some(a), Some(b)) = (near, far) {
            list.line(a.pos, b.pos, 2.0, colors::RAIL);
        }
    }

    // Painter's order: farthest enemies first
    let mut enemies: Vec<_> = state.enemies.iter().collect();
    enemies.sort_by(|a, b| a.pos.z.total_cmp(&b.pos.z));
    for enemy in enemies {
        enemy.draw(&mut list, viewport);
    }
    if let Some(game) = &state.minigame {
        game.draw(&mut list, viewport);
    }
    for shot in &state.enemy_projectiles {
        shot.draw(&mut list, viewport);
    }
    for shot in &state.projectiles {
        shot.draw(&mut list, viewport);
    }
    state.particles.draw(&mut list, viewport);
    for text in &state.texts {
        text.draw(&mut list, viewport);
    }

    draw_hud(state, viewport, &mut list);
    list
}

fn draw_hud(state: &GameState, viewport: &Viewport, list: &mut DrawList) {
    let run = &state.run;
    let w = viewport.width;
    let h = viewport.height;

    let cross = viewport.aim_to_screen(state.player.aim);
    list.ring(cross, 8.0, 10.0, colors::CROSSHAIR);

    if let Some(p) = viewport.project(Vec3::new(state.player.x, 0.0, PLAYER_Z)) {
        list.rect(p.pos, Vec2::new(0.6 * p.scale, 4.0), colors::PLAYER);
    }

    list.bar(
        Vec2::new(120.0, h - 24.0),
        Vec2::new(200.0, 14.0),
        run.health / run.max_health.max(1.0),
        colors::HEALTH_FG,
        colors::HEALTH_BG,
    );
    list.label(
        Vec2::new(16.0, 16.0),
        format!("WAVE {}  SCORE {}  COINS {}", run.wave, run.score, run.coins),
        colors::DAMAGE_TEXT,
        18.0,
    );
    if state.combo.count > 1 {
        list.label(
            Vec2::new(16.0, 40.0),
            format!("COMBO x{:.1}", state.combo.multiplier()),
            colors::CRIT_TEXT,
            16.0,
        );
    }
    if run.heal_ready() {
        list.label(Vec2::new(16.0, h - 56.0), "HEAL READY".into(), colors::REWARD_TEXT, 16.0);
    }

    if let Some(boss) = state.boss() {
        list.bar(
            Vec2::new(w * 0.5, 32.0),
            Vec2::new(w * 0.6, 16.0),
            run.boss_fraction,
            colors::BOSS_BAR,
            colors::HEALTH_BG,
        );
        list.label(
            Vec2::new(w * 0.5, 52.0),
            format!("{} - PHASE {}", boss.kind.name(), boss.phase),
            colors::DAMAGE_TEXT,
            16.0,
        );
    }
    if let Some(game) = &state.minigame {
        list.label(
            Vec2::new(w * 0.5, h * 0.25),
            format!("HIT THE WEAK POINTS! {}s  x{}", game.seconds_left, game.hits),
            colors::CRIT_TEXT,
            22.0,
        );
    }
    if run.shop_open {
        list.label(Vec2::new(w * 0.5, h * 0.5), "SHOP".into(), colors::REWARD_TEXT, 28.0);
    }
    if run.game_over {
        list.label(Vec2::new(w * 0.5, h * 0.5), "GAME OVER".into(), colors::BOSS_BAR, 36.0);
    }
}
