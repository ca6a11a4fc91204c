//! Canvas 2D frame drawing
//!
//! Pure presentation: reads the entity lists the sim produced this frame and
//! paints them. Nothing here mutates game state.

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use crate::sim::{DotStatus, GameState};

/// Base dot color (from the classic palette)
const DOT_RGB: (u8, u8, u8) = (29, 133, 240);

/// Draw one frame: clear, then dots (alpha from their opacity tier), then
/// live particles.
pub fn draw_frame(ctx: &CanvasRenderingContext2d, state: &GameState) {
    ctx.clear_rect(0.0, 0.0, state.width as f64, state.height as f64);

    for dot in &state.dots {
        if dot.status != DotStatus::Alive {
            continue;
        }
        let tier = state.opacity_tier(dot.points);
        fill_circle(
            ctx,
            dot.x as f64,
            dot.y as f64,
            dot.radius as f64,
            tier as f64 / 10.0,
        );
    }

    // Particles use the plain dot fill at full opacity.
    for p in &state.particles {
        if p.is_visible() {
            fill_circle(ctx, p.pos.x as f64, p.pos.y as f64, p.radius as f64, 1.0);
        }
    }
}

fn fill_circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, alpha: f64) {
    let (r, g, b) = DOT_RGB;
    ctx.set_fill_style_str(&format!("rgba({r},{g},{b},{alpha:.2})"));
    ctx.begin_path();
    let _ = ctx.arc(x, y, radius, 0.0, TAU);
    ctx.fill();
    ctx.close_path();
}
