//! Canvas2D renderer (top-down)
//!
//! World units map to CSS pixels through a single transform so the view
//! always shows `VIEW_WIDTH` world units across, y pointing up.

use glam::DVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::shapes::{TrackScene, css_color, frame_transforms, hit_zone_markers, vehicle_corners};
use crate::Settings;
use crate::sim::GameState;

/// World units visible across the canvas
const VIEW_WIDTH: f64 = 960.0;
const ASPHALT: &str = "#546e90";
const GRASS: &str = "#67c240";
const MARKING: &str = "#e0ffff";
const POINTS_PER_ARC: usize = 48;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    size: (u32, u32),
    scene: TrackScene,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement, state: &GameState) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            ctx,
            size: (canvas.width(), canvas.height()),
            scene: TrackScene::new(&state.track, POINTS_PER_ARC),
        })
    }

    /// Track a new backing-store size after the canvas was resized
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    /// Draw one frame
    pub fn render(&self, state: &GameState, settings: &Settings) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        let scale = w / VIEW_WIDTH;

        ctx.reset_transform()?;
        ctx.set_fill_style_str(GRASS);
        ctx.fill_rect(0.0, 0.0, w, h);

        // World space: origin at canvas center, y up
        ctx.set_transform(scale, 0.0, 0.0, -scale, w / 2.0, h / 2.0)?;

        ctx.set_fill_style_str(ASPHALT);
        self.fill_polyline(&self.scene.outer_boundary);

        if settings.line_markings {
            ctx.set_stroke_style_str(MARKING);
            ctx.set_line_width(2.0 / scale);
            let dash = js_sys::Array::of2(&JsValue::from_f64(10.0 / scale), &JsValue::from_f64(14.0 / scale));
            ctx.set_line_dash(&dash)?;
            for marking in &self.scene.markings {
                ctx.begin_path();
                ctx.arc(marking.center.x, marking.center.y, marking.radius, marking.start, marking.end)?;
                ctx.stroke();
            }
            ctx.set_line_dash(&js_sys::Array::new())?;
        }

        ctx.set_fill_style_str(GRASS);
        for island in &self.scene.islands {
            self.fill_polyline(island);
        }

        for transform in frame_transforms(state) {
            ctx.set_fill_style_str(&css_color(transform.color));
            self.fill_polyline(&vehicle_corners(&transform));
            if transform.is_player {
                ctx.set_stroke_style_str("#ffffff");
                ctx.set_line_width(2.0 / scale);
                ctx.stroke();
            }
        }

        if settings.show_hit_zones {
            ctx.set_stroke_style_str("#ff00ff");
            ctx.set_line_width(1.0 / scale);
            // Circles of half the collision distance touch exactly at the threshold
            let r = state.tuning.collision_distance / 2.0;
            for p in hit_zone_markers(state) {
                ctx.begin_path();
                ctx.arc(p.x, p.y, r, 0.0, std::f64::consts::TAU)?;
                ctx.stroke();
            }
        }

        ctx.reset_transform()?;
        Ok(())
    }

    /// Fill a closed polygon (leaves the path set for an optional stroke)
    fn fill_polyline(&self, points: &[DVec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
}
