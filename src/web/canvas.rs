//! Canvas surface the birds are drawn on during the presentation.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use crate::birds::Viewport;
use crate::error::GameError;
use crate::trajectory::BirdPose;

const CANVAS_ID: &str = "fc-bird-canvas";
const BASE_STYLE: &str = "position:absolute; inset:0; width:100%; height:100%; z-index:10;";

pub struct BirdCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    container: HtmlElement,
}

impl BirdCanvas {
    /// Create (or reuse) the bird canvas inside `container`.
    pub fn attach(doc: &Document, container: &HtmlElement) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
            el.dyn_into()?
        } else {
            let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
            c.set_id(CANVAS_ID);
            container.append_child(&c)?;
            c
        };
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(GameError::NoCanvasContext)?
            .dyn_into()?;
        let surface = Self {
            canvas,
            ctx,
            container: container.clone(),
        };
        surface.set_active(false);
        Ok(surface)
    }

    /// Match the backing store to the container; this also wipes the surface.
    pub fn fit_to_container(&self) -> Viewport {
        let w = self.container.client_width().max(0) as u32;
        let h = self.container.client_height().max(0) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        Viewport::new(w as f64, h as f64)
    }

    pub fn set_active(&self, active: bool) {
        let display = if active { "block" } else { "none" };
        self.canvas
            .set_attribute("style", &format!("{BASE_STYLE} display:{display};"))
            .ok();
    }

    pub fn clear(&self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    pub fn draw(&self, poses: &[BirdPose]) -> Result<(), JsValue> {
        self.clear();
        for pose in poses {
            self.ctx.save();
            let drawn = draw_bird(&self.ctx, pose);
            self.ctx.restore();
            drawn?;
        }
        Ok(())
    }
}

fn draw_bird(ctx: &CanvasRenderingContext2d, pose: &BirdPose) -> Result<(), JsValue> {
    let s = pose.size;
    ctx.translate(pose.x, pose.y)?;
    ctx.rotate(pose.heading)?;

    ctx.set_shadow_blur(10.0);
    ctx.set_shadow_color("rgba(0,0,0,0.3)");

    // Body
    ctx.set_fill_style_str(pose.color);
    ctx.begin_path();
    ctx.arc(0.0, 0.0, s, 0.0, TAU)?;
    ctx.fill();

    // Wings, mirrored around the heading axis
    for side in [-1.0, 1.0] {
        ctx.begin_path();
        ctx.move_to(0.0, 0.0);
        ctx.line_to(-s * 0.8, side * (s * 1.5 - pose.flap));
        ctx.line_to(-s * 1.5, 0.0);
        ctx.fill();
    }

    // Eye
    ctx.set_fill_style_str("white");
    ctx.begin_path();
    ctx.arc(s * 0.4, -s * 0.2, s * 0.2, 0.0, TAU)?;
    ctx.fill();
    ctx.set_fill_style_str("black");
    ctx.begin_path();
    ctx.arc(s * 0.45, -s * 0.2, s * 0.1, 0.0, TAU)?;
    ctx.fill();
    Ok(())
}
