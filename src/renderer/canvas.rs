//! Canvas 2D backend

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlVideoElement};

use super::shapes::DrawCommand;
use crate::sim::Color;

/// `HTMLMediaElement.HAVE_ENOUGH_DATA`
const HAVE_ENOUGH_DATA: u16 = 4;

/// Executes draw lists on a 2D canvas context
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    video: Option<HtmlVideoElement>,
    width: f64,
    height: f64,
}

impl CanvasRenderer {
    pub fn new(
        ctx: CanvasRenderingContext2d,
        video: Option<HtmlVideoElement>,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            ctx,
            video,
            width,
            height,
        }
    }

    pub fn render(&self, commands: &[DrawCommand]) -> Result<(), JsValue> {
        for command in commands {
            match command {
                DrawCommand::Backdrop { dim, fallback } => self.backdrop(*dim, *fallback)?,
                DrawCommand::Rect { min, size, fill } => {
                    self.ctx.set_fill_style_str(&fill.to_css());
                    self.ctx.fill_rect(
                        min.x as f64,
                        min.y as f64,
                        size.x as f64,
                        size.y as f64,
                    );
                }
                DrawCommand::Circle {
                    center,
                    radius,
                    fill,
                    stroke,
                } => {
                    self.ctx.begin_path();
                    self.ctx
                        .arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                    if let Some(fill) = fill {
                        self.ctx.set_fill_style_str(&fill.to_css());
                        self.ctx.fill();
                    }
                    if let Some((color, width)) = stroke {
                        self.ctx.set_stroke_style_str(&color.to_css());
                        self.ctx.set_line_width(*width as f64);
                        self.ctx.stroke();
                    }
                }
                DrawCommand::Text {
                    pos,
                    text,
                    size,
                    color,
                } => {
                    self.ctx.set_fill_style_str(&color.to_css());
                    self.ctx.set_font(&format!("bold {}px Arial", size));
                    self.ctx.set_text_align("center");
                    self.ctx.set_text_baseline("middle");
                    self.ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
                }
            }
        }
        Ok(())
    }

    /// Mirrored webcam frame plus dim overlay, or a solid fill until the camera is ready
    fn backdrop(&self, dim: Color, fallback: Color) -> Result<(), JsValue> {
        match &self.video {
            Some(video) if video.ready_state() >= HAVE_ENOUGH_DATA => {
                self.ctx.save();
                self.ctx.scale(-1.0, 1.0)?;
                self.ctx.draw_image_with_html_video_element_and_dw_and_dh(
                    video,
                    -self.width,
                    0.0,
                    self.width,
                    self.height,
                )?;
                self.ctx.restore();
                self.ctx.set_fill_style_str(&dim.to_css());
            }
            _ => self.ctx.set_fill_style_str(&fallback.to_css()),
        }
        self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
        Ok(())
    }
}
