use vello_cpu::kurbo::Shape as _;

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{StarloopError, StarloopResult};
use crate::render::backend::{FrameRGBA, RasterBackend, RenderSettings};
use crate::scene::model::{DiscFill, GradientStop, Primitive, SceneFrame};

const CIRCLE_TOLERANCE: f64 = 0.1;
// Trails shorter than this (in pixels) have no usable gradient direction.
const MIN_TRAIL_PX: f64 = 1e-3;

/// CPU backend powered by `vello_cpu`.
///
/// Each frame starts from a transparent surface (or `clear_rgba` when set), so the output keeps
/// a real alpha channel for overlay compositing.
pub struct CpuBackend {
    settings: RenderSettings,
}

impl CpuBackend {
    /// Create a CPU backend with the given settings.
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    /// Settings this backend was created with.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

impl RasterBackend for CpuBackend {
    #[tracing::instrument(level = "trace", skip(self, scene), fields(t = scene.time_secs, prims = scene.primitives.len()))]
    fn rasterize(&mut self, scene: &SceneFrame, canvas: Canvas) -> StarloopResult<FrameRGBA> {
        canvas
            .validate()
            .map_err(|e| StarloopError::rasterization(format!("bad surface: {e}")))?;
        let width_u16 = u16::try_from(canvas.width)
            .map_err(|_| StarloopError::rasterization("surface width exceeds u16::MAX"))?;
        let height_u16 = u16::try_from(canvas.height)
            .map_err(|_| StarloopError::rasterization("surface height exceeds u16::MAX"))?;

        let point_scale = self.settings.resolve_point_scale(canvas);
        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(canvas.width),
                f64::from(canvas.height),
            ));
        }

        for prim in &scene.primitives {
            if prim.is_invisible() {
                continue;
            }
            draw_primitive(&mut ctx, prim, canvas, point_scale)?;
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn draw_primitive(
    ctx: &mut vello_cpu::RenderContext,
    prim: &Primitive,
    canvas: Canvas,
    point_scale: f64,
) -> StarloopResult<()> {
    match prim {
        Primitive::Disc {
            center,
            radius,
            color,
            fill,
        } => {
            let center_px = point_to_cpu(canvas.percent_to_px(*center));
            let radius_px = radius * point_scale;
            if !(radius_px.is_finite() && center_px.x.is_finite() && center_px.y.is_finite()) {
                return Err(StarloopError::rasterization(format!(
                    "disc has non-finite geometry (center {center:?}, radius {radius})"
                )));
            }
            match fill {
                DiscFill::Solid => ctx.set_paint(color_to_cpu(*color)),
                DiscFill::Radial => {
                    let stops = [
                        (0.0_f32, color_to_cpu(*color)),
                        (1.0_f32, color_to_cpu(Rgba8 { a: 0, ..*color })),
                    ];
                    let gradient =
                        vello_cpu::peniko::Gradient::new_radial(center_px, radius_px as f32)
                            .with_stops(&stops[..]);
                    ctx.set_paint(gradient);
                }
            }
            let path = vello_cpu::kurbo::Circle::new(center_px, radius_px).to_path(CIRCLE_TOLERANCE);
            ctx.fill_path(&path);
        }
        Primitive::Trail {
            from,
            to,
            width,
            stops,
        } => {
            let from_px = point_to_cpu(canvas.percent_to_px(*from));
            let to_px = point_to_cpu(canvas.percent_to_px(*to));
            let width_px = width * point_scale;
            if !(width_px.is_finite()
                && from_px.x.is_finite()
                && from_px.y.is_finite()
                && to_px.x.is_finite()
                && to_px.y.is_finite())
            {
                return Err(StarloopError::rasterization(
                    "trail has non-finite geometry".to_string(),
                ));
            }
            if (to_px - from_px).hypot() < MIN_TRAIL_PX {
                return Ok(());
            }

            let cpu_stops = gradient_stops_to_cpu(stops);
            let gradient =
                vello_cpu::peniko::Gradient::new_linear(from_px, to_px).with_stops(&cpu_stops[..]);
            ctx.set_paint(gradient);
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(width_px).with_caps(vello_cpu::kurbo::Cap::Round),
            );

            let mut path = vello_cpu::kurbo::BezPath::new();
            path.move_to(from_px);
            path.line_to(to_px);
            ctx.stroke_path(&path);
        }
    }
    Ok(())
}

fn gradient_stops_to_cpu(stops: &[GradientStop]) -> Vec<(f32, vello_cpu::peniko::Color)> {
    stops
        .iter()
        .map(|s| (s.offset.clamp(0.0, 1.0) as f32, color_to_cpu(s.color)))
        .collect()
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
