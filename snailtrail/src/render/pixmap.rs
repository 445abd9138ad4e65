//! Raster drawing surface backed by a `tiny_skia::Pixmap`.
//!
//! Segments are clipped to the requested rectangle before stroking, so lines
//! never spill outside the map area even when the pixmap is larger.

use std::path::Path;

use thiserror::Error;
use tiny_skia::{Color, LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::canvas::{Canvas, ClipRect, ScreenPoint, SnailColour, NUM_SNAIL_COLOURS};
use super::clip::clip_segment;

/// Default map background.
pub const MAP_BACKGROUND: Color = Color::WHITE;

/// Thinnest pen, pixels.
const MIN_PEN_WIDTH: f32 = 2.0;

/// Extra width of the strongest climb pen over the thinnest, pixels.
const CLIMB_PEN_EXTRA: f32 = 4.0;

/// Errors from raster surfaces.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to write PNG: {0}")]
    Encode(String),
}

/// One snail pen: colour and stroke width.
#[derive(Debug, Clone, Copy)]
struct Pen {
    colour: Color,
    width: f32,
}

/// Sink-to-climb palette: red through grey to green, climb pens thicker.
fn snail_palette() -> [Pen; NUM_SNAIL_COLOURS] {
    let middle = NUM_SNAIL_COLOURS / 2;
    let mut pens = [Pen {
        colour: Color::BLACK,
        width: MIN_PEN_WIDTH,
    }; NUM_SNAIL_COLOURS];

    for (i, pen) in pens.iter_mut().enumerate() {
        let sink = (0xc0, 0x20, 0x20);
        let neutral = (0xa0, 0xa0, 0xa0);
        let climb = (0x10, 0xa0, 0x30);
        let (from, to, f) = if i < middle {
            (sink, neutral, i as f32 / middle as f32)
        } else {
            let span = (NUM_SNAIL_COLOURS - 1 - middle).max(1) as f32;
            (neutral, climb, (i - middle) as f32 / span)
        };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
        pen.colour = Color::from_rgba8(
            lerp(from.0, to.0),
            lerp(from.1, to.1),
            lerp(from.2, to.2),
            0xff,
        );
        if i > middle {
            pen.width = MIN_PEN_WIDTH + CLIMB_PEN_EXTRA * f;
        }
    }
    pens
}

/// Canvas that rasterises trail operations onto a pixmap.
pub struct PixmapCanvas {
    pixmap: Pixmap,
    palette: [Pen; NUM_SNAIL_COLOURS],
    pen: SnailColour,
    cursor: Option<ScreenPoint>,
}

impl PixmapCanvas {
    /// Create a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self, SurfaceError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(SurfaceError::InvalidSize { width, height })?;
        pixmap.fill(background);
        Ok(Self {
            pixmap,
            palette: snail_palette(),
            pen: SnailColour::MIDDLE,
            cursor: None,
        })
    }

    /// Clip rectangle covering the whole surface.
    pub fn bounds(&self) -> ClipRect {
        ClipRect::from_size(self.pixmap.width(), self.pixmap.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Clear to `background` and forget the current path.
    pub fn clear(&mut self, background: Color) {
        self.pixmap.fill(background);
        self.cursor = None;
    }

    /// Write the surface as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        self.pixmap
            .save_png(path.as_ref())
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }

    fn stroke_segment(&mut self, a: ScreenPoint, b: ScreenPoint, clip: &ClipRect) {
        let Some(((x0, y0), (x1, y1))) = clip_segment(a, b, clip) else {
            return;
        };
        let mut builder = PathBuilder::new();
        builder.move_to(x0 as f32, y0 as f32);
        builder.line_to(x1 as f32, y1 as f32);
        let Some(path) = builder.finish() else {
            return;
        };

        let pen = self.palette[self.pen.index()];
        let mut paint = Paint::default();
        paint.set_color(pen.colour);
        paint.anti_alias = true;
        let stroke = Stroke {
            width: pen.width,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

impl Canvas for PixmapCanvas {
    fn select_pen(&mut self, pen: SnailColour) {
        self.pen = pen;
    }

    fn move_to(&mut self, to: ScreenPoint) {
        self.cursor = Some(to);
    }

    fn line_to(&mut self, to: ScreenPoint, clip: &ClipRect) {
        if let Some(from) = self.cursor {
            self.stroke_segment(from, to, clip);
        }
        self.cursor = Some(to);
    }

    fn clipped_polyline(&mut self, points: &[ScreenPoint], clip: &ClipRect) {
        for pair in points.windows(2) {
            self.stroke_segment(pair[0], pair[1], clip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn painted(canvas: &PixmapCanvas) -> usize {
        canvas
            .pixmap()
            .pixels()
            .iter()
            .filter(|p| p.alpha() > 0)
            .count()
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            PixmapCanvas::new(0, 10, Color::TRANSPARENT),
            Err(SurfaceError::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_palette_runs_sink_to_climb() {
        let palette = snail_palette();
        let sink = palette[0].colour.to_color_u8();
        let climb = palette[NUM_SNAIL_COLOURS - 1].colour.to_color_u8();
        assert!(sink.red() > sink.green());
        assert!(climb.green() > climb.red());
        assert!(palette[NUM_SNAIL_COLOURS - 1].width > palette[0].width);
    }

    #[test]
    fn test_line_requires_move() {
        let mut canvas = PixmapCanvas::new(50, 50, Color::TRANSPARENT).unwrap();
        let clip = canvas.bounds();
        canvas.line_to(ScreenPoint::new(40, 40), &clip);
        assert_eq!(painted(&canvas), 0);

        canvas.line_to(ScreenPoint::new(10, 40), &clip);
        assert!(painted(&canvas) > 0);
    }

    #[test]
    fn test_segments_stay_inside_clip() {
        let mut canvas = PixmapCanvas::new(100, 100, Color::TRANSPARENT).unwrap();
        let clip = ClipRect::new(0, 0, 50, 100);
        canvas.select_pen(SnailColour::new(0));
        canvas.move_to(ScreenPoint::new(10, 50));
        canvas.line_to(ScreenPoint::new(95, 50), &clip);

        let width = canvas.pixmap().width() as usize;
        let right_half = canvas
            .pixmap()
            .pixels()
            .iter()
            .enumerate()
            .filter(|(i, p)| i % width >= 55 && p.alpha() > 0)
            .count();
        assert!(painted(&canvas) > 0);
        assert_eq!(right_half, 0);
    }

    #[test]
    fn test_polyline_and_png() {
        let mut canvas = PixmapCanvas::new(64, 64, Color::WHITE).unwrap();
        let clip = canvas.bounds();
        canvas.clipped_polyline(
            &[ScreenPoint::new(5, 5), ScreenPoint::new(60, 5), ScreenPoint::new(60, 60)],
            &clip,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        canvas.save_png(&path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
