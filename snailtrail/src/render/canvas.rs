//! Drawing surface abstraction.
//!
//! The trail engine never owns a surface. It selects one of the snail pens
//! and issues path operations clipped to a rectangle; the map window decides
//! what those operations turn into.

/// Number of discrete climb-rate colours.
pub const NUM_SNAIL_COLOURS: usize = 15;

/// Integer screen coordinate, pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another point.
    pub fn manhattan(&self, other: &ScreenPoint) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Clip rectangle in screen pixels (`right`/`bottom` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle covering a `width` × `height` surface.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// A snail pen: index into the climb-rate palette, always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnailColour(u8);

impl SnailColour {
    /// Pen used for the contest overlay.
    pub const MIDDLE: SnailColour = SnailColour((NUM_SNAIL_COLOURS / 2) as u8);

    /// Create a pen, clamping out-of-range buckets to the palette.
    pub fn new(bucket: usize) -> Self {
        Self(bucket.min(NUM_SNAIL_COLOURS - 1) as u8)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Operations the trail engine issues against a surface.
pub trait Canvas {
    /// Select the pen for subsequent lines.
    fn select_pen(&mut self, pen: SnailColour);

    /// Start a new path at `to` without drawing.
    fn move_to(&mut self, to: ScreenPoint);

    /// Draw from the current position to `to`, clipped to `clip`.
    fn line_to(&mut self, to: ScreenPoint, clip: &ClipRect);

    /// Draw an open polyline clipped to `clip`.
    fn clipped_polyline(&mut self, points: &[ScreenPoint], clip: &ClipRect);
}

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasOp {
    SelectPen(SnailColour),
    MoveTo(ScreenPoint),
    LineTo(ScreenPoint),
    Polyline(Vec<ScreenPoint>),
}

/// Canvas that records operations instead of drawing them.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    ops: Vec<CanvasOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Number of line segments drawn by `line_to`.
    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::LineTo(_)))
            .count()
    }

    /// Number of paths started by `move_to`.
    pub fn move_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::MoveTo(_)))
            .count()
    }

    /// Every polyline drawn, in order.
    pub fn polylines(&self) -> Vec<&[ScreenPoint]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                CanvasOp::Polyline(points) => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Pen active when each `line_to` was issued.
    pub fn line_pens(&self) -> Vec<SnailColour> {
        let mut pen = None;
        let mut pens = Vec::new();
        for op in &self.ops {
            match op {
                CanvasOp::SelectPen(p) => pen = Some(*p),
                CanvasOp::LineTo(_) => {
                    if let Some(p) = pen {
                        pens.push(p);
                    }
                }
                _ => {}
            }
        }
        pens
    }
}

impl Canvas for RecordingCanvas {
    fn select_pen(&mut self, pen: SnailColour) {
        self.ops.push(CanvasOp::SelectPen(pen));
    }

    fn move_to(&mut self, to: ScreenPoint) {
        self.ops.push(CanvasOp::MoveTo(to));
    }

    fn line_to(&mut self, to: ScreenPoint, _clip: &ClipRect) {
        self.ops.push(CanvasOp::LineTo(to));
    }

    fn clipped_polyline(&mut self, points: &[ScreenPoint], _clip: &ClipRect) {
        self.ops.push(CanvasOp::Polyline(points.to_vec()));
    }
}
