//! Line clipping against the map clip rectangle (Cohen–Sutherland).

use super::canvas::{ClipRect, ScreenPoint};

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

/// A clipped segment in floating-point screen coordinates.
pub type Segment = ((f64, f64), (f64, f64));

fn outcode(x: f64, y: f64, r: &ClipRect) -> u8 {
    let mut code = INSIDE;
    if x < r.left as f64 {
        code |= LEFT;
    } else if x > r.right as f64 {
        code |= RIGHT;
    }
    if y < r.top as f64 {
        code |= TOP;
    } else if y > r.bottom as f64 {
        code |= BOTTOM;
    }
    code
}

/// Clip the segment `a`–`b` to `rect`.
///
/// Returns `None` when no part of the segment lies inside.
pub fn clip_segment(a: ScreenPoint, b: ScreenPoint, rect: &ClipRect) -> Option<Segment> {
    let (mut x0, mut y0) = (a.x as f64, a.y as f64);
    let (mut x1, mut y1) = (b.x as f64, b.y as f64);
    let (xmin, xmax) = (rect.left as f64, rect.right as f64);
    let (ymin, ymax) = (rect.top as f64, rect.bottom as f64);

    let mut code0 = outcode(x0, y0, rect);
    let mut code1 = outcode(x1, y1, rect);

    loop {
        if code0 | code1 == INSIDE {
            return Some(((x0, y0), (x1, y1)));
        }
        if code0 & code1 != INSIDE {
            return None;
        }

        let out = if code0 != INSIDE { code0 } else { code1 };
        let (x, y);
        if out & BOTTOM != 0 {
            x = x0 + (x1 - x0) * (ymax - y0) / (y1 - y0);
            y = ymax;
        } else if out & TOP != 0 {
            x = x0 + (x1 - x0) * (ymin - y0) / (y1 - y0);
            y = ymin;
        } else if out & RIGHT != 0 {
            y = y0 + (y1 - y0) * (xmax - x0) / (x1 - x0);
            x = xmax;
        } else {
            y = y0 + (y1 - y0) * (xmin - x0) / (x1 - x0);
            x = xmin;
        }

        if out == code0 {
            x0 = x;
            y0 = y;
            code0 = outcode(x0, y0, rect);
        } else {
            x1 = x;
            y1 = y;
            code1 = outcode(x1, y1, rect);
        }
    }
}
