//! Widget Geometry
//!
//! Integer rectangles in screen space, the nine drag/resize handles, and the
//! pure functions the interaction controller is built on: hit-testing a pointer
//! against the handles and computing constrained bounds for a drag delta.

use serde::{Deserialize, Serialize};

/// Smallest width a resize may produce.
pub const MIN_WIDTH: i32 = 50;
/// Smallest height a resize may produce.
pub const MIN_HEIGHT: i32 = 30;
/// Thickness of the corner squares and edge strips.
pub const HANDLE_MARGIN: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - origin`, saturating at the `i32` range.
    pub fn delta_from(self, origin: Point) -> Point {
        Point::new(self.x.saturating_sub(origin.x), self.y.saturating_sub(origin.y))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle. `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Build from edge coordinates.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn translated(&self, delta: Point) -> Rect {
        Rect::new(
            self.x.saturating_add(delta.x),
            self.y.saturating_add(delta.y),
            self.width,
            self.height,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        self.width > 0
            && self.height > 0
            && p.x >= self.left()
            && p.x < self.right()
            && p.y >= self.top()
            && p.y < self.bottom()
    }

    /// True when the rectangle respects `MIN_WIDTH` x `MIN_HEIGHT`.
    pub fn meets_minimum(&self) -> bool {
        self.width >= MIN_WIDTH && self.height >= MIN_HEIGHT
    }
}

/// A named hit-test region of the widget while drag/resize mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeHandle {
    None,
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    Body,
}

impl ResizeHandle {
    pub fn moves_left_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Left | ResizeHandle::BottomLeft
        )
    }

    pub fn moves_right_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopRight | ResizeHandle::Right | ResizeHandle::BottomRight
        )
    }

    pub fn moves_top_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::TopLeft | ResizeHandle::Top | ResizeHandle::TopRight
        )
    }

    pub fn moves_bottom_edge(&self) -> bool {
        matches!(
            self,
            ResizeHandle::BottomLeft | ResizeHandle::Bottom | ResizeHandle::BottomRight
        )
    }

    /// Pointer affordance for this handle.
    pub fn cursor(&self) -> CursorShape {
        match self {
            ResizeHandle::Body => CursorShape::Move,
            ResizeHandle::Left | ResizeHandle::Right => CursorShape::ResizeHorizontal,
            ResizeHandle::Top | ResizeHandle::Bottom => CursorShape::ResizeVertical,
            ResizeHandle::TopLeft | ResizeHandle::BottomRight => CursorShape::ResizeDiagonalMain,
            ResizeHandle::TopRight | ResizeHandle::BottomLeft => CursorShape::ResizeDiagonalAnti,
            ResizeHandle::None => CursorShape::Default,
        }
    }

    /// Classify `pointer` against `bounds`.
    ///
    /// Corners win over edges where they overlap; the body is the interior
    /// inset by `HANDLE_MARGIN` on every side.
    pub fn hit_test(bounds: Rect, pointer: Point) -> ResizeHandle {
        let m = HANDLE_MARGIN;
        let (l, t, r, b) = (bounds.left(), bounds.top(), bounds.right(), bounds.bottom());
        let inner_w = bounds.width.saturating_sub(2 * m);
        let inner_h = bounds.height.saturating_sub(2 * m);
        let (l_in, t_in) = (l.saturating_add(m), t.saturating_add(m));
        let (r_in, b_in) = (r.saturating_sub(m), b.saturating_sub(m));

        let regions = [
            (ResizeHandle::TopLeft, Rect::new(l, t, m, m)),
            (ResizeHandle::TopRight, Rect::new(r_in, t, m, m)),
            (ResizeHandle::BottomLeft, Rect::new(l, b_in, m, m)),
            (ResizeHandle::BottomRight, Rect::new(r_in, b_in, m, m)),
            (ResizeHandle::Left, Rect::new(l, t_in, m, inner_h)),
            (ResizeHandle::Right, Rect::new(r_in, t_in, m, inner_h)),
            (ResizeHandle::Top, Rect::new(l_in, t, inner_w, m)),
            (ResizeHandle::Bottom, Rect::new(l_in, b_in, inner_w, m)),
            (ResizeHandle::Body, Rect::new(l_in, t_in, inner_w, inner_h)),
        ];

        regions
            .iter()
            .find(|(_, region)| region.contains(pointer))
            .map(|(handle, _)| *handle)
            .unwrap_or(ResizeHandle::None)
    }

    /// Bounds after dragging this handle by `delta`, starting from `original`.
    ///
    /// The body translates. Edges move on their own axis only; corners move
    /// both adjacent edges. When the result would fall under the minimum size
    /// the dragged edge stops at the minimum distance from the fixed opposite
    /// edge.
    ///
    /// Edges are computed in `i64` and saturated back into `i32`, so extreme
    /// deltas pin the rectangle at the edge of the coordinate space.
    pub fn apply(&self, original: Rect, delta: Point) -> Rect {
        match self {
            ResizeHandle::None => original,
            ResizeHandle::Body => original.translated(delta),
            _ => {
                let (dx, dy) = (i64::from(delta.x), i64::from(delta.y));
                let min_w = i64::from(MIN_WIDTH);
                let min_h = i64::from(MIN_HEIGHT);
                let mut left = i64::from(original.x);
                let mut top = i64::from(original.y);
                let mut right = left + i64::from(original.width);
                let mut bottom = top + i64::from(original.height);

                if self.moves_left_edge() {
                    left += dx;
                }
                if self.moves_right_edge() {
                    right += dx;
                }
                if self.moves_top_edge() {
                    top += dy;
                }
                if self.moves_bottom_edge() {
                    bottom += dy;
                }

                if right - left < min_w {
                    if self.moves_left_edge() {
                        left = right - min_w;
                    } else {
                        right = left + min_w;
                    }
                }
                if bottom - top < min_h {
                    if self.moves_top_edge() {
                        top = bottom - min_h;
                    } else {
                        bottom = top + min_h;
                    }
                }

                let (x, width) = fit_span(left, right, min_w, self.moves_left_edge());
                let (y, height) = fit_span(top, bottom, min_h, self.moves_top_edge());
                Rect::new(x, y, width, height)
            }
        }
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Fit an edge pair into `i32` origin and extent. A span wider than
/// `i32::MAX` is shortened from the moving edge so the fixed edge stays put.
fn fit_span(mut start: i64, mut end: i64, min: i64, start_moves: bool) -> (i32, i32) {
    let max = i64::from(i32::MAX);
    if end - start > max {
        if start_moves {
            start = end - max;
        } else {
            end = start + max;
        }
    }
    let origin = saturate(start);
    let extent = (end - i64::from(origin)).clamp(min, max) as i32;
    (origin, extent)
}

/// Pointer affordance shown by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorShape {
    Default,
    Move,
    ResizeHorizontal,
    ResizeVertical,
    /// Top-left to bottom-right diagonal
    ResizeDiagonalMain,
    /// Top-right to bottom-left diagonal
    ResizeDiagonalAnti,
}
