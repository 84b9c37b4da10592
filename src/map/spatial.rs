use std::collections::HashMap;
use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::util::stable_unit_pair;

use super::store::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Positions {
    by_id: HashMap<NodeId, Point>,
}

impl Positions {
    pub fn get(&self, id: &NodeId) -> Option<Point> {
        self.by_id.get(id).copied()
    }

    pub fn set(&mut self, id: NodeId, position: Point) {
        self.by_id.insert(id, position);
    }

    /// Stored position, or a stable spot in the default viewport for nodes the
    /// document never placed.
    pub fn resolve(&self, id: &NodeId) -> Point {
        self.get(id).unwrap_or_else(|| {
            let (x, y) = stable_unit_pair(id.as_str());
            Point::new(100.0 + x * 400.0, 100.0 + y * 300.0)
        })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Point)> {
        self.by_id.iter()
    }
}

impl FromIterator<(NodeId, Point)> for Positions {
    fn from_iter<I: IntoIterator<Item = (NodeId, Point)>>(iter: I) -> Self {
        Self {
            by_id: iter.into_iter().collect(),
        }
    }
}

/// Pan and zoom of the graph projection: `screen = pan + content * zoom`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub pan: Point,
    pub zoom: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan: Point::ZERO,
            zoom: 1.0,
        }
    }
}

impl ViewTransform {
    pub const MIN_ZOOM: f64 = 0.1;
    pub const MAX_ZOOM: f64 = 3.0;
    pub const WHEEL_STEP: f64 = 1.1;
    pub const BUTTON_ZOOM_IN: f64 = 1.2;
    pub const BUTTON_ZOOM_OUT: f64 = 0.8;

    pub fn to_screen(&self, content: Point) -> Point {
        self.pan + content * self.zoom
    }

    pub fn to_content(&self, screen: Point) -> Point {
        (screen - self.pan) / self.zoom
    }

    /// Scales by `factor` (clamped) while the content under `anchor` stays put.
    pub fn zoom_about(&mut self, anchor: Point, factor: f64) {
        let old_zoom = self.zoom;
        let new_zoom = (old_zoom * factor).clamp(Self::MIN_ZOOM, Self::MAX_ZOOM);
        self.pan = anchor - (anchor - self.pan) * (new_zoom / old_zoom);
        self.zoom = new_zoom;
    }

    /// Wheel input: positive `delta_y` scrolls down and zooms out.
    pub fn wheel(&mut self, pointer: Point, delta_y: f64) {
        if delta_y > 0.0 {
            self.zoom_about(pointer, 1.0 / Self::WHEEL_STEP);
        } else if delta_y < 0.0 {
            self.zoom_about(pointer, Self::WHEEL_STEP);
        }
    }

    pub fn zoom_in_centered(&mut self, canvas_size: Point) {
        self.zoom_about(canvas_size * 0.5, Self::BUTTON_ZOOM_IN);
    }

    pub fn zoom_out_centered(&mut self, canvas_size: Point) {
        self.zoom_about(canvas_size * 0.5, Self::BUTTON_ZOOM_OUT);
    }

    /// Keeps the zoom and moves `content` to the middle of the canvas.
    pub fn center_on(&mut self, content: Point, canvas_size: Point) {
        self.pan = canvas_size * 0.5 - content * self.zoom;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What a pointer-down landed on. Node hits win over the background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PointerTarget {
    Node(NodeId),
    Canvas,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        anchor: Point,
    },
    Dragging {
        id: NodeId,
        pointer_start: Point,
        node_start: Point,
    },
}

/// Positions, transform and the single active pointer gesture.
///
/// All pointer coordinates are canvas-relative screen coordinates.
#[derive(Clone, Debug, Default)]
pub struct SpatialView {
    pub positions: Positions,
    pub transform: ViewTransform,
    gesture: Gesture,
}

impl SpatialView {
    pub fn new(positions: Positions) -> Self {
        Self {
            positions,
            transform: ViewTransform::default(),
            gesture: Gesture::Idle,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        self.gesture == Gesture::Idle
    }

    /// Starts a drag or pan. Ignored while another gesture is running.
    pub fn begin(&mut self, target: PointerTarget, pointer: Point) -> bool {
        if !self.is_idle() {
            return false;
        }

        self.gesture = match target {
            PointerTarget::Node(id) => {
                let node_start = self.positions.resolve(&id);
                debug!(node = %id, "drag started");
                Gesture::Dragging {
                    id,
                    pointer_start: pointer,
                    node_start,
                }
            }
            PointerTarget::Canvas => Gesture::Panning {
                anchor: pointer - self.transform.pan,
            },
        };
        true
    }

    pub fn update(&mut self, pointer: Point) {
        match &self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { anchor } => {
                self.transform.pan = pointer - *anchor;
            }
            Gesture::Dragging {
                id,
                pointer_start,
                node_start,
            } => {
                let position = *node_start + (pointer - *pointer_start);
                self.positions.set(id.clone(), position);
            }
        }
    }

    pub fn end(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Leaving the canvas stops a pan; drags keep tracking outside it.
    pub fn pointer_left_canvas(&mut self) {
        if matches!(self.gesture, Gesture::Panning { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Lost input focus or pointer capture: nothing will deliver the release.
    pub fn cancel(&mut self) {
        if !self.is_idle() {
            debug!("gesture cancelled");
        }
        self.gesture = Gesture::Idle;
    }

    pub fn wheel(&mut self, pointer: Point, delta_y: f64) {
        self.transform.wheel(pointer, delta_y);
    }

    /// Bulk replacement: new positions, no gesture survives.
    pub fn replace_positions(&mut self, positions: Positions) {
        self.positions = positions;
        self.gesture = Gesture::Idle;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn close(a: Point, b: Point) -> bool {
        let scale = 1.0 + a.x.abs().max(a.y.abs()).max(b.x.abs()).max(b.y.abs());
        (a.x - b.x).abs() <= 1e-9 * scale && (a.y - b.y).abs() <= 1e-9 * scale
    }

    #[test]
    fn drag_follows_pointer_without_bounds() {
        let mut view = SpatialView::new([(NodeId::from("a"), Point::new(10.0, 20.0))].into_iter().collect());
        assert!(view.begin(PointerTarget::Node("a".into()), Point::new(100.0, 100.0)));
        view.update(Point::new(150.0, 40.0));
        assert_eq!(view.positions.get(&"a".into()), Some(Point::new(60.0, -40.0)));
        view.update(Point::new(-5000.0, 100.0));
        assert_eq!(view.positions.get(&"a".into()), Some(Point::new(-5090.0, 20.0)));
        view.end();
        assert!(view.is_idle());
        view.update(Point::new(0.0, 0.0));
        assert_eq!(view.positions.get(&"a".into()), Some(Point::new(-5090.0, 20.0)));
    }

    #[test]
    fn drag_applies_raw_pointer_delta_at_any_zoom() {
        let mut view = SpatialView::new([(NodeId::from("a"), Point::new(10.0, 20.0))].into_iter().collect());
        view.transform.zoom = 2.0;
        view.transform.pan = Point::new(-35.0, 12.0);
        assert!(view.begin(PointerTarget::Node("a".into()), Point::new(100.0, 100.0)));
        view.update(Point::new(140.0, 160.0));
        assert_eq!(view.positions.get(&"a".into()), Some(Point::new(50.0, 80.0)));

        view.end();
        view.wheel(Point::new(300.0, 200.0), -1.0);
        assert!(view.begin(PointerTarget::Node("a".into()), Point::new(0.0, 0.0)));
        view.update(Point::new(-7.0, 3.0));
        assert_eq!(view.positions.get(&"a".into()), Some(Point::new(43.0, 83.0)));
    }

    #[test]
    fn drag_without_stored_position_starts_from_fallback() {
        let mut view = SpatialView::default();
        let id = NodeId::from("unplaced");
        let fallback = view.positions.resolve(&id);
        view.begin(PointerTarget::Node(id.clone()), Point::ZERO);
        view.update(Point::new(1.0, 1.0));
        assert_eq!(view.positions.get(&id), Some(fallback + Point::new(1.0, 1.0)));
    }

    #[test]
    fn pan_uses_anchor_fixed_at_start() {
        let mut view = SpatialView::default();
        view.transform.pan = Point::new(30.0, 30.0);
        assert!(view.begin(PointerTarget::Canvas, Point::new(100.0, 100.0)));
        view.update(Point::new(110.0, 90.0));
        assert_eq!(view.transform.pan, Point::new(40.0, 20.0));
        view.update(Point::new(100.0, 100.0));
        assert_eq!(view.transform.pan, Point::new(30.0, 30.0));
    }

    #[test]
    fn only_one_gesture_at_a_time() {
        let mut view = SpatialView::default();
        assert!(view.begin(PointerTarget::Node("a".into()), Point::ZERO));
        assert!(!view.begin(PointerTarget::Canvas, Point::ZERO));
        view.update(Point::new(50.0, 50.0));
        assert_eq!(view.transform.pan, Point::ZERO);
    }

    #[test]
    fn leaving_canvas_ends_pan_but_not_drag() {
        let mut view = SpatialView::default();
        view.begin(PointerTarget::Canvas, Point::ZERO);
        view.pointer_left_canvas();
        assert!(view.is_idle());

        view.begin(PointerTarget::Node("a".into()), Point::ZERO);
        view.pointer_left_canvas();
        assert!(matches!(view.gesture(), Gesture::Dragging { .. }));
        view.cancel();
        assert!(view.is_idle());
    }

    #[test]
    fn zoom_is_clamped() {
        let mut transform = ViewTransform::default();
        for _ in 0..100 {
            transform.wheel(Point::new(10.0, 10.0), -1.0);
        }
        assert_eq!(transform.zoom, ViewTransform::MAX_ZOOM);
        for _ in 0..100 {
            transform.wheel(Point::new(10.0, 10.0), 1.0);
        }
        assert_eq!(transform.zoom, ViewTransform::MIN_ZOOM);
    }

    #[test]
    fn button_zoom_anchors_at_canvas_center_and_reset_restores() {
        let mut transform = ViewTransform::default();
        let canvas = Point::new(800.0, 600.0);
        let center_before = transform.to_content(canvas * 0.5);
        transform.zoom_in_centered(canvas);
        assert!((transform.zoom - 1.2).abs() < 1e-12);
        assert!(close(transform.to_content(canvas * 0.5), center_before));

        transform.reset();
        assert_eq!(transform, ViewTransform::default());
    }

    #[test]
    fn center_on_puts_content_in_the_middle() {
        let mut transform = ViewTransform { pan: Point::ZERO, zoom: 2.0 };
        let canvas = Point::new(400.0, 200.0);
        transform.center_on(Point::new(50.0, 25.0), canvas);
        assert!(close(transform.to_screen(Point::new(50.0, 25.0)), Point::new(200.0, 100.0)));
    }

    proptest! {
        #[test]
        fn wheel_zoom_keeps_content_under_pointer(
            px in -2000.0f64..2000.0,
            py in -2000.0f64..2000.0,
            pan_x in -1000.0f64..1000.0,
            pan_y in -1000.0f64..1000.0,
            zoom in 0.1f64..3.0,
            delta in prop_oneof![Just(-1.0f64), Just(1.0f64)],
        ) {
            let pointer = Point::new(px, py);
            let mut transform = ViewTransform { pan: Point::new(pan_x, pan_y), zoom };
            let before = transform.to_content(pointer);
            transform.wheel(pointer, delta);
            prop_assert!(transform.zoom >= ViewTransform::MIN_ZOOM);
            prop_assert!(transform.zoom <= ViewTransform::MAX_ZOOM);
            prop_assert!(close(transform.to_content(pointer), before));
        }
    }
}
