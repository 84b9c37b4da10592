use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};

use fwmap::map::{Classification, Point};

const CURVE_SEGMENTS: usize = 20;

pub(super) fn class_color(class: Classification) -> Color32 {
    let [r, g, b] = class.rgb();
    Color32::from_rgb(r, g, b)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Context-only nodes (ancestors of a filter match) are drawn with this.
pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn to_screen_pos(rect: Rect, point: Point) -> Pos2 {
    rect.min + vec2(point.x as f32, point.y as f32)
}

pub(super) fn to_canvas_point(rect: Rect, pos: Pos2) -> Point {
    let offset = pos - rect.min;
    Point::new(f64::from(offset.x), f64::from(offset.y))
}

pub(super) fn rect_size_point(rect: Rect) -> Point {
    Point::new(f64::from(rect.width()), f64::from(rect.height()))
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (40.0 * zoom.clamp(0.4, 2.0)).max(16.0);
    let origin = rect.min + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn rect_visible(canvas: Rect, card: Rect) -> bool {
    canvas.intersects(card)
}

/// Vertical S-curve from `start` down to `end`, sampled as a polyline.
pub(super) fn vertical_curve(start: Pos2, end: Pos2) -> Vec<Pos2> {
    let mid_y = (start.y + end.y) * 0.5;
    let c1 = pos2(start.x, mid_y);
    let c2 = pos2(end.x, mid_y);

    (0..=CURVE_SEGMENTS)
        .map(|step| {
            let t = step as f32 / CURVE_SEGMENTS as f32;
            let u = 1.0 - t;
            let a = u * u * u;
            let b = 3.0 * u * u * t;
            let c = 3.0 * u * t * t;
            let d = t * t * t;
            pos2(
                a * start.x + b * c1.x + c * c2.x + d * end.x,
                a * start.y + b * c1.y + c * c2.y + d * end.y,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_conversions_invert() {
        let rect = Rect::from_min_size(pos2(30.0, 50.0), vec2(400.0, 300.0));
        let point = Point::new(12.5, 80.0);
        assert_eq!(to_canvas_point(rect, to_screen_pos(rect, point)), point);
        assert_eq!(rect_size_point(rect), Point::new(400.0, 300.0));
    }

    #[test]
    fn curve_starts_and_ends_on_anchors() {
        let start = pos2(10.0, 20.0);
        let end = pos2(200.0, 160.0);
        let points = vertical_curve(start, end);
        assert_eq!(points.len(), CURVE_SEGMENTS + 1);
        assert_eq!(points[0], start);
        assert!((points[CURVE_SEGMENTS] - end).length() < 1e-3);
    }
}
