use crate::map::spatial::Point;

pub const SLOT_WIDTH: f64 = 180.0;
/// Narrowest band a sibling group may occupy.
pub const MIN_BAND_WIDTH: f64 = 200.0;
pub const ROW_HEIGHT: f64 = 140.0;
/// Centre of the root band and the y of depth 0.
pub const ORIGIN: Point = Point::new(600.0, 80.0);

/// Footprint of a node card in the graph projection, anchored at its top-left.
pub const CARD_WIDTH: f64 = 160.0;
pub const CARD_HEIGHT: f64 = 70.0;

/// Connection endpoints: bottom-centre of the parent card to top-centre of the child.
pub fn connection_anchors(parent: Point, child: Point) -> (Point, Point) {
    (
        Point::new(parent.x + CARD_WIDTH / 2.0, parent.y + CARD_HEIGHT),
        Point::new(child.x + CARD_WIDTH / 2.0, child.y),
    )
}

/// Positions for `count` siblings at `depth`, laid left to right in a band centred
/// on `center_x`.
pub fn band_positions(center_x: f64, depth: usize, count: usize) -> impl Iterator<Item = Point> {
    let band_width = (count as f64 * SLOT_WIDTH).max(MIN_BAND_WIDTH);
    let left = center_x - band_width / 2.0;
    let y = ORIGIN.y + depth as f64 * ROW_HEIGHT;

    (0..count).map(move |slot| Point::new(left + slot as f64 * SLOT_WIDTH + SLOT_WIDTH / 2.0, y))
}
