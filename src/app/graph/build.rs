use eframe::egui::{Pos2, Rect, vec2};

use fwmap::layout::{CARD_HEIGHT, CARD_WIDTH};
use fwmap::map::spatial::ViewTransform;
use fwmap::map::visibility::GraphScene;
use fwmap::map::{Classification, NodeStore, Point};

use super::super::render_utils::{rect_visible, to_screen_pos, vertical_curve};

const TOGGLE_SIZE: f32 = 18.0;
const EDGE_PADDING: f32 = 4.0;

/// A card that survived culling. `slot` indexes `GraphScene::nodes`.
pub(in crate::app) struct ScreenCard {
    pub(in crate::app) slot: usize,
    pub(in crate::app) rect: Rect,
    pub(in crate::app) toggle: Option<Rect>,
}

pub(in crate::app) struct ScreenEdge {
    pub(in crate::app) parent: usize,
    pub(in crate::app) child: usize,
    pub(in crate::app) points: Vec<Pos2>,
    pub(in crate::app) color_key: Classification,
}

#[derive(Default)]
pub(in crate::app) struct ScreenScene {
    pub(in crate::app) cards: Vec<ScreenCard>,
    pub(in crate::app) edges: Vec<ScreenEdge>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) struct CardHit {
    pub(in crate::app) slot: usize,
    pub(in crate::app) on_toggle: bool,
}

pub(in crate::app) fn card_rect(canvas: Rect, transform: &ViewTransform, top_left: Point) -> Rect {
    let zoom = transform.zoom as f32;
    Rect::from_min_size(
        to_screen_pos(canvas, transform.to_screen(top_left)),
        vec2(CARD_WIDTH as f32 * zoom, CARD_HEIGHT as f32 * zoom),
    )
}

/// Projects the scene into screen space, dropping anything outside `canvas`.
pub(in crate::app) fn build_screen_scene(
    store: &NodeStore,
    scene: &GraphScene<'_>,
    transform: &ViewTransform,
    canvas: Rect,
) -> ScreenScene {
    let zoom = transform.zoom as f32;

    let cards = scene
        .nodes
        .iter()
        .enumerate()
        .filter_map(|(slot, view)| {
            let rect = card_rect(canvas, transform, view.position);
            if !rect_visible(canvas, rect) {
                return None;
            }
            let toggle = view.has_children.then(|| {
                let size = TOGGLE_SIZE * zoom;
                let inset = size + 4.0 * zoom;
                Rect::from_min_size(rect.right_bottom() - vec2(inset, inset), vec2(size, size))
            });
            Some(ScreenCard { slot, rect, toggle })
        })
        .collect();

    let edges = scene
        .connections
        .iter()
        .filter_map(|edge| {
            let start = to_screen_pos(canvas, transform.to_screen(edge.from_position));
            let end = to_screen_pos(canvas, transform.to_screen(edge.to_position));
            let bounds = Rect::from_two_pos(start, end).expand(EDGE_PADDING);
            if !rect_visible(canvas, bounds) {
                return None;
            }
            Some(ScreenEdge {
                parent: store.index_of(&edge.from)?,
                child: store.index_of(&edge.to)?,
                points: vertical_curve(start, end),
                color_key: edge.color_key,
            })
        })
        .collect();

    ScreenScene { cards, edges }
}

/// Topmost card under `pointer`. Cards are drawn in order, so the last hit wins.
pub(in crate::app) fn hit_test(screen: &ScreenScene, pointer: Pos2) -> Option<CardHit> {
    screen
        .cards
        .iter()
        .rev()
        .find(|card| card.rect.contains(pointer))
        .map(|card| CardHit {
            slot: card.slot,
            on_toggle: card.toggle.is_some_and(|toggle| toggle.contains(pointer)),
        })
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use fwmap::map::ingest::{Entry, ingest};
    use fwmap::map::visibility::{Filter, Projection, graph_scene, visible_nodes};

    use super::*;

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(1200.0, 800.0))
    }

    #[test]
    fn cards_scale_with_zoom() {
        let transform = ViewTransform {
            pan: Point::new(10.0, 20.0),
            zoom: 2.0,
        };
        let rect = card_rect(canvas(), &transform, Point::new(100.0, 50.0));
        assert_eq!(rect.min, pos2(210.0, 120.0));
        assert_eq!(rect.size(), vec2(320.0, 140.0));
    }

    #[test]
    fn offscreen_cards_are_culled_and_hits_prefer_toggles() {
        let state = ingest(&[Entry::new("a/b.txt", 1), Entry::new("a/c/d.txt", 1)]);
        let filter = Filter::default();
        let visible = visible_nodes(Projection::Graph, &state.store, &state.expanded, &filter);
        let scene = graph_scene(
            &state.store,
            &state.expanded,
            &filter,
            &visible,
            &state.positions,
            None,
        );

        let transform = ViewTransform::default();
        let screen = build_screen_scene(&state.store, &scene, &transform, canvas());
        assert_eq!(screen.cards.len(), 4);
        assert_eq!(screen.edges.len(), 3);

        let root = &screen.cards[0];
        let toggle = root.toggle.unwrap();
        assert_eq!(
            hit_test(&screen, toggle.center()),
            Some(CardHit { slot: 0, on_toggle: true })
        );
        assert_eq!(
            hit_test(&screen, root.rect.left_top() + vec2(4.0, 4.0)),
            Some(CardHit { slot: 0, on_toggle: false })
        );
        assert_eq!(hit_test(&screen, pos2(-50.0, -50.0)), None);

        let far = ViewTransform {
            pan: Point::new(-10_000.0, 0.0),
            zoom: 1.0,
        };
        let screen = build_screen_scene(&state.store, &scene, &far, canvas());
        assert!(screen.cards.is_empty());
        assert!(screen.edges.is_empty());
    }
}
