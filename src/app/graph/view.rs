use eframe::egui::{self, Align2, Color32, FontId, Painter, Sense, Shape, Stroke, StrokeKind, Ui, vec2};

use fwmap::map::visibility::GraphNodeView;
use fwmap::util::format_bytes;

use super::super::ViewModel;
use super::super::highlight::{EdgeEmphasis, HighlightState, build_highlight_state};
use super::super::render_utils::{
    blend_color, class_color, dim_color, draw_background, rect_size_point,
};
use super::build::{ScreenCard, build_screen_scene, hit_test};
use super::interaction::PressTarget;

const CARD_FILL: Color32 = Color32::from_rgb(30, 36, 44);
const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);
const ROOT_PATH_COLOR: Color32 = Color32::from_rgb(247, 194, 111);
const LABEL_MIN_ZOOM: f32 = 0.35;
const EMPTY_MAP_MESSAGE: &str = "Import a firmware directory or open a .fmap map to begin.";
const NO_MATCHES_MESSAGE: &str = "No entries match the current filter.";

fn truncate_label(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        return name.to_owned();
    }
    let mut short = name.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    short.push('…');
    short
}

fn canvas_message(total: usize, visible: usize) -> Option<&'static str> {
    match (total, visible) {
        (0, _) => Some(EMPTY_MAP_MESSAGE),
        (_, 0) => Some(NO_MATCHES_MESSAGE),
        _ => None,
    }
}

fn paint_canvas_message(painter: &Painter, rect: egui::Rect, message: &str) {
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        message,
        FontId::proportional(15.0),
        Color32::from_gray(170),
    );
}

impl ViewModel {
    fn draw_graph_toolbar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("Zoom +").clicked() {
                self.session.zoom_in(self.canvas_size);
            }
            if ui.button("Zoom −").clicked() {
                self.session.zoom_out(self.canvas_size);
            }
            if ui.button("Reset view").clicked() {
                self.session.reset_view();
            }
            ui.label(format!("{:.0}%", self.session.transform().zoom * 100.0));
            ui.separator();
            ui.weak("Drag cards to move them, drag the background to pan, scroll to zoom.");
        });
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        self.draw_graph_toolbar(ui);

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.canvas_size = rect_size_point(rect);
        self.handle_graph_motion(ui, rect, &response);
        let press = self.pressed_on_canvas(ui, rect, &response);

        let painter = ui.painter_at(rect);
        let transform = *self.session.transform();
        let zoom = transform.zoom as f32;
        draw_background(
            &painter,
            rect,
            vec2(transform.pan.x as f32, transform.pan.y as f32),
            zoom,
        );

        if self.session.is_empty() {
            paint_canvas_message(&painter, rect, EMPTY_MAP_MESSAGE);
            if let Some(pointer) = press {
                self.apply_graph_press(rect, pointer, PressTarget::Canvas);
            }
            return;
        }

        let press = {
            let store = self.session.store();
            let scene = self.session.graph_scene();
            let screen = build_screen_scene(store, &scene, &transform, rect);
            if let Some(message) = canvas_message(store.len(), scene.nodes.len()) {
                paint_canvas_message(&painter, rect, message);
            }
            let highlight = self
                .session
                .selected()
                .and_then(|id| build_highlight_state(store, id));

            for edge in &screen.edges {
                let emphasis = highlight
                    .as_ref()
                    .and_then(|state| state.edge_emphasis(edge.parent, edge.child));
                let base = class_color(edge.color_key);
                let stroke = match emphasis {
                    Some(EdgeEmphasis::RootPath) => {
                        Stroke::new((3.0 * zoom).clamp(1.5, 5.0), blend_color(base, ROOT_PATH_COLOR, 0.7))
                    }
                    Some(EdgeEmphasis::Child) => Stroke::new((2.5 * zoom).clamp(1.2, 4.0), base),
                    None => Stroke::new((2.0 * zoom).clamp(0.8, 3.0), dim_color(base, 0.7)),
                };
                painter.add(Shape::line(edge.points.clone(), stroke));
            }

            for card in &screen.cards {
                let Some(view) = scene.nodes.get(card.slot) else {
                    continue;
                };
                Self::draw_card(&painter, card, view, zoom, highlight.as_ref());
            }

            let hovered = ui
                .input(|input| input.pointer.hover_pos())
                .filter(|pos| rect.contains(*pos))
                .and_then(|pos| hit_test(&screen, pos));
            if let Some(hit) = hovered
                && let Some(view) = scene.nodes.get(hit.slot)
            {
                ui.output_mut(|output| {
                    output.cursor_icon = egui::CursorIcon::PointingHand;
                });
                painter.text(
                    rect.left_top() + vec2(10.0, 10.0),
                    Align2::LEFT_TOP,
                    format!(
                        "{}  |  {}  |  {}",
                        view.node.name,
                        view.node.classification.label(),
                        format_bytes(view.node.size_bytes)
                    ),
                    FontId::proportional(13.0),
                    Color32::from_gray(240),
                );
            }

            press.map(|pointer| {
                let target = match hit_test(&screen, pointer) {
                    Some(hit) => match scene.nodes.get(hit.slot) {
                        Some(view) if hit.on_toggle => PressTarget::Toggle(view.node.id.clone()),
                        Some(view) => PressTarget::Card(view.node.id.clone()),
                        None => PressTarget::Canvas,
                    },
                    None => PressTarget::Canvas,
                };
                (pointer, target)
            })
        };

        if let Some((pointer, target)) = press {
            self.apply_graph_press(rect, pointer, target);
        }
    }

    fn draw_card(
        painter: &Painter,
        card: &ScreenCard,
        view: &GraphNodeView<'_>,
        zoom: f32,
        highlight: Option<&HighlightState>,
    ) {
        let node = view.node;
        let fade = if view.matches_filter { 1.0 } else { 0.45 };
        let accent = dim_color(class_color(node.classification), fade);
        let on_root_path = highlight.is_some_and(|state| state.root_path_nodes.contains(&view.index));
        let radius = 6.0 * zoom;

        painter.rect_filled(card.rect, radius, dim_color(CARD_FILL, fade.max(0.7)));

        let stripe = egui::Rect::from_min_size(card.rect.min, vec2(4.0 * zoom, card.rect.height()));
        painter.rect_filled(stripe, 0.0, accent);

        let stroke = if view.is_selected {
            Stroke::new(2.5, SELECTED_COLOR)
        } else if on_root_path {
            Stroke::new(2.0, blend_color(accent, ROOT_PATH_COLOR, 0.6))
        } else {
            Stroke::new(1.2, accent)
        };
        painter.rect_stroke(card.rect, radius, stroke, StrokeKind::Inside);

        if zoom >= LABEL_MIN_ZOOM {
            let text_color = dim_color(Color32::from_gray(235), fade);
            painter.text(
                card.rect.left_top() + vec2(12.0, 8.0) * zoom,
                Align2::LEFT_TOP,
                format!("{} {}", node.classification.icon(), truncate_label(&node.name, 18)),
                FontId::proportional(13.0 * zoom),
                text_color,
            );

            let detail = if node.is_folder() {
                format!("folder · {} items", view.child_count)
            } else {
                format_bytes(node.size_bytes)
            };
            painter.text(
                card.rect.left_top() + vec2(12.0, 30.0) * zoom,
                Align2::LEFT_TOP,
                detail,
                FontId::proportional(11.0 * zoom),
                dim_color(Color32::from_gray(170), fade),
            );
            painter.text(
                card.rect.left_top() + vec2(12.0, 48.0) * zoom,
                Align2::LEFT_TOP,
                node.classification.label(),
                FontId::proportional(10.0 * zoom),
                accent,
            );
        }

        if let Some(toggle) = card.toggle {
            painter.rect_filled(toggle, 3.0 * zoom, Color32::from_rgb(52, 60, 72));
            painter.text(
                toggle.center(),
                Align2::CENTER_CENTER,
                if view.is_expanded { "−" } else { "+" },
                FontId::proportional(13.0 * zoom),
                Color32::from_gray(230),
            );

            if !view.is_expanded && view.visible_child_count < view.child_count {
                painter.text(
                    toggle.left_center() - vec2(4.0 * zoom, 0.0),
                    Align2::RIGHT_CENTER,
                    view.child_count.to_string(),
                    FontId::proportional(11.0 * zoom),
                    accent,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate_label("busybox", 18), "busybox");
        assert_eq!(truncate_label("libcrypto.so.1.0.0-firmware", 10), "libcrypto…");
    }

    #[test]
    fn filtered_out_map_reports_no_matches() {
        assert_eq!(canvas_message(0, 0), Some(EMPTY_MAP_MESSAGE));
        assert_eq!(canvas_message(4, 0), Some(NO_MATCHES_MESSAGE));
        assert_eq!(canvas_message(4, 3), None);
    }
}
