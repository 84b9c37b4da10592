use eframe::egui::{self, Rect, Ui};

use fwmap::map::{NodeId, PointerTarget};

use super::super::ViewModel;
use super::super::render_utils::to_canvas_point;

pub(in crate::app) enum PressTarget {
    Toggle(NodeId),
    Card(NodeId),
    Canvas,
}

impl ViewModel {
    /// Runs before drawing: continues or ends the active gesture and applies the wheel.
    pub(in crate::app) fn handle_graph_motion(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let (pointer, released, focused, scroll) = ui.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.primary_released() || !input.pointer.primary_down(),
                input.focused,
                input.raw_scroll_delta.y,
            )
        });

        if !focused {
            self.session.cancel_gesture();
            return;
        }

        if !self.session.spatial().is_idle() {
            match pointer {
                Some(pos) => {
                    self.session.pointer_moved(to_canvas_point(rect, pos));
                    if !rect.contains(pos) {
                        self.session.pointer_left_canvas();
                    }
                }
                None => self.session.pointer_left_canvas(),
            }
            if released {
                self.session.pointer_up();
            }
            ui.ctx().request_repaint();
        }

        if response.hovered()
            && scroll.abs() > f32::EPSILON
            && let Some(pos) = pointer
        {
            self.session
                .wheel(to_canvas_point(rect, pos), -f64::from(scroll));
        }
    }

    pub(in crate::app) fn pressed_on_canvas(
        &self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Option<egui::Pos2> {
        if !response.hovered() {
            return None;
        }
        let (pressed, pointer) =
            ui.input(|input| (input.pointer.primary_pressed(), input.pointer.interact_pos()));
        pointer.filter(|pos| pressed && rect.contains(*pos))
    }

    /// Runs after drawing, once the scene no longer borrows the session.
    pub(in crate::app) fn apply_graph_press(
        &mut self,
        rect: Rect,
        pointer: egui::Pos2,
        target: PressTarget,
    ) {
        let pointer = to_canvas_point(rect, pointer);
        match target {
            PressTarget::Toggle(id) => {
                self.session.toggle_expanded(&id);
            }
            PressTarget::Card(id) => {
                self.session.select(Some(id.clone()));
                self.session.pointer_down(PointerTarget::Node(id), pointer);
            }
            PressTarget::Canvas => {
                self.session.pointer_down(PointerTarget::Canvas, pointer);
            }
        }
    }
}
