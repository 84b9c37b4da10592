use eframe::egui::{self, Color32, RichText, Ui};

use fwmap::map::{Classification, NodeId};
use fwmap::util::format_bytes;

use super::ViewModel;
use super::render_utils::{class_color, dim_color};

const INDENT_WIDTH: f32 = 18.0;
const ROW_HEIGHT: f32 = 22.0;

enum TreeAction {
    Toggle(NodeId),
    Select(NodeId),
}

impl ViewModel {
    pub(super) fn draw_tree(&mut self, ui: &mut Ui) {
        if self.session.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.label("Import a firmware directory or open a .fmap map to begin.");
            });
            return;
        }

        let mut actions = Vec::new();
        {
            let rows = self.session.tree_rows();
            if rows.is_empty() {
                ui.label("No entries match the current filter.");
            }

            egui::ScrollArea::vertical()
                .id_salt("tree_rows_scroll")
                .auto_shrink([false, false])
                .show_rows(ui, ROW_HEIGHT, rows.len(), |ui, row_range| {
                    for index in row_range {
                        let Some(row) = rows.get(index) else {
                            continue;
                        };
                        let node = row.node;
                        let fade = if row.matches_filter { 1.0 } else { 0.5 };

                        ui.horizontal(|ui| {
                            ui.add_space(row.indent as f32 * INDENT_WIDTH);

                            if row.has_children {
                                let arrow = if row.is_expanded { "⏷" } else { "⏵" };
                                if ui.small_button(arrow).clicked() {
                                    actions.push(TreeAction::Toggle(node.id.clone()));
                                }
                            } else {
                                ui.add_space(INDENT_WIDTH);
                            }

                            let icon = if node.is_folder() { "📁" } else { "📄" };
                            let label = RichText::new(format!("{icon} {}", node.name))
                                .color(dim_color(Color32::from_gray(230), fade));
                            if ui.selectable_label(row.is_selected, label).clicked() {
                                actions.push(TreeAction::Select(node.id.clone()));
                            }

                            if let Some(count) = row.badge {
                                ui.weak(format!("({count})"));
                            }

                            if node.classification != Classification::Unknown {
                                ui.label(
                                    RichText::new(format!(
                                        "{} {}",
                                        node.classification.icon(),
                                        node.classification.label()
                                    ))
                                    .small()
                                    .color(dim_color(class_color(node.classification), fade)),
                                );
                            }

                            if !node.is_folder() {
                                ui.weak(format_bytes(node.size_bytes));
                            }
                        });
                    }
                });
        }

        for action in actions {
            match action {
                TreeAction::Toggle(id) => {
                    self.session.toggle_expanded(&id);
                }
                TreeAction::Select(id) => self.session.select(Some(id)),
            }
        }
    }
}
