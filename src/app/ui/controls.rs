use eframe::egui::{self, RichText, Ui};

use fwmap::map::{ClassFilter, Classification, NodeId, Projection};

use super::super::ViewModel;
use super::super::render_utils::class_color;

const QUICK_FIND_LIMIT: usize = 12;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Map Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.projection, Projection::Tree, "Tree")
                .on_hover_text("Nested directory listing.");
            ui.selectable_value(&mut self.projection, Projection::Graph, "Mind map")
                .on_hover_text("Freeform cards with parent/child connections.");
        });

        ui.separator();

        ui.label("Search")
            .on_hover_text("Shows matching entries plus the folders that lead to them.");
        let mut search = self.session.filter().search.clone();
        if ui.text_edit_singleline(&mut search).changed() {
            self.session.set_search(search);
        }

        let mut class_filter = self.session.filter().classification;
        egui::ComboBox::from_id_salt("class_filter")
            .selected_text(match class_filter {
                ClassFilter::All => "All types".to_owned(),
                ClassFilter::Only(class) => format!("{} {}", class.icon(), class.label()),
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut class_filter, ClassFilter::All, "All types");
                for class in Classification::ALL {
                    ui.selectable_value(
                        &mut class_filter,
                        ClassFilter::Only(class),
                        format!("{} {}", class.icon(), class.label()),
                    );
                }
            });
        if class_filter != self.session.filter().classification {
            self.session.set_class_filter(class_filter);
        }

        if ui
            .add_enabled(self.session.filter().is_active(), egui::Button::new("Clear filters"))
            .clicked()
        {
            self.session.clear_filters();
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Expand all").clicked() {
                self.session.expand_all();
            }
            if ui.button("Collapse all").clicked() {
                self.session.collapse_all();
            }
        });

        ui.separator();
        self.draw_legend(ui);
        ui.separator();
        self.draw_quick_find(ui);
    }

    fn draw_legend(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Legend").strong())
            .on_hover_text("Click a class to show only it; click again to show everything.");

        let active = self.session.filter().classification;
        let mut clicked = None;
        for class in Classification::ALL {
            let text = RichText::new(format!("{} {}", class.icon(), class.label()))
                .color(class_color(class));
            if ui
                .selectable_label(active == ClassFilter::Only(class), text)
                .clicked()
            {
                clicked = Some(class);
            }
        }

        if let Some(class) = clicked {
            self.session.toggle_legend(class);
        }
    }

    fn draw_quick_find(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Quick find").strong())
            .on_hover_text("Fuzzy jump to an entry. Opens its folders and centres the mind map on it.");
        ui.text_edit_singleline(&mut self.quick_find);

        let hits = self.session.quick_find(&self.quick_find, QUICK_FIND_LIMIT);
        let mut jump: Option<NodeId> = None;
        for hit in &hits {
            let Some(node) = self.session.store().by_index(hit.index) else {
                continue;
            };
            if ui.link(node.name.as_str()).clicked() {
                jump = Some(node.id.clone());
            }
        }

        if let Some(id) = jump {
            self.session.reveal(&id, self.canvas_size);
        }
    }
}
