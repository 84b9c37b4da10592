use eframe::egui::{self, RichText, Ui};

use fwmap::map::{Classification, EntryKind, Projection};
use fwmap::util::format_bytes;

use super::super::ViewModel;
use super::super::render_utils::class_color;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Node Details");
        ui.add_space(6.0);

        let Some(node) = self.session.selected_node() else {
            ui.label("Select an entry in the tree or the mind map.");
            return;
        };

        let id = node.id.clone();
        let name = node.name.clone();
        let kind = node.kind;
        let size_bytes = node.size_bytes;
        let depth = node.depth;
        let current_classification = node.classification;
        let mut classification = current_classification;
        let mut notes = node.notes.clone();
        let path = self
            .session
            .store()
            .index_of(&id)
            .map(|index| {
                let store = self.session.store();
                let mut segments = store
                    .ancestors(index)
                    .filter_map(|ancestor| store.by_index(ancestor))
                    .map(|ancestor| ancestor.name.as_str())
                    .collect::<Vec<_>>();
                segments.reverse();
                segments.push(name.as_str());
                segments.join("/")
            })
            .unwrap_or_default();
        let child_count = self.session.store().child_count(&id);

        ui.label(RichText::new(name.as_str()).strong());
        ui.small(path.as_str());
        ui.add_space(6.0);

        match kind {
            EntryKind::File => {
                ui.label("Type: file");
                ui.label(format!("Size: {}", format_bytes(size_bytes)));
            }
            EntryKind::Folder => {
                ui.label("Type: directory");
                ui.label(format!("Children: {child_count}"));
            }
        }
        ui.label(format!("Depth: {depth}"));

        ui.separator();
        ui.label(RichText::new("Classification").strong());
        egui::ComboBox::from_id_salt("node_classification")
            .selected_text(
                RichText::new(format!("{} {}", classification.icon(), classification.label()))
                    .color(class_color(classification)),
            )
            .show_ui(ui, |ui| {
                for class in Classification::ALL {
                    ui.selectable_value(
                        &mut classification,
                        class,
                        format!("{} {}", class.icon(), class.label()),
                    );
                }
            });
        if classification != current_classification {
            self.session.classify(&id, classification);
        }

        ui.separator();
        ui.label(RichText::new("Notes").strong());
        let notes_response = ui.add(
            egui::TextEdit::multiline(&mut notes)
                .hint_text("Findings, offsets, CVEs...")
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        if notes_response.changed() {
            self.session.annotate(&id, notes);
        }

        ui.add_space(8.0);
        if ui.button("Show in mind map").clicked() {
            self.projection = Projection::Graph;
            self.session.reveal(&id, self.canvas_size);
        }
    }
}
