use eframe::egui::{self, Align, Context, Layout, RichText};
use tracing::{error, info};

use fwmap::map::codec::{self, FILE_EXTENSION};
use fwmap::map::{Point, Projection, Session};

use super::super::source::LoadRequest;
use super::super::{Status, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(projection: Projection) -> Self {
        Self {
            session: Session::new(),
            projection,
            path_input: String::new(),
            quick_find: String::new(),
            status: None,
            canvas_size: Point::new(1000.0, 700.0),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        loading: Option<&str>,
        request: &mut Option<LoadRequest>,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("fwmap");
                    ui.separator();
                    ui.label("Path");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.path_input)
                            .hint_text("firmware directory or map.fmap")
                            .desired_width(320.0),
                    );

                    let idle = loading.is_none();
                    let has_path = self.path().is_some();
                    if ui
                        .add_enabled(idle && has_path, egui::Button::new("Import directory"))
                        .on_hover_text("Walk an extracted firmware tree and build a fresh map.")
                        .clicked()
                        && let Some(path) = self.path()
                    {
                        *request = Some(LoadRequest::ImportDir(path));
                    }
                    if ui
                        .add_enabled(idle && has_path, egui::Button::new("Open .fmap"))
                        .clicked()
                        && let Some(path) = self.path()
                    {
                        *request = Some(LoadRequest::OpenMap(path));
                    }
                    if ui
                        .add_enabled(!self.session.is_empty(), egui::Button::new("Export .fmap"))
                        .clicked()
                    {
                        self.export_map();
                    }
                    if ui
                        .add_enabled(idle && !self.session.is_empty(), egui::Button::new("Clear"))
                        .clicked()
                    {
                        self.session.clear();
                        self.report(Status::Info("Map cleared".to_owned()));
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(label) = loading {
                            ui.label(format!("Loading {label}..."));
                            ui.spinner();
                        } else if let Some((color, text)) = self.status_line() {
                            ui.label(RichText::new(text).color(color));
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("stats_bar")
            .resizable(false)
            .show(ctx, |ui| {
                let stats = self.session.stats();
                let visible = self.session.visible_count();
                ui.horizontal(|ui| {
                    ui.label(format!("Total items: {}", stats.total));
                    ui.separator();
                    ui.label(format!("Directories: {}", stats.folders));
                    ui.separator();
                    ui.label(format!("Files: {}", stats.files));
                    ui.separator();
                    ui.label(format!("Classified: {}", stats.classified));
                    ui.separator();
                    ui.label(format!("Visible: {visible}"));
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(label) = loading
                && self.session.is_empty()
            {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading(format!("Loading {label}..."));
                    ui.add_space(8.0);
                    ui.spinner();
                });
                return;
            }

            match self.projection {
                Projection::Tree => self.draw_tree(ui),
                Projection::Graph => self.draw_graph(ui),
            }
        });
    }

    /// Writes to the typed path when it names a `.fmap` file, otherwise to
    /// `firmware-map.fmap` in the working directory.
    fn export_map(&mut self) {
        let path = self
            .path()
            .filter(|path| path.extension().is_some_and(|ext| ext == FILE_EXTENSION))
            .unwrap_or_else(|| format!("firmware-map.{FILE_EXTENSION}").into());

        match codec::write_document(&path, &self.session.export()) {
            Ok(()) => {
                info!(path = %path.display(), "map exported");
                self.report(Status::Info(format!("Exported to {}", path.display())));
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "export failed");
                self.report(Status::Error(err.to_string()));
            }
        }
    }
}
