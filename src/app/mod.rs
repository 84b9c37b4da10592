use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use fwmap::map::{MapState, Point, Projection, Session};

mod graph;
mod highlight;
mod render_utils;
pub(crate) mod source;
mod tree;
mod ui;

use source::LoadRequest;

pub struct FwmapApp {
    model: ViewModel,
    pending: Option<PendingLoad>,
}

struct PendingLoad {
    label: String,
    rx: Receiver<Result<MapState, String>>,
}

enum Status {
    Info(String),
    Error(String),
}

struct ViewModel {
    session: Session,
    projection: Projection,
    path_input: String,
    quick_find: String,
    status: Option<Status>,
    canvas_size: Point,
}

impl FwmapApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        projection: Projection,
        startup: Option<LoadRequest>,
    ) -> Self {
        let mut app = Self {
            model: ViewModel::new(projection),
            pending: None,
        };
        if let Some(request) = startup {
            app.model.path_input = request.path().display().to_string();
            app.start_load(request);
        }
        app
    }

    fn spawn_load(request: LoadRequest) -> Receiver<Result<MapState, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = source::load(&request).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(&mut self, request: LoadRequest) {
        info!(source = %request, "loading map");
        self.pending = Some(PendingLoad {
            label: request.to_string(),
            rx: Self::spawn_load(request),
        });
    }

    fn poll_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };

        match pending.rx.try_recv() {
            Ok(Ok(state)) => {
                self.model.session.load(state);
                self.model.status = Some(Status::Info(format!(
                    "Loaded {} ({} items)",
                    pending.label,
                    self.model.session.store().len()
                )));
            }
            Ok(Err(message)) => {
                error!(source = %pending.label, %message, "load failed");
                self.model.status = Some(Status::Error(message));
            }
            Err(TryRecvError::Empty) => {
                self.pending = Some(pending);
            }
            Err(TryRecvError::Disconnected) => {
                self.model.status =
                    Some(Status::Error("Background load worker disconnected".to_owned()));
            }
        }
    }
}

impl eframe::App for FwmapApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_pending();

        let loading = self.pending.as_ref().map(|pending| pending.label.as_str());
        let mut request = None;
        self.model.show(ctx, loading, &mut request);

        if let Some(request) = request
            && self.pending.is_none()
        {
            self.start_load(request);
        }

        if self.pending.is_some() {
            ctx.request_repaint();
        }
    }
}

impl ViewModel {
    fn path(&self) -> Option<PathBuf> {
        let trimmed = self.path_input.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    fn report(&mut self, status: Status) {
        self.status = Some(status);
    }

    fn status_line(&self) -> Option<(egui::Color32, &str)> {
        self.status.as_ref().map(|status| match status {
            Status::Info(text) => (egui::Color32::from_rgb(140, 200, 150), text.as_str()),
            Status::Error(text) => (egui::Color32::from_rgb(235, 110, 110), text.as_str()),
        })
    }
}
