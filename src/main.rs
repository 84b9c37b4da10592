mod app;
mod logging;

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use tracing::info;

use fwmap::map::Projection;

use crate::app::source::LoadRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ViewArg {
    Tree,
    Graph,
}

impl From<ViewArg> for Projection {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Tree => Projection::Tree,
            ViewArg::Graph => Projection::Graph,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Saved `.fmap` document to load at startup.
    #[arg(long, value_name = "FILE", conflicts_with = "import_dir")]
    open: Option<PathBuf>,
    /// Extracted firmware directory to ingest at startup.
    #[arg(long, value_name = "DIR")]
    import_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = ViewArg::Tree)]
    view: ViewArg,
    /// Tracing filter, e.g. `debug` or `fwmap=trace`. Defaults to RUST_LOG, then `info`.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level.as_deref())?;

    let startup = match (args.open, args.import_dir) {
        (Some(path), _) => Some(LoadRequest::OpenMap(path)),
        (None, Some(dir)) => Some(LoadRequest::ImportDir(dir)),
        (None, None) => None,
    };
    let projection = Projection::from(args.view);
    info!(?projection, ?startup, "starting fwmap");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "fwmap",
        options,
        Box::new(move |cc| Ok(Box::new(app::FwmapApp::new(cc, projection, startup)))),
    )
    .map_err(|error| anyhow!("failed to run the UI: {error}"))
}
