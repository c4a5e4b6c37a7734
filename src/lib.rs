pub mod cli;
pub mod config;
pub mod consumer;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod rectangle;
pub mod session;
pub mod viewport;

use std::cell::RefCell;
use std::rc::Rc;

pub use error::{AppError, AppResult};

use cli::Cli;
use config::AppConfig;
use geometry::ToolBounds;
use rectangle::{OptionsStore, RectangleTool};
use viewport::ScaledViewport;

/// What a replay produced and where it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub bounds: ToolBounds,
    pub output_width: u32,
    pub output_height: u32,
}

/// Entrypoint used by the `marquee` binary.
pub fn run(cli: &Cli) -> AppResult<RunSummary> {
    tracing::info!(image = ?cli.image, session = ?cli.session, "starting marquee");

    let app_config = if cli.no_config {
        AppConfig::default()
    } else {
        config::load_app_config()
    };
    let image = image::open(&cli.image)?;
    let session = session::load_session(&cli.session)?;

    let mut viewport = ScaledViewport::new(image.width(), image.height());
    if let Some(zoom_percent) = cli.zoom.or(session.zoom_percent) {
        viewport.set_zoom_percent(zoom_percent);
    }
    let options = Rc::new(OptionsStore::new(app_config.rectangle.options()));
    let tool = Rc::new(RefCell::new(
        RectangleTool::new(viewport, Rc::clone(&options))
            .with_handle_size(app_config.rectangle.handle_size)
            .with_snap_distance(app_config.rectangle.snap_distance),
    ));
    RectangleTool::connect_options(&tool);

    let outcome = session::replay(&session, &tool);
    let bounds = outcome.result().ok_or(AppError::NoRectangle)?;

    let output = cli.operation.apply(&image, bounds)?;
    output.save(&cli.output)?;
    tracing::info!(output = ?cli.output, ?bounds, "wrote result");

    if app_config.remember_last_used && !cli.no_config {
        let remembered = AppConfig {
            rectangle: app_config.rectangle.with_options(&options.values()),
            ..app_config
        };
        config::save_app_config(&remembered)?;
    }

    Ok(RunSummary {
        bounds,
        output_width: output.width(),
        output_height: output.height(),
    })
}
