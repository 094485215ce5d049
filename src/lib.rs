pub mod app;
pub mod asset;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod time;

use app::App;
use error::RunError;
use settings::RenderSettings;
use winit::event_loop::EventLoop;

pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}

/// Opens the window and runs the frame loop until it is closed.
///
/// Returns the setup error if the renderer could not start.
pub fn run() -> Result<(), RunError> {
    init_logging();

    log::info!("Starting shadow-mapped renderer");

    let settings = RenderSettings::load();
    let event_loop = EventLoop::new()?;
    let mut app = App::new(settings);

    let result = event_loop.run_app(&mut app);

    if let Some(err) = app.take_error() {
        return Err(err.into());
    }
    if let Err(ref err) = result {
        log::error!("Application error: {}", err);
    }

    log::info!("Application shutdown complete");

    result.map_err(RunError::from)
}
