//! The glint binary: loads options, opens the viewer window, and runs
//! the event loop until the window closes.

use glint::options::Options;
use glint::viewer::Viewer;

/// Options preset loaded from the working directory when present.
const OPTIONS_PATH: &str = "glint.toml";

fn main() {
    env_logger::init();

    let options_path = std::path::Path::new(OPTIONS_PATH);
    let options = if options_path.exists() {
        match Options::load(options_path) {
            Ok(opts) => {
                log::info!("loaded options from {OPTIONS_PATH}");
                opts
            }
            Err(e) => {
                log::error!("failed to load {OPTIONS_PATH}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        Options::default()
    };

    let mut builder = Viewer::builder().with_options(options);
    if let Some(obj_path) = std::env::args().nth(1) {
        builder = builder.with_obj_path(obj_path);
    }

    if let Err(e) = builder.build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
