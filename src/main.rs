//! `texview [options.toml]`
//!
//! Opens a window showing a test-pattern texture. Keys `1`/`2`/`3` switch
//! between stretch, aspect-fill and aspect-fit; `A` toggles auto-resize.

use std::{path::PathBuf, process::ExitCode};

use texview::{TexviewError, ViewOptions, Viewer};

fn run() -> Result<(), TexviewError> {
    let options = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => {
            log::info!("loading options from {}", path.display());
            ViewOptions::load(&path)?
        }
        None => ViewOptions::default(),
    };

    Viewer::builder()
        .with_title("texview")
        .with_options(options)
        .build()
        .run()
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
