//! The *jot* line editor.
//!
//! Copyright 2024 David Edwards
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//! <https://www.apache.org/licenses/LICENSE-2.0>
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.
mod ansi;
mod bind;
mod buffer;
mod clip;
mod column;
mod config;
mod control;
mod display;
mod document;
mod env;
mod error;
mod help;
mod key;
mod line;
mod logging;
mod op;
mod opt;
mod recorder;
mod ring;
mod search;
mod sys;
mod term;
mod user;
mod viewport;

use crate::buffer::Buffer;
use crate::config::Configuration;
use crate::control::Controller;
use crate::env::Environment;
use crate::error::Result;
use crate::key::Keyboard;
use crate::opt::Options;
use crate::viewport::Window;
use std::ops::Drop;
use std::process::ExitCode;
use tracing::info;

/// Usage documentation for display to terminal.
const USAGE: &str = include_str!("include/usage.in");

// Version information.
const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Used for restoring the terminal via [`Drop`] to its original state.
struct RestoreTerminal;

impl Drop for RestoreTerminal {
    fn drop(&mut self) {
        display::Display::new()
            .clear_screen()
            .write_str(ansi::alt_screen(false))
            .send();
        term::restore().unwrap_or_else(|e| println!("error restoring terminal: {e}"));
    }
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            println!("{e}");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run() -> Result<()> {
    let opts = Options::parse(std::env::args().skip(1))?;
    if opts.help {
        println!("{USAGE}");
        Ok(())
    } else if opts.version {
        println!("{PACKAGE_NAME} {PACKAGE_VERSION}");
        Ok(())
    } else {
        run_opts(&opts)
    }
}

fn run_opts(opts: &Options) -> Result<()> {
    // Load optional configuration from either standard location or path specified on
    // command line, and apply command line options afterwards since these override
    // all other settings.
    let mut config = if let Some(ref config_path) = opts.config_path {
        Configuration::load_file(config_path)?
    } else {
        Configuration::load()?
    };
    config.apply_opts(opts);

    if opts.ops {
        print!("{}", help::ops_content(&config.bindings));
        Ok(())
    } else if opts.bindings {
        print!("{}", help::bindings_content(config.bindings.bindings()));
        Ok(())
    } else {
        logging::init(&config.settings)?;
        run_config(opts, config)
    }
}

fn run_config(opts: &Options, config: Configuration) -> Result<()> {
    // Load files specified on command line before touching the terminal, so errors
    // are reported normally.
    let buffers = opts
        .files
        .iter()
        .map(Buffer::load)
        .collect::<Result<Vec<_>>>()?;
    info!(files = buffers.len(), "starting");

    let (rows, cols) = term::size()?;
    let window = Window::new(rows.saturating_sub(2), cols, config.settings.tab_size);
    let env = Environment::new(&config, window, buffers);
    let mut controller = Controller::new(env, config.bindings);

    // Puts terminal into raw mode prior to running main controller loop, but also
    // ensures terminal settings are restored upon exit.
    term::init()?;
    let _restore = RestoreTerminal;
    display::Display::new()
        .write_str(ansi::alt_screen(true))
        .send();
    controller.run(&mut Keyboard::new())?;
    info!("exiting");
    Ok(())
}
