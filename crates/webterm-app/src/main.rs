//! webterm reference host.
//!
//! Runs one terminal session over stdin/stdout: reads a line, dispatches it
//! through the session, renders sink output to the console. Runs until EOF.

mod addons;
mod config;

use std::io::{self, BufRead, Write};
use std::path::Path;

use webterm_terminal::{OutputSink, Session};

use config::WebtermConfig;

/// Renders sink writes straight to stdout; `clear` is an ANSI erase.
struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_line(&mut self, text: &str) {
        println!("{text}");
    }

    fn write_rich(&mut self, markup: &str) {
        // No embedding surface on a console; show the markup as-is.
        println!("{markup}");
    }

    fn clear(&mut self) {
        print!("\x1b[2J\x1b[H");
        let _ = io::stdout().flush();
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match WebtermConfig::load(Path::new("webterm.toml")) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("config error: {e}; using defaults");
            WebtermConfig::default()
        },
    };

    let mut session = Session::with_defaults();
    session.set_history_capacity(config.history_capacity);
    addons::register_demo_addons(&mut session);
    log::info!("webterm session ready");

    let mut sink = StdoutSink;
    if !config.greeting.is_empty() {
        sink.write_line(&config.greeting);
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{}", config.prompt);
        let _ = io::stdout().flush();
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => session.dispatch(&line, &mut sink),
            Err(e) => {
                log::error!("stdin read failed: {e}");
                break;
            },
        }
    }
    log::info!("webterm session ended");
}
