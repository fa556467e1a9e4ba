use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use liker_core::{update, AppState, Msg};
use liker_engine::EngineHandle;
use liker_logging::{liker_debug, liker_info, liker_warn};

use super::config::{LikerConfig, DEFAULT_CONFIG_PATH};
use super::effects::EffectRunner;
use super::logging;
use super::ui;
use super::ui::input::Command;

const TICK: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = LikerConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    logging::initialize(
        config.log_destination,
        liker_logging::parse_level(&config.log_level),
    );
    liker_info!(
        "Starting against {} (batch size {}, page size {})",
        config.base_url,
        config.batch_size,
        config.page_size
    );

    let engine = EngineHandle::new(config.gateway_settings())
        .with_context(|| format!("connecting to {}", config.base_url))?;
    let mut shell = Shell::new(
        AppState::with_settings(config.controller_settings()),
        EffectRunner::new(engine),
    );

    let lines = spawn_stdin_reader();
    println!("{}", ui::constants::HELP_TEXT);
    shell.dispatch(Msg::Started);
    shell.prompt();

    loop {
        shell.pump_engine();
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                if !shell.handle_line(&line) {
                    break;
                }
                shell.prompt();
            }
            Err(mpsc::RecvTimeoutError::Timeout) => shell.dispatch(Msg::Tick),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    shell.shutdown();
    liker_info!("Exiting");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

struct Shell {
    state: AppState,
    runner: EffectRunner,
}

impl Shell {
    fn new(state: AppState, runner: EffectRunner) -> Self {
        Self { state, runner }
    }

    /// Returns `false` when the operator asked to leave.
    fn handle_line(&mut self, line: &str) -> bool {
        match ui::input::parse_command(line, self.state.page_size()) {
            Ok(None) => {}
            Ok(Some(Command::Help)) => println!("{}", ui::constants::HELP_TEXT),
            Ok(Some(Command::Quit)) => return false,
            Ok(Some(Command::Dispatch(msg))) => {
                liker_debug!("Input -> {:?}", msg);
                self.dispatch(msg);
            }
            Err(err) => println!("{err}"),
        }
        true
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
        self.render_if_dirty();
    }

    fn pump_engine(&mut self) {
        for msg in self.runner.drain_messages() {
            self.dispatch(msg);
        }
    }

    fn render_if_dirty(&mut self) {
        if !self.state.consume_dirty() {
            return;
        }
        let clock = chrono::Local::now().format("%H:%M:%S").to_string();
        let mut stdout = io::stdout().lock();
        for line in ui::render::render(&self.state.view(), &clock) {
            let _ = writeln!(stdout, "{line}");
        }
        let _ = stdout.flush();
    }

    fn prompt(&self) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", ui::constants::PROMPT);
        let _ = stdout.flush();
    }

    /// Stops a running like-all and waits briefly for its final report.
    fn shutdown(&mut self) {
        if !self.state.batch().is_active() {
            return;
        }
        liker_warn!("Quitting with a like-all running; cancelling it");
        self.dispatch(Msg::CancelBatchClicked);
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while self.state.batch().is_active() && Instant::now() < deadline {
            self.pump_engine();
            thread::sleep(TICK);
        }
        if self.state.batch().is_active() {
            liker_warn!("Like-all did not stop within {:?}", SHUTDOWN_GRACE);
        }
    }
}
