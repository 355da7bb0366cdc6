use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use board_logging::{board_debug, board_info, board_warn};
use clap::Parser;
use jobboard_client::{BackendHandle, ReqwestBackend};
use jobboard_core::{update, AppState, DashboardViewModel, Msg};

use super::config::{self, Cli};
use super::effects::{EffectRunner, MsgSink};
use super::input::{parse_command, InputCommand, HELP_TEXT};
use super::ui;

/// Everything the event loop reacts to, in arrival order.
pub enum LoopEvent {
    Msg(Msg),
    Input(InputCommand),
    InputClosed,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = config::load(&cli).context("failed to load configuration")?;
    board_logging::initialize(settings.log_to, settings.log_level, &settings.log_file);
    board_info!(
        "jobboard starting against {} (page size {})",
        settings.backend.endpoint,
        settings.dashboard.page_size
    );

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    let backend = ReqwestBackend::new(&settings.backend).context("invalid backend endpoint")?;
    let handle = BackendHandle::new(
        Arc::new(backend),
        settings.poll_interval,
        Arc::new(MsgSink::new(event_tx.clone())),
    )
    .context("failed to start backend worker")?;

    spawn_input_reader(event_tx)?;

    let mut session = Session::new(
        AppState::with_config(settings.dashboard),
        EffectRunner::new(handle),
        io::stdout(),
    );
    session.print(HELP_TEXT);
    session.dispatch_msg(Msg::Init);

    while let Ok(event) = event_rx.recv() {
        let keep_running = match event {
            LoopEvent::Msg(msg) => {
                session.dispatch_msg(msg);
                true
            }
            LoopEvent::Input(command) => session.handle_input(command),
            LoopEvent::InputClosed => false,
        };
        if !keep_running {
            break;
        }
    }

    session.shutdown();
    board_info!("jobboard stopped");
    Ok(())
}

fn spawn_input_reader(tx: mpsc::Sender<LoopEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("jobboard-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        board_warn!("Failed to read input: {}", err);
                        break;
                    }
                };
                if let Some(command) = parse_command(&line) {
                    if tx.send(LoopEvent::Input(command)).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(LoopEvent::InputClosed);
        })?;
    Ok(())
}

/// What a typed command turns into.
#[derive(Debug, PartialEq)]
enum Action {
    Dispatch(Msg),
    Print(String),
    Quit,
}

fn translate(command: InputCommand, view: &DashboardViewModel) -> Action {
    match command {
        InputCommand::Search(text) => Action::Dispatch(Msg::SearchInput(text)),
        InputCommand::Site(site) => Action::Dispatch(Msg::SiteFilterChanged(site)),
        InputCommand::Next => Action::Dispatch(Msg::NextPage),
        InputCommand::Prev => Action::Dispatch(Msg::PrevPage),
        InputCommand::Page(page) => Action::Dispatch(Msg::PageRequested(page)),
        InputCommand::View(row) => match row.checked_sub(1).and_then(|index| view.rows.get(index)) {
            Some(job) => Action::Dispatch(Msg::OpenJob {
                url: job.url.clone(),
            }),
            None => Action::Print(format!(
                "No row {row} on this page ({} shown).",
                view.rows.len()
            )),
        },
        InputCommand::Close => Action::Dispatch(Msg::CloseJob),
        InputCommand::Logs => Action::Dispatch(Msg::ShowLogPanel),
        InputCommand::Hide => Action::Dispatch(Msg::CloseLogPanel),
        InputCommand::Escape => Action::Dispatch(Msg::DismissOverlays),
        InputCommand::Scrape => {
            if view.run.start_enabled {
                Action::Dispatch(Msg::StartScrapeClicked)
            } else {
                Action::Print("A scrape is already running.".to_string())
            }
        }
        InputCommand::Refresh => Action::Dispatch(Msg::RefreshRequested),
        InputCommand::Help => Action::Print(HELP_TEXT.to_string()),
        InputCommand::Quit => Action::Quit,
        InputCommand::Invalid(message) => Action::Print(message),
    }
}

struct Session<W: Write> {
    state: AppState,
    last_view: DashboardViewModel,
    runner: Option<EffectRunner>,
    out: W,
}

impl<W: Write> Session<W> {
    fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        let last_view = state.view();
        Self {
            state,
            last_view,
            runner: Some(runner),
            out,
        }
    }

    /// Returns `false` when the user asked to quit.
    fn handle_input(&mut self, command: InputCommand) -> bool {
        board_debug!("Input {:?}", command);
        match translate(command, &self.last_view) {
            Action::Dispatch(msg) => self.dispatch_msg(msg),
            Action::Print(text) => self.print(&text),
            Action::Quit => return false,
        }
        true
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if let Some(runner) = &self.runner {
            runner.enqueue(effects);
        }
        if was_dirty {
            self.last_view = self.state.view();
            self.render();
        }
    }

    fn render(&mut self) {
        let frame = ui::render::render(&self.last_view).join("\n");
        self.print(&frame);
    }

    fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}\n").and_then(|_| self.out.flush()) {
            board_warn!("Failed to write to terminal: {}", err);
        }
    }

    fn shutdown(&mut self) {
        if let Some(runner) = self.runner.take() {
            runner.shutdown();
        }
    }
}
