use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use lenz_core::{update, AppState, Msg, Settings};
use lenz_engine::{
    ApiClient, BridgeGateway, BridgeTransport, ClientSettings, DirectTransport, HostDialogs,
    ReqwestApiClient, SettingsStore, Transport, DEFAULT_API_URL,
};

use super::dialogs::{answer_to_path, DialogPrompt, TerminalDialogs};
use super::effects::EffectRunner;
use super::logging;
use super::ui::catalog::{prompt_text, texts};
use super::ui::commands::{self, Command};
use super::ui::render::render;
use super::{Cli, TransportKind};

/// Everything the shell loop reacts to, in arrival order.
#[derive(Debug)]
pub(crate) enum ShellEvent {
    Line(String),
    Msg(Msg),
    Prompt(DialogPrompt),
    Eof,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log, &cli.log_file, logging::level_for(cli.verbose));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    let store = SettingsStore::new(cli.settings.clone().unwrap_or_else(SettingsStore::default_path));
    let stored = store.load();
    let fallback_base_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let base_url = cli
        .api_url
        .clone()
        .or(stored.api_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    engine_info!(
        "Starting lenz: transport={:?} endpoint={} settings={}",
        cli.transport,
        base_url,
        store.path().display()
    );

    let client: Arc<dyn ApiClient> = Arc::new(
        ReqwestApiClient::new(ClientSettings::default().with_base_url(base_url))
            .context("building HTTP client")?,
    );

    let (event_tx, event_rx) = mpsc::channel::<ShellEvent>();
    let dialogs: Arc<dyn HostDialogs> = Arc::new(TerminalDialogs::new(event_tx.clone()));
    let transport: Arc<dyn Transport> = match cli.transport {
        TransportKind::Bridge => {
            let gateway = BridgeGateway::new(client, dialogs, store, fallback_base_url);
            Arc::new(BridgeTransport::new(Arc::new(gateway)))
        }
        TransportKind::Direct => {
            Arc::new(DirectTransport::new(client, dialogs, store, fallback_base_url))
        }
    };

    spawn_stdin_reader(event_tx.clone());
    let runner = EffectRunner::new(runtime.handle().clone(), transport, event_tx);
    let settings = runner.load_settings();
    let state = AppState::with_endpoint_override(cli.api_url.clone());
    let mut shell = Shell::new(runner, state, io::stdout());
    shell.start(settings);
    shell.run(&event_rx);

    runtime.shutdown_timeout(Duration::from_millis(500));
    Ok(())
}

fn spawn_stdin_reader(events: mpsc::Sender<ShellEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(ShellEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    engine_warn!("Reading stdin failed: {}", err);
                    break;
                }
            }
        }
        let _ = events.send(ShellEvent::Eof);
    });
}

struct Shell<W: Write> {
    state: AppState,
    runner: EffectRunner,
    pending_prompt: Option<DialogPrompt>,
    out: W,
}

impl<W: Write> Shell<W> {
    fn new(runner: EffectRunner, state: AppState, out: W) -> Self {
        Self {
            state,
            runner,
            pending_prompt: None,
            out,
        }
    }

    fn start(&mut self, settings: Settings) {
        let hint = texts(settings.ui_language).help_hint;
        self.print(hint);
        self.dispatch_msg(Msg::SettingsLoaded(settings));
        self.dispatch_msg(Msg::ApiStatusRequested);
    }

    fn run(&mut self, events: &mpsc::Receiver<ShellEvent>) {
        while let Ok(event) = events.recv() {
            match event {
                ShellEvent::Line(line) => {
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                ShellEvent::Msg(msg) => self.dispatch_msg(msg),
                ShellEvent::Prompt(prompt) => {
                    let language = self.state.settings().ui_language;
                    self.print(&prompt_text(language, &prompt.kind));
                    // Only one dialog is ever open; a newer one replaces a stale one.
                    if let Some(previous) = self.pending_prompt.replace(prompt) {
                        let _ = previous.reply.send(None);
                    }
                }
                ShellEvent::Eof => break,
            }
        }
        engine_info!("Shell loop finished");
    }

    /// Returns `false` when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        if let Some(prompt) = self.pending_prompt.take() {
            let _ = prompt.reply.send(answer_to_path(line));
            return true;
        }
        let t = texts(self.state.settings().ui_language);
        match commands::parse(line) {
            Ok(None) => true,
            Ok(Some(Command::Quit)) => false,
            Ok(Some(Command::Help)) => {
                self.print(t.help);
                true
            }
            Ok(Some(Command::Dispatch(msg))) => {
                self.dispatch_msg(msg);
                true
            }
            Err(err) => {
                self.print(&format!("{}: {}\n{}", t.unknown_command, err, t.help_hint));
                true
            }
        }
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            let text = render(&self.state.view());
            self.print(&text);
        }
    }

    fn print(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text.trim_end());
        let _ = self.out.flush();
    }
}
