use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crawlchat_core::{update, AppState, Msg};
use crawlchat_engine::{EngineHandle, ReqwestTransport, StateStore};
use crawlchat_logging::{chat_info, chat_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::persistence;
use super::ui::constants::HELP_TEXT;
use super::ui::input::{parse_line, InputCommand};
use super::ui::render::TerminalRenderer;

const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Everything the main loop reacts to.
pub(crate) enum LoopEvent {
    Core(Msg),
    Input(InputCommand),
    InputClosed,
}

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    crawlchat_logging::initialize(
        config.log_target.into(),
        config.level_filter(),
        &config.log_file,
    );
    chat_info!("crawlchat starting against {}", config.base_url);

    let store = StateStore::new(config.state_dir.clone());
    let cookie = persistence::load_session_cookie(&store, &config.base_url);
    let transport = ReqwestTransport::new(config.service_settings(cookie.clone()))?;
    let (engine, events) = EngineHandle::start(Arc::new(transport))?;

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(engine, events, loop_tx.clone());
    spawn_input_reader(loop_tx.clone());
    spawn_ticker(loop_tx);

    let mut session = Session {
        state: AppState::new(),
        runner,
        renderer: TerminalRenderer::new(io::stdout()),
        store,
        base_url: config.base_url.clone(),
        saved_cookie: cookie,
    };

    session.renderer.notice(HELP_TEXT)?;
    session.dispatch(Msg::SessionStarted)?;

    for event in loop_rx {
        match event {
            LoopEvent::Core(msg) => {
                let settles_crawl = matches!(msg, Msg::IngestFinished(_));
                session.dispatch(msg)?;
                if settles_crawl {
                    session.save_cookie_if_changed();
                }
            }
            LoopEvent::Input(command) => {
                if !session.handle_input(command)? {
                    break;
                }
            }
            LoopEvent::InputClosed => break,
        }
    }

    session.save_cookie_if_changed();
    chat_info!("crawlchat exiting");
    Ok(())
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: TerminalRenderer<io::Stdout>,
    store: StateStore,
    base_url: String,
    saved_cookie: Option<String>,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        if dirty {
            self.renderer.render(&self.state.view())?;
        }
        Ok(())
    }

    /// Returns false when the user asked to leave.
    fn handle_input(&mut self, command: InputCommand) -> io::Result<bool> {
        match command {
            InputCommand::Crawl(url) => {
                self.dispatch(Msg::UrlInputChanged(url))?;
                self.dispatch(Msg::UrlSubmitted)?;
            }
            InputCommand::Ask(text) => {
                self.dispatch(Msg::QueryInputChanged(text))?;
                self.dispatch(Msg::QuerySubmitted)?;
            }
            InputCommand::Status => self.renderer.render_status(&self.state.view())?,
            InputCommand::Help => self.renderer.notice(HELP_TEXT)?,
            InputCommand::Unknown(name) => {
                self.renderer
                    .notice(&format!("Unknown command {name}. Try /help."))?;
            }
            InputCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn save_cookie_if_changed(&mut self) {
        let cookie = self.runner.session_cookie();
        if cookie.is_some() && cookie != self.saved_cookie {
            persistence::save_session_cookie(&self.store, &self.base_url, cookie.as_deref());
            self.saved_cookie = cookie;
        }
    }
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    chat_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            if loop_tx.send(LoopEvent::Input(parse_line(&line))).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

// Background tick to animate the crawl indicator.
fn spawn_ticker(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while loop_tx.send(LoopEvent::Core(Msg::Tick)).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}
