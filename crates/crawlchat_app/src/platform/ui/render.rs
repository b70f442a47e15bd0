use std::io::{self, Write};
use std::sync::LazyLock;

use chrono::Local;
use regex::Regex;
use crawlchat_core::{
    AppViewModel, Banner, ConversationPhase, IngestionPhase, LogRowView, Progress, Role,
    SubmitError,
};

use super::constants::*;

// Inverse of the escapes html2md adds to text nodes.
static MARKDOWN_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\([<>*\\_~=+\-#])").expect("static escape pattern"));

/// Prints view-model changes to a line-oriented terminal.
///
/// Entries are printed once, in log order. The crawl indicator is redrawn in
/// place on its own line until the crawl settles.
pub struct TerminalRenderer<W: Write> {
    out: W,
    printed_entries: usize,
    typing_shown: bool,
    last_banner: Option<Banner>,
    last_rejection: Option<SubmitError>,
    last_conversation: ConversationPhase,
    progress_open: bool,
    spinner_frame: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed_entries: 0,
            typing_shown: false,
            last_banner: None,
            last_rejection: None,
            last_conversation: ConversationPhase::Locked,
            progress_open: false,
            spinner_frame: 0,
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        self.render_banner(view)?;
        self.render_unlock(view)?;
        self.render_rows(view)?;
        self.render_rejection(view)?;
        self.render_progress(view)?;
        self.out.flush()
    }

    pub fn render_status(&mut self, view: &AppViewModel) -> io::Result<()> {
        let crawl = match view.ingestion_phase {
            IngestionPhase::Idle => "idle",
            IngestionPhase::InFlight => "crawling",
            IngestionPhase::Succeeded => "done",
            IngestionPhase::Failed => "failed",
        };
        let chat = match view.conversation_phase {
            ConversationPhase::Locked => "locked",
            ConversationPhase::Idle => "ready",
            ConversationPhase::AwaitingResponse => "waiting for answer",
        };
        let site = match (&view.target_url, view.pages_count) {
            (Some(url), Some(count)) => format!("{url} ({count} pages)"),
            (Some(url), None) => url.clone(),
            (None, _) => "none".to_string(),
        };
        self.line(&format!(
            "crawl: {crawl} | chat: {chat} | site: {site} | messages: {}",
            view.entry_count()
        ))?;
        self.out.flush()
    }

    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        self.line(text)?;
        self.out.flush()
    }

    fn render_banner(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.banner == self.last_banner {
            return Ok(());
        }
        self.last_banner = view.banner.clone();
        match &view.banner {
            Some(Banner::Success(text)) => self.line(&format!("[ok] {text}")),
            Some(Banner::Error(text)) => self.line(&format!("[error] {text}")),
            None => Ok(()),
        }
    }

    fn render_unlock(&mut self, view: &AppViewModel) -> io::Result<()> {
        let was_locked = self.last_conversation == ConversationPhase::Locked;
        self.last_conversation = view.conversation_phase;
        if was_locked && view.conversation_phase != ConversationPhase::Locked {
            self.line("Chat is ready. Type a question.")?;
        }
        Ok(())
    }

    fn render_rows(&mut self, view: &AppViewModel) -> io::Result<()> {
        let fresh: Vec<(Role, String)> = view
            .rows
            .iter()
            .filter_map(|row| match row {
                LogRowView::Entry {
                    role, raw, markup, ..
                } => Some((*role, entry_text(*role, raw, markup))),
                LogRowView::Typing => None,
            })
            .skip(self.printed_entries)
            .collect();

        for (role, text) in fresh {
            let label = match role {
                Role::User => LABEL_USER,
                Role::Bot => LABEL_BOT,
                Role::System => LABEL_SYSTEM,
            };
            let stamp = Local::now().format("%H:%M");
            self.line(&format!("[{stamp}] {label}> {text}"))?;
            self.printed_entries += 1;
        }

        let typing = view.is_typing();
        if typing && !self.typing_shown {
            self.line(TYPING_TEXT)?;
        }
        self.typing_shown = typing;
        Ok(())
    }

    fn render_rejection(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.last_rejection == self.last_rejection {
            return Ok(());
        }
        self.last_rejection = view.last_rejection;
        match view.last_rejection {
            Some(rejection) => self.line(&format!("({rejection})")),
            None => Ok(()),
        }
    }

    fn render_progress(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.ingestion_phase != IngestionPhase::InFlight {
            if self.progress_open {
                writeln!(self.out)?;
                self.progress_open = false;
            }
            return Ok(());
        }

        let target = view.target_url.as_deref().unwrap_or("");
        let indicator = match view.progress {
            Progress::Percent(p) => format!("{p:>3}%"),
            Progress::Indeterminate | Progress::Hidden => {
                self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
                format!("  {} ", SPINNER[self.spinner_frame])
            }
        };
        write!(self.out, "\rcrawling {target} {indicator}")?;
        self.progress_open = true;
        Ok(())
    }

    /// Full line; closes an open progress line first.
    fn line(&mut self, text: &str) -> io::Result<()> {
        if self.progress_open {
            writeln!(self.out)?;
            self.progress_open = false;
        }
        writeln!(self.out, "{text}")
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

/// User lines are shown as typed; everything else is projected from markup.
fn entry_text(role: Role, raw: &str, markup: &str) -> String {
    match role {
        Role::User => raw.to_string(),
        Role::Bot | Role::System => terminal_text(markup),
    }
}

/// Display markup as readable terminal text.
fn terminal_text(markup: &str) -> String {
    let projected = html2md::parse_html(markup);
    MARKDOWN_ESCAPE
        .replace_all(projected.trim(), "$1")
        .into_owned()
}
