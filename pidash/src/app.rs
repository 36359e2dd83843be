//! App state and main loop: input handling, background requests, and drawing.

use std::{
    io,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::action::{authorize, classify, settle, Action, ActionOutcome};
use crate::api::{ApiClient, RawReply};
use crate::diagnostics::Diagnostics;
use crate::error::ClientError;
use crate::interact::Interaction;
use crate::types::Snapshot;
use crate::ui::{
    buttons::draw_buttons,
    diagnostics::draw_diagnostics,
    dialog::{draw_dialog, Dialog, DialogResult},
    fields::draw_fields,
    header::draw_header,
};
use crate::view::DashboardView;

/// Completed background requests, delivered back to the event loop.
#[derive(Debug)]
pub enum Reply {
    Snapshot(Result<Snapshot, ClientError>),
    Action(Action, Result<RawReply, ClientError>),
}

pub struct App {
    client: ApiClient,
    view: DashboardView,
    diagnostics: Diagnostics,
    last_loaded: Option<DateTime<Local>>,

    // in-flight guards
    loading: bool,
    busy: [bool; 2],

    focus: Action,
    refresh: Option<Duration>,
    last_load_started: Option<Instant>,
    should_quit: bool,

    tx: mpsc::UnboundedSender<Reply>,
    rx: mpsc::UnboundedReceiver<Reply>,
}

fn slot(action: Action) -> usize {
    match action {
        Action::Shutdown => 0,
        Action::Update => 1,
    }
}

impl App {
    pub fn new(client: ApiClient, refresh: Option<Duration>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            view: DashboardView::new(),
            diagnostics: Diagnostics::default(),
            last_loaded: None,
            loading: false,
            busy: [false; 2],
            focus: Action::Shutdown,
            refresh: refresh.filter(|d| !d.is_zero()),
            last_load_started: None,
            should_quit: false,
            tx,
            rx,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.busy[slot(action)]
    }

    pub fn focus(&self) -> Action {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn last_loaded(&self) -> Option<DateTime<Local>> {
        self.last_loaded
    }

    /// Fire a snapshot request unless one is already in flight.
    pub fn start_load(&mut self) -> bool {
        if self.loading {
            debug!("load already in flight, ignoring");
            return false;
        }
        self.loading = true;
        self.last_load_started = Some(Instant::now());
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let res = client.fetch_snapshot().await;
            let _ = tx.send(Reply::Snapshot(res));
        });
        true
    }

    /// Button activation: ask for the key and confirmation, then send the
    /// request in the background. A busy button ignores activations.
    pub fn activate<I: Interaction + ?Sized>(&mut self, action: Action, ui: &mut I) -> bool {
        if self.is_busy(action) {
            debug!(%action, "request already in flight, ignoring");
            return false;
        }
        let Some(key) = authorize(action, ui) else {
            debug!(%action, "cancelled by user");
            return false;
        };
        self.busy[slot(action)] = true;
        info!(%action, "sending request");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let res = client.post_action(action, &key).await;
            let _ = tx.send(Reply::Action(action, res));
        });
        true
    }

    pub fn on_reply<I: Interaction + ?Sized>(&mut self, reply: Reply, ui: &mut I) {
        match reply {
            Reply::Snapshot(res) => {
                self.loading = false;
                match res {
                    Ok(snapshot) => {
                        self.view.apply(&snapshot);
                        self.last_loaded = Some(Local::now());
                    }
                    Err(e) => self
                        .diagnostics
                        .record(format!("loading snapshot failed: {e}")),
                }
            }
            Reply::Action(action, res) => {
                self.busy[slot(action)] = false;
                let outcome = match res {
                    Ok(raw) => classify(&raw),
                    Err(e) => ActionOutcome::Failed(e),
                };
                settle(action, &outcome, ui, &mut self.diagnostics);
            }
        }
    }

    /// Wait for the next background reply and apply it. `false` once no
    /// sender can produce more.
    pub async fn process_next<I: Interaction + ?Sized>(&mut self, ui: &mut I) -> bool {
        match self.rx.recv().await {
            Some(reply) => {
                self.on_reply(reply, ui);
                true
            }
            None => false,
        }
    }

    fn drain_replies<I: Interaction + ?Sized>(&mut self, ui: &mut I) {
        while let Ok(reply) = self.rx.try_recv() {
            self.on_reply(reply, ui);
        }
    }

    fn refresh_due(&self) -> bool {
        match (self.refresh, self.last_load_started) {
            (Some(every), Some(started)) => !self.loading && started.elapsed() >= every,
            _ => false,
        }
    }

    pub fn handle_key<I: Interaction + ?Sized>(&mut self, k: KeyEvent, ui: &mut I) {
        if k.kind != KeyEventKind::Press {
            return;
        }
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.start_load();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.focus = Action::Shutdown;
                self.activate(Action::Shutdown, ui);
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.focus = Action::Update;
                self.activate(Action::Update, ui);
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Action::Shutdown => Action::Update,
                    Action::Update => Action::Shutdown,
                };
            }
            KeyCode::Enter => {
                let focus = self.focus;
                self.activate(focus, ui);
            }
            _ => {}
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        self.start_load();
        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Draw, keeping the frame as a backdrop for modal dialogs
            let backdrop = terminal.draw(|f| self.draw(f))?.buffer.clone();

            // Replies from background requests (alerts are modal)
            {
                let mut ui = TerminalInteraction::new(terminal, &backdrop);
                self.drain_replies(&mut ui);
            }

            // Input (non-blocking)
            while event::poll(Duration::from_millis(50))? {
                if let Event::Key(k) = event::read()? {
                    let mut ui = TerminalInteraction::new(terminal, &backdrop);
                    self.handle_key(k, &mut ui);
                }
                if self.should_quit {
                    break;
                }
            }
            if self.should_quit {
                break;
            }

            if self.refresh_due() {
                self.start_load();
            }

            // Let spawned requests progress
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    pub fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),  // header
                Constraint::Length(10), // fields
                Constraint::Length(3),  // buttons
                Constraint::Min(3),     // diagnostics
                Constraint::Length(1),  // key help
            ])
            .split(f.area());

        draw_header(
            f,
            rows[0],
            &host_label(self.client.base_url()),
            self.last_loaded,
            self.loading,
        );
        draw_fields(f, rows[1], &self.view);
        draw_buttons(f, rows[2], self.focus, |a| self.is_busy(a));
        draw_diagnostics(f, rows[3], &self.diagnostics);
        f.render_widget(
            Paragraph::new(Line::styled(
                "r: reload   s: shutdown   u: update   ←/→/Tab: focus   Enter: press   q: quit",
                Style::default().add_modifier(Modifier::DIM),
            )),
            rows[4],
        );
    }
}

fn host_label(url: &url::Url) -> String {
    let host = url.host_str().unwrap_or("?");
    match url.port() {
        Some(p) => format!("{host}:{p}"),
        None => host.to_string(),
    }
}

/// Modal dialogs in the terminal: each call blocks the loop until answered,
/// drawn over the last dashboard frame.
pub struct TerminalInteraction<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    backdrop: &'a Buffer,
}

impl<'a, B: Backend> TerminalInteraction<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, backdrop: &'a Buffer) -> Self {
        Self { terminal, backdrop }
    }

    fn run_dialog(&mut self, mut dialog: Dialog) -> Option<DialogResult> {
        let backdrop = self.backdrop;
        loop {
            let drawn = self.terminal.draw(|f| {
                if f.buffer_mut().area == backdrop.area {
                    *f.buffer_mut() = backdrop.clone();
                }
                draw_dialog(f, &dialog);
            });
            if drawn.is_err() {
                return None;
            }
            match event::read() {
                Ok(Event::Key(k)) => {
                    if let Some(res) = dialog.handle_key(k) {
                        return Some(res);
                    }
                }
                Ok(_) => {}
                Err(_) => return None,
            }
        }
    }
}

impl<B: Backend> Interaction for TerminalInteraction<'_, B> {
    fn prompt(&mut self, message: &str) -> Option<String> {
        match self.run_dialog(Dialog::prompt(message)) {
            Some(DialogResult::Text(t)) => t,
            _ => None,
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        matches!(
            self.run_dialog(Dialog::confirm(message)),
            Some(DialogResult::Answer(true))
        )
    }

    fn notify(&mut self, message: &str) {
        let _ = self.run_dialog(Dialog::notice(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_label_includes_explicit_port() {
        let u = url::Url::parse("http://raspberrypi.local:7070/").unwrap();
        assert_eq!(host_label(&u), "raspberrypi.local:7070");
        let u = url::Url::parse("https://pi.example.com/monitor/").unwrap();
        assert_eq!(host_label(&u), "pi.example.com");
    }

    #[test]
    fn focus_cycles_between_buttons() {
        struct Never;
        impl Interaction for Never {
            fn prompt(&mut self, _: &str) -> Option<String> {
                panic!("no prompt expected")
            }
            fn confirm(&mut self, _: &str) -> bool {
                panic!("no confirm expected")
            }
            fn notify(&mut self, _: &str) {}
        }
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let mut app = App::new(client, None);
        assert_eq!(app.focus(), Action::Shutdown);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), &mut Never);
        assert_eq!(app.focus(), Action::Update);
        app.handle_key(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE), &mut Never);
        assert_eq!(app.focus(), Action::Shutdown);
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE), &mut Never);
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn refresh_waits_for_interval_and_idle() {
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let mut app = App::new(client, Some(Duration::from_millis(10)));
        // nothing loaded yet, the first load is started explicitly
        assert!(!app.refresh_due());

        assert!(app.start_load());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(app.is_loading());
        assert!(!app.refresh_due(), "no reload while one is in flight");

        app.loading = false;
        assert!(app.refresh_due());
    }

    #[tokio::test]
    async fn refresh_not_due_before_interval() {
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let mut app = App::new(client, Some(Duration::from_secs(60)));
        assert!(app.start_load());
        app.loading = false;
        assert!(!app.refresh_due());
    }

    #[tokio::test]
    async fn zero_refresh_means_load_once() {
        let client = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let mut app = App::new(client, Some(Duration::ZERO));
        assert!(app.refresh.is_none());
        assert!(app.start_load());
        app.loading = false;
        assert!(!app.refresh_due());
    }
}
