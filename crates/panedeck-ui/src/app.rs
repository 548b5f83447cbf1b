//! Main application struct
//!
//! [`App`] implements [`AppCoordinator`]: it maps messages onto
//! [`WidgetManager`] operations and draws the whole frame.
//!
//! # Example
//!
//! ```ignore
//! let mut app = App::new(manager, theme);
//! app.start(runtime.handle());
//!
//! loop {
//!     terminal.draw(|f| app.render(f))?;
//!     if event::poll(Duration::from_millis(100))? {
//!         app.dispatch(Message::from(InputEvent::from(event::read()?)));
//!     }
//!     app.tick();
//!     if app.should_quit() {
//!         break;
//!     }
//! }
//! ```

use crate::keymap::{self, message_for_key};
use crate::renderer::{render_dashboard, AppLayout};
use crate::widget_manager::WidgetManager;
use crate::widgets::{StatusBar, TabBar};
use panedeck_core::{AppCoordinator, LaunchRequest, Message, Theme};
use ratatui::prelude::*;
use tokio::runtime::Handle;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Main application state
pub struct App {
    manager: WidgetManager,
    theme: Theme,
    /// Lifecycle messages published by widget tasks
    inbox: broadcast::Receiver<Message>,
    should_quit: bool,
    show_help: bool,
    launch: Option<LaunchRequest>,
}

impl App {
    /// Wraps a built manager.
    ///
    /// The app subscribes to the manager's bus right away, so readiness
    /// published by widgets started later is never missed.
    #[must_use]
    pub fn new(manager: WidgetManager, theme: Theme) -> Self {
        let inbox = manager.bus().subscribe();
        App {
            manager,
            theme,
            inbox,
            should_quit: false,
            show_help: false,
            launch: None,
        }
    }

    /// Initializes every widget and shows the first tab.
    pub fn start(&mut self, runtime: &Handle) -> Vec<JoinHandle<()>> {
        let handles = self.manager.init_all(runtime);
        self.manager.switch_tab(0);
        handles
    }

    #[must_use]
    pub fn manager(&self) -> &WidgetManager {
        &self.manager
    }

    /// Command chosen from a menu, to run once the terminal is restored.
    pub fn take_launch_request(&mut self) -> Option<LaunchRequest> {
        self.launch.take()
    }

    /// Renders the tab bar, the visible tab and the status bar.
    pub fn render(&self, frame: &mut Frame) {
        let layout = AppLayout::new(frame.area());

        let names = self.manager.tab_names();
        let tab_bar = TabBar::new(&names, self.manager.active_tab(), &self.theme);
        frame.render_widget(tab_bar, layout.tab_bar);

        render_dashboard(frame, layout.content, &self.manager, &self.theme);

        let (title, state) = self
            .manager
            .active_widget()
            .map_or(("", ""), |w| (w.title(), w.state().label()));
        let hints = if self.show_help {
            keymap::HELP
        } else {
            keymap::HINTS
        };
        let status = StatusBar::new(&self.theme)
            .left(title)
            .center(state)
            .right(hints);
        frame.render_widget(status, layout.status_bar);
    }

    fn cycle_tab(&mut self, forward: bool) {
        let count = self.manager.tab_count();
        if count == 0 {
            return;
        }
        let next = match (self.manager.active_tab(), forward) {
            (None, _) => 0,
            (Some(tab), true) => (tab + 1) % count,
            (Some(tab), false) => (tab + count - 1) % count,
        };
        self.manager.switch_tab(next);
    }

    fn drain_inbox(&mut self) {
        loop {
            match self.inbox.try_recv() {
                Ok(msg) => self.dispatch(msg),
                Err(TryRecvError::Lagged(skipped)) => {
                    // Statuses are re-read by reconcile, so dropped
                    // notifications lose nothing.
                    debug!(skipped, "lifecycle notifications lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

impl AppCoordinator for App {
    fn tab_names(&self) -> Vec<&str> {
        self.manager.tab_names()
    }

    fn active_tab(&self) -> Option<usize> {
        self.manager.active_tab()
    }

    fn theme(&self) -> &Theme {
        &self.theme
    }

    fn dispatch(&mut self, msg: Message) {
        match msg {
            Message::Quit => self.should_quit = true,
            Message::NextTab => self.cycle_tab(true),
            Message::PrevTab => self.cycle_tab(false),
            Message::SwitchTab(tab) => {
                self.manager.switch_tab(tab);
            }
            Message::Focus(direction) => {
                self.manager.next_widget(direction);
            }
            Message::WidgetReady(_) | Message::WidgetDisabled(_) => {
                self.manager.reconcile();
            }
            Message::Launch(request) => {
                info!(command = %request.command, "launching command after exit");
                self.launch = Some(request);
                self.should_quit = true;
            }
            Message::ToggleHelp => self.show_help = !self.show_help,
            Message::Key(key) => match message_for_key(key) {
                Message::Key(key) => {
                    if let Some(response) = self.manager.handle_key(key) {
                        self.dispatch(response);
                    }
                }
                other => self.dispatch(other),
            },
            Message::Resize(width, height) => {
                let (width, height) = AppLayout::grid_size(width, height);
                self.manager.resize(width, height);
            }
            batch @ Message::Batch(_) => {
                for m in batch.flatten() {
                    self.dispatch(m);
                }
            }
            Message::None => {}
        }
    }

    fn tick(&mut self) {
        self.drain_inbox();
        self.manager.tick();
        if self.manager.reconcile() {
            if let Some(active) = self.manager.active_widget() {
                debug!(widget = active.id(), "focused after readiness change");
            } else {
                warn!("no focusable widget on the visible tab");
            }
        }
    }

    fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use panedeck_core::{
        CoreResult, DashboardConfig, Direction, InitContext, InitFuture, InitOutcome, MessageBus,
        Widget, WidgetKind, WidgetSpec, WidgetView,
    };
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Paragraph;
    use ratatui::Terminal;

    /// Prints its content; content `later` makes it initialize on the runtime.
    struct EchoWidget {
        text: String,
    }

    impl Widget for EchoWidget {
        fn kind(&self) -> WidgetKind {
            WidgetKind::Note
        }

        fn init(&mut self, _ctx: InitContext) -> InitOutcome {
            if self.text == "later" {
                let task: InitFuture = Box::pin(async {
                    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                    Ok(())
                });
                InitOutcome::Deferred(task)
            } else {
                InitOutcome::Ready
            }
        }

        fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
            (key.code == KeyCode::Enter)
                .then(|| Message::Launch(LaunchRequest::new(&self.text, Vec::new())))
        }

        fn render(&self, frame: &mut Frame, area: Rect, view: &WidgetView<'_>) {
            frame.render_widget(Paragraph::new(self.text.as_str()).style(view.theme.text()), area);
        }
    }

    const CONFIG: &str = r#"
[[widgets]]
id = "left"
type = "note"
title = "Left"
content = "echo left"
[[widgets]]
id = "right"
type = "note"
title = "Right"
content = "later"

[[layout]]
name = "main"
[[layout.rows]]
[[layout.rows.cols]]
[[layout.rows.cols.stacks]]
id = "left"
[[layout.rows.cols]]
[[layout.rows.cols.stacks]]
id = "right"

[[layout]]
name = "other"
[[layout.rows]]
[[layout.rows.cols]]
[[layout.rows.cols.stacks]]
id = "left"
"#;

    fn echo(spec: &WidgetSpec) -> CoreResult<Box<dyn Widget>> {
        Ok(Box::new(EchoWidget {
            text: spec.text_content().unwrap_or_default().to_string(),
        }))
    }

    fn app(width: u16, height: u16) -> App {
        let config = DashboardConfig::from_toml_str(CONFIG).unwrap();
        let (w, h) = AppLayout::grid_size(width, height);
        let manager = WidgetManager::build(&config, w, h, MessageBus::default(), echo).unwrap();
        App::new(manager, Theme::dark())
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn test_start_focuses_first_ready_widget() {
        let mut app = app(60, 20);
        app.start(&Handle::current());
        assert_eq!(app.active_tab(), Some(0));
        assert_eq!(app.manager().active_widget().unwrap().id(), "left");
        assert_eq!(app.tab_names(), vec!["main", "other"]);
    }

    #[tokio::test]
    async fn test_deferred_widget_becomes_reachable() {
        let mut app = app(60, 20);
        for handle in app.start(&Handle::current()) {
            handle.await.unwrap();
        }
        app.tick();
        app.dispatch(Message::Focus(Direction::Right));
        assert_eq!(app.manager().active_widget().unwrap().id(), "right");
    }

    #[tokio::test]
    async fn test_keys_drive_navigation_and_quit() {
        let mut app = app(60, 20);
        app.start(&Handle::current());

        app.dispatch(Message::Key(KeyEvent::from(KeyCode::Char('2'))));
        assert_eq!(app.active_tab(), Some(1));
        app.dispatch(Message::Key(KeyEvent::from(KeyCode::Tab)));
        assert_eq!(app.active_tab(), Some(0));
        app.dispatch(Message::PrevTab);
        assert_eq!(app.active_tab(), Some(1));

        assert!(!app.should_quit());
        app.dispatch(Message::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_widget_key_can_request_launch() {
        let mut app = app(60, 20);
        app.start(&Handle::current());
        app.dispatch(Message::Key(KeyEvent::from(KeyCode::Enter)));
        assert!(app.should_quit());
        let request = app.take_launch_request().unwrap();
        assert_eq!(request.command, "echo left");
        assert!(app.take_launch_request().is_none());
    }

    #[tokio::test]
    async fn test_resize_keeps_focus() {
        let mut app = app(60, 20);
        app.start(&Handle::current());
        app.dispatch(Message::Resize(100, 30));
        assert_eq!(app.manager().grid_size(), (100, 28));
        assert_eq!(app.manager().active_widget().unwrap().id(), "left");
    }

    #[tokio::test]
    async fn test_render_draws_bars_and_widgets() {
        let mut app = app(60, 12);
        app.start(&Handle::current());

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let text = screen(&terminal);

        assert!(text.contains("1.main"));
        assert!(text.contains("2.other"));
        assert!(text.contains("Left"));
        assert!(text.contains("echo left"));
        assert!(text.contains("Right (loading)"));
        assert!(text.contains("q:quit"));
    }

    #[tokio::test]
    async fn test_toggle_help_changes_status_bar() {
        let mut app = app(100, 12);
        app.start(&Handle::current());
        app.dispatch(Message::Batch(vec![
            Message::None,
            Message::Batch(vec![Message::ToggleHelp, Message::SwitchTab(1)]),
        ]));
        assert_eq!(app.active_tab(), Some(1));

        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        assert!(screen(&terminal).contains("move focus"));
    }

    #[test]
    fn test_render_before_start_does_not_panic() {
        let app = app(40, 10);
        let mut terminal = Terminal::new(TestBackend::new(40, 10)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }
}
