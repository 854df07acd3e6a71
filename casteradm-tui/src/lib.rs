use anyhow::Result;
use casteradm_client::{AdminClient, Endpoint};
use casteradm_core::{Location, Page, Router, Subscription};
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};
use serde_json::Value;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

pub mod command;

pub use command::{Command, HELP, parse_command};

const MAX_OUTPUT_LINES: usize = 1000;
const MAX_HISTORY: usize = 100;

pub struct App {
    input: String,
    history: Vec<String>,
    output: Vec<String>,
    cursor_position: usize,
    should_quit: bool,
    scroll_offset: usize,
    history_index: Option<usize>,
    temp_input: String,
    client: AdminClient,
    router: Router,
    page_changes: Rc<RefCell<Vec<Page>>>,
    subscription: Option<Subscription>,
}

impl App {
    pub fn new(client: AdminClient, location: Location) -> Self {
        let router = Router::new(location);

        let page_changes = Rc::new(RefCell::new(Vec::new()));
        let changes = page_changes.clone();
        let subscription = router.subscribe(move |page| changes.borrow_mut().push(*page));
        // The first notification is the page we start on
        page_changes.borrow_mut().clear();

        let output = vec![
            String::new(),
            "  casteradm admin console".to_string(),
            format!("  Server: {}", client.base_url()),
            String::new(),
            "  Type 'help' for available commands, 'exit' or 'quit' to exit.".to_string(),
            String::new(),
        ];

        Self {
            input: String::new(),
            history: Vec::new(),
            output,
            cursor_position: 0,
            should_quit: false,
            scroll_offset: 0,
            history_index: None,
            temp_input: String::new(),
            client,
            router,
            page_changes,
            subscription: Some(subscription),
        }
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn current_page(&self) -> Page {
        self.router.current()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn add_output(&mut self, message: impl Into<String>) {
        self.output.push(message.into());
        if self.output.len() > MAX_OUTPUT_LINES {
            self.output.drain(0..self.output.len() - MAX_OUTPUT_LINES);
        }
        // Auto-scroll to bottom on new output
        self.scroll_offset = 0;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position in characters, not bytes
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map_or(self.input.len(), |(offset, _)| offset)
    }

    fn stop_history_navigation(&mut self) {
        self.history_index = None;
        self.temp_input.clear();
    }

    pub fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor_position);
        self.input.insert(offset, c);
        self.cursor_position += 1;
        self.stop_history_navigation();
    }

    pub fn delete_backward(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let offset = self.byte_offset(self.cursor_position - 1);
        self.input.remove(offset);
        self.cursor_position -= 1;
        self.stop_history_navigation();
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    /// Empty the input line and hand back what was typed
    pub fn take_input(&mut self) -> String {
        self.cursor_position = 0;
        std::mem::take(&mut self.input)
    }

    pub fn navigate_history_backward(&mut self) {
        if self.history.is_empty() {
            return;
        }

        if self.history_index.is_none() {
            self.temp_input = self.input.clone();
        }

        let idx = match self.history_index {
            None => self.history.len() - 1,
            Some(idx) => idx.saturating_sub(1),
        };

        self.history_index = Some(idx);
        self.input = self.history[idx].clone();
        self.cursor_position = self.input.chars().count();
    }

    pub fn navigate_history_forward(&mut self) {
        let Some(idx) = self.history_index else {
            return;
        };

        if idx + 1 >= self.history.len() {
            // Past the newest entry, restore what was being typed
            self.input = std::mem::take(&mut self.temp_input);
            self.history_index = None;
        } else {
            self.history_index = Some(idx + 1);
            self.input = self.history[idx + 1].clone();
        }
        self.cursor_position = self.input.chars().count();
    }

    /// One turn of the event loop: deliver pending navigation events and
    /// react to the resulting page changes.
    pub async fn pump(&mut self) {
        if self.router.location().dispatch_pending() == 0 {
            return;
        }

        let changes: Vec<Page> = self.page_changes.borrow_mut().drain(..).collect();
        for page in changes {
            debug!("Console showing {}", page);
            self.add_output(format!("── {} ──", page.title()));
            self.show_page(page).await;
        }
    }

    async fn show_page(&mut self, page: Page) {
        let Some(endpoint) = page.endpoint() else {
            let who = self.client.credentials().get().user.unwrap_or_default();
            if who.is_empty() {
                self.add_output("Not logged in. Use: login <user> <password>");
            } else {
                self.add_output(format!("Logged in as {}", who));
            }
            return;
        };

        if !self.client.credentials().is_logged_in() {
            self.add_output("Not logged in. Use: login <user> <password>");
            return;
        }

        let result = self.client.get(endpoint).await;
        self.show_result(endpoint, result);
    }

    fn show_result(&mut self, endpoint: &str, result: casteradm_client::error::Result<Value>) {
        let stamp = Local::now().format("%H:%M:%S");
        match result {
            Ok(value) => {
                self.add_output(format!("[{}] {}:", stamp, endpoint));
                let pretty = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
                for line in pretty.lines() {
                    self.add_output(format!("  {}", line));
                }
            }
            Err(e) => {
                self.add_output(format!("[{}] Error: {}", stamp, e));
            }
        }
    }

    pub async fn handle_input(&mut self, input: String) {
        if input.trim().is_empty() {
            return;
        }

        // Passwords stay out of the history and the echo
        let is_login = input.trim_start().starts_with("login ");
        if !is_login {
            self.history.push(input.clone());
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
        }
        self.stop_history_navigation();

        let echo = if is_login {
            let user = input.split_whitespace().nth(1).unwrap_or_default();
            format!("> login {} ****", user)
        } else {
            format!("> {}", input)
        };
        self.add_output(echo);

        let command = match parse_command(&input) {
            Ok(Some(command)) => command,
            Ok(None) => return,
            Err(e) => {
                self.add_output(format!("Error: {}", e));
                self.add_output("Type 'help' for available commands");
                return;
            }
        };

        self.execute(command).await;
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Login { user, password } => {
                self.client.credentials().set(&user, &password);
                self.add_output(format!("Credentials stored for {}", user));
            }
            Command::Logout => {
                self.client.credentials().clear();
                self.add_output("Credentials cleared");
            }
            Command::Whoami => match self.client.credentials().get().user {
                Some(user) if !user.is_empty() => self.add_output(format!("Logged in as {}", user)),
                _ => self.add_output("Not logged in"),
            },
            Command::Go(page) => {
                self.router.go(&page);
            }
            Command::Refresh => {
                let page = self.router.current();
                self.show_page(page).await;
            }
            Command::Get(endpoint) => {
                let result = self.client.get(&endpoint).await;
                self.show_result(&endpoint, result);
            }
            Command::Post { endpoint, fields } => {
                let result = self.client.post(&endpoint, fields.as_slice()).await;
                self.show_result(&endpoint, result);
            }
            Command::Endpoints => {
                for endpoint in Endpoint::ALL {
                    self.add_output(format!(
                        "  {:<5} {:<14} {}",
                        endpoint.method(),
                        endpoint.path(),
                        endpoint.description()
                    ));
                }
            }
            Command::Clear => {
                self.output.clear();
            }
            Command::Help => {
                for line in HELP {
                    self.add_output(*line);
                }
            }
            Command::Exit => {
                self.should_quit = true;
            }
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

/// Run the console until the user exits. `location` carries the initial page.
pub async fn run(client: AdminClient, location: Location) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, location);
    let initial = app.current_page();
    app.show_page(initial).await;

    let result = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.pump().await;
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            // Only process KeyPress events, ignore KeyRelease
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char(c) => app.insert_char(c),
                KeyCode::Backspace => app.delete_backward(),
                KeyCode::Enter => {
                    let input = app.take_input();
                    app.handle_input(input).await;
                }
                KeyCode::Tab => {
                    let next = app.router.current().next();
                    app.router.go(next.as_str());
                }
                KeyCode::BackTab => {
                    let previous = app.router.current().previous();
                    app.router.go(previous.as_str());
                }
                KeyCode::Up => app.navigate_history_backward(),
                KeyCode::Down => app.navigate_history_forward(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                KeyCode::Home => app.move_cursor_home(),
                KeyCode::End => app.move_cursor_end(),
                KeyCode::Esc => app.should_quit = true,
                KeyCode::PageUp => {
                    app.scroll_offset = app.scroll_offset.saturating_sub(10);
                }
                KeyCode::PageDown => {
                    app.scroll_offset =
                        (app.scroll_offset + 10).min(app.output.len().saturating_sub(1));
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Page tabs
            Constraint::Min(3),    // Output area
            Constraint::Length(1), // Horizontal rule
            Constraint::Length(1), // Input area
            Constraint::Length(1), // Horizontal rule
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let current = app.router.current();
    let selected = Page::ALL.iter().position(|p| *p == current).unwrap_or(0);
    let tabs = Tabs::new(Page::ALL.iter().map(|p| p.title()))
        .block(Block::default().borders(Borders::ALL).title(" casteradm "))
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    // Output area - scrollable
    let output_height = chunks[1].height as usize;
    let total_lines = app.output.len();

    let scroll_offset = if app.scroll_offset == 0 && total_lines > output_height {
        total_lines.saturating_sub(output_height)
    } else {
        app.scroll_offset.min(total_lines.saturating_sub(output_height))
    };

    let visible_output: Vec<Line> = app
        .output
        .iter()
        .skip(scroll_offset)
        .take(output_height)
        .map(|line| Line::from(line.clone()))
        .collect();

    let output = Paragraph::new(visible_output).style(Style::default().fg(Color::White));
    f.render_widget(output, chunks[1]);

    let rule1 = Paragraph::new("─".repeat(chunks[2].width as usize))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(rule1, chunks[2]);

    let prompt = format!("{}> ", current);
    let input = Paragraph::new(format!("{}{}", prompt, app.input))
        .style(Style::default().fg(Color::Yellow));
    f.render_widget(input, chunks[3]);

    f.set_cursor_position((
        chunks[3].x + (prompt.chars().count() + app.cursor_position) as u16,
        chunks[3].y,
    ));

    let rule2 = Paragraph::new("─".repeat(chunks[4].width as usize))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(rule2, chunks[4]);

    let session = match app.client.credentials().get().user {
        Some(user) if !user.is_empty() => Span::styled(user, Style::default().fg(Color::Green)),
        _ => Span::styled("not logged in", Style::default().fg(Color::Red)),
    };

    let status = Paragraph::new(Line::from(vec![
        session,
        Span::raw(" | "),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" pages | "),
        Span::styled("ESC", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" or "),
        Span::styled("exit", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to quit | "),
        Span::styled("help", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" for commands | "),
        Span::styled("↑↓", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" history | "),
        Span::styled("PgUp/PgDn", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" scroll"),
    ]))
    .style(Style::default().fg(Color::DarkGray));

    f.render_widget(status, chunks[5]);
}
