mod client;

use anyhow::Result;
use client::{ChatOutcome, RelayClient};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use tokio::sync::mpsc;

const RELAY_BASE_URL: &str = "http://127.0.0.1:8000";

const PROMPT_PLACEHOLDER: &str =
    "e.g. 'You are a helpful assistant who loves to explain complex topics simply.'";
const QUERY_PLACEHOLDER: &str = "e.g. 'What is photosynthesis?'";

#[derive(Clone, Copy, PartialEq)]
enum Field {
    Prompt,
    Query,
}

/// What the outcome panel is currently showing.
enum Status {
    Idle,
    Warning(String),
    Thinking,
    Reply(String),
    UnexpectedFormat(String),
    Error(String),
}

struct App {
    prompt: String,
    query: String,
    focus: Field,
    status: Status,
}

impl App {
    fn new() -> Self {
        Self {
            prompt: String::new(),
            query: String::new(),
            focus: Field::Prompt,
            status: Status::Idle,
        }
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Prompt => &mut self.prompt,
            Field::Query => &mut self.query,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Prompt => Field::Query,
            Field::Query => Field::Prompt,
        };
    }
}

/// Both fields must have content before anything goes on the wire.
/// Warnings are ranked most-broken-first.
fn validate(prompt: &str, query: &str) -> Option<&'static str> {
    match (prompt.trim().is_empty(), query.trim().is_empty()) {
        (true, true) => Some("Please provide both a system prompt and a user query."),
        (true, false) => Some("Please provide a system prompt."),
        (false, true) => Some("Please provide a user query."),
        (false, false) => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file so tracing output doesn't corrupt the alternate screen.
    if let Ok(file) = std::fs::File::create("relay-form.log") {
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .init();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let client = RelayClient::new(RELAY_BASE_URL);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        while let Ok(event) = event::read() {
            if ui_tx.send(event).is_err() {
                break;
            }
        }
    });

    let res = run_app(&mut terminal, &mut app, &client, &mut ui_rx).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &RelayClient,
    ui_rx: &mut mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Some(event) = ui_rx.recv().await else {
            return Ok(());
        };

        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Tab => app.toggle_focus(),
                KeyCode::Char(c) => app.focused_input().push(c),
                KeyCode::Backspace => {
                    app.focused_input().pop();
                }
                KeyCode::Enter => {
                    if let Some(warning) = validate(&app.prompt, &app.query) {
                        app.status = Status::Warning(warning.to_string());
                        continue;
                    }

                    // Deliberately blocks the event loop until the relay
                    // answers; the form is a one-shot request/response UI.
                    app.status = Status::Thinking;
                    terminal.draw(|f| ui(f, app))?;

                    app.status = match client.send(app.prompt.clone(), app.query.clone()).await {
                        Ok(ChatOutcome::Reply(reply)) => Status::Reply(reply),
                        Ok(ChatOutcome::UnexpectedFormat(raw)) => Status::UnexpectedFormat(raw),
                        Err(e) => Status::Error(format!(
                            "An error occurred: {e:#}. Please check the server and your input."
                        )),
                    };
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = Paragraph::new("Dynamic Prompt Chat")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(title, chunks[0]);

    f.render_widget(
        input_box(
            "System Prompt (persona)",
            &app.prompt,
            PROMPT_PLACEHOLDER,
            app.focus == Field::Prompt,
        ),
        chunks[1],
    );
    f.render_widget(
        input_box(
            "Your Query",
            &app.query,
            QUERY_PLACEHOLDER,
            app.focus == Field::Query,
        ),
        chunks[2],
    );

    f.render_widget(outcome_panel(&app.status), chunks[3]);

    let help = Paragraph::new("Tab: switch field | Enter: submit | Ctrl-Q: quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[4]);
}

fn input_box<'a>(title: &'a str, value: &'a str, placeholder: &'a str, focused: bool) -> Paragraph<'a> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let body = if value.is_empty() {
        Span::styled(placeholder, Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value)
    };
    Paragraph::new(Line::from(body))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: true })
}

fn outcome_panel(status: &Status) -> Paragraph<'_> {
    let (title, style, body) = match status {
        Status::Idle => (
            "Response",
            Style::default().fg(Color::DarkGray),
            vec![Line::from(
                "Fill in both fields and press Enter to get a response.",
            )],
        ),
        Status::Warning(warning) => (
            "Check your input",
            Style::default().fg(Color::Yellow),
            text_lines(warning),
        ),
        Status::Thinking => (
            "Response",
            Style::default().fg(Color::Yellow),
            vec![Line::from("Thinking... Please wait...")],
        ),
        Status::Reply(reply) => (
            "Here's the AI's response",
            Style::default().fg(Color::Green),
            text_lines(reply),
        ),
        Status::UnexpectedFormat(raw) => {
            let mut lines =
                text_lines("Received an unexpected response format from the API.");
            lines.push(Line::from(""));
            lines.extend(text_lines(raw));
            ("Unexpected format", Style::default().fg(Color::Red), lines)
        }
        Status::Error(message) => ("Error", Style::default().fg(Color::Red), text_lines(message)),
    };

    Paragraph::new(body)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true })
}

fn text_lines(text: &str) -> Vec<Line<'_>> {
    text.lines().map(Line::from).collect()
}
