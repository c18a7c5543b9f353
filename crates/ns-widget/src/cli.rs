//! Interactive month browser
//!
//! A reedline REPL over a [`CalendarWidget`]. The last grid that was shown
//! is kept so that `day <n>` can list its events without a new request.

use ns_calendar::{CalendarWidget, EventSource};
use ns_core::{Grid, Time};
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Suggestion,
};
use tracing::{debug, error, info};

use crate::render::Renderer;

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("next", "Nächster Monat"),
    ("prev", "Vorheriger Monat"),
    ("today", "Aktueller Monat"),
    ("show", "Monat anzeigen: show <monat> <jahr>"),
    ("day", "Termine eines Tages: day <tag>"),
    ("help", "Hilfe anzeigen"),
    ("exit", "Beenden"),
];

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.to_vec(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if line.contains(' ') {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Prompt showing the displayed month
struct MonthPrompt {
    style: Style,
    heading: String,
}

impl MonthPrompt {
    fn new(heading: String) -> Self {
        Self {
            style: Color::Cyan.bold(),
            heading,
        }
    }
}

impl Prompt for MonthPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(self.style.paint(format!("{} > ", self.heading)).to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }
}

/// A parsed REPL command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Today,
    Show { month: u32, year: i32 },
    Day(u32),
    Help,
    Exit,
}

impl Command {
    /// Parse one input line; the error is a message for the user
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut parts = input.split_whitespace();
        let name = parts.next().unwrap_or_default().to_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("next" | "n", []) => Self::Next,
            ("prev" | "p", []) => Self::Previous,
            ("today" | "t", []) => Self::Today,
            ("show" | "s", [month, year]) => Self::Show {
                month: month
                    .parse()
                    .map_err(|_| format!("Ungültiger Monat: {}", month))?,
                year: year
                    .parse()
                    .map_err(|_| format!("Ungültiges Jahr: {}", year))?,
            },
            ("day" | "d", [day]) => {
                Self::Day(day.parse().map_err(|_| format!("Ungültiger Tag: {}", day))?)
            }
            ("help" | "?", []) => Self::Help,
            ("exit" | "quit" | "q", []) => Self::Exit,
            ("show" | "s", _) => return Err("Verwendung: show <monat> <jahr>".to_string()),
            ("day" | "d", _) => return Err("Verwendung: day <tag>".to_string()),
            _ => {
                return Err(format!(
                    "Unbekannter Befehl: {}. Mit help werden alle Befehle angezeigt.",
                    input
                ))
            }
        };

        Ok(command)
    }
}

/// Run the interactive month browser
pub async fn run_cli<S: EventSource>(
    widget: CalendarWidget<S>,
    renderer: Renderer,
) -> anyhow::Result<()> {
    info!("Starting interactive mode");

    print_welcome();

    let mut keybindings = default_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(40))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    // Last grid handed out by the widget
    let mut last: Option<Grid> = None;
    update(widget.current().await, &renderer, &mut last);

    loop {
        let (month, year) = widget.displayed().await;
        let prompt = MonthPrompt::new(widget.heading(month, year));

        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                let command = match Command::parse(input) {
                    Ok(command) => command,
                    Err(message) => {
                        eprintln!("\n{}\n", message);
                        continue;
                    }
                };

                match command {
                    Command::Next => update(widget.next().await, &renderer, &mut last),
                    Command::Previous => update(widget.previous().await, &renderer, &mut last),
                    Command::Today => update(widget.today().await, &renderer, &mut last),
                    Command::Show { month, year } => {
                        update(widget.show(month, year).await, &renderer, &mut last)
                    }
                    Command::Day(day) => print_day(last.as_ref(), day, &renderer),
                    Command::Help => print_help(),
                    Command::Exit => {
                        println!("\nTschüss!\n");
                        break;
                    }
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("\nTschüss!\n");
                break;
            }
            Err(err) => {
                eprintln!("\nFehler: {}\n", err);
                break;
            }
        }
    }

    Ok(())
}

/// Print a freshly fetched grid and remember it; failures keep the old one
fn update(result: ns_calendar::Result<Option<Grid>>, renderer: &Renderer, last: &mut Option<Grid>) {
    match result {
        Ok(Some(grid)) => {
            println!("\n{}", renderer.render_month(&grid, &Time::today()));
            *last = Some(grid);
        }
        Ok(None) => debug!("Response superseded, nothing to render"),
        Err(e) => {
            error!("Failed to load month: {}", e);
            eprintln!("\nFehler: {}\n", e);
        }
    }
}

fn print_day(last: Option<&Grid>, day: u32, renderer: &Renderer) {
    let Some(grid) = last else {
        eprintln!("\nNoch kein Monat geladen.\n");
        return;
    };

    match grid.cell(grid.year, grid.month, day) {
        Some(cell) => println!("\n{}", renderer.render_day(cell)),
        None => eprintln!(
            "\nDer {} hat keinen Tag {}.\n",
            renderer.locale().month_title(grid.month, grid.year),
            day
        ),
    }
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

fn print_welcome() {
    println!();
    println!("ns-calendar {} - interaktiver Modus", env!("CARGO_PKG_VERSION"));
    println!("Befehle: next, prev, today, show, day, help, exit (Tab vervollständigt)");
    println!();
}

fn print_help() {
    println!();
    println!("Verfügbare Befehle:");
    for (cmd, desc) in COMMANDS {
        println!("  {:<6} {}", cmd, desc);
    }
    println!();
}
