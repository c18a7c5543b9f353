//! Terminal rendering of month grids and day agendas

use ns_core::{day_agenda, event_count_label, DayCell, Grid, Locale, Placement, Time, Timespan};
use nu_ansi_term::Style;

/// Width of one day column
const CELL_WIDTH: usize = 3;

/// Renders grids as plain or ANSI-styled text
pub struct Renderer {
    locale: Locale,
    color: bool,
}

impl Renderer {
    pub fn new(locale: Locale, color: bool) -> Self {
        Self { locale, color }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Render a month: navigation heading, weekday header, weeks and the
    /// event counts of every eventful day
    pub fn render_month(&self, grid: &Grid, today: &Time) -> String {
        let mut out = String::new();

        let (prev_month, prev_year) = grid.previous_month();
        let (next_month, next_year) = grid.next_month();
        out.push_str(&format!(
            "< {}   {}   {} >\n",
            self.locale.month_title(prev_month, prev_year),
            self.paint(Style::new().bold(), &self.locale.short_heading(grid.month, grid.year)),
            self.locale.month_title(next_month, next_year),
        ));

        let header: Vec<String> = self
            .locale
            .weekday_abbreviations()
            .iter()
            .map(|abbr| format!("{:<width$}", abbr, width = CELL_WIDTH))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        for week in &grid.weeks {
            let cells: Vec<String> = week
                .iter()
                .map(|cell| self.render_cell(grid, cell, today))
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        let eventful: Vec<&DayCell> = grid.days().filter(|c| c.has_events()).collect();
        if !eventful.is_empty() {
            out.push('\n');
            for cell in eventful {
                out.push_str(&format!(
                    "{}: {}\n",
                    cell.date.to_localized_string_default(&self.locale.months),
                    event_count_label(cell.events.len(), &self.locale)
                ));
            }
        }

        out
    }

    /// Render the agenda of one day
    pub fn render_day(&self, cell: &DayCell) -> String {
        let mut out = format!(
            "{}: {}\n",
            self.paint(
                Style::new().bold(),
                &cell.date.to_localized_string_default(&self.locale.months)
            ),
            event_count_label(cell.events.len(), &self.locale)
        );

        for event in day_agenda(cell) {
            out.push_str(&format!("  • {}\n", event.title));
            out.push_str(&format!("    {}\n", Timespan::of(event).describe(&self.locale)));
            if let Some(location) = &event.location {
                out.push_str(&format!("    {}\n", location));
            }
            if let Some(description) = &event.description {
                for line in description.lines() {
                    out.push_str(&format!(
                        "    {}\n",
                        self.paint(Style::new().dimmed(), line)
                    ));
                }
            }
        }

        out
    }

    fn render_cell(&self, grid: &Grid, cell: &DayCell, today: &Time) -> String {
        let marker = if cell.has_events() { '*' } else { ' ' };
        let text = format!("{:>2}{}", cell.day(), marker);

        let mut style = Style::new();
        if grid.placement(cell) != Placement::Current {
            style = style.dimmed();
        }
        if cell.is_today(today) {
            style = style.bold();
        }

        self.paint(style, &text)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.color && style != Style::new() {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}
