//! Terminal rendering for the tutor.
//!
//! Panels, rules and result tables are built as ratatui [`Line`]s and then
//! written to any [`Write`] with crossterm styling, or as plain text when
//! color is off.

use crate::db::{TabularResult, Value};
use crossterm::style::{Attribute, Color as TermColor, ContentStyle, PrintStyledContent, StyledContent};
use crossterm::{cursor, queue, terminal};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::io::{self, Write};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Narrowest layout we render panels at.
const MIN_WIDTH: usize = 20;

/// Writes styled lines to an output stream.
pub struct Console<W: Write> {
    out: W,
    color: bool,
    width: usize,
    max_rows: usize,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, color: bool, width: usize, max_rows: usize) -> Self {
        Self {
            out,
            color,
            width: width.max(MIN_WIDTH),
            max_rows,
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Clears the screen (color mode only, so captured output stays clean).
    pub fn clear(&mut self) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                terminal::Clear(terminal::ClearType::All),
                cursor::MoveTo(0, 0)
            )?;
        }
        self.out.flush()
    }

    /// Writes one line followed by a newline.
    pub fn line(&mut self, line: &Line<'_>) -> io::Result<()> {
        for span in &line.spans {
            let style = line.style.patch(span.style);
            if self.color && style != Style::default() {
                queue!(
                    self.out,
                    PrintStyledContent(StyledContent::new(to_content_style(style), &span.content))
                )?;
            } else {
                self.out.write_all(span.content.as_bytes())?;
            }
        }
        self.out.write_all(b"\n")
    }

    /// Writes several lines and flushes.
    pub fn lines(&mut self, lines: &[Line<'_>]) -> io::Result<()> {
        for line in lines {
            self.line(line)?;
        }
        self.out.flush()
    }

    /// Writes a plain line in the given style.
    pub fn say(&mut self, text: &str, style: Style) -> io::Result<()> {
        let lines: Vec<Line> = text
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
        self.lines(&lines)
    }

    /// Writes a prompt without a trailing newline.
    pub fn prompt(&mut self, prompt: &str) -> io::Result<()> {
        self.out.write_all(prompt.as_bytes())?;
        self.out.flush()
    }

    /// A horizontal rule with a centered title.
    pub fn rule(&mut self, title: &str, style: Style) -> io::Result<()> {
        let line = rule_line(title, self.width, style);
        self.lines(&[line])
    }

    /// A bordered panel with an optional title.
    pub fn panel(&mut self, title: Option<&str>, body: &str, border: Color, text: Style) -> io::Result<()> {
        let lines = panel_lines(title, body, self.width, border, text);
        self.lines(&lines)
    }

    /// A result table, capped at the configured number of rows.
    pub fn table(&mut self, result: &TabularResult) -> io::Result<()> {
        if result.is_empty() {
            return self.say(
                "Query returned no rows.",
                Style::default().add_modifier(Modifier::ITALIC),
            );
        }
        let lines = ResultTable::new(result, self.max_rows).render_to_lines(self.width);
        self.lines(&lines)
    }
}

/// Maps ratatui styles onto crossterm's.
fn to_content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(to_term_color);
    content.background_color = style.bg.map(to_term_color);
    if style.add_modifier.contains(Modifier::BOLD) {
        content.attributes.set(Attribute::Bold);
    }
    if style.add_modifier.contains(Modifier::ITALIC) {
        content.attributes.set(Attribute::Italic);
    }
    if style.add_modifier.contains(Modifier::DIM) {
        content.attributes.set(Attribute::Dim);
    }
    content
}

fn to_term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}

/// `──── title ────` spanning `width` columns.
pub fn rule_line(title: &str, width: usize, style: Style) -> Line<'static> {
    let border = Style::default().fg(Color::DarkGray);
    if title.is_empty() {
        return Line::from(Span::styled("─".repeat(width), border));
    }

    let label = format!(" {title} ");
    let remaining = width.saturating_sub(label.chars().count());
    let left = remaining / 2;
    let right = remaining - left;

    Line::from(vec![
        Span::styled("─".repeat(left), border),
        Span::styled(label, style),
        Span::styled("─".repeat(right), border),
    ])
}

/// Builds a rounded box around word-wrapped text.
pub fn panel_lines(
    title: Option<&str>,
    body: &str,
    width: usize,
    border: Color,
    text: Style,
) -> Vec<Line<'static>> {
    let border_style = Style::default().fg(border);
    let inner = width.saturating_sub(4).max(1);

    let top = match title {
        Some(title) => {
            let label = format!(" {title} ");
            let fill = width.saturating_sub(label.chars().count() + 3);
            Line::from(vec![
                Span::styled("╭─", border_style),
                Span::styled(label, border_style.add_modifier(Modifier::BOLD)),
                Span::styled(format!("{}╮", "─".repeat(fill)), border_style),
            ])
        }
        None => Line::from(Span::styled(
            format!("╭{}╮", "─".repeat(width.saturating_sub(2))),
            border_style,
        )),
    };

    let mut lines = vec![top];
    for row in wrap(body, inner) {
        let pad = inner.saturating_sub(row.chars().count());
        lines.push(Line::from(vec![
            Span::styled("│ ", border_style),
            Span::styled(row, text),
            Span::raw(" ".repeat(pad)),
            Span::styled(" │", border_style),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("╰{}╯", "─".repeat(width.saturating_sub(2))),
        border_style,
    )));
    lines
}

/// Word-wraps text to `width` columns, keeping explicit line breaks.
/// Lines that already fit are kept verbatim; words longer than a line are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.lines() {
        let paragraph = paragraph.trim_end();
        if paragraph.chars().count() <= width {
            out.push(paragraph.to_string());
            continue;
        }

        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > width {
                if current_len > 0 {
                    out.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                out.push(word.drain(..width).collect());
            }

            let word_len = word.len();
            if word_len == 0 {
                continue;
            }
            if current_len > 0 && current_len + 1 + word_len > width {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word);
            current_len += word_len;
        }

        out.push(current);
    }

    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Renders a query result as a bordered table.
pub struct ResultTable<'a> {
    result: &'a TabularResult,
    max_rows: usize,
}

impl<'a> ResultTable<'a> {
    pub fn new(result: &'a TabularResult, max_rows: usize) -> Self {
        Self { result, max_rows }
    }

    fn shown_rows(&self) -> &'a [Vec<Value>] {
        let n = self.result.rows.len().min(self.max_rows);
        &self.result.rows[..n]
    }

    /// Calculates the optimal width for each column.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| col.name.chars().count().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in self.shown_rows() {
            for (i, value) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(i) {
                    *width = (*width).max(value.to_display_string().chars().count());
                }
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let head: String = s.chars().take(max_width - 3).collect();
            format!("{head}...")
        }
    }

    /// Renders the table to a vector of Lines.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.result.columns.is_empty() {
            lines.push(Line::from(Span::styled(
                "(empty result)",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let widths = self.calculate_column_widths();

        // Borders and padding take three columns per cell plus one
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };

        let adjusted_widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        lines.push(Self::render_border(&adjusted_widths, '┌', '┬', '┐'));
        lines.push(self.render_header_row(&adjusted_widths));
        lines.push(Self::render_border(&adjusted_widths, '├', '┼', '┤'));

        for row in self.shown_rows() {
            lines.push(Self::render_data_row(row, &adjusted_widths));
        }

        lines.push(Self::render_border(&adjusted_widths, '└', '┴', '┘'));

        let total = self.result.row_count();
        let shown = self.shown_rows().len();
        let footer = if shown < total {
            format!("showing {shown} of {total} rows")
        } else {
            format!(
                "{} row{} returned ({}ms)",
                total,
                if total == 1 { "" } else { "s" },
                self.result.execution_time.as_millis()
            )
        };
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }

        border.push(right);

        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    fn render_header_row(&self, widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (i, col) in self.result.columns.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let name = Self::truncate(&col.name, width);
            let padded = format!(" {:width$} ", name, width = width);

            spans.push(Span::styled(
                padded,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }

    fn render_data_row(row: &[Value], widths: &[usize]) -> Line<'static> {
        let mut spans = vec![Span::styled("│", Style::default().fg(Color::DarkGray))];

        for (i, value) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let truncated = Self::truncate(&value.to_display_string(), width);
            let padded = format!(" {:width$} ", truncated, width = width);

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(padded, style));
            spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
        }

        Line::from(spans)
    }
}
