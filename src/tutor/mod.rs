//! The interactive tutor: lesson display, the prompt loop and course progression.

pub mod help;
pub mod input;
pub mod render;

pub use input::{MetaCommand, StatementBuffer, CONTINUATION_PROMPT, PRIMARY_PROMPT};
pub use render::{Console, ResultTable};

use crate::content::{Course, Lesson, LessonRef, ModuleInfo};
use crate::error::{Result, SqleanError};
use crate::history::InputHistory;
use crate::progress::ProgressStore;
use crate::validation::{ValidationResult, Validator};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, error, info, warn};

/// How a tutor session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every lesson has been passed.
    Finished,
    /// The learner quit (command, Ctrl-C or end of input).
    Quit,
}

/// How a single lesson ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LessonEnd {
    Passed,
    Quit,
}

enum InputEvent {
    Line(String),
    Interrupt,
    Eof,
}

/// Runs the course against a line-oriented input and a terminal-like output.
pub struct Tutor<R, W: Write> {
    course: Course,
    validator: Validator,
    progress: ProgressStore,
    history: InputHistory,
    input: Lines<R>,
    console: Console<W>,
}

impl<R, W> Tutor<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        course: Course,
        validator: Validator,
        progress: ProgressStore,
        input: R,
        console: Console<W>,
    ) -> Self {
        Self {
            course,
            validator,
            progress,
            history: InputHistory::in_memory(),
            input: input.lines(),
            console,
        }
    }

    /// Records submitted statements into `history` instead of an in-memory
    /// list.
    pub fn with_history(mut self, history: InputHistory) -> Self {
        self.history = history;
        self
    }

    /// The statements submitted so far, including earlier sessions.
    pub fn history(&self) -> &InputHistory {
        &self.history
    }

    /// Consumes the tutor, returning the console it wrote to.
    pub fn into_console(self) -> Console<W> {
        self.console
    }

    /// Runs lessons from the saved position until the course ends or the
    /// learner quits.
    pub async fn run(&mut self) -> Result<SessionEnd> {
        self.console.clear()?;
        let banner = format!("Welcome to {}!", self.course.title());
        self.console.panel(
            None,
            &banner,
            Color::Green,
            Style::default().add_modifier(Modifier::BOLD),
        )?;

        let mut current = self.starting_lesson()?;
        let end = loop {
            let Some(at) = current.clone() else {
                self.console.panel(
                    None,
                    "Congratulations! You have completed the entire course!",
                    Color::Green,
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )?;
                info!("Course completed");
                break SessionEnd::Finished;
            };

            let (module, lesson) = {
                let (module, lesson) = self.course.resolve(&at)?;
                (module.clone(), lesson.clone())
            };

            self.show_lesson(&module, &lesson)?;

            match self.lesson_loop(&at, &module, &lesson).await? {
                LessonEnd::Passed => {
                    info!("Lesson {at} passed");
                    current = self.course.next_lesson(&at);
                    self.save_progress(&at, true);
                    if let Some(next) = &current {
                        self.save_progress(next, false);
                        self.console
                            .say("Moving to the next lesson...", Style::default().fg(Color::Cyan))?;
                    }
                }
                LessonEnd::Quit => break SessionEnd::Quit,
            }
        };

        self.console.say("Goodbye!", Style::default())?;
        Ok(end)
    }

    /// The saved lesson if it still exists, otherwise the first lesson.
    fn starting_lesson(&self) -> Result<Option<LessonRef>> {
        let progress = self.progress.load();
        if let Some(saved) = progress.current() {
            if self.course.resolve(&saved).is_ok() {
                info!("Resuming at lesson {saved}");
                return Ok(Some(saved));
            }
            warn!("Saved lesson {saved} no longer exists; starting from the beginning");
        }

        match self.course.first_lesson() {
            Some(first) => Ok(Some(first)),
            None => Err(SqleanError::content("The course has no lessons")),
        }
    }

    fn save_progress(&mut self, at: &LessonRef, completed: bool) {
        if let Err(e) = self.progress.record(at, completed) {
            warn!("Could not save progress: {e}");
        }
    }

    fn show_lesson(&mut self, module: &ModuleInfo, lesson: &Lesson) -> Result<()> {
        let heading = if module.title.is_empty() {
            format!("Lesson {}: {}", lesson.id, lesson.title)
        } else {
            format!("{} | Lesson {}: {}", module.title, lesson.id, lesson.title)
        };

        self.console.line(&Line::default())?;
        self.console.rule(
            &heading,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )?;
        if !lesson.text.trim().is_empty() {
            self.console
                .panel(Some("Concept"), lesson.text.trim(), Color::Cyan, Style::default())?;
        }
        if !lesson.exercise.trim().is_empty() {
            self.console.panel(
                Some("Exercise"),
                lesson.exercise.trim(),
                Color::Yellow,
                Style::default().add_modifier(Modifier::BOLD),
            )?;
        }
        if let Some(snippet) = &lesson.schema_snippet {
            self.console.say(
                &format!("Schema hint: {}", snippet.trim()),
                Style::default().fg(Color::DarkGray),
            )?;
        }
        self.console
            .say(help::INPUT_HINT, Style::default().add_modifier(Modifier::ITALIC))?;
        Ok(())
    }

    async fn lesson_loop(
        &mut self,
        at: &LessonRef,
        module: &ModuleInfo,
        lesson: &Lesson,
    ) -> Result<LessonEnd> {
        let mut buffer = StatementBuffer::new();

        loop {
            self.console.prompt(buffer.prompt())?;

            let line = match self.next_event().await? {
                InputEvent::Line(line) => line,
                InputEvent::Interrupt if buffer.is_pending() => {
                    buffer.clear();
                    self.console.line(&Line::default())?;
                    self.console
                        .say("Multiline input cancelled.", Style::default().fg(Color::Yellow))?;
                    continue;
                }
                InputEvent::Interrupt | InputEvent::Eof => {
                    self.console.line(&Line::default())?;
                    return Ok(LessonEnd::Quit);
                }
            };

            if let Some(command) = MetaCommand::parse(&line) {
                if command == MetaCommand::Quit {
                    return Ok(LessonEnd::Quit);
                }
                self.run_meta(command, module, lesson).await?;
                continue;
            }

            let Some(statement) = buffer.push(&line) else {
                continue;
            };

            debug!("Submitting statement for lesson {at}: {statement}");
            self.history.record(&statement);
            if self.submit(at, module, lesson, &statement).await? {
                return Ok(LessonEnd::Passed);
            }
        }
    }

    async fn next_event(&mut self) -> Result<InputEvent> {
        let line = tokio::select! {
            line = self.input.next_line() => line?,
            Ok(()) = tokio::signal::ctrl_c() => return Ok(InputEvent::Interrupt),
        };

        Ok(match line {
            Some(line) => InputEvent::Line(line),
            None => InputEvent::Eof,
        })
    }

    async fn run_meta(
        &mut self,
        command: MetaCommand,
        module: &ModuleInfo,
        lesson: &Lesson,
    ) -> Result<()> {
        match command {
            MetaCommand::Help => {
                self.console
                    .panel(Some("Help"), help::HELP_TEXT, Color::Blue, Style::default())?;
            }
            MetaCommand::Hint => {
                let hint = lesson
                    .hint
                    .as_deref()
                    .unwrap_or("No hint available for this lesson.");
                self.console
                    .panel(Some("Hint"), hint.trim(), Color::Yellow, Style::default())?;
            }
            MetaCommand::Schema => match self.validator.datasets().schema_text(&module.dataset).await {
                Ok(schema) => {
                    self.console.panel(
                        Some("Database Schema"),
                        &schema,
                        Color::Blue,
                        Style::default().fg(Color::Green),
                    )?;
                }
                Err(e) => {
                    error!("Could not read schema of '{}': {e}", module.dataset);
                    self.console.say(
                        "Error: Could not load schema.",
                        Style::default().fg(Color::Red),
                    )?;
                }
            },
            MetaCommand::Solve => {
                let solution = lesson
                    .spec
                    .solution_query
                    .as_deref()
                    .unwrap_or("No solution is available for this lesson.");
                self.console.panel(
                    Some("Solution"),
                    solution.trim(),
                    Color::Magenta,
                    Style::default().fg(Color::Green),
                )?;
            }
            MetaCommand::History => {
                let recent = self.history.recent(help::HISTORY_SHOWN);
                let text = if recent.is_empty() {
                    "No statements submitted yet.".to_string()
                } else {
                    recent
                        .iter()
                        .enumerate()
                        .map(|(i, statement)| format!("{:>2}. {statement}", i + 1))
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                self.console
                    .panel(Some("History"), &text, Color::Blue, Style::default())?;
            }
            MetaCommand::Quit => {}
        }
        Ok(())
    }

    /// Grades one statement and reports back. Returns true if it passed.
    async fn submit(
        &mut self,
        at: &LessonRef,
        module: &ModuleInfo,
        lesson: &Lesson,
        statement: &str,
    ) -> Result<bool> {
        match self
            .validator
            .validate(&module.dataset, statement, &lesson.spec)
            .await
        {
            Ok(result) => {
                self.report(&result)?;
                Ok(result.passed)
            }
            Err(e) if e.is_authoring() => {
                error!("Lesson {at} is broken: {e}");
                self.console.panel(
                    Some("Lesson error"),
                    &e.learner_message(),
                    Color::Magenta,
                    Style::default().fg(Color::Magenta),
                )?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn report(&mut self, result: &ValidationResult) -> Result<()> {
        if result.passed {
            self.console.panel(
                None,
                &format!("✅ {}", result.message),
                Color::Green,
                Style::default().fg(Color::Green),
            )?;
            return Ok(());
        }

        self.console.panel(
            None,
            &format!("❌ {}", result.message),
            Color::Red,
            Style::default().fg(Color::Red),
        )?;
        if let Some(table) = &result.learner_result {
            self.console.say(
                "This is what your query returned:",
                Style::default().add_modifier(Modifier::BOLD),
            )?;
            self.console.table(table)?;
        }
        Ok(())
    }
}
