//! Line commands accepted by the interactive session.
//!
//! Each input line is split into words and parsed with clap, then applied
//! to the application state. Nothing here touches stdin or stdout, so the
//! whole command surface is testable without a terminal.

use clap::{Parser, Subcommand};
use pomotrack_core::task::{MAX_ESTIMATE, MIN_ESTIMATE};
use pomotrack_core::{
    AppState, Config, Event, IntervalKind, NewTask, Stats, Task, TaskFilter, TaskId, TaskLedger,
    TaskPatch,
};

#[derive(Parser)]
#[command(
    name = "pomotrack",
    no_binary_name = true,
    disable_version_flag = true,
    about = "Commands available inside a session"
)]
struct Line {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start or pause the countdown
    Toggle,
    /// Stop and refill the current interval
    Reset,
    /// Jump to another interval kind (work, short-break, long-break)
    Switch { kind: IntervalKind },
    /// Show the current interval and time remaining
    Status,
    /// Task management
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Session statistics
    Stats,
    /// Timer settings for this session
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Create a new task
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Task description
        #[arg(short, long)]
        description: Option<String>,
        /// Estimated work intervals (clamped to 1..=10)
        #[arg(short, long, default_value_t = 1)]
        estimate: u32,
    },
    /// List tasks
    List {
        /// all, active or completed
        #[arg(short, long)]
        filter: Option<TaskFilter>,
    },
    /// Edit a task
    Edit {
        /// List number, id or id prefix
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(short, long)]
        estimate: Option<u32>,
    },
    /// Toggle a task's completed flag
    Done {
        /// List number, id or id prefix
        task: String,
    },
    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// List number, id or id prefix
        task: String,
    },
    /// Credit completed work intervals to a task
    Focus {
        /// List number, id or id prefix
        task: String,
    },
    /// Clear the active task
    Unfocus,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change a setting by key (e.g. timer.work 30); not saved to disk
    Set { key: String, value: String },
}

/// Result of executing one line.
#[derive(Debug, Default)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Outcome {
    fn say(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

/// Session-scoped presentation state.
pub struct Shell {
    config: Config,
}

impl Shell {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn banner(&self, app: &AppState) -> String {
        format!(
            "pomotrack session. {} Type 'help' for commands.",
            self.status_line(app)
        )
    }

    pub fn status_line(&self, app: &AppState) -> String {
        let c = app.controller();
        let mut line = format!(
            "{} {} {}",
            c.kind(),
            c.display_time(),
            if c.is_running() { "running" } else { "paused" }
        );
        if self.config.ui.show_progress {
            line.push_str(&format!(" ({:.0}%)", c.progress() * 100.0));
        }
        if let Some(task) = app.ledger().active_task() {
            line.push_str(&format!(" on \"{}\"", task.title));
        }
        line
    }

    pub fn execute(&mut self, app: &mut AppState, input: &str) -> Outcome {
        let words = match split_words(input) {
            Ok(words) => words,
            Err(e) => return Outcome::default().say(format!("error: {e}")),
        };
        if words.is_empty() {
            return Outcome::default();
        }
        match Line::try_parse_from(words) {
            Ok(line) => self.dispatch(app, line.command),
            Err(e) => Outcome::default().say(e.render().to_string().trim_end().to_string()),
        }
    }

    fn dispatch(&mut self, app: &mut AppState, command: ShellCommand) -> Outcome {
        let out = Outcome::default();
        match command {
            ShellCommand::Start => {
                if app.is_running() {
                    out.say(self.status_line(app))
                } else {
                    out.say(render_event(&app.toggle_running()))
                }
            }
            ShellCommand::Pause => {
                if app.is_running() {
                    out.say(render_event(&app.toggle_running()))
                } else {
                    out.say(self.status_line(app))
                }
            }
            ShellCommand::Toggle => out.say(render_event(&app.toggle_running())),
            ShellCommand::Reset => out.say(render_event(&app.reset())),
            ShellCommand::Switch { kind } => out.say(render_event(&app.select_kind(kind))),
            ShellCommand::Status => out.say(self.status_line(app)),
            ShellCommand::Task { action } => self.task(app, action),
            ShellCommand::Stats => out.say(render_stats(&app.stats())),
            ShellCommand::Settings { action } => self.settings(app, action),
            ShellCommand::Quit => Outcome {
                lines: vec!["bye".into()],
                quit: true,
            },
        }
    }

    fn task(&mut self, app: &mut AppState, action: TaskCommand) -> Outcome {
        let out = Outcome::default();
        match action {
            TaskCommand::Add {
                title,
                description,
                estimate,
            } => {
                let mut new = NewTask::titled(title.join(" "))
                    .with_estimate(estimate.clamp(MIN_ESTIMATE, MAX_ESTIMATE));
                new.description = description;
                match app.add_task(new) {
                    Ok(event) => out.say(render_event(&event)),
                    Err(e) => out.say(format!("error: {e}")),
                }
            }
            TaskCommand::List { filter } => {
                let filter = filter.unwrap_or(self.config.ui.default_filter);
                out.say(render_tasks(app.ledger(), filter))
            }
            TaskCommand::Edit {
                task,
                title,
                description,
                clear_description,
                estimate,
            } => {
                let id = match resolve_task(app.ledger(), &task) {
                    Ok(id) => id,
                    Err(e) => return out.say(format!("error: {e}")),
                };
                let patch = TaskPatch {
                    title,
                    description: if clear_description {
                        Some(None)
                    } else {
                        description.map(Some)
                    },
                    estimated_work_units: estimate.map(|e| e.clamp(MIN_ESTIMATE, MAX_ESTIMATE)),
                    completed: None,
                };
                if patch.is_empty() {
                    return out.say("nothing to change");
                }
                out.say(render_optional(app.update_task(&id, patch), &id))
            }
            TaskCommand::Done { task } => match resolve_task(app.ledger(), &task) {
                Ok(id) => out.say(render_optional(app.toggle_completion(&id), &id)),
                Err(e) => out.say(format!("error: {e}")),
            },
            TaskCommand::Rm { task } => match resolve_task(app.ledger(), &task) {
                Ok(id) => out.say(render_optional(app.delete_task(&id), &id)),
                Err(e) => out.say(format!("error: {e}")),
            },
            TaskCommand::Focus { task } => match resolve_task(app.ledger(), &task) {
                Ok(id) => out.say(render_event(&app.set_active_task(Some(id)))),
                Err(e) => out.say(format!("error: {e}")),
            },
            TaskCommand::Unfocus => out.say(render_event(&app.set_active_task(None))),
        }
    }

    fn settings(&mut self, app: &mut AppState, action: SettingsCommand) -> Outcome {
        let out = Outcome::default();
        match action {
            SettingsCommand::Show => {
                self.config.timer = app.settings().clone();
                let lines = self
                    .config
                    .entries()
                    .into_iter()
                    .map(|(k, v)| format!("{k} = {v}"))
                    .collect();
                Outcome { lines, quit: false }
            }
            SettingsCommand::Set { key, value } => {
                let mut candidate = self.config.clone();
                candidate.timer = app.settings().clone();
                if let Err(e) = candidate.set_value(&key, &value) {
                    return out.say(format!("error: {e}"));
                }
                if candidate.timer == *app.settings() {
                    self.config = candidate;
                    return out.say("ok");
                }
                match app.update_settings(candidate.timer.clone()) {
                    Ok(event) => {
                        self.config = candidate;
                        out.say(render_event(&event))
                    }
                    Err(e) => out.say(format!("error: {e}")),
                }
            }
        }
    }
}

/// Resolve a list number (1-based), full id, or unique id prefix.
///
/// An all-digit reference is always a list number, never an id prefix.
fn resolve_task(ledger: &TaskLedger, reference: &str) -> Result<TaskId, String> {
    if reference.is_empty() {
        return Err("empty task reference".into());
    }
    if let Ok(n) = reference.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| ledger.tasks().get(i))
            .map(|task| task.id)
            .ok_or_else(|| format!("no task #{n}"));
    }
    if let Ok(id) = reference.parse::<TaskId>() {
        return Ok(id);
    }
    let matches: Vec<&Task> = ledger
        .tasks()
        .iter()
        .filter(|t| t.id.to_string().starts_with(reference))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.id),
        [] => Err(format!("no task matches '{reference}'")),
        _ => Err(format!("'{reference}' matches more than one task")),
    }
}

fn render_event(event: &Event) -> String {
    serde_json::to_string_pretty(event).unwrap_or_else(|_| event.name().to_string())
}

fn render_optional(event: Option<Event>, id: &TaskId) -> String {
    match event {
        Some(event) => render_event(&event),
        None => format!("no task with id {id}"),
    }
}

fn render_stats(stats: &Stats) -> String {
    serde_json::to_string_pretty(stats).unwrap_or_else(|e| format!("error: {e}"))
}

fn render_tasks(ledger: &TaskLedger, filter: TaskFilter) -> String {
    let active = ledger.active_task_id();
    let rows: Vec<String> = ledger
        .tasks()
        .iter()
        .enumerate()
        .filter(|(_, t)| filter.matches(t))
        .map(|(i, t)| {
            let id = t.id.to_string();
            format!(
                "{:>2}. [{}] {} ({}/{}) {}{}",
                i + 1,
                if t.completed { "x" } else { " " },
                t.title,
                t.completed_work_units,
                t.estimated_work_units,
                &id[..8],
                if active == Some(t.id) { " *active*" } else { "" }
            )
        })
        .collect();
    if rows.is_empty() {
        match filter {
            TaskFilter::All => "No tasks".to_string(),
            other => format!("No tasks ({other})"),
        }
    } else {
        rows.join("\n")
    }
}

/// Split a line into words. Double quotes group words; `\"` inside quotes
/// is a literal quote.
fn split_words(input: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            '\\' if quoted => match chars.next() {
                Some(next) => current.push(next),
                None => return Err("dangling escape".into()),
            },
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(shell: &mut Shell, app: &mut AppState, line: &str) -> String {
        shell.execute(app, line).lines.join("\n")
    }

    #[test]
    fn split_words_handles_quotes() {
        assert_eq!(
            split_words(r#"task add "Write report" -d "the \"big\" one""#).unwrap(),
            vec!["task", "add", "Write report", "-d", r#"the "big" one"#]
        );
        assert_eq!(split_words("   ").unwrap(), Vec::<String>::new());
        assert_eq!(split_words(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
        assert!(split_words(r#"task add "oops"#).is_err());
    }

    #[test]
    fn add_and_list_tasks() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        let out = run(&mut shell, &mut app, "task add Write the report -e 3");
        assert!(out.contains("TaskAdded"));
        let listing = run(&mut shell, &mut app, "task list");
        assert!(listing.contains("1. [ ] Write the report (0/3)"));
    }

    #[test]
    fn estimate_is_clamped_by_the_shell() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        run(&mut shell, &mut app, "task add big -e 40");
        run(&mut shell, &mut app, "task add small -e 0");
        let tasks = app.ledger().tasks();
        assert_eq!(tasks[0].estimated_work_units, 10);
        assert_eq!(tasks[1].estimated_work_units, 1);
    }

    #[test]
    fn blank_title_reports_error() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        let out = run(&mut shell, &mut app, r#"task add "   ""#);
        assert!(out.contains("Task title must not be empty"));
        assert!(app.ledger().is_empty());
    }

    #[test]
    fn focus_done_and_remove_by_number() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        run(&mut shell, &mut app, "task add one");
        run(&mut shell, &mut app, "task add two");
        run(&mut shell, &mut app, "task focus 2");
        assert_eq!(app.ledger().active_task().unwrap().title, "two");

        run(&mut shell, &mut app, "task done 1");
        assert!(app.ledger().tasks()[0].completed);
        let completed = run(&mut shell, &mut app, "task list --filter completed");
        assert!(completed.contains("one"));
        assert!(!completed.contains("two"));

        let out = run(&mut shell, &mut app, "task rm 2");
        assert!(out.contains("\"cleared_active\": true"));
        assert_eq!(app.ledger().active_task_id(), None);
        assert!(run(&mut shell, &mut app, "task rm 7").contains("no task #7"));
    }

    #[test]
    fn tasks_resolve_by_id_prefix() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        run(&mut shell, &mut app, "task add only");
        let id = app.ledger().tasks()[0].id.to_string();
        run(&mut shell, &mut app, &format!("task edit {} --title renamed", &id[..9]));
        assert_eq!(app.ledger().tasks()[0].title, "renamed");
    }

    #[test]
    fn out_of_range_number_never_matches_id_prefix() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        // Keep adding until the single task's id starts with a digit above 1.
        let mut digit = None;
        for _ in 0..64 {
            run(&mut shell, &mut app, "task add target");
            let id = app.ledger().tasks()[0].id;
            match id.to_string().chars().next() {
                Some(c @ '2'..='9') => {
                    digit = Some(c);
                    break;
                }
                _ => {
                    app.delete_task(&id);
                }
            }
        }
        let digit = digit.expect("an id starting with 2-9");

        let out = run(&mut shell, &mut app, &format!("task rm {digit}"));
        assert!(out.contains(&format!("no task #{digit}")));
        let out = run(&mut shell, &mut app, &format!("task focus {digit}"));
        assert!(out.contains(&format!("no task #{digit}")));
        assert_eq!(app.ledger().len(), 1);
        assert_eq!(app.ledger().active_task_id(), None);
        assert!(run(&mut shell, &mut app, "task rm 0").contains("no task #0"));
    }

    #[test]
    fn empty_reference_is_rejected() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        run(&mut shell, &mut app, "task add only");
        let out = run(&mut shell, &mut app, r#"task done """#);
        assert!(out.contains("empty task reference"));
        assert!(!app.ledger().tasks()[0].completed);
    }

    #[test]
    fn start_pause_and_switch() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        assert!(run(&mut shell, &mut app, "start").contains("TimerStarted"));
        assert!(app.is_running());
        assert!(run(&mut shell, &mut app, "start").contains("running"));
        assert!(run(&mut shell, &mut app, "pause").contains("TimerPaused"));
        assert!(!app.is_running());

        run(&mut shell, &mut app, "switch long");
        assert_eq!(app.controller().kind(), IntervalKind::LongBreak);
        assert_eq!(
            run(&mut shell, &mut app, "status"),
            "Long Break 15:00 paused (0%)"
        );
    }

    #[test]
    fn settings_set_applies_to_session() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        let out = run(&mut shell, &mut app, "settings set timer.work 30");
        assert!(out.contains("SettingsUpdated"));
        assert_eq!(app.settings().work, 30);

        let out = run(&mut shell, &mut app, "settings set timer.work 0");
        assert!(out.starts_with("error:"));
        assert_eq!(app.settings().work, 30);

        assert_eq!(run(&mut shell, &mut app, "settings set ui.show_progress false"), "ok");
        assert_eq!(run(&mut shell, &mut app, "status"), "Work 25:00 paused");
        assert!(run(&mut shell, &mut app, "settings show").contains("timer.work = 30"));
    }

    #[test]
    fn unknown_command_shows_clap_error() {
        let mut shell = Shell::new(Config::default());
        let mut app = AppState::default();
        let out = run(&mut shell, &mut app, "dance");
        assert!(out.contains("unrecognized subcommand"));
        assert!(!shell.execute(&mut app, "help").quit);
        assert!(shell.execute(&mut app, "quit").quit);
    }
}
