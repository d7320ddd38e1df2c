//! Terminal host screen: renders a flow and feeds it user intents.
//!
//! Each frame drains finished submissions (`poll`), then queued input lines,
//! then toasts. The flow ends when the navigator receives an exit or a
//! destination.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use rise_engine::rise_types::InputKind;
use rise_engine::{
    FlowController, FlowDefinition, FlowEvent, Navigator, Screen, Stage, ToastQueue,
};

use crate::input::LinePump;

const FRAME_DURATION: Duration = Duration::from_millis(50);

pub const HELP: &str = "\
Type a value and press Enter to continue.
  /next          continue without typing (optional steps, review)
  /back          previous step (leaves the flow from the first step)
  /pick          open the date picker
  /date DATE     commit a date (YYYY-MM-DD or DD-MM-YYYY)
  /cancel        close the date picker without choosing
  /quit          leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Text(String),
    Next,
    Back,
    Pick,
    Date(NaiveDate),
    Cancel,
    Quit,
    Help,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Text(line.to_string()));
    };
    let (name, arg) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, arg)| (name, arg.trim()));
    match name {
        "next" | "n" => Ok(Command::Next),
        "back" | "b" => Ok(Command::Back),
        "pick" => Ok(Command::Pick),
        "date" => parse_date(arg).map(Command::Date),
        "cancel" => Ok(Command::Cancel),
        "quit" | "q" => Ok(Command::Quit),
        "help" | "h" => Ok(Command::Help),
        other => Err(format!("unknown command /{other}; try /help")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d-%m-%Y"))
        .map_err(|_| format!("not a date: {raw:?} (use YYYY-MM-DD)"))
}

/// How a flow run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowExit {
    /// Back from the first step.
    Exited,
    Navigated(Screen),
    Quit,
}

/// Records where the flow asked to go; the run loop picks it up.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    outcome: Mutex<Option<FlowExit>>,
}

impl TerminalNavigator {
    pub fn take(&self) -> Option<FlowExit> {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn set(&self, exit: FlowExit) {
        *self.outcome.lock().unwrap_or_else(PoisonError::into_inner) = Some(exit);
    }
}

impl Navigator for TerminalNavigator {
    fn exit(&self) {
        self.set(FlowExit::Exited);
    }

    fn navigate_to(&self, screen: Screen) {
        tracing::debug!(?screen, "Navigating");
        self.set(FlowExit::Navigated(screen));
    }
}

/// Drive `flow` until it exits, navigates, or input ends.
pub async fn run_flow<F: FlowDefinition>(
    flow: &mut FlowController<F>,
    input: &mut LinePump,
    navigator: &TerminalNavigator,
    toasts: &ToastQueue,
) -> Result<FlowExit> {
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    render_step(flow);

    loop {
        frames.tick().await;

        if let Some(event) = flow.poll() {
            report(flow, &event);
        }

        while let Some(line) = input.try_line()? {
            match parse_command(&line) {
                Ok(Command::Quit) => {
                    flow.teardown();
                    return Ok(FlowExit::Quit);
                }
                Ok(command) => {
                    let event = apply(flow, command);
                    if let Some(event) = event {
                        report(flow, &event);
                    }
                }
                Err(message) => println!("{message}"),
            }
        }

        for toast in toasts.take() {
            println!("{}", toast.format());
        }

        if let Some(exit) = navigator.take() {
            return Ok(exit);
        }

        if input.is_closed() {
            // Let an in-flight submission finish before giving up on the flow.
            if flow.submission_status().is_pending()
                && let Some(event) = flow.settle().await
            {
                report(flow, &event);
                for toast in toasts.take() {
                    println!("{}", toast.format());
                }
                if let Some(exit) = navigator.take() {
                    return Ok(exit);
                }
            }
            flow.teardown();
            return Ok(FlowExit::Quit);
        }
    }
}

fn apply<F: FlowDefinition>(flow: &mut FlowController<F>, command: Command) -> Option<FlowEvent> {
    match command {
        Command::Text(text) => {
            if flow.current_step().kind().input_kind() == InputKind::Date {
                if flow.open_date_picker() {
                    render_picker(flow);
                }
                return None;
            }
            if !text.trim().is_empty() && !flow.set_text(text) {
                println!("This step does not take text.");
                return None;
            }
            Some(flow.go_next())
        }
        Command::Next => Some(flow.go_next()),
        Command::Back => Some(flow.go_back()),
        Command::Pick => {
            if flow.open_date_picker() {
                render_picker(flow);
            } else {
                println!("No date to pick on this step.");
            }
            None
        }
        Command::Date(date) => {
            if !flow.picker().is_open() && !flow.open_date_picker() {
                println!("No date to pick on this step.");
                return None;
            }
            if flow.commit_date(date) {
                println!("Date: {}", flow.picker().display_label());
                if flow.can_go_next() {
                    return Some(flow.go_next());
                }
                println!("That date is not allowed here.");
            } else {
                println!("That date is too early.");
                render_picker(flow);
            }
            None
        }
        Command::Cancel => {
            flow.close_date_picker();
            None
        }
        Command::Help => {
            println!("{HELP}");
            None
        }
        Command::Quit => None,
    }
}

fn report<F: FlowDefinition>(flow: &FlowController<F>, event: &FlowEvent) {
    tracing::debug!(?event, index = flow.current_index(), "Flow event");
    match event {
        FlowEvent::Moved(_) | FlowEvent::Pinned(_) => render_step(flow),
        FlowEvent::Blocked => println!("Please complete this step first."),
        FlowEvent::SubmissionStarted => println!("Submitting..."),
        FlowEvent::AlreadySubmitting => println!("Still submitting, please wait."),
        FlowEvent::Failed(_) => println!("You can retry with /next or go /back."),
        FlowEvent::Exited
        | FlowEvent::Unchanged
        | FlowEvent::Completed
        | FlowEvent::Ignored => {}
    }
}

fn render_step<F: FlowDefinition>(flow: &FlowController<F>) {
    if flow.stage() == Stage::Completed {
        return;
    }
    let step = flow.current_step();
    println!();
    println!(
        "{} {}  {}",
        progress_bar(flow.progress()),
        flow.question_label(),
        flow.nav_title()
    );
    println!("{}", step.prompt());
    match step.kind().input_kind() {
        InputKind::Date => println!("  [{}]  (/pick to choose)", flow.picker().display_label()),
        InputKind::None => println!("  (/next to confirm)"),
        InputKind::Text | InputKind::Phone | InputKind::Currency => {
            if let Some(current) = flow.values().text(step.key()) {
                println!("  current: {current}");
            }
        }
    }
}

fn render_picker<F: FlowDefinition>(flow: &FlowController<F>) {
    let picker = flow.picker();
    match picker.minimum() {
        Some(min) => println!("Choose a date on or after {min} with /date YYYY-MM-DD."),
        None => println!("Choose a date with /date YYYY-MM-DD."),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // 0..=1 scaled to 0..=10
fn progress_bar(progress: f32) -> String {
    let filled = (progress.clamp(0.0, 1.0) * 10.0).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}
