//! Spinners driven by workbench events.
//!
//! A workbench action runs alongside its event subscription; generation and
//! save events open and close the spinner, so commands never manage spinners
//! for workbench work themselves.

use std::future::Future;

use indicatif::ProgressBar;
use ocforge_core::event::WorkbenchEvents;
use ocforge_types::event::{GenerationKind, SaveStatus, WorkbenchEvent};

use super::spinner;

/// What an event does to the spinner.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    Start {
        color: &'static str,
        message: &'static str,
    },
    Finish,
    Keep,
}

fn step(event: &WorkbenchEvent) -> Step {
    match event {
        WorkbenchEvent::GenerationStarted {
            kind: GenerationKind::Persona,
        } => Step::Start {
            color: "magenta",
            message: "Weaving a persona...",
        },
        WorkbenchEvent::GenerationStarted {
            kind: GenerationKind::Avatar,
        } => Step::Start {
            color: "cyan",
            message: "Painting a portrait...",
        },
        WorkbenchEvent::StatusChanged {
            to: SaveStatus::Saving,
            ..
        } => Step::Start {
            color: "cyan",
            message: "Saving character...",
        },
        WorkbenchEvent::GenerationCompleted { .. }
        | WorkbenchEvent::Saved { .. }
        | WorkbenchEvent::SaveFailed { .. } => Step::Finish,
        WorkbenchEvent::StatusChanged { .. } => Step::Keep,
    }
}

#[derive(Default)]
struct Progress {
    spinner: Option<ProgressBar>,
}

impl Progress {
    fn apply(&mut self, event: &WorkbenchEvent) {
        tracing::trace!(?event, "workbench event");
        match step(event) {
            Step::Start { color, message } => {
                self.clear();
                self.spinner = Some(spinner(color, message));
            }
            Step::Finish => self.clear(),
            Step::Keep => {}
        }
    }

    fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// Run a workbench action, rendering its events until it resolves.
///
/// Events still queued when the action finishes are applied before
/// returning, so no spinner outlives the action.
pub async fn track<T>(events: &mut WorkbenchEvents, action: impl Future<Output = T>) -> T {
    let mut progress = Progress::default();
    tokio::pin!(action);

    let output = loop {
        tokio::select! {
            output = &mut action => break output,
            Some(event) = events.next() => progress.apply(&event),
        }
    };

    for event in events.drain() {
        progress.apply(&event);
    }
    progress.clear();
    output
}
