use std::fmt;

/// One of the three dependent fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Books,
    Chapters,
    Verses,
}

impl Stage {
    /// Message shown to the user when this stage fails
    pub fn error_message(self) -> &'static str {
        match self {
            Stage::Books => "Unable to load books. Please try again.",
            Stage::Chapters => "Unable to load chapters. Please try again.",
            Stage::Verses => "Unable to load verses. Please try again.",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Books => "books",
            Stage::Chapters => "chapters",
            Stage::Verses => "verses",
        };
        f.write_str(name)
    }
}

/// Identifies one dispatched request. Only the ticket matching its stage's
/// latest generation may commit a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub stage: Stage,
    pub generation: u64,
}

/// Generation counter plus the outcome of the live request for one stage.
#[derive(Debug, Clone)]
pub(crate) struct StageTracker {
    stage: Stage,
    generation: u64,
    in_flight: bool,
    failed: bool,
}

impl StageTracker {
    pub(crate) fn new(stage: Stage) -> Self {
        Self {
            stage,
            generation: 0,
            in_flight: false,
            failed: false,
        }
    }

    /// Start a new request, superseding whatever was in flight
    pub(crate) fn dispatch(&mut self) -> Ticket {
        self.generation += 1;
        self.in_flight = true;
        self.failed = false;
        Ticket {
            stage: self.stage,
            generation: self.generation,
        }
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        ticket.stage == self.stage && ticket.generation == self.generation && self.in_flight
    }

    /// Settle the live request. Callers check `is_current` first.
    pub(crate) fn settle(&mut self, succeeded: bool) {
        self.in_flight = false;
        self.failed = !succeeded;
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub(crate) fn failed(&self) -> bool {
        self.failed
    }
}
