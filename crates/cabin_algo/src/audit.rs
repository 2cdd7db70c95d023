//! Human-readable decision transcript.
//!
//! The engine emits [`AuditEvent`]s into an [`AuditSink`]; each event renders
//! to exactly one line. Sinks only observe: swapping [`AuditRecorder`] for
//! [`NullAudit`] never changes an allocation.

use std::fmt;

use cabin_core::{Apartment, Participant, Period, SeedEcho};

use crate::order::{Round, Turn};
use crate::summary::DrawStatistics;

#[derive(Debug, Clone, Copy)]
pub enum AuditEvent<'a> {
    Banner(&'static str),
    Blank,
    Seed(SeedEcho),
    ParticipantCount(usize),
    DrawPosition { position: usize, participant: &'a Participant },
    RoundOrder { round: Round, order: &'a [&'a Participant] },
    TurnStarted { turn: Turn<'a>, total: usize },
    CapReached,
    Evaluating { held: u32, wishes: usize },
    WishTried { priority: u32, period: &'a Period, apartments: &'a [&'a Apartment] },
    PeriodAlreadyHeld,
    Granted { apartment: &'a Apartment, period: &'a Period },
    NoFreeUnit,
    NoGrantThisRound,
    TotalAllocations(u32),
    Holding { allocations: u32, participants: u32 },
}

fn join_names<'a, I>(f: &mut fmt::Formatter<'_>, names: I, sep: &str) -> fmt::Result
where
    I: IntoIterator<Item = &'a str>,
{
    for (i, n) in names.into_iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        f.write_str(n)?;
    }
    Ok(())
}

impl fmt::Display for AuditEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AuditEvent::Banner(text) => write!(f, "=== {text} ==="),
            AuditEvent::Blank => Ok(()),
            AuditEvent::Seed(seed) => write!(f, "Seed: {seed}"),
            AuditEvent::ParticipantCount(n) => write!(f, "Participants: {n}"),
            AuditEvent::DrawPosition { position, participant } => {
                write!(f, "  {position}. {} ({})", participant.name, participant.email)
            }
            AuditEvent::RoundOrder { round, order } => {
                write!(f, "  Round {} ({round}): ", round.number())?;
                match round {
                    Round::Down => join_names(f, order.iter().map(|p| p.name.as_str()), " → "),
                    Round::Up => join_names(f, order.iter().rev().map(|p| p.name.as_str()), " → "),
                }
            }
            AuditEvent::TurnStarted { turn, total } => write!(
                f,
                "Turn {}/{total} (round {}, position {}): {}",
                turn.index + 1,
                turn.round.number(),
                turn.position,
                turn.participant.name
            ),
            AuditEvent::CapReached => f.write_str("  → already has 2 allocations, skipping"),
            AuditEvent::Evaluating { held, wishes } => write!(
                f,
                "  Allocations so far: {held}; evaluating {wishes} wishes in priority order"
            ),
            AuditEvent::WishTried { priority, period, apartments } => {
                write!(f, "    Priority {priority}: {} - ", period.description)?;
                join_names(f, apartments.iter().map(|a| a.name.as_str()), ", ")
            }
            AuditEvent::PeriodAlreadyHeld => f.write_str("      ✗ Already holds this period"),
            AuditEvent::Granted { apartment, period } => {
                write!(f, "      ✓ GRANTED: {} in {}", apartment.name, period.description)
            }
            AuditEvent::NoFreeUnit => f.write_str("      ✗ No free units"),
            AuditEvent::NoGrantThisRound => f.write_str("  → no allocation this round"),
            AuditEvent::TotalAllocations(n) => write!(f, "Total allocations: {n}"),
            AuditEvent::Holding { allocations, participants } => {
                let noun = if allocations == 1 { "allocation" } else { "allocations" };
                write!(f, "Participants with {allocations} {noun}: {participants}")
            }
        }
    }
}

/// Receiver of audit events.
pub trait AuditSink {
    fn record(&mut self, event: AuditEvent<'_>);
}

/// Collects rendered lines in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditRecorder {
    lines: Vec<String>,
}

impl AuditRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Append the closing statistics block.
    pub fn record_summary(&mut self, stats: &DrawStatistics) {
        self.record(AuditEvent::Blank);
        self.record(AuditEvent::Banner("DRAW COMPLETE"));
        self.record(AuditEvent::TotalAllocations(stats.total_allocations));
        for (allocations, participants) in [(0, stats.with_zero), (1, stats.with_one), (2, stats.with_two)] {
            self.record(AuditEvent::Holding { allocations, participants });
        }
    }
}

impl AuditSink for AuditRecorder {
    fn record(&mut self, event: AuditEvent<'_>) {
        self.lines.push(event.to_string());
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudit;

impl AuditSink for NullAudit {
    #[inline]
    fn record(&mut self, _event: AuditEvent<'_>) {}
}
