//! Plain-text message for chat or e-mail. One line per participant.

use std::fmt::Write as _;

use crate::DrawSummary;

pub fn render_text(s: &DrawSummary) -> String {
    let mut out = String::with_capacity(1024);
    let _ = writeln!(out, "*{}*", s.title);
    let _ = writeln!(
        out,
        "Drawing {} executed {} by {} (seed {})",
        s.drawing_id, s.executed_at, s.executed_by, s.seed
    );
    out.push('\n');

    for p in &s.participants {
        if p.slots.is_empty() {
            let _ = writeln!(out, "{}. {} has no allocation", p.position, p.name);
            continue;
        }
        for slot in &p.slots {
            let _ = writeln!(
                out,
                "{}. {} has {} in {} ({} to {}), priority {}",
                p.position, p.name, slot.apartment, slot.period, slot.start_date, slot.end_date, slot.priority
            );
        }
    }

    if !s.periods.is_empty() {
        out.push('\n');
        out.push_str("Per period:\n");
        for r in &s.periods {
            let _ = writeln!(out, "  {}: {}", r.period, r.allocated);
        }
    }

    let t = &s.totals;
    out.push('\n');
    let _ = writeln!(
        out,
        "{} allocations for {} participants (none: {}, one: {}, two: {})",
        t.allocations, t.participants, t.with_zero, t.with_one, t.with_two
    );
    let _ = write!(out, "Execution {}", s.execution_id);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_summary, fixture};

    #[test]
    fn lists_every_participant_once_per_slot() {
        let text = render_text(&build_summary(&fixture::execution()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "*Cabin draw results: Easter 2025*");
        assert!(lines.contains(&"1. Bo has Upper floor in Week after Easter (2025-04-17 to 2025-04-24), priority 1"));
        assert!(lines.contains(&"2. Ada <&> has Lower floor in Week after Easter (2025-04-17 to 2025-04-24), priority 2"));
        assert!(lines.contains(&"3. Cy has no allocation"));
        assert!(lines.contains(&"  Easter week: 1"));
        assert!(text.ends_with("Execution EXE:00\n"));
    }
}
