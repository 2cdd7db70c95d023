//! Snake-draft scenarios: contention, cap, determinism, empty input, fallback.

use std::collections::BTreeSet;

use cabin_algo::{
    run_draw, run_snake_draft, AuditRecorder, DraftError, NullAudit, Round, SkipReason,
    TurnOutcome,
};
use cabin_core::{
    Allocation, Apartment, DrawInput, DrawRng, NaiveDate, Participant, ParticipantId, Period, Wish,
};

// -----------------------------------------------------------------------------
// Input builder
// -----------------------------------------------------------------------------

#[derive(Default)]
struct Fixture {
    input: DrawInput,
}

impl Fixture {
    fn participant(mut self, id: &str) -> Self {
        self.input.participants.push(Participant {
            id: id.parse().unwrap(),
            name: id.to_uppercase(),
            email: format!("{id}@example.org"),
        });
        self
    }

    fn period(mut self, id: &str, day: u32) -> Self {
        let start = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        self.input.periods.insert(
            id.parse().unwrap(),
            Period {
                id: id.parse().unwrap(),
                start_date: start,
                end_date: start,
                description: format!("Period {id}"),
                sort_order: day as i32,
            },
        );
        self
    }

    fn apartment(mut self, id: &str, sort_order: i32) -> Self {
        self.input.apartments.insert(
            id.parse().unwrap(),
            Apartment { id: id.parse().unwrap(), name: format!("Apt {id}"), sort_order },
        );
        self
    }

    fn wish(mut self, who: &str, period: &str, priority: u32, apts: &[&str]) -> Self {
        self.input.wishes.push(Wish {
            participant: who.parse().unwrap(),
            period: period.parse().unwrap(),
            priority,
            apartments: apts.iter().map(|a| a.parse().unwrap()).collect(),
            comment: None,
        });
        self
    }

    fn build(self) -> DrawInput {
        self.input
    }
}

fn slots(allocs: &[Allocation]) -> BTreeSet<(String, String)> {
    allocs
        .iter()
        .map(|a| (a.period.to_string(), a.apartment.to_string()))
        .collect()
}

fn count_for(allocs: &[Allocation], who: &str) -> usize {
    allocs.iter().filter(|a| a.participant.as_str() == who).count()
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[test]
fn three_people_two_apartments_one_period() {
    let input = Fixture::default()
        .participant("p1")
        .participant("p2")
        .participant("p3")
        .period("w1", 1)
        .apartment("a1", 1)
        .apartment("a2", 2)
        .wish("p1", "w1", 1, &["a1", "a2"])
        .wish("p2", "w1", 1, &["a1", "a2"])
        .wish("p3", "w1", 1, &["a1", "a2"])
        .build();

    for seed in 0..16 {
        let out = run_draw(&input, &mut DrawRng::from_seed_u64(seed)).unwrap();
        assert_eq!(out.allocations.len(), 2);
        assert_eq!(slots(&out.allocations).len(), 2);
        assert_eq!(out.statistics.with_zero, 1);
        assert_eq!(out.statistics.with_one, 2);
        assert_eq!(out.statistics.with_two, 0);
    }
}

#[test]
fn one_person_reaches_the_cap_across_two_periods() {
    let input = Fixture::default()
        .participant("solo")
        .period("w1", 1)
        .period("w2", 8)
        .apartment("a1", 1)
        .wish("solo", "w1", 1, &["a1"])
        .wish("solo", "w2", 1, &["a1"])
        .build();

    let out = run_draw(&input, &mut DrawRng::from_seed_u64(3)).unwrap();
    assert_eq!(out.allocations.len(), 2);
    let periods: BTreeSet<&str> = out.allocations.iter().map(|a| a.period.as_str()).collect();
    assert_eq!(periods, BTreeSet::from(["w1", "w2"]));
    assert_eq!(out.statistics.with_two, 1);
}

#[test]
fn more_wishes_than_turns_still_caps_at_two() {
    let input = Fixture::default()
        .participant("solo")
        .period("w1", 1)
        .period("w2", 8)
        .period("w3", 15)
        .apartment("a1", 1)
        .wish("solo", "w1", 1, &["a1"])
        .wish("solo", "w2", 1, &["a1"])
        .wish("solo", "w3", 1, &["a1"])
        .build();
    let out = run_draw(&input, &mut DrawRng::from_seed_u64(0)).unwrap();
    assert_eq!(out.allocations.len(), 2);
    assert!(out
        .turns
        .iter()
        .all(|t| matches!(t.outcome, TurnOutcome::Granted { .. })));
}

#[test]
fn seed_42_is_reproducible() {
    let input = contended();
    let a = run_draw(&input, &mut DrawRng::from_seed_u64(42)).unwrap();
    let b = run_draw(&input, &mut DrawRng::from_seed_u64(42)).unwrap();
    assert_eq!(a.allocations, b.allocations);
    assert_eq!(a.statistics, b.statistics);
    assert_eq!(a.audit_log, b.audit_log);
    assert_eq!(a.draw_order, b.draw_order);
}

#[test]
fn supplied_order_does_not_change_a_seeded_result() {
    let input = contended();
    let mut shuffled = input.clone();
    shuffled.participants.reverse();
    shuffled.wishes.reverse();
    let a = run_draw(&input, &mut DrawRng::from_seed_u64(42)).unwrap();
    let b = run_draw(&shuffled, &mut DrawRng::from_seed_u64(42)).unwrap();
    assert_eq!(a.allocations, b.allocations);
}

#[test]
fn different_seeds_produce_different_results() {
    let input = Fixture::default()
        .participant("p1")
        .participant("p2")
        .participant("p3")
        .period("w1", 1)
        .apartment("a1", 1)
        .wish("p1", "w1", 1, &["a1"])
        .wish("p2", "w1", 1, &["a1"])
        .wish("p3", "w1", 1, &["a1"])
        .build();

    let winners: BTreeSet<ParticipantId> = (0..64u64)
        .map(|seed| {
            let out = run_draw(&input, &mut DrawRng::from_seed_u64(seed)).unwrap();
            assert_eq!(out.allocations.len(), 1);
            out.allocations[0].participant.clone()
        })
        .collect();
    assert!(winners.len() > 1, "one participant won under every seed");
}

#[test]
fn unseeded_runs_report_random() {
    let input = contended();
    let out = run_draw(&input, &mut DrawRng::from_entropy()).unwrap();
    assert_eq!(out.seed.to_string(), "random");
    assert!(out.audit_log.iter().any(|l| l == "Seed: random"));
}

#[test]
fn empty_participant_set_is_a_precondition_failure() {
    let input = Fixture::default().period("w1", 1).apartment("a1", 1).build();
    let mut rng = DrawRng::from_seed_u64(1);
    let mut audit = AuditRecorder::new();
    let err = run_snake_draft(&input, &mut rng, &mut audit).unwrap_err();
    assert_eq!(err, DraftError::NoParticipants);
    assert!(!err.is_invariant_violation());
    assert!(audit.lines().is_empty());
    assert!(run_draw(&input, &mut rng).is_err());
}

#[test]
fn no_wishes_is_data_not_an_error() {
    let input = Fixture::default()
        .participant("p1")
        .participant("p2")
        .period("w1", 1)
        .apartment("a1", 1)
        .build();
    let out = run_draw(&input, &mut DrawRng::from_seed_u64(5)).unwrap();
    assert!(out.allocations.is_empty());
    assert_eq!(out.statistics.with_zero, 2);
    assert_eq!(out.turns.len(), 4);
    assert!(out
        .turns
        .iter()
        .all(|t| t.outcome == TurnOutcome::Skipped { reason: SkipReason::NoAvailableWish }));
}

#[test]
fn contested_slot_loser_gets_fallback() {
    let input = Fixture::default()
        .participant("p1")
        .participant("p2")
        .period("w1", 1)
        .period("w2", 8)
        .apartment("a1", 1)
        .apartment("a2", 2)
        .wish("p1", "w1", 1, &["a1"])
        .wish("p1", "w2", 2, &["a1"])
        .wish("p2", "w1", 1, &["a1"])
        .wish("p2", "w2", 2, &["a2"])
        .build();

    for seed in 0..16 {
        let out = run_draw(&input, &mut DrawRng::from_seed_u64(seed)).unwrap();
        let first = out.draw_order[0].as_str();
        let loser = if first == "p1" { "p2" } else { "p1" };
        let contested = out
            .allocations
            .iter()
            .find(|a| a.period.as_str() == "w1")
            .unwrap();
        assert_eq!(contested.participant.as_str(), first);

        let fallback: Vec<&Allocation> = out
            .allocations
            .iter()
            .filter(|a| a.participant.as_str() == loser)
            .collect();
        assert_eq!(fallback.len(), 1, "seed {seed}");
        assert_eq!(fallback[0].period.as_str(), "w2");
        assert_eq!(fallback[0].priority, 2);
    }
}

#[test]
fn apartments_are_tried_by_sort_order() {
    let input = Fixture::default()
        .participant("p1")
        .period("w1", 1)
        .apartment("late", 9)
        .apartment("early", 1)
        .wish("p1", "w1", 1, &["late", "early"])
        .build();
    let out = run_draw(&input, &mut DrawRng::from_seed_u64(0)).unwrap();
    assert_eq!(out.allocations[0].apartment.as_str(), "early");
}

#[test]
fn same_period_is_never_granted_twice_to_one_person() {
    let input = Fixture::default()
        .participant("p1")
        .period("w1", 1)
        .apartment("a1", 1)
        .apartment("a2", 2)
        .wish("p1", "w1", 1, &["a1"])
        .wish("p1", "w1", 2, &["a2"])
        .build();
    let out = run_draw(&input, &mut DrawRng::from_seed_u64(0)).unwrap();
    assert_eq!(count_for(&out.allocations, "p1"), 1);
    assert!(out.audit_log.iter().any(|l| l.contains("Already holds this period")));
}

#[test]
fn audit_is_a_pure_side_channel() {
    let input = contended();
    let mut rec = AuditRecorder::new();
    let with = run_snake_draft(&input, &mut DrawRng::from_seed_u64(8), &mut rec).unwrap();
    let without = run_snake_draft(&input, &mut DrawRng::from_seed_u64(8), &mut NullAudit).unwrap();
    assert_eq!(with.allocations, without.allocations);
    assert_eq!(with.turns, without.turns);
    assert!(!rec.lines().is_empty());
}

#[test]
fn transcript_shape() {
    let input = contended();
    let out = run_draw(&input, &mut DrawRng::from_seed_u64(11)).unwrap();
    let log = &out.audit_log;
    assert_eq!(log[0], "=== SNAKE DRAFT ===");
    assert_eq!(log[1], "Seed: 11");
    assert!(log.iter().any(|l| l.starts_with("  Round 1 (down): ")));
    assert!(log.iter().any(|l| l.starts_with("  Round 2 (up): ")));
    let turns = log.iter().filter(|l| l.starts_with("Turn ")).count();
    assert_eq!(turns, 2 * input.participants.len());
    assert!(log.iter().any(|l| l == "=== DRAW COMPLETE ==="));
    assert_eq!(
        log.last().map(String::as_str),
        Some(format!("Participants with 2 allocations: {}", out.statistics.with_two).as_str())
    );
}

#[test]
fn turn_records_follow_the_snake() {
    let input = contended();
    let out = run_draw(&input, &mut DrawRng::from_seed_u64(4)).unwrap();
    let n = input.participants.len();
    for (i, t) in out.turns.iter().enumerate() {
        assert_eq!(t.index, i);
        if i < n {
            assert_eq!(t.round, Round::Down);
            assert_eq!(t.participant, out.draw_order[i]);
        } else {
            assert_eq!(t.round, Round::Up);
            assert_eq!(t.participant, out.draw_order[2 * n - 1 - i]);
        }
    }
}

fn contended() -> DrawInput {
    Fixture::default()
        .participant("anna")
        .participant("bjorn")
        .participant("cora")
        .participant("dag")
        .period("easter", 1)
        .period("winter", 15)
        .apartment("upper", 1)
        .apartment("lower", 2)
        .wish("anna", "easter", 1, &["upper", "lower"])
        .wish("anna", "winter", 2, &["upper"])
        .wish("bjorn", "easter", 1, &["upper"])
        .wish("bjorn", "winter", 1, &["lower", "upper"])
        .wish("cora", "easter", 1, &["lower"])
        .wish("cora", "winter", 1, &["upper"])
        .wish("cora", "easter", 2, &["upper"])
        .wish("dag", "winter", 1, &["upper", "lower"])
        .build()
}
