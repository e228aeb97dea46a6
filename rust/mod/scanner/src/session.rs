//! Scan classification.
//!
//! A [`ScanSession`] is either without a unit, where every token is ignored,
//! or holds a unit's roster and the tokens accepted so far. Each token is
//! checked as foreign first, then as duplicate, and only then accepted.
//! `scanned` is always a subset of the roster and keeps first-acceptance order.

use std::collections::HashSet;

use crate::roster::Roster;

/// Result of classifying one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No unit is selected.
    Ignored,
    Accepted(String),
    /// Not on the selected unit's roster.
    Foreign(String),
    /// Already scanned in this session.
    Duplicate(String),
}

impl ScanOutcome {
    pub fn token(&self) -> Option<&str> {
        match self {
            ScanOutcome::Ignored => None,
            ScanOutcome::Accepted(t) | ScanOutcome::Foreign(t) | ScanOutcome::Duplicate(t) => {
                Some(t)
            }
        }
    }
}

/// Running counts of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub expected: usize,
    pub scanned: usize,
    pub missing: usize,
}

#[derive(Debug, Default)]
pub struct ScanSession {
    unit: Option<String>,
    roster: Vec<String>,
    expected: HashSet<String>,
    scanned: Vec<String>,
    seen: HashSet<String>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting `roster`. Anything scanned before is dropped.
    /// Repeated ids are kept once, at their first position.
    pub fn select(&mut self, roster: Roster) {
        self.expected.clear();
        self.roster.clear();
        for id in roster.ids {
            if self.expected.insert(id.clone()) {
                self.roster.push(id);
            }
        }
        self.unit = Some(roster.unit.id);
        self.scanned.clear();
        self.seen.clear();
    }

    /// Back to no unit selected.
    pub fn deselect(&mut self) {
        *self = Self::default();
    }

    /// Clear the scanned set and keep the roster.
    pub fn reset(&mut self) {
        self.scanned.clear();
        self.seen.clear();
    }

    pub fn process(&mut self, token: &str) -> ScanOutcome {
        if self.unit.is_none() {
            return ScanOutcome::Ignored;
        }
        if !self.expected.contains(token) {
            return ScanOutcome::Foreign(token.to_string());
        }
        if self.seen.contains(token) {
            return ScanOutcome::Duplicate(token.to_string());
        }
        self.seen.insert(token.to_string());
        self.scanned.push(token.to_string());
        ScanOutcome::Accepted(token.to_string())
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn scanned(&self) -> &[String] {
        &self.scanned
    }

    /// Roster entries not yet scanned, in roster order.
    pub fn missing(&self) -> Vec<String> {
        self.roster
            .iter()
            .filter(|id| !self.seen.contains(*id))
            .cloned()
            .collect()
    }

    pub fn counts(&self) -> Counts {
        Counts {
            expected: self.roster.len(),
            scanned: self.scanned.len(),
            missing: self.roster.len() - self.scanned.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use inventory::model::UnitRef;

    use super::*;

    fn roster(unit: &str, ids: &[&str]) -> Roster {
        Roster {
            unit: UnitRef {
                id: unit.into(),
                name: unit.to_uppercase(),
            },
            ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn session(ids: &[&str]) -> ScanSession {
        let mut s = ScanSession::new();
        s.select(roster("u1", ids));
        s
    }

    fn assert_invariants(s: &ScanSession) {
        let c = s.counts();
        assert_eq!(c.scanned + c.missing, s.roster().len());
        assert_eq!(c.missing, s.missing().len());
        for id in s.scanned() {
            assert!(s.roster().contains(id), "{id} scanned but not on roster");
        }
    }

    #[test]
    fn tokens_ignored_without_unit() {
        let mut s = ScanSession::new();
        assert_eq!(s.process("A1"), ScanOutcome::Ignored);
        assert!(s.scanned().is_empty());
        assert_eq!(s.counts(), Counts::default());
    }

    #[test]
    fn duplicate_and_foreign_are_rejected() {
        let mut s = session(&["A1", "A2", "A3"]);
        let outcomes: Vec<ScanOutcome> =
            ["A1", "A1", "A4", "A2"].iter().map(|t| s.process(t)).collect();

        assert_eq!(
            outcomes,
            vec![
                ScanOutcome::Accepted("A1".into()),
                ScanOutcome::Duplicate("A1".into()),
                ScanOutcome::Foreign("A4".into()),
                ScanOutcome::Accepted("A2".into()),
            ]
        );
        assert_eq!(s.scanned(), ["A1", "A2"]);
        assert_eq!(s.counts(), Counts { expected: 3, scanned: 2, missing: 1 });
        assert_eq!(s.missing(), vec!["A3"]);
    }

    #[test]
    fn reselect_starts_a_new_count() {
        let mut s = session(&["A1", "A2"]);
        s.process("A1");
        s.select(roster("u2", &["B1", "B2"]));
        assert_eq!(s.unit(), Some("u2"));
        assert!(s.scanned().is_empty());
        assert_eq!(s.roster(), ["B1", "B2"]);
        assert_eq!(s.process("A1"), ScanOutcome::Foreign("A1".into()));
    }

    #[test]
    fn reset_keeps_roster() {
        let mut s = session(&["A1", "A2", "A3"]);
        s.process("A1");
        s.process("A2");
        s.reset();
        assert!(s.scanned().is_empty());
        assert_eq!(s.missing(), vec!["A1", "A2", "A3"]);

        s.reset();
        assert_eq!(s.roster(), ["A1", "A2", "A3"]);
        assert_eq!(s.process("A2"), ScanOutcome::Accepted("A2".into()));
    }

    #[test]
    fn scanned_keeps_first_acceptance_order() {
        let mut s = session(&["A1", "A2", "A3"]);
        for t in ["A3", "X", "A3", "A1", "A9", "A1", "A2"] {
            s.process(t);
            assert_invariants(&s);
        }
        assert_eq!(s.scanned(), ["A3", "A1", "A2"]);
        assert!(s.missing().is_empty());
    }

    #[test]
    fn missing_follows_roster_order() {
        let mut s = session(&["A1", "A2", "A3", "A10"]);
        s.process("A2");
        assert_eq!(s.missing(), vec!["A1", "A3", "A10"]);
    }

    #[test]
    fn foreign_wins_over_duplicate() {
        let mut s = session(&["A1"]);
        assert_eq!(s.process("Z"), ScanOutcome::Foreign("Z".into()));
        assert_eq!(s.process("Z"), ScanOutcome::Foreign("Z".into()));
    }

    #[test]
    fn empty_roster_rejects_everything() {
        let mut s = session(&[]);
        assert_eq!(s.process("A1"), ScanOutcome::Foreign("A1".into()));
        assert_eq!(s.counts(), Counts::default());
    }

    #[test]
    fn repeated_roster_ids_count_once() {
        let mut s = session(&["A1", "A1", "A2"]);
        assert_eq!(s.roster(), ["A1", "A2"]);
        assert_eq!(s.counts(), Counts { expected: 2, scanned: 0, missing: 2 });

        s.process("A1");
        assert_invariants(&s);
        assert_eq!(s.counts().missing, 1);
        assert_eq!(s.missing(), vec!["A2"]);
    }

    #[test]
    fn deselect_drops_everything() {
        let mut s = session(&["A1"]);
        s.process("A1");
        s.deselect();
        assert_eq!(s.unit(), None);
        assert_eq!(s.process("A1"), ScanOutcome::Ignored);
    }

    mod properties {
        use std::collections::HashSet;

        use proptest::prelude::*;

        use super::*;

        /// Tokens drawn from the roster, from outside it, or repeating the
        /// previous token.
        fn token_stream(size: usize) -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec((0u8..3, 0..size.max(1) + 3), 0..40).prop_map(|picks| {
                let mut out: Vec<String> = Vec::with_capacity(picks.len());
                for (kind, n) in picks {
                    let token = match (kind, out.last()) {
                        (2, Some(prev)) => prev.clone(),
                        (1, _) => format!("X{n}"),
                        _ => format!("A{n}"),
                    };
                    out.push(token);
                }
                out
            })
        }

        proptest! {
            #[test]
            fn counts_hold_after_every_token(
                (size, tokens) in (0usize..12).prop_flat_map(|n| (Just(n), token_stream(n)))
            ) {
                let ids: Vec<String> = (0..size).map(|i| format!("A{i}")).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let mut s = session(&refs);
                let mut accepted: Vec<String> = Vec::new();

                for token in &tokens {
                    let before = s.scanned().to_vec();
                    let outcome = s.process(token);
                    assert_invariants(&s);

                    match outcome {
                        ScanOutcome::Accepted(t) => {
                            prop_assert!(ids.contains(&t));
                            prop_assert!(!accepted.contains(&t));
                            accepted.push(t);
                        }
                        ScanOutcome::Duplicate(t) => {
                            prop_assert!(accepted.contains(&t));
                            prop_assert_eq!(s.scanned(), before.as_slice());
                        }
                        ScanOutcome::Foreign(t) => {
                            prop_assert!(!ids.contains(&t));
                            prop_assert_eq!(s.scanned(), before.as_slice());
                        }
                        ScanOutcome::Ignored => prop_assert!(false, "unit is selected"),
                    }
                    prop_assert_eq!(s.scanned(), accepted.as_slice());
                    prop_assert_eq!(s.counts().missing, size - accepted.len());
                }
            }

            #[test]
            fn repeated_roster_entries_never_skew_counts(
                picks in prop::collection::vec(0u8..6, 0..20),
                scans in prop::collection::vec(0u8..6, 0..20),
            ) {
                let ids: Vec<String> = picks.iter().map(|n| format!("A{n}")).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let mut s = session(&refs);
                let distinct: HashSet<&String> = ids.iter().collect();
                prop_assert_eq!(s.counts().expected, distinct.len());

                for n in scans {
                    s.process(&format!("A{n}"));
                    assert_invariants(&s);
                }
                prop_assert_eq!(s.counts().missing, s.missing().len());
            }
        }
    }
}
