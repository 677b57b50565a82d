use crate::Team;
use crate::errors::Scope;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditMode {
    /// Every team counted at least once (teams against matches).
    AtLeastOnce,
    /// Every team counted exactly once (participants against teams).
    ExactlyOnce,
}

/// Per-team counters, kept in the order the teams were seeded.
#[derive(Debug, Clone, Default)]
pub struct TeamAudit {
    counts: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl TeamAudit {
    pub fn new(teams: &[Team]) -> Self {
        let mut audit = Self::default();
        for team in teams {
            if !audit.index.contains_key(&team.id) {
                audit.index.insert(team.id.clone(), audit.counts.len());
                audit.counts.push((team.id.clone(), 0));
            }
        }
        audit
    }

    /// Count one appearance. False if the id is empty or unknown.
    pub fn ack(&mut self, id: &str) -> bool {
        self.add(id, 1)
    }

    pub fn add(&mut self, id: &str, n: u32) -> bool {
        match self.slot(id) {
            Some(count) => {
                *count = count.saturating_add(n);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, id: &str, n: u32) -> bool {
        match self.slot(id) {
            Some(count) => {
                *count = n;
                true
            }
            None => false,
        }
    }

    pub fn count(&self, id: &str) -> Option<u32> {
        self.index.get(id).map(|&i| self.counts[i].1)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(id, n)| (id.as_str(), *n))
    }

    fn slot(&mut self, id: &str) -> Option<&mut u32> {
        if id.is_empty() {
            return None;
        }
        let i = *self.index.get(id)?;
        Some(&mut self.counts[i].1)
    }

    /// Report every team whose count breaks the mode, sorted by message.
    pub fn validate(&self, mode: AuditMode, errs: &mut Scope<'_>) {
        let mut msgs: Vec<String> = self
            .entries()
            .filter_map(|(id, n)| match mode {
                AuditMode::AtLeastOnce if n == 0 => Some(format!("team id '{id}': count 0")),
                AuditMode::ExactlyOnce if n != 1 => Some(format!("team id '{id}', count = {n}")),
                _ => None,
            })
            .collect();
        msgs.sort();
        for msg in msgs {
            errs.add(msg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MultiError;
    use crate::fixtures::team;

    fn teams() -> Vec<Team> {
        vec![team("C"), team("A"), team("B")]
    }

    fn validate(audit: &TeamAudit, mode: AuditMode) -> Vec<String> {
        let mut errs = MultiError::new();
        audit.validate(mode, &mut errs.scope());
        errs.messages().to_vec()
    }

    #[test]
    fn unknown_and_empty_ids_are_rejected() {
        let mut audit = TeamAudit::new(&teams());
        assert!(audit.ack("A"));
        assert!(!audit.ack("Z"));
        assert!(!audit.ack(""));
        assert!(!audit.set("Z", 4));
        assert_eq!(audit.count("A"), Some(1));
        assert_eq!(audit.count("Z"), None);
    }

    #[test]
    fn entries_keep_seed_order() {
        let mut audit = TeamAudit::new(&teams());
        audit.add("B", 3);
        audit.set("C", 2);
        let entries: Vec<_> = audit.entries().collect();
        assert_eq!(entries, vec![("C", 2), ("A", 0), ("B", 3)]);
    }

    #[test]
    fn duplicate_seeds_share_a_counter() {
        let mut audit = TeamAudit::new(&[team("A"), team("A")]);
        audit.ack("A");
        assert_eq!(audit.entries().count(), 1);
        assert_eq!(audit.count("A"), Some(1));
    }

    #[test]
    fn at_least_once_reports_unseen_teams_sorted() {
        let mut audit = TeamAudit::new(&teams());
        audit.add("A", 5);
        assert_eq!(
            validate(&audit, AuditMode::AtLeastOnce),
            vec!["team id 'B': count 0", "team id 'C': count 0"]
        );
    }

    #[test]
    fn exactly_once_reports_missing_and_repeated_claims() {
        let mut audit = TeamAudit::new(&teams());
        audit.ack("A");
        audit.add("C", 2);
        assert_eq!(
            validate(&audit, AuditMode::ExactlyOnce),
            vec!["team id 'B', count = 0", "team id 'C', count = 2"]
        );

        audit.set("B", 1);
        audit.set("C", 1);
        assert!(validate(&audit, AuditMode::ExactlyOnce).is_empty());
    }
}
