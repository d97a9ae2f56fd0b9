use crate::tiebreak::RuleSet;
use serde::{Deserialize, Serialize};

/// Points awarded per match outcome. 3/1/0 is the default policy, not a
/// constant: some deployments run alternative schemes per tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointScheme {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for PointScheme {
    fn default() -> Self {
        PointScheme {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Preliminary,
    Final,
}

/// Sport code of a tournament block. Gates which tie-break rules are
/// meaningful: fair-play accounting exists for football-style sports,
/// time-based rules only for timed sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Football,
    Futsal,
    IceHockey,
    Athletics,
    Swimming,
    Generic,
}

impl Sport {
    pub fn is_timed(&self) -> bool {
        matches!(self, Sport::Athletics | Sport::Swimming)
    }

    pub fn has_fair_play(&self) -> bool {
        matches!(self, Sport::Football | Sport::Futsal)
    }
}

/// Per-invocation configuration for one standings computation. Constructed
/// fresh by the caller for every request; the core keeps no state between
/// calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockContext {
    pub sport: Sport,
    pub phase: Phase,
    pub scheme: PointScheme,
    pub rules: RuleSet,
}

impl BlockContext {
    pub fn new(sport: Sport, phase: Phase) -> Self {
        BlockContext {
            sport,
            phase,
            scheme: PointScheme::default(),
            rules: RuleSet::default(),
        }
    }

    pub fn with_scheme(mut self, scheme: PointScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_scheme() {
        let scheme = PointScheme::default();

        assert_eq!(scheme.win, 3);
        assert_eq!(scheme.draw, 1);
        assert_eq!(scheme.loss, 0);
    }

    #[test]
    fn test_sport_capabilities() {
        assert!(Sport::Football.has_fair_play());
        assert!(Sport::Futsal.has_fair_play());
        assert!(!Sport::Athletics.has_fair_play());

        assert!(Sport::Athletics.is_timed());
        assert!(Sport::Swimming.is_timed());
        assert!(!Sport::Football.is_timed());
        assert!(!Sport::Generic.is_timed());
    }
}
