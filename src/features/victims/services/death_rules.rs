//! Death-rule table and evaluator.
//!
//! Each death category maps to a `DeathRule`; any category missing from the
//! table falls back to `DeathRule::Never`. Adding a category means adding a
//! row to `DeathRuleTable::standard`, not another branch in `should_die`.

use chrono::{DateTime, Duration, Utc};

/// Seconds a heart attack victim survives before the rule fires
pub const HEART_ATTACK_THRESHOLD_SECS: i64 = 40;

/// Accepted spellings for the heart attack category
const HEART_ATTACK_ALIASES: &[&str] = &[
    "heart attack",
    "paro cardiaco",
    "paro cardíaco",
    "ataque al corazon",
    "ataque al corazón",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathRule {
    /// Victim is never transitioned automatically
    Never,
    /// Victim dies once strictly more than `threshold` has elapsed since creation
    AfterDelay {
        threshold: Duration,
        requires_image: bool,
    },
}

impl DeathRule {
    pub fn fires(&self, now: DateTime<Utc>, created_at: DateTime<Utc>, has_image: bool) -> bool {
        match *self {
            DeathRule::Never => false,
            DeathRule::AfterDelay {
                threshold,
                requires_image,
            } => {
                if requires_image && !has_image {
                    return false;
                }
                now.signed_duration_since(created_at) > threshold
            }
        }
    }
}

#[derive(Debug, Clone)]
struct DeathRuleEntry {
    category: &'static str,
    aliases: Vec<String>,
    rule: DeathRule,
}

/// Lookup table of `{category -> rule}` with a `Never` default
#[derive(Debug, Clone)]
pub struct DeathRuleTable {
    entries: Vec<DeathRuleEntry>,
    default_rule: DeathRule,
}

impl Default for DeathRuleTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl DeathRuleTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            default_rule: DeathRule::Never,
        }
    }

    /// The rule set the game ships with
    pub fn standard() -> Self {
        Self::empty().with_rule(
            "heart_attack",
            HEART_ATTACK_ALIASES,
            DeathRule::AfterDelay {
                threshold: Duration::seconds(HEART_ATTACK_THRESHOLD_SECS),
                requires_image: true,
            },
        )
    }

    pub fn with_rule(mut self, category: &'static str, aliases: &[&str], rule: DeathRule) -> Self {
        self.entries.push(DeathRuleEntry {
            category,
            aliases: aliases.iter().map(|a| normalize_death_type(a)).collect(),
            rule,
        });
        self
    }

    /// Category key for a free-form death type, if the table knows it
    pub fn category_of(&self, death_type: &str) -> Option<&'static str> {
        self.entry_for(death_type).map(|entry| entry.category)
    }

    pub fn rule_for(&self, death_type: Option<&str>) -> DeathRule {
        death_type
            .and_then(|dt| self.entry_for(dt))
            .map(|entry| entry.rule)
            .unwrap_or(self.default_rule)
    }

    pub fn should_die(
        &self,
        now: DateTime<Utc>,
        created_at: DateTime<Utc>,
        death_type: Option<&str>,
        has_image: bool,
    ) -> bool {
        self.rule_for(death_type).fires(now, created_at, has_image)
    }

    fn entry_for(&self, death_type: &str) -> Option<&DeathRuleEntry> {
        let key = normalize_death_type(death_type);
        self.entries
            .iter()
            .find(|entry| entry.aliases.iter().any(|alias| *alias == key))
    }
}

/// Case-insensitive, whitespace-collapsed form used for matching
fn normalize_death_type(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created_ago(now: DateTime<Utc>, secs: i64) -> DateTime<Utc> {
        now - Duration::seconds(secs)
    }

    #[test]
    fn test_heart_attack_without_image_never_dies() {
        let table = DeathRuleTable::standard();
        let now = Utc::now();

        for secs in [0, 41, 3_600, 10 * 365 * 24 * 3_600] {
            assert!(!table.should_die(now, created_ago(now, secs), Some("Heart Attack"), false));
        }
    }

    #[test]
    fn test_heart_attack_at_exact_threshold_does_not_fire() {
        let table = DeathRuleTable::standard();
        let now = Utc::now();
        let created_at = created_ago(now, HEART_ATTACK_THRESHOLD_SECS);

        assert!(!table.should_die(now, created_at, Some("Heart Attack"), true));
    }

    #[test]
    fn test_heart_attack_past_threshold_with_image_fires() {
        let table = DeathRuleTable::standard();
        let now = Utc::now();

        assert!(table.should_die(now, created_ago(now, 41), Some("Heart Attack"), true));

        let just_over = now - Duration::seconds(HEART_ATTACK_THRESHOLD_SECS) - Duration::milliseconds(1);
        assert!(table.should_die(now, just_over, Some("Heart Attack"), true));
    }

    #[test]
    fn test_heart_attack_aliases_match_loosely() {
        let table = DeathRuleTable::standard();
        for spelling in [
            "heart attack",
            "HEART   ATTACK",
            " Paro Cardiaco ",
            "paro cardíaco",
            "Ataque al Corazón",
        ] {
            assert_eq!(table.category_of(spelling), Some("heart_attack"), "{}", spelling);
        }
        assert_eq!(table.category_of("heartattack"), None);
    }

    #[test]
    fn test_unknown_or_missing_death_type_never_fires() {
        let table = DeathRuleTable::standard();
        let now = Utc::now();
        let long_ago = created_ago(now, 86_400);

        assert!(!table.should_die(now, long_ago, Some("asesinato"), true));
        assert!(!table.should_die(now, long_ago, Some("suicidio"), true));
        assert!(!table.should_die(now, long_ago, None, true));
        assert_eq!(table.rule_for(Some("asesinato")), DeathRule::Never);
    }

    #[test]
    fn test_future_created_at_does_not_fire() {
        let table = DeathRuleTable::standard();
        let now = Utc::now();
        let skewed = now + Duration::seconds(120);

        assert!(!table.should_die(now, skewed, Some("Heart Attack"), true));
    }

    #[test]
    fn test_added_rule_needs_no_new_branches() {
        let table = DeathRuleTable::standard().with_rule(
            "accident",
            &["accident", "accidente"],
            DeathRule::AfterDelay {
                threshold: Duration::seconds(10),
                requires_image: false,
            },
        );
        let now = Utc::now();

        assert!(table.should_die(now, created_ago(now, 11), Some("Accidente"), false));
        assert!(!table.should_die(now, created_ago(now, 10), Some("accident"), false));
        assert!(table.should_die(now, created_ago(now, 41), Some("heart attack"), true));
    }

    #[test]
    fn test_empty_table_defaults_to_never() {
        let table = DeathRuleTable::empty();
        let now = Utc::now();
        assert!(!table.should_die(now, created_ago(now, 1_000), Some("Heart Attack"), true));
    }
}
