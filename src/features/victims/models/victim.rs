use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::VictimImage;

/// Database model for victim
///
/// `images` is not a column; stores fill it after loading the row, ordered by
/// image id (insertion order).
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Victim {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub is_alive: bool,
    pub death_type: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    #[sqlx(skip)]
    pub images: Vec<VictimImage>,
}

impl Victim {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }
}

/// Data for inserting a new victim row
#[derive(Debug, Clone)]
pub struct NewVictim {
    pub name: String,
    pub last_name: String,
    pub death_type: Option<String>,
    pub details: Option<String>,
}

impl NewVictim {
    /// Names are stored trimmed and upper-cased so the roster compares them uniformly
    pub fn new(
        name: &str,
        last_name: &str,
        death_type: Option<String>,
        details: Option<String>,
    ) -> Self {
        Self {
            name: normalize_name(name),
            last_name: normalize_name(last_name),
            death_type,
            details,
        }
    }
}

pub fn normalize_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

/// Partial update for a victim
///
/// There is no way to set a victim back to alive: `mark_dead` can only move
/// `is_alive` from true to false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VictimPatch {
    pub death_type: Option<String>,
    pub details: Option<String>,
    pub mark_dead: bool,
    /// Only bumps `edited_at`, used when images are attached
    pub touch: bool,
}

impl VictimPatch {
    pub fn death_type(death_type: impl Into<String>) -> Self {
        Self {
            death_type: Some(death_type.into()),
            ..Default::default()
        }
    }

    pub fn details(details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Default::default()
        }
    }

    pub fn mark_dead() -> Self {
        Self {
            mark_dead: true,
            ..Default::default()
        }
    }

    pub fn touch() -> Self {
        Self {
            touch: true,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.death_type.is_none() && self.details.is_none() && !self.mark_dead && !self.touch
    }

    /// Apply the patch in place, stamping `edited_at` with `now` when anything changed
    pub fn apply(&self, victim: &mut Victim, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        if let Some(death_type) = &self.death_type {
            victim.death_type = Some(death_type.clone());
        }
        if let Some(details) = &self.details {
            victim.details = Some(details.clone());
        }
        if self.mark_dead {
            victim.is_alive = false;
        }
        victim.edited_at = Some(now);
    }
}

/// Listing filter for victims
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VictimFilter {
    pub is_alive: Option<bool>,
}

impl VictimFilter {
    pub fn alive() -> Self {
        Self {
            is_alive: Some(true),
        }
    }

    pub fn matches(&self, victim: &Victim) -> bool {
        self.is_alive.is_none_or(|alive| victim.is_alive == alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn victim() -> Victim {
        Victim {
            id: Uuid::new_v4(),
            name: "JOHN".to_string(),
            last_name: "DOE".to_string(),
            is_alive: true,
            death_type: None,
            details: None,
            created_at: Utc::now(),
            edited_at: None,
            images: vec![],
        }
    }

    #[test]
    fn test_new_victim_normalizes_names() {
        let new_victim = NewVictim::new("  john ", "de  la   cruz", None, None);
        assert_eq!(new_victim.name, "JOHN");
        assert_eq!(new_victim.last_name, "DE LA CRUZ");
    }

    #[test]
    fn test_patch_sets_edited_at_only_when_changing_something() {
        let mut v = victim();
        let now = v.created_at + Duration::seconds(5);

        VictimPatch::default().apply(&mut v, now);
        assert_eq!(v.edited_at, None);

        VictimPatch::death_type("Heart Attack").apply(&mut v, now);
        assert_eq!(v.death_type.as_deref(), Some("Heart Attack"));
        assert_eq!(v.edited_at, Some(now));
        assert!(v.is_alive);
    }

    #[test]
    fn test_patch_mark_dead_keeps_other_fields() {
        let mut v = victim();
        v.details = Some("at the office".to_string());
        let now = v.created_at + Duration::seconds(41);

        VictimPatch::mark_dead().apply(&mut v, now);

        assert!(!v.is_alive);
        assert_eq!(v.details.as_deref(), Some("at the office"));
        assert_eq!(v.edited_at, Some(now));
    }

    #[test]
    fn test_filter_matches() {
        let mut v = victim();
        assert!(VictimFilter::default().matches(&v));
        assert!(VictimFilter::alive().matches(&v));

        v.is_alive = false;
        assert!(!VictimFilter::alive().matches(&v));
        assert!(VictimFilter { is_alive: Some(false) }.matches(&v));
    }
}
