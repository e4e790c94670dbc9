mod death_rules;
mod victim_service;

pub use death_rules::DeathRuleTable;
pub use victim_service::VictimService;
