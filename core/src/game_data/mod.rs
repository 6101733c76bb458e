mod heroes;

pub use heroes::HeroTable;

/// `type` tags of the event records the engine reads.
/// Everything else in the stream is kept as an opaque record.
pub mod event_type {
    pub const INTERVAL: &str = "interval";
    pub const EPILOGUE: &str = "epilogue";
    pub const COMBATLOG_DAMAGE: &str = "DOTA_COMBATLOG_DAMAGE";
    pub const COMBATLOG_DEATH: &str = "DOTA_COMBATLOG_DEATH";

    // Short names used by some exporters
    pub const COMBAT_DAMAGE: &str = "combat_damage";
    pub const COMBAT_DEATH: &str = "combat_death";
}
