pub mod analysis;
pub mod attacks;
pub mod combat_log;
pub mod context;
pub mod game_data;
pub mod identity;
pub mod moments;
pub mod signals;
pub mod timeline;

// Re-exports for convenience
pub use analysis::{EventOrigin, Match, MatchError, Player};
pub use attacks::{AttackWindow, CombatRow};
pub use combat_log::{EventKind, EventParser, ReplayEvent, Reader, Slot};
pub use context::{AnalysisConfig, AppConfig, AppConfigExt, MomentSources};
pub use game_data::HeroTable;
pub use identity::{IdentityMap, OpenDotaRosterDecoder, RosterDecoder, SteamId};
pub use moments::{ActionMoment, format_clock};
pub use signals::HealthSignals;
pub use timeline::{Interval, Tick, TimeSeries, TimeTable, Timed};
pub use skirmish_types::{AttackWindowRecord, MomentRecord};
