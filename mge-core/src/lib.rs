pub mod class;
pub mod duel;
pub mod heatmap;
pub mod matchup;
pub mod rating;
pub mod steam_id;

pub use class::TfClass;
pub use duel::{DuelKind, DuelRecord, DuelSide, DuelSlot};
pub use steam_id::{LegacySteamId, SteamId64};
