//! Actor records, game-rule family detection and character summaries.

pub mod actor;
mod de;
pub mod entries;
pub mod family;
pub mod summary;
pub mod text;

pub use actor::{ActorRecord, EffectRecord, ItemRecord};
pub use family::{detect_family, GameFamily, SystemData};
pub use summary::{
    extract_basic_info, extract_stats, format_effects, format_items, summarize, CharacterList,
    CharacterListing, CharacterSummary,
};
pub use text::truncate;
