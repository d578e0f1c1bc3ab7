//! Community board: sighting reports, moderation and the contributor
//! leaderboard, over a pluggable data-service backend.

pub mod backend;
pub mod board;
pub mod error;
pub mod filter;
pub mod leaderboard;
pub mod permissions;
pub mod supabase;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use backend::{NewSighting, SightingBackend};
pub use board::{Board, BoardState, ProfileSummary};
pub use error::{BoardError, ValidationIssue};
pub use filter::SightingFilter;
pub use leaderboard::{build_leaderboard, Badge, Contributor, POINTS_PER_REPORT};
pub use supabase::SupabaseBackend;
pub use validate::{PhotoUpload, SightingDraft};
