//! Bloom status derivation and prediction rendering pipeline.
//!
//! Prediction records flow leaf to root through:
//! store → status classifier → species filter → projector → selection.
//! Every stage is synchronous and pure apart from the one-time dataset load.

pub mod filter;
pub mod format;
pub mod projector;
pub mod selection;
pub mod status;
pub mod store;

pub use filter::{dedup_by_key, filter_species};
pub use projector::{
    classify_species, project_predictions, Classified, Descriptor, GridProjector, MapProjector,
    Position, Projection, Projector, Summary, ViewKind,
};
pub use selection::{SelectionController, SelectionState};
pub use status::{
    classify, days_until_bloom, species_stats, viewing_window, BloomStatus, BloomTier,
    SpeciesStats, ViewingWindow,
};
pub use store::PredictionStore;
