pub mod error;
pub mod extract;
pub mod ports;
pub mod prompts;
pub mod reconcile;
pub mod recommender;
pub mod types;

pub use error::{StylistError, StylistErrorKind};
pub use recommender::OutfitRecommender;
