//! Public types for the Mimir API.

mod contract;
mod diagnosis;
mod genre;
mod reference;
mod score;

pub use contract::{ContractKind, LabelSet};
pub use diagnosis::Diagnosis;
pub use genre::Genre;
pub use reference::ReferenceEntry;
pub use score::{INTENSITY_RANGE, POLARITY_RANGE, Scored};
pub(crate) use score::ScoreField;
