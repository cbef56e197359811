// Knowledge base access
// Fetching, caching and querying the remote knowledge collection

pub mod entity;
pub mod fallback;
pub mod payload;
pub mod source;
pub mod store;
pub mod submit;

pub use entity::{
    GeoLocation, HistoricalContext, KnowledgeCollection, KnowledgeEntity, PrimaryView,
};
pub use source::{HttpKnowledgeSource, KnowledgeSource};
pub use store::KnowledgeStore;
pub use submit::{KnowledgeSubmission, SubmissionOutcome, submit_knowledge};
