//! Bundled knowledge used when the remote collection cannot be fetched.

use tracing::error;

use super::entity::KnowledgeCollection;
use super::payload::parse_collection;

const FALLBACK_KNOWLEDGE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/fallback_knowledge.json"
));

/// Small set of interface-help and sample entries so views never render empty
#[inline]
pub fn fallback_collection() -> KnowledgeCollection {
    parse_collection(FALLBACK_KNOWLEDGE).unwrap_or_else(|e| {
        error!("Bundled fallback knowledge is unreadable: {}", e);
        KnowledgeCollection::new()
    })
}
