//! Storage layer (profile key-value store).

pub mod profile_store;

pub use profile_store::{MemoryProfileStore, ProfileStore};

/// Storage keys as constants.
pub mod keys {
    /// Serialized LinkedIn profile payload, written on `Connected`
    pub const LINKEDIN_PROFILE: &str = "linkedinUser";
}
