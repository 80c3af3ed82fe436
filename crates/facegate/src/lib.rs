//! # facegate
//!
//! Face-embedding enrollment and recognition.
//!
//! Embeddings arrive from an external feature extractor; this crate stores
//! them per identity and answers "who is this?" for new ones.
//!
//! ```text
//! let settings = facegate::load_settings()?;
//! facegate::init_logging(&settings.logging);
//! let fg = facegate::Facegate::open(&settings)?;
//! fg.enroll("1001", "Ada Lovelace", embedding)?;
//! match fg.identify(query)? { ... }
//! ```

#![deny(unsafe_code)]

pub mod errors;
pub mod handle;
pub mod logging;

pub use handle::Facegate;
pub use errors::{EnrollError, IdentifyError, OpenError};
pub use logging::init_logging;

pub use facegate_core::{
    Embedding, EmbeddingError, IdentityError, IdentityId, IdentityName, IdentityRecord,
};
pub use facegate_matcher::{DEFAULT_TOLERANCE, MatchResult, Matcher, MatcherError, Recognizer};
pub use facegate_settings::{FacegateSettings, SettingsError, load_settings, load_settings_from_path};
pub use facegate_store::{EmbeddingEncoding, EmbeddingStore, StoreConfig, StoreError, StoreErrorKind};
