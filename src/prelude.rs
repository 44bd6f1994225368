//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use cesta::prelude::*;
//! ```

pub use crate::artifact::ModelArtifact;
pub use crate::encode::{ItemId, ItemVocabulary};
pub use crate::error::{CestaError, Result};
pub use crate::mining::{FpGrowth, FrequentItemset};
pub use crate::recommend::{Recommendation, RecommendationEngine};
pub use crate::rules::{AssociationRule, RuleGenerator, RuleIndex};
