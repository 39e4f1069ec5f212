//! Record domain model.
//!
//! # Responsibility
//! - Define the shared base attributes and the concrete record variants.
//! - Declare which typed fields each variant requires.
//!
//! # Invariants
//! - Every record carries a complete base attribute set.
//! - The `itemtype` discriminator always names one registered variant.

pub mod record;
pub mod schema;
