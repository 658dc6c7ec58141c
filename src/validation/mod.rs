//! Partition validator: temporal split, leakage check, and schema sanity check.
//!
//! Missing features are tolerated by `leakage_check` (best-effort summary over
//! candidate names) but a missing column is fatal for `sanity_check`, where
//! the column's presence is part of what is being checked.

pub mod leakage;
pub mod sanity;
pub mod split;

pub use leakage::*;
pub use sanity::*;
pub use split::*;
