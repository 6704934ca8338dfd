pub mod compare;
pub mod corrector;
pub mod preferences;

pub use crate::domain::model::{Adjuster, Adjustments, Drift, PrefValue, Report};
pub use crate::domain::ports::{PrefEntries, PrefsBackend};
pub use crate::utils::error::Result;
