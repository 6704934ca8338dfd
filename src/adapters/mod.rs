// Adapters layer: concrete preferences backends.

pub mod memory;
pub mod xml_file;

pub use memory::MemoryPrefs;
pub use xml_file::XmlFilePrefs;

use std::path::PathBuf;

pub const DEFAULT_NODE: &str = "ninjabrainbot";

/// Java's user preference root: `$HOME/.java/.userPrefs`.
///
/// `NINBOT_FIXER_USER_ROOT` replaces `$HOME/.java/.userPrefs` entirely.
pub fn user_prefs_root() -> Option<PathBuf> {
    if let Ok(root) = std::env::var("NINBOT_FIXER_USER_ROOT") {
        if !root.is_empty() {
            return Some(PathBuf::from(root));
        }
    }
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".java").join(".userPrefs"))
}

/// `<root>/<node>/prefs.xml`
pub fn default_prefs_path(node: &str) -> Option<PathBuf> {
    user_prefs_root().map(|root| root.join(node).join("prefs.xml"))
}
