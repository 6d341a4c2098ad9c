//! Application-wide constants
//!
//! Everything backend-specific lives in `inference::constants`; this module
//! only adds what the binary itself needs.

/// Configuration file locations
pub mod paths {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "sigil";
    /// Configuration file inside the config directory
    pub const CONFIG_FILE: &str = "config.json";
}

/// Environment variables read by the binary
pub mod env {
    pub use inference::constants::env::{BASE_URL, GEMINI_API_KEY, MODEL};

    /// Selects the generation backend by registry name
    pub const BACKEND: &str = "SIGIL_BACKEND";
    /// Overrides the directory holding `config.json`
    pub const CONFIG_DIR: &str = "SIGIL_CONFIG_DIR";
}

/// Canvas layout for fragments given on the command line
pub mod layout {
    /// Horizontal position of each argument fragment
    pub const ARG_X: f64 = 50.0;
    /// Vertical position of the first argument fragment
    pub const ARG_TOP: f64 = 50.0;
    /// Vertical gap between argument fragments
    pub const ARG_SPACING: f64 = 100.0;
}
