// src/lib.rs - Library interface for the analysis and plotting modules

pub mod constants;
pub mod controller_config;
pub mod data_analysis;
pub mod data_output;
pub mod plot_framework;
pub mod plot_functions;
pub mod types;

// Crate version, preferring a git-derived version when the build provides one.
pub fn crate_version() -> &'static str {
    option_env!("VERGEN_GIT_SEMVER").unwrap_or(env!("CARGO_PKG_VERSION"))
}
