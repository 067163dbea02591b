// src/plot_functions/mod.rs

pub mod plot_root_paths;
pub mod plot_root_scatter;
pub mod plot_speed_deviation;

// src/plot_functions/mod.rs
