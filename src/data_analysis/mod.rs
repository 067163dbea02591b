// src/data_analysis/mod.rs

pub mod characteristic_roots;
pub mod recurrence;
pub mod stability_search;

// src/data_analysis/mod.rs
