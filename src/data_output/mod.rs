// src/data_output/mod.rs

pub mod sweep_export;

// src/data_output/mod.rs
