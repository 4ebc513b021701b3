pub mod anomaly;
pub mod cli;
pub mod config;
pub mod corr;
pub mod coverage;
pub mod ctx;
pub mod error;
pub mod io;
pub mod math;
pub mod pipeline;
pub mod regions;
pub mod schema;
pub mod series;
