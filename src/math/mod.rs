pub mod interp;
pub mod savgol;
pub mod stats;
