//! Expose citemark's internal API for use in testing. The engine itself lives
//! in `citemark-core`; this crate only wires files, chunks and configuration
//! together for the command line.
pub mod chunks;
pub mod cli;
pub mod error;
pub mod run;
