pub mod app;
pub mod cancel;
pub mod cli;
pub mod collect;
pub mod config;
pub mod dates;
pub mod git;
pub mod metrics;
pub mod models;
pub mod report;
pub mod store;
pub mod tagger;
pub mod utils;

#[cfg(test)]
pub mod test_utils;
