pub mod aggregator;
pub mod date;
pub mod endpoints;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod plate;
pub mod projector;
pub mod record;
pub mod report;
pub mod services;
pub mod vehicle;
