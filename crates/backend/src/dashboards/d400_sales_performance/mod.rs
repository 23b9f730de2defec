pub mod aggregation;
pub mod dataset;
pub mod filter;
pub mod presentation;
pub mod service;
