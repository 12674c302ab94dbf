pub mod analytics;
pub mod calendar;
pub mod config;
pub mod demo;
pub mod domain;
pub mod error;
