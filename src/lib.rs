//! teseacquire - thesis and dissertation metadata acquisition.
//!
//! Crawls the BDTD aggregator (Biblioteca Digital Brasileira de Teses e
//! Dissertações), follows results into institutional repositories, and
//! extracts structured metadata through per-institution strategies, all
//! backed by a single SQLite database.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod progress;
pub mod repository;
pub mod scrapers;
pub mod services;
