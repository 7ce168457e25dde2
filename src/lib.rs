//! Relationship Spark: structured relationship cards from conversational text.
//!
//! A user describes someone in their life in free text. A text-generation
//! collaborator is asked to answer in a fixed label-line format, and a
//! deterministic layer parses, validates, merges, and stores the result as a
//! [`Record`](record::Record). A second path enriches records from a
//! professional-profile scraping service.
//!
//! | Path | Flow |
//! |------|------|
//! | **Spark** | user text → collaborator → parser → known-field override → store |
//! | **Enrich** | profile URL → job poller → profile extraction → tag merger → store |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`record`]: Record types, the tag merger, and the record store
//! - [`extraction`]: Label-line parser, known-field override, and prompts
//! - [`generation`]: Text-generation collaborator trait and HTTP client
//! - [`enrichment`]: Scraping job client, poller, and profile extraction
//! - [`spark`]: Use-case orchestration ([`SparkService`](spark::SparkService))
//! - [`server`]: HTTP API

pub mod config;
pub mod enrichment;
pub mod error;
pub mod extraction;
pub mod generation;
pub mod record;
pub mod server;
pub mod spark;

pub use error::{Result, SparkError};
