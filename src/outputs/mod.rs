//! Output writers for the scraped record.
//!
//! - [`json`]: prints the [`ScrapeResult`](crate::models::ScrapeResult) to
//!   stdout and optionally stores it under a date-based directory
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── mars_08-00-12.json
//!     └── mars_20-30-45.json
//! ```

pub mod json;
