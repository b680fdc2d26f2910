//! Content-hash fingerprinting for static build output.
//!
//! Renames generated files to `name-<hash>.ext`, rewrites the font and image
//! references inside stylesheets to the renamed files, and records every
//! rename in a JSON manifest.
//!
//! ```ignore
//! let config = FingerprintConfig::default();
//! let mut fingerprinter = Fingerprinter::new(config, "production")?;
//! fingerprinter
//!     .process_batch(&[GeneratedFile::new("public/css/app.css")])
//!     .await?;
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod logger;
pub mod manifest;
pub mod utils;

pub use config::FingerprintConfig;
pub use engine::{AssetMap, Fingerprinter, GeneratedFile};
pub use error::FingerprintError;
