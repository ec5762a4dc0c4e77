//! # Placa - Nameplate Label Designer Core
//!
//! Placa renders engraved-style nameplate labels: it fits text to plates,
//! rasterizes previews, and summarizes submissions as multi-page PDF tables.
//! It provides:
//!
//! - **Plate layout**: shrink-to-fit font sizing and centered line stacking
//! - **Preview rendering**: RGBA plate rasters, PNG or data-URI encoded
//! - **PDF summaries**: a paginated Letter table of saved templates
//! - **Submission flow**: validate, render, store, webhook delivery
//!
//! ## Quick Start
//!
//! ```
//! use placa::{
//!     preview::{render_plate_png, PreviewOptions, Typeface},
//!     template::{LabelTemplate, LineSpec},
//! };
//!
//! // Describe a 5" x 1.5" plate with two lines
//! let template = LabelTemplate {
//!     lines: vec![
//!         LineSpec::new("JOHN DOE", 22.0),
//!         LineSpec::new("SITE MANAGER", 18.0),
//!     ],
//!     ..LabelTemplate::default()
//! };
//!
//! // Render it to a PNG preview
//! let typeface = Typeface::builtin();
//! let png = render_plate_png(&template, &typeface, &PreviewOptions::default())?;
//! assert!(!png.is_empty());
//! # Ok::<(), placa::error::PlacaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Label templates, palettes, validation |
//! | [`layout`] | Unit conversion, font fit, plate layout |
//! | [`preview`] | Raster previews of a single plate |
//! | [`pdf`] | PDF writer and the summary table renderer |
//! | [`submission`] | Validation, storage and webhook ports |
//! | [`server`] | HTTP API for the designer frontend |
//! | [`error`] | Error types |

pub mod error;
pub mod layout;
pub mod pdf;
pub mod preview;
pub mod server;
pub mod submission;
pub mod template;

// Re-exports for convenience
pub use error::PlacaError;
pub use template::LabelTemplate;
