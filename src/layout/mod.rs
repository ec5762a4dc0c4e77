//! # Plate Layout Engine
//!
//! Pure geometry for nameplate previews: unit conversion between physical
//! sizes and device pixels, the shrink-to-fit font sizing primitive, and the
//! line stacking/centering layout.
//!
//! ```text
//! LabelTemplate ─┐
//!                ├─ layout_plate() ─→ RenderedPlate (rect + placed lines)
//! PlateRect ─────┘        │
//!                         └─ fit_font_size() per line, via TextMeasure
//! ```
//!
//! Everything here is deterministic and side-effect free; text measurement
//! is injected through the [`TextMeasure`] trait so layout can be exercised
//! without any rendering surface.

pub mod fit;
pub mod plate;
pub mod units;

pub use fit::{FixedAdvance, TextMeasure, fit_font_size};
pub use plate::{LayoutOptions, PlacedLine, PlateRect, RenderedPlate, layout_plate};
pub use units::{DPI, SURFACE_PAD, SurfaceGeometry, in_to_px, pt_to_px, surface_geometry};
