//! Containment and boundary math for loop containers.
//!
//! Child positions are relative to the parent loop's top-left corner. The loop
//! draws a header band of `header_height` on top, then an interior drop area
//! inset by `interior_margin` on the left and right, then a footer band. All
//! clamping happens against that interior area.

mod bounds;
mod footprint;
mod targeting;

pub use bounds::*;
pub use footprint::*;
pub use targeting::*;

use crate::model::{DEFAULT_SUBFLOW_HEIGHT, DEFAULT_SUBFLOW_WIDTH, Size};
use serde::Deserialize;

/// Geometry constants shared by every boundary computation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Footprint used for node types without a more specific estimate.
    pub default_node_width: f64,
    pub default_node_height: f64,
    pub start_height: f64,
    pub end_height: f64,
    /// Height of one switch row; the header counts as one row.
    pub switch_row_height: f64,
    pub header_height: f64,
    pub footer_height: f64,
    /// Gap kept between a child and any container edge.
    pub boundary_padding: f64,
    /// Extra horizontal inset that keeps children clear of the side margins.
    pub inset_x: f64,
    /// Margin between the loop's outline and its interior drop area, per side.
    pub interior_margin: f64,
    pub min_container_width: f64,
    pub min_container_height: f64,
    /// Two drops of the same type closer than this on both axes are one drop.
    pub duplicate_tolerance: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_node_width: 220.0,
            default_node_height: 80.0,
            start_height: 34.0,
            end_height: 70.0,
            switch_row_height: 24.0,
            header_height: 34.0,
            footer_height: 12.0,
            boundary_padding: 10.0,
            inset_x: 20.0,
            interior_margin: 12.0,
            min_container_width: DEFAULT_SUBFLOW_WIDTH,
            min_container_height: DEFAULT_SUBFLOW_HEIGHT,
            duplicate_tolerance: 10.0,
        }
    }
}

impl LayoutConfig {
    pub fn min_container_size(&self) -> Size {
        Size::new(self.min_container_width, self.min_container_height)
    }
}
