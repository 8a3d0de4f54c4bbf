use strata_chunk::{Column, Neighborhood};

use crate::rng::ColumnRng;

/// Cave carving hook. Runs last in the population pass and currently leaves
/// the column untouched; a carver would cut from stone here using the
/// neighbourhood to keep tunnels continuous.
pub(super) fn carve_caves(_column: &mut Column, _neighbors: &Neighborhood, _rng: &mut ColumnRng) {}
