// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use log::warn;

use crate::error::Error;
use crate::window::Dimension;

/// Binning of a single axis.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Axis {
    pub(super) min: f64,
    pub(super) max: f64,
    pub(super) bins: usize,
    pub(super) width: f64,
    /// Index of the first bin whose lower boundary is at or above zero.
    pub(super) first_positive_bin: usize,
    /// Lower boundary of `first_positive_bin`.
    pub(super) first_positive_shift: f64,
    pub(super) sigma: f64,
}

impl Axis {
    /// Callers must have validated `min < max` and `bins > 0`.
    fn new(min: f64, max: f64, bins: usize) -> Self {
        let width = (max - min) / bins as f64;
        let (first_positive_bin, first_positive_shift) = zero_anchor(min, width);
        Axis {
            min,
            max,
            bins,
            width,
            first_positive_bin,
            first_positive_shift,
            sigma: width,
        }
    }

    pub(super) fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Bin holding `value`, counted from the zero anchor.
    ///
    /// `value` must lie inside the extent. The inclusive upper boundary and
    /// round-off just above `min` are kept inside the edge bins.
    pub(super) fn index(&self, value: f64) -> usize {
        let raw = ((value - self.first_positive_shift) / self.width
            + self.first_positive_bin as f64)
            .floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.bins - 1)
        }
    }

    /// Kernel node of bin `index`.
    pub(super) fn center(&self, index: usize) -> f64 {
        self.min + (index as f64 + 0.5) * self.width
    }
}

/// Walks from `min` in steps of `width` up to the first boundary that is not
/// negative. Returns the number of steps and the boundary reached.
fn zero_anchor(min: f64, width: f64) -> (usize, f64) {
    if min >= 0.0 {
        return (0, min);
    }
    // jump close to zero, then settle the last step against round-off
    let mut index = (-min / width).floor() as usize;
    let mut start = min + index as f64 * width;
    while start < 0.0 {
        index += 1;
        start = min + index as f64 * width;
    }
    while index > 0 && min + (index - 1) as f64 * width >= 0.0 {
        index -= 1;
        start = min + index as f64 * width;
    }
    (index, start)
}

/// Extent and binning of every axis of an estimator.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Geometry {
    pub(super) axes: Vec<Axis>,
    /// Histogram shape. The second entry is 1 for most one-dimensional estimators.
    pub(super) bins: [usize; 2],
}

impl Geometry {
    /// Validates `extent` and `bins` for `dimension` and derives the binning.
    ///
    /// A one-dimensional estimator given a single bin count gets a trailing
    /// count of 1 appended, so both variants share the two-axis histogram.
    pub(super) fn new(
        dimension: Dimension,
        extent: &[[f64; 2]],
        bins: &[usize],
    ) -> Result<Self, Error> {
        let bins = validate(dimension, extent, bins).inspect_err(|err| {
            warn!("rejected estimator geometry: {err}");
        })?;
        Ok(Self::from_validated(extent, bins))
    }

    /// Builds geometry from parameters known to be valid.
    pub(super) fn from_validated(extent: &[[f64; 2]], bins: [usize; 2]) -> Self {
        let axes = extent
            .iter()
            .zip(bins)
            .map(|(&[min, max], count)| Axis::new(min, max, count))
            .collect();
        Geometry { axes, bins }
    }

    pub(super) fn extent(&self) -> Vec<[f64; 2]> {
        self.axes.iter().map(|axis| [axis.min, axis.max]).collect()
    }

    /// Bin indices of `point`, or `None` when any coordinate is outside the
    /// extent.
    pub(super) fn indices(&self, point: &[f64]) -> Option<[usize; 2]> {
        if point.len() < self.axes.len() {
            return None;
        }
        let mut indices = [0usize; 2];
        for (slot, (axis, &value)) in indices.iter_mut().zip(self.axes.iter().zip(point)) {
            if !axis.contains(value) {
                return None;
            }
            *slot = axis.index(value);
        }
        Some(indices)
    }
}

fn validate(
    dimension: Dimension,
    extent: &[[f64; 2]],
    bins: &[usize],
) -> Result<[usize; 2], Error> {
    let axes = dimension.axes();
    let mut counts = bins.to_vec();
    // compatibility shim: 1D estimators address a degenerate second axis
    if axes == 1 && counts.len() == 1 {
        counts.push(1);
    }

    if extent.len() != axes || counts.len() != 2 {
        return Err(Error::config_invalid("extent or bin counts do not match the dimension")
            .with_context("dim", axes)
            .with_context("extent_rows", extent.len())
            .with_context("bins_len", bins.len()));
    }

    for (axis, &[min, max]) in extent.iter().enumerate() {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(Error::config_invalid("axis extent must satisfy min < max")
                .with_context("axis", axis)
                .with_context("min", min)
                .with_context("max", max));
        }
    }

    if let Some(axis) = counts.iter().position(|&count| count == 0) {
        return Err(
            Error::config_invalid("bin counts must be positive").with_context("axis", axis)
        );
    }
    if counts[0].checked_mul(counts[1]).is_none_or(|total| total > u32::MAX as usize) {
        return Err(Error::config_invalid("too many bins")
            .with_context("bins_x", counts[0])
            .with_context("bins_y", counts[1]));
    }

    Ok([counts[0], counts[1]])
}
