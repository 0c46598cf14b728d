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

use std::fmt;

use log::debug;
use log::info;
use log::trace;

use crate::error::Error;
use crate::kernel::gaussian_1d;
use crate::kernel::gaussian_2d;
use crate::window::Dimension;
use crate::window::MIN_SUPPORT;
use crate::window::ParzenWindowBuilder;
use crate::window::geometry::Geometry;
use crate::window::histogram::Histogram;
use crate::window::serialization;

/// Online Parzen window estimator over a bounded domain.
///
/// See the [module documentation](super) for more details.
#[derive(Debug, Clone, PartialEq)]
pub struct ParzenWindow {
    dimension: Dimension,
    geometry: Geometry,
    oversampling: usize,

    positive: Histogram,
    negative: Histogram,
}

impl ParzenWindow {
    /// Creates an estimator over `extent` with the given bin counts.
    ///
    /// `extent` holds one `[min, max]` row per axis. `bins` holds one count per
    /// axis; a one-dimensional estimator also accepts a single count.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// if the number of extent rows differs from the dimension, if `bins` does
    /// not hold two counts after the one-dimensional shim, if a count is zero or
    /// if an axis does not satisfy `min < max`.
    pub fn new(dimension: Dimension, extent: &[[f64; 2]], bins: &[usize]) -> Result<Self, Error> {
        let geometry = Geometry::new(dimension, extent, bins)?;
        Ok(Self::with_geometry(
            dimension,
            geometry,
            dimension.default_oversampling(),
        ))
    }

    /// Creates a one-dimensional estimator over `[-0.1, 0.2]` with 20 bins.
    pub fn one_dimensional() -> Self {
        Self::with_defaults(Dimension::One)
    }

    /// Creates a two-dimensional estimator over `[-0.1, 0.2] x [0.0, 1.2]` with
    /// 8 x 4 bins.
    pub fn two_dimensional() -> Self {
        Self::with_defaults(Dimension::Two)
    }

    /// Returns a builder starting from the default geometry of `dimension`.
    pub fn builder(dimension: Dimension) -> ParzenWindowBuilder {
        ParzenWindowBuilder::new(dimension)
    }

    fn with_defaults(dimension: Dimension) -> Self {
        let geometry =
            Geometry::from_validated(dimension.default_extent(), dimension.default_bins());
        Self::with_geometry(dimension, geometry, dimension.default_oversampling())
    }

    pub(super) fn with_geometry(
        dimension: Dimension,
        geometry: Geometry,
        oversampling: usize,
    ) -> Self {
        let [rows, cols] = geometry.bins;
        debug!(
            "configured {}D Parzen window: extent {:?}, bins {:?}",
            dimension.axes(),
            geometry.extent(),
            geometry.bins
        );
        ParzenWindow {
            dimension,
            geometry,
            oversampling,
            positive: Histogram::new(rows, cols),
            negative: Histogram::new(rows, cols),
        }
    }

    /// Replaces the geometry and zeroes both histograms.
    ///
    /// On error the estimator is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ParzenWindow::new`].
    pub fn configure(&mut self, extent: &[[f64; 2]], bins: &[usize]) -> Result<(), Error> {
        let geometry = Geometry::new(self.dimension, extent, bins)?;
        *self = Self::with_geometry(self.dimension, geometry, self.oversampling);
        Ok(())
    }

    /// Discards every observation, keeping the current geometry.
    pub fn reset(&mut self) {
        let [rows, cols] = self.geometry.bins;
        self.positive = Histogram::new(rows, cols);
        self.negative = Histogram::new(rows, cols);
    }

    /// Returns the dimension of this estimator.
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Returns the `[min, max]` row of every axis.
    pub fn extent(&self) -> Vec<[f64; 2]> {
        self.geometry.extent()
    }

    /// Returns the histogram shape; the second count is 1 for a plain 1D estimator.
    pub fn bins(&self) -> [usize; 2] {
        self.geometry.bins
    }

    /// Returns the bin width of every axis.
    pub fn bin_widths(&self) -> Vec<f64> {
        self.geometry.axes.iter().map(|axis| axis.width).collect()
    }

    /// Returns the kernel bandwidth of every axis.
    pub fn sigmas(&self) -> Vec<f64> {
        self.geometry.axes.iter().map(|axis| axis.sigma).collect()
    }

    /// Returns, per axis, the index of the first bin starting at or above zero.
    pub fn first_positive_bins(&self) -> Vec<usize> {
        self.geometry
            .axes
            .iter()
            .map(|axis| axis.first_positive_bin)
            .collect()
    }

    /// Returns, per axis, the lower boundary of the first bin starting at or
    /// above zero.
    pub fn first_positive_shifts(&self) -> Vec<f64> {
        self.geometry
            .axes
            .iter()
            .map(|axis| axis.first_positive_shift)
            .collect()
    }

    /// Returns the max-search oversampling factor.
    pub fn oversampling(&self) -> usize {
        self.oversampling
    }

    /// Sets the max-search oversampling factor.
    ///
    /// # Panics
    ///
    /// Panics if `oversampling` is 0 or larger than `u16::MAX`.
    pub fn set_oversampling(&mut self, oversampling: usize) {
        assert!(
            (1..=u16::MAX as usize).contains(&oversampling),
            "oversampling must be in [1, 65535]"
        );
        self.oversampling = oversampling;
    }

    /// Returns the bin indices of `point`, or `None` if it lies outside the
    /// extent on any axis.
    ///
    /// One-dimensional estimators always report 0 as the second index.
    pub fn indices_for(&self, point: &[f64]) -> Option<[usize; 2]> {
        self.geometry.indices(point)
    }

    /// Records a positive observation at `point`.
    ///
    /// Returns false, without side effects, if `point` is outside the extent.
    pub fn add_positive_sample(&mut self, point: &[f64]) -> bool {
        match self.geometry.indices(point) {
            Some(bin) => self.positive.increment(bin),
            None => {
                trace!("positive sample {point:?} outside the extent");
                false
            }
        }
    }

    /// Records a negative observation at `point`.
    ///
    /// Returns false, without side effects, if `point` is outside the extent.
    pub fn add_negative_sample(&mut self, point: &[f64]) -> bool {
        match self.geometry.indices(point) {
            Some(bin) => self.negative.increment(bin),
            None => {
                trace!("negative sample {point:?} outside the extent");
                false
            }
        }
    }

    /// Returns the positive count of `bin`, or `None` if the bin is off the grid.
    pub fn positive_count(&self, bin: [usize; 2]) -> Option<u32> {
        self.positive.get(bin)
    }

    /// Returns the negative count of `bin`, or `None` if the bin is off the grid.
    pub fn negative_count(&self, bin: [usize; 2]) -> Option<u32> {
        self.negative.get(bin)
    }

    /// Overwrites the positive count of `bin`. Used when restoring saved state.
    ///
    /// Returns false if the bin is off the grid.
    pub fn set_positive_count(&mut self, bin: [usize; 2], count: u32) -> bool {
        self.positive.set(bin, count)
    }

    /// Overwrites the negative count of `bin`. Used when restoring saved state.
    ///
    /// Returns false if the bin is off the grid.
    pub fn set_negative_count(&mut self, bin: [usize; 2], count: u32) -> bool {
        self.negative.set(bin, count)
    }

    /// Positive counts in axis-major order (`i * bins[1] + j`).
    pub fn positive_histogram(&self) -> &[u32] {
        self.positive.as_slice()
    }

    /// Negative counts in axis-major order (`i * bins[1] + j`).
    pub fn negative_histogram(&self) -> &[u32] {
        self.negative.as_slice()
    }

    /// Returns the number of recorded observations, positive and negative.
    pub fn total_samples(&self) -> u64 {
        self.positive.total() + self.negative.total()
    }

    /// Returns true if no observation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_samples() == 0
    }

    /// Returns the positive fraction of `bin`.
    ///
    /// Bins with fewer than [`MIN_SUPPORT`] observations, and bins off the
    /// grid, report 0.
    pub fn raw_ratio(&self, bin: [usize; 2]) -> f64 {
        let Some(offset) = self.positive.offset(bin) else {
            return 0.0;
        };
        let positive = self.positive.at(offset);
        let total = positive as u64 + self.negative.at(offset) as u64;
        if total < MIN_SUPPORT as u64 {
            return 0.0;
        }
        positive as f64 / total as f64
    }

    /// Returns the raw ratio of every bin, `bins[0]` rows of `bins[1]` values.
    pub fn materialize(&self) -> Vec<Vec<f64>> {
        let [rows, cols] = self.geometry.bins;
        (0..rows)
            .map(|i| (0..cols).map(|j| self.raw_ratio([i, j])).collect())
            .collect()
    }

    /// Returns the unnormalized kernel-smoothed estimate at `point`.
    ///
    /// Every bin with at least one observation contributes its positive
    /// fraction, without the [`MIN_SUPPORT`] floor applied by
    /// [`raw_ratio`](Self::raw_ratio). `point` may lie outside the extent.
    pub fn density(&self, point: &[f64]) -> f64 {
        match (self.dimension, point) {
            (Dimension::One, &[x, ..]) => self.density_1d(x),
            (Dimension::Two, &[x, y, ..]) => self.density_2d(x, y),
            _ => 0.0,
        }
    }

    /// Returns [`density`](Self::density) at `point` divided by the largest
    /// density found on the oversampled grid, clamped to `[0, 1]`.
    ///
    /// Returns 0 everywhere while no bin carries positive weight, and for a
    /// point with a NaN coordinate.
    pub fn scaled_response(&self, point: &[f64]) -> f64 {
        let peak = self.peak_density();
        if peak <= 0.0 {
            return 0.0;
        }
        let ratio = self.density(point) / peak;
        if ratio.is_nan() { 0.0 } else { ratio.min(1.0) }
    }

    /// Returns the scaled response at `point`, or 0 if `point` lies outside the
    /// extent.
    pub fn aggregated_response(&self, point: &[f64]) -> f64 {
        if self.geometry.indices(point).is_none() {
            trace!("query {point:?} outside the extent");
            return 0.0;
        }
        self.scaled_response(point)
    }

    /// Returns the summary line, followed by both histograms if `verbose`.
    pub fn summary(&self, verbose: bool) -> String {
        let mut res = self.to_string();
        if verbose {
            let separator = match self.dimension {
                Dimension::One => "\t",
                Dimension::Two => "\n",
            };
            res.push_str(&format!(
                "\nPositive histogram:{separator}{}",
                self.positive.transposed_lines().join("\n")
            ));
            res.push_str(&format!(
                "\nNegative histogram:{separator}{}",
                self.negative.transposed_lines().join("\n")
            ));
        }
        res
    }

    /// Logs the verbose summary at info level.
    pub fn log_summary(&self) {
        info!("{}", self.summary(true));
    }

    /// Serializes the estimator to a byte vector.
    pub fn serialize(&self) -> Vec<u8> {
        serialization::serialize(self)
    }

    /// Deserializes an estimator written by [`serialize`](Self::serialize).
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDeserializeData`](crate::error::ErrorKind::MalformedDeserializeData) if
    /// the bytes are truncated, belong to another format or describe an
    /// invalid geometry.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        serialization::deserialize(bytes)
    }

    /// Positive fraction of the bin at `offset` over all its observations.
    fn kernel_weight(&self, offset: usize) -> f64 {
        let positive = self.positive.at(offset);
        let total = positive as u64 + self.negative.at(offset) as u64;
        if total == 0 {
            0.0
        } else {
            positive as f64 / total as f64
        }
    }

    fn density_1d(&self, x: f64) -> f64 {
        let axis = &self.geometry.axes[0];
        let [rows, cols] = self.geometry.bins;
        (0..rows)
            .map(|i| {
                let weight = self.kernel_weight(i * cols);
                if weight == 0.0 {
                    0.0
                } else {
                    weight * gaussian_1d(axis.center(i), axis.sigma, x)
                }
            })
            .sum()
    }

    fn density_2d(&self, x: f64, y: f64) -> f64 {
        let (ax, ay) = (&self.geometry.axes[0], &self.geometry.axes[1]);
        let [rows, cols] = self.geometry.bins;
        let mut sum = 0.0;
        for i in 0..rows {
            for j in 0..cols {
                let weight = self.kernel_weight(i * cols + j);
                if weight != 0.0 {
                    sum += weight
                        * gaussian_2d(ax.center(i), ay.center(j), ax.sigma, ay.sigma, x, y);
                }
            }
        }
        sum
    }

    /// Largest density on a grid `oversampling` times finer than the bins,
    /// starting at the lower corner of the extent.
    fn peak_density(&self) -> f64 {
        if self.positive.total() == 0 {
            return 0.0;
        }
        let steps = self.oversampling as f64;
        match self.dimension {
            Dimension::One => {
                let axis = &self.geometry.axes[0];
                let step = axis.width / steps;
                (0..axis.bins * self.oversampling)
                    .map(|i| self.density_1d(axis.min + i as f64 * step))
                    .fold(0.0, f64::max)
            }
            Dimension::Two => {
                let (ax, ay) = (&self.geometry.axes[0], &self.geometry.axes[1]);
                let (step_x, step_y) = (ax.width / steps, ay.width / steps);
                let mut peak = 0.0f64;
                for i in 0..ax.bins * self.oversampling {
                    let x = ax.min + i as f64 * step_x;
                    for j in 0..ay.bins * self.oversampling {
                        peak = peak.max(self.density_2d(x, ay.min + j as f64 * step_y));
                    }
                }
                peak
            }
        }
    }
}

impl fmt::Display for ParzenWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axes = &self.geometry.axes;
        let [bins_x, bins_y] = self.geometry.bins;
        match self.dimension {
            Dimension::One => write!(
                f,
                "Extension [X1 X2]: {} {}\tbinsNum[X]: {}\tbinWidth[X]: {}\tsigma[X]: {}",
                axes[0].min, axes[0].max, bins_x, axes[0].width, axes[0].sigma
            ),
            Dimension::Two => {
                write!(
                    f,
                    "Extension [X1 X2 Y1 Y2]: {} {} {} {}\tbinsNum[X Y]: {} {}",
                    axes[0].min, axes[0].max, axes[1].min, axes[1].max, bins_x, bins_y
                )?;
                write!(
                    f,
                    "\tbinWidth[X Y]: {} {}\tsigma[X Y]: {} {}",
                    axes[0].width, axes[1].width, axes[0].sigma, axes[1].sigma
                )
            }
        }
    }
}
