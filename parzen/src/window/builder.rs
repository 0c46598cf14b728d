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

use crate::error::Error;
use crate::window::Dimension;
use crate::window::ParzenWindow;
use crate::window::geometry::Geometry;

/// Builder for creating Parzen window estimators.
///
/// Unset parameters fall back to the defaults of the chosen dimension.
///
/// # Examples
///
/// ```
/// use parzen::window::Dimension;
/// use parzen::window::ParzenWindow;
///
/// let estimator = ParzenWindow::builder(Dimension::Two)
///     .extent(&[[-0.2, 0.2], [0.0, 1.0]])
///     .bins(&[16, 8])
///     .oversampling(4)
///     .build()
///     .unwrap();
///
/// assert_eq!(estimator.bins(), [16, 8]);
/// assert_eq!(estimator.oversampling(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ParzenWindowBuilder {
    dimension: Dimension,
    extent: Vec<[f64; 2]>,
    bins: Vec<usize>,
    oversampling: usize,
}

impl ParzenWindowBuilder {
    pub(super) fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            extent: dimension.default_extent().to_vec(),
            bins: dimension.default_bins().to_vec(),
            oversampling: dimension.default_oversampling(),
        }
    }

    /// Sets the `[min, max]` row of every axis.
    pub fn extent(mut self, extent: &[[f64; 2]]) -> Self {
        self.extent = extent.to_vec();
        self
    }

    /// Sets the bin count of every axis.
    pub fn bins(mut self, bins: &[usize]) -> Self {
        self.bins = bins.to_vec();
        self
    }

    /// Sets how many max-search grid points are taken per bin and axis.
    ///
    /// # Panics
    ///
    /// Panics if `oversampling` is 0 or larger than `u16::MAX`.
    pub fn oversampling(mut self, oversampling: usize) -> Self {
        assert!(
            (1..=u16::MAX as usize).contains(&oversampling),
            "oversampling must be in [1, 65535]"
        );
        self.oversampling = oversampling;
        self
    }

    /// Builds the estimator.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// under the same conditions as [`ParzenWindow::new`].
    pub fn build(self) -> Result<ParzenWindow, Error> {
        let geometry = Geometry::new(self.dimension, &self.extent, &self.bins)?;
        Ok(ParzenWindow::with_geometry(
            self.dimension,
            geometry,
            self.oversampling,
        ))
    }
}
