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

//! Parzen window estimators over a bounded one- or two-dimensional domain.
//!
//! An estimator keeps two histograms over a fixed grid of bins: one counting
//! positive observations and one counting negative observations. Queries smooth
//! the per-bin positive fraction with a Gaussian kernel centered on every bin
//! and normalize the result against the largest value found on a grid finer
//! than the histogram, so the response lies in `[0, 1]`.
//!
//! Bin indices are anchored on zero: each axis records the first bin boundary
//! at or above zero reachable from its minimum in whole bin widths, and points
//! are binned relative to that boundary. When the minimum is a whole number of
//! widths below zero, `0.0` is a boundary and signed coordinates (for example
//! signed distances to a surface) never share a bin across the sign change.
//!
//! # Usage
//!
//! ```rust
//! use parzen::window::Dimension;
//! use parzen::window::ParzenWindow;
//!
//! let mut estimator = ParzenWindow::new(Dimension::One, &[[-0.1, 0.2]], &[20]).unwrap();
//! for _ in 0..10 {
//!     estimator.add_positive_sample(&[0.05]);
//! }
//! estimator.add_negative_sample(&[0.05]);
//! estimator.add_negative_sample(&[0.05]);
//!
//! let near = estimator.aggregated_response(&[0.05]);
//! let far = estimator.aggregated_response(&[-0.095]);
//! assert!(near > far);
//! assert_eq!(estimator.aggregated_response(&[0.5]), 0.0);
//! ```
//!
//! # Sharing between threads
//!
//! Estimators hold no lock of their own. A control loop that ingests samples
//! on one thread and queries on another wraps the estimator in a mutex:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::Mutex;
//!
//! use parzen::window::ParzenWindow;
//!
//! let shared = Arc::new(Mutex::new(ParzenWindow::two_dimensional()));
//! let producer = {
//!     let shared = Arc::clone(&shared);
//!     std::thread::spawn(move || {
//!         let mut estimator = shared.lock().unwrap();
//!         for _ in 0..5 {
//!             estimator.add_positive_sample(&[0.0, 0.3]);
//!         }
//!     })
//! };
//! producer.join().unwrap();
//! let response = shared.lock().unwrap().aggregated_response(&[0.0, 0.3]);
//! assert!(response > 0.0);
//! ```

mod builder;
mod estimator;
mod geometry;
mod histogram;
mod serialization;

pub use self::builder::ParzenWindowBuilder;
pub use self::estimator::ParzenWindow;

/// Minimum number of observations a bin needs before its raw ratio is reported.
pub const MIN_SUPPORT: u32 = 5;

/// Max-search grid points per bin for one-dimensional estimators.
pub const ONE_DIM_OVERSAMPLING: usize = 10;
/// Max-search grid points per bin and axis for two-dimensional estimators.
pub const TWO_DIM_OVERSAMPLING: usize = 2;

/// Default extent of one-dimensional estimators.
pub const DEFAULT_ONE_DIM_EXTENT: [[f64; 2]; 1] = [[-0.1, 0.2]];
/// Default bin count of one-dimensional estimators.
pub const DEFAULT_ONE_DIM_BINS: [usize; 2] = [20, 1];
/// Default extent of two-dimensional estimators.
pub const DEFAULT_TWO_DIM_EXTENT: [[f64; 2]; 2] = [[-0.1, 0.2], [0.0, 1.2]];
/// Default bin counts of two-dimensional estimators.
pub const DEFAULT_TWO_DIM_BINS: [usize; 2] = [8, 4];

/// Number of axes an estimator covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    One = 1,
    Two = 2,
}

impl Dimension {
    /// Number of axes.
    pub const fn axes(self) -> usize {
        self as usize
    }

    /// Oversampling factor used by the max search unless overridden.
    pub const fn default_oversampling(self) -> usize {
        match self {
            Dimension::One => ONE_DIM_OVERSAMPLING,
            Dimension::Two => TWO_DIM_OVERSAMPLING,
        }
    }

    pub(crate) fn from_axes(axes: u8) -> Option<Self> {
        match axes {
            1 => Some(Dimension::One),
            2 => Some(Dimension::Two),
            _ => None,
        }
    }

    fn default_extent(self) -> &'static [[f64; 2]] {
        match self {
            Dimension::One => &DEFAULT_ONE_DIM_EXTENT,
            Dimension::Two => &DEFAULT_TWO_DIM_EXTENT,
        }
    }

    fn default_bins(self) -> [usize; 2] {
        match self {
            Dimension::One => DEFAULT_ONE_DIM_BINS,
            Dimension::Two => DEFAULT_TWO_DIM_BINS,
        }
    }
}
