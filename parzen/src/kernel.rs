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

//! Gaussian smoothing kernels evaluated at query time.

use std::f64::consts::PI;

/// Normal density with mean `center` and standard deviation `bandwidth`,
/// evaluated at `value`.
///
/// # Examples
///
/// ```
/// use parzen::kernel::gaussian_1d;
///
/// let peak = gaussian_1d(0.0, 1.0, 0.0);
/// assert!((peak - 0.398_942_280_4).abs() < 1e-9);
/// ```
pub fn gaussian_1d(center: f64, bandwidth: f64, value: f64) -> f64 {
    let z = (value - center) / bandwidth;
    (1.0 / ((2.0 * PI).sqrt() * bandwidth)) * (-0.5 * z * z).exp()
}

/// Product-form bivariate normal density with independent per-axis bandwidths.
///
/// Off-diagonal covariance is never modeled. The normalization constant is
/// `1 / sqrt(2π · bandwidth_x · bandwidth_y)`; it scales every term equally and
/// cancels once the response is max-normalized.
pub fn gaussian_2d(
    center_x: f64,
    center_y: f64,
    bandwidth_x: f64,
    bandwidth_y: f64,
    value_x: f64,
    value_y: f64,
) -> f64 {
    let zx = (value_x - center_x) / bandwidth_x;
    let zy = (value_y - center_y) / bandwidth_y;
    (1.0 / (2.0 * PI * bandwidth_x * bandwidth_y).sqrt()) * (-0.5 * (zx * zx + zy * zy)).exp()
}
