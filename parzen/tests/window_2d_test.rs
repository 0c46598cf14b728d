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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::gt;
use googletest::prelude::lt;
use googletest::prelude::near;
use parzen::error::ErrorKind;
use parzen::window::Dimension;
use parzen::window::ParzenWindow;
use parzen::window::TWO_DIM_OVERSAMPLING;

const EXTENT: [[f64; 2]; 2] = [[-0.1, 0.2], [0.0, 1.2]];

fn estimator() -> ParzenWindow {
    ParzenWindow::new(Dimension::Two, &EXTENT, &[8, 4]).unwrap()
}

fn bin_center(estimator: &ParzenWindow, bin: [usize; 2]) -> [f64; 2] {
    let extent = estimator.extent();
    let widths = estimator.bin_widths();
    [
        extent[0][0] + (bin[0] as f64 + 0.5) * widths[0],
        extent[1][0] + (bin[1] as f64 + 0.5) * widths[1],
    ]
}

#[test]
fn test_geometry() {
    let estimator = estimator();
    assert_eq!(estimator, ParzenWindow::two_dimensional());
    assert_eq!(estimator.dimension(), Dimension::Two);
    assert_eq!(estimator.bins(), [8, 4]);
    assert_eq!(estimator.oversampling(), TWO_DIM_OVERSAMPLING);
    assert_eq!(estimator.first_positive_bins(), vec![3, 0]);

    let widths = estimator.bin_widths();
    assert_that!(widths[0], near(0.0375, 1e-12));
    assert_that!(widths[1], near(0.3, 1e-12));
    assert_eq!(estimator.sigmas(), widths);

    let shifts = estimator.first_positive_shifts();
    assert_that!(shifts[0], near(0.0125, 1e-12));
    assert_eq!(shifts[1], 0.0);
    assert_eq!(estimator.positive_histogram().len(), 32);
}

#[test]
fn test_indices() {
    let estimator = estimator();
    assert_eq!(estimator.indices_for(&[-0.1, 0.0]), Some([0, 0]));
    assert_eq!(estimator.indices_for(&[0.2, 1.2]), Some([7, 3]));
    assert_eq!(estimator.indices_for(&[0.013, 0.61]), Some([3, 2]));
    assert_eq!(estimator.indices_for(&[0.05, 2.0]), None);
    assert_eq!(estimator.indices_for(&[0.05, -0.01]), None);
    assert_eq!(estimator.indices_for(&[0.25, 0.5]), None);
}

#[test]
fn test_rejected_sample_leaves_histograms_unchanged() {
    let mut estimator = estimator();
    estimator.add_positive_sample(&[0.0, 0.5]);
    estimator.add_negative_sample(&[0.1, 0.9]);
    let positive = estimator.positive_histogram().to_vec();
    let negative = estimator.negative_histogram().to_vec();

    assert!(!estimator.add_positive_sample(&[0.05, 2.0]));
    assert!(!estimator.add_negative_sample(&[0.05, 2.0]));
    assert!(!estimator.add_positive_sample(&[0.05]));

    assert_eq!(estimator.positive_histogram(), positive.as_slice());
    assert_eq!(estimator.negative_histogram(), negative.as_slice());
    assert_eq!(estimator.aggregated_response(&[0.05, 2.0]), 0.0);
}

#[test]
fn test_ingestion_monotonicity() {
    let mut estimator = estimator();
    let point = [0.1, 0.7];
    let bin = estimator.indices_for(&point).unwrap();
    let negative = estimator.negative_histogram().to_vec();

    assert!(estimator.add_positive_sample(&point));
    assert_eq!(estimator.positive_count(bin), Some(1));
    assert_eq!(estimator.negative_histogram(), negative.as_slice());
    assert_eq!(estimator.total_samples(), 1);

    assert!(estimator.add_negative_sample(&point));
    assert_eq!(estimator.negative_count(bin), Some(1));
    assert_eq!(estimator.positive_count(bin), Some(1));
    assert_eq!(estimator.positive_count([8, 0]), None);
}

#[test]
fn test_empty_estimator_normalization() {
    let estimator = estimator();
    for point in [[-0.1, 0.0], [0.0, 0.6], [0.2, 1.2], [0.05, 0.3]] {
        assert_eq!(estimator.scaled_response(&point), 0.0);
        assert_eq!(estimator.aggregated_response(&point), 0.0);
    }
}

#[test]
fn test_response_peaks_at_bin_center() {
    let mut estimator = estimator();
    for _ in 0..6 {
        estimator.add_positive_sample(&[0.05, 0.45]);
    }
    let bin = estimator.indices_for(&[0.05, 0.45]).unwrap();
    let center = bin_center(&estimator, bin);

    assert_that!(estimator.aggregated_response(&center), near(1.0, 1e-9));
    let far = estimator.aggregated_response(&[0.19, 1.15]);
    assert_that!(far, lt(0.01));
    assert_that!(estimator.aggregated_response(&[0.05, 0.45]), gt(far));
}

#[test]
fn test_response_is_separable() {
    let mut estimator = estimator();
    for _ in 0..5 {
        estimator.add_positive_sample(&[0.0, 0.6]);
    }
    let [cx, cy] = bin_center(&estimator, estimator.indices_for(&[0.0, 0.6]).unwrap());
    let [sx, sy] = [estimator.sigmas()[0], estimator.sigmas()[1]];

    let expected = (-0.5f64).exp() * (-0.5f64 * 0.25).exp();
    assert_that!(
        estimator.scaled_response(&[cx + sx, cy - 0.5 * sy]),
        near(expected, 1e-6)
    );
}

#[test]
fn test_response_follows_bin_ratios() {
    let mut estimator = estimator();
    for _ in 0..10 {
        estimator.add_positive_sample(&[-0.09, 0.1]);
    }
    for _ in 0..5 {
        estimator.add_positive_sample(&[0.19, 1.1]);
        estimator.add_negative_sample(&[0.19, 1.1]);
    }
    let certain = bin_center(&estimator, [0, 0]);
    let mixed = bin_center(&estimator, [7, 3]);

    assert_that!(estimator.aggregated_response(&certain), near(1.0, 1e-6));
    assert_that!(estimator.aggregated_response(&mixed), near(0.5, 1e-6));
}

#[test]
fn test_materialize() {
    let mut estimator = estimator();
    for _ in 0..3 {
        estimator.add_positive_sample(&[0.15, 1.0]);
    }
    for _ in 0..2 {
        estimator.add_negative_sample(&[0.15, 1.0]);
    }
    let bin = estimator.indices_for(&[0.15, 1.0]).unwrap();

    let grid = estimator.materialize();
    assert_eq!(grid.len(), 8);
    assert!(grid.iter().all(|row| row.len() == 4));
    assert_eq!(grid[bin[0]][bin[1]], 0.6);
    let nonzero = grid.iter().flatten().filter(|&&ratio| ratio != 0.0).count();
    assert_eq!(nonzero, 1);
}

#[test]
fn test_mismatched_bins_fail_configuration() {
    let err = ParzenWindow::new(Dimension::Two, &EXTENT, &[8]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert_that!(err.message(), contains_substring("do not match"));
    assert!(
        err.context()
            .iter()
            .any(|(key, value)| *key == "bins_len" && value == "1")
    );

    let err = ParzenWindow::new(Dimension::Two, &EXTENT[..1], &[8, 4]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);

    let mut estimator = estimator();
    estimator.add_positive_sample(&[0.0, 0.5]);
    assert!(estimator.configure(&EXTENT, &[8]).is_err());
    assert_eq!(estimator.bins(), [8, 4]);
    assert_eq!(estimator.total_samples(), 1);
}

#[test]
fn test_builder() {
    let estimator = ParzenWindow::builder(Dimension::Two)
        .extent(&[[-0.2, 0.2], [-0.5, 0.5]])
        .bins(&[4, 10])
        .oversampling(3)
        .build()
        .unwrap();
    assert_eq!(estimator.bins(), [4, 10]);
    assert_eq!(estimator.oversampling(), 3);
    assert_eq!(estimator.first_positive_bins(), vec![2, 5]);

    let err = ParzenWindow::builder(Dimension::Two)
        .bins(&[4, 0])
        .build()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn test_summary() {
    let mut estimator = estimator();
    estimator.add_positive_sample(&[-0.1, 0.0]);
    estimator.add_negative_sample(&[0.2, 1.2]);

    let line = estimator.to_string();
    assert_that!(
        line.as_str(),
        contains_substring("Extension [X1 X2 Y1 Y2]: -0.1 0.2 0 1.2\tbinsNum[X Y]: 8 4")
    );
    assert_that!(line.as_str(), contains_substring("\tbinWidth[X Y]: 0.0375"));

    let verbose = estimator.summary(true);
    assert_that!(
        verbose.as_str(),
        contains_substring("\nPositive histogram:\n1 0 0 0 0 0 0 0\n0 0 0 0 0 0 0 0\n")
    );
    assert!(verbose.ends_with("\n0 0 0 0 0 0 0 1"));
}
