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

//! Binary snapshot of an estimator.
//!
//! Layout, little-endian:
//!
//! ```text
//! byte 0   preamble ints (always 2)
//! byte 1   serial version
//! byte 2   family id
//! byte 3   flags (bit 2: no observations)
//! byte 4   number of axes (1 or 2)
//! byte 5   unused
//! byte 6-7 oversampling factor
//! then     per axis: f64 min, f64 max
//! then     u32 bins[0], u32 bins[1]
//! then     unless empty: positive counts, then negative counts, u32 each,
//!          axis-major (i * bins[1] + j)
//! ```

use log::debug;

use crate::codec::SnapshotBytes;
use crate::codec::SnapshotSlice;
use crate::codec::assert::ensure_preamble_ints_in;
use crate::codec::assert::ensure_serial_version_is;
use crate::codec::family::Family;
use crate::error::Error;
use crate::window::Dimension;
use crate::window::ParzenWindow;
use crate::window::geometry::Geometry;

const PREAMBLE_INTS: u8 = 2;
const SERIAL_VERSION: u8 = 1;
const FLAGS_IS_EMPTY: u8 = 1 << 2;

pub(super) fn serialize(estimator: &ParzenWindow) -> Vec<u8> {
    let extent = estimator.extent();
    let [rows, cols] = estimator.bins();
    let is_empty = estimator.is_empty();

    let mut size_bytes = PREAMBLE_INTS as usize * 4 + extent.len() * 16 + 8;
    if !is_empty {
        size_bytes += 2 * rows * cols * 4;
    }

    let mut bytes = SnapshotBytes::with_capacity(size_bytes);
    bytes.write_u8(PREAMBLE_INTS);
    bytes.write_u8(SERIAL_VERSION);
    bytes.write_u8(Family::PARZEN_WINDOW.id);
    bytes.write_u8(if is_empty { FLAGS_IS_EMPTY } else { 0 });
    bytes.write_u8(estimator.dimension().axes() as u8);
    bytes.write_u8(0);
    bytes.write_u16_le(estimator.oversampling() as u16);
    for [min, max] in extent {
        bytes.write_f64_le(min);
        bytes.write_f64_le(max);
    }
    // bin counts are bounded by u32::MAX in total, see geometry validation
    bytes.write_u32_le(rows as u32);
    bytes.write_u32_le(cols as u32);

    if is_empty {
        return bytes.into_bytes();
    }

    for &count in estimator.positive_histogram() {
        bytes.write_u32_le(count);
    }
    for &count in estimator.negative_histogram() {
        bytes.write_u32_le(count);
    }
    bytes.into_bytes()
}

pub(super) fn deserialize(bytes: &[u8]) -> Result<ParzenWindow, Error> {
    fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
        move |_| Error::insufficient_data(tag)
    }

    let mut cursor = SnapshotSlice::new(bytes);
    let preamble_ints = cursor.read_u8().map_err(make_error("preamble_ints"))?;
    let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
    let family_id = cursor.read_u8().map_err(make_error("family_id"))?;
    let flags = cursor.read_u8().map_err(make_error("flags"))?;
    let axes = cursor.read_u8().map_err(make_error("axes"))?;
    cursor.read_u8().map_err(make_error("unused"))?;
    let oversampling = cursor.read_u16_le().map_err(make_error("oversampling"))?;

    Family::PARZEN_WINDOW.validate_id(family_id)?;
    ensure_serial_version_is(SERIAL_VERSION, serial_version)?;
    ensure_preamble_ints_in(&[PREAMBLE_INTS], preamble_ints)?;
    let dimension = Dimension::from_axes(axes).ok_or_else(|| {
        Error::deserial("number of axes must be 1 or 2").with_context("axes", axes)
    })?;
    if oversampling == 0 {
        return Err(Error::deserial("oversampling must be at least 1"));
    }

    let mut extent = Vec::with_capacity(dimension.axes());
    for _ in 0..dimension.axes() {
        let min = cursor.read_f64_le().map_err(make_error("extent"))?;
        let max = cursor.read_f64_le().map_err(make_error("extent"))?;
        extent.push([min, max]);
    }
    let rows = cursor.read_u32_le().map_err(make_error("bins"))? as usize;
    let cols = cursor.read_u32_le().map_err(make_error("bins"))? as usize;

    let geometry = Geometry::new(dimension, &extent, &[rows, cols]).map_err(|err| {
        Error::deserial("snapshot describes an invalid geometry").set_source(err)
    })?;
    let is_empty = (flags & FLAGS_IS_EMPTY) != 0;
    // both histograms must be present before any counter is allocated
    let expected_bytes = 2 * 4 * (rows as u64) * (cols as u64);
    if !is_empty && (cursor.remaining() as u64) < expected_bytes {
        return Err(Error::insufficient_data("histograms")
            .with_context("expected_bytes", expected_bytes)
            .with_context("remaining_bytes", cursor.remaining()));
    }

    let mut estimator = ParzenWindow::with_geometry(dimension, geometry, oversampling as usize);
    if is_empty {
        debug!("decoded empty {}D Parzen window", dimension.axes());
        return Ok(estimator);
    }

    for i in 0..rows {
        for j in 0..cols {
            let count = cursor.read_u32_le().map_err(make_error("positive histogram"))?;
            estimator.set_positive_count([i, j], count);
        }
    }
    for i in 0..rows {
        for j in 0..cols {
            let count = cursor.read_u32_le().map_err(make_error("negative histogram"))?;
            estimator.set_negative_count([i, j], count);
        }
    }

    debug!(
        "decoded {}D Parzen window holding {} samples",
        dimension.axes(),
        estimator.total_samples()
    );
    Ok(estimator)
}
