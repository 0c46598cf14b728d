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

/// Grid of per-bin counters stored axis-major (`i * cols + j`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Histogram {
    rows: usize,
    cols: usize,
    counts: Vec<u32>,
}

impl Histogram {
    pub(super) fn new(rows: usize, cols: usize) -> Self {
        Histogram {
            rows,
            cols,
            counts: vec![0; rows * cols],
        }
    }

    pub(super) fn offset(&self, bin: [usize; 2]) -> Option<usize> {
        let [i, j] = bin;
        (i < self.rows && j < self.cols).then_some(i * self.cols + j)
    }

    pub(super) fn get(&self, bin: [usize; 2]) -> Option<u32> {
        self.offset(bin).map(|offset| self.counts[offset])
    }

    pub(super) fn at(&self, offset: usize) -> u32 {
        self.counts[offset]
    }

    pub(super) fn increment(&mut self, bin: [usize; 2]) -> bool {
        match self.offset(bin) {
            Some(offset) => {
                self.counts[offset] = self.counts[offset].saturating_add(1);
                true
            }
            None => false,
        }
    }

    pub(super) fn set(&mut self, bin: [usize; 2], count: u32) -> bool {
        match self.offset(bin) {
            Some(offset) => {
                self.counts[offset] = count;
                true
            }
            None => false,
        }
    }

    pub(super) fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub(super) fn total(&self) -> u64 {
        self.counts.iter().map(|&count| count as u64).sum()
    }

    /// Rows of the transposed grid: one line per column, one value per row.
    pub(super) fn transposed_lines(&self) -> Vec<String> {
        (0..self.cols)
            .map(|j| {
                (0..self.rows)
                    .map(|i| self.counts[i * self.cols + j].to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_major_layout() {
        let mut hist = Histogram::new(3, 2);
        assert!(hist.increment([2, 1]));
        assert!(hist.set([1, 0], 4));
        assert_eq!(hist.as_slice(), &[0, 0, 4, 0, 0, 1]);
        assert_eq!(hist.get([2, 1]), Some(1));
        assert_eq!(hist.total(), 5);
    }

    #[test]
    fn test_out_of_range_bins() {
        let mut hist = Histogram::new(3, 1);
        assert_eq!(hist.get([3, 0]), None);
        assert_eq!(hist.get([0, 1]), None);
        assert!(!hist.increment([3, 0]));
        assert!(!hist.set([0, 1], 2));
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn test_transposed_lines() {
        let mut hist = Histogram::new(3, 2);
        hist.set([0, 0], 1);
        hist.set([2, 1], 7);
        assert_eq!(hist.transposed_lines(), vec!["1 0 0", "0 0 7"]);
    }
}
