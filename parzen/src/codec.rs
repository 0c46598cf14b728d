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

//! Little-endian byte buffers used by the estimator snapshot format.

use std::io;
use std::io::Cursor;

use byteorder::ByteOrder;
use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

pub(crate) mod assert;
pub(crate) mod family;

pub(crate) struct SnapshotBytes {
    bytes: Vec<u8>,
}

impl SnapshotBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write(&mut self, buf: &[u8]) {
        self.bytes.extend_from_slice(buf);
    }

    pub fn write_u8(&mut self, n: u8) {
        self.bytes.push(n);
    }

    pub fn write_u16_le(&mut self, n: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_u32_le(&mut self, n: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, n);
        self.write(&buf);
    }

    pub fn write_f64_le(&mut self, n: f64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, n);
        self.write(&buf);
    }
}

pub(crate) struct SnapshotSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl<'a> SnapshotSlice<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        SnapshotSlice {
            slice: Cursor::new(slice),
        }
    }

    /// Number of bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len() as u64;
        len.saturating_sub(self.slice.position()) as usize
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        self.slice.read_u8()
    }

    pub fn read_u16_le(&mut self) -> io::Result<u16> {
        self.slice.read_u16::<LittleEndian>()
    }

    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.slice.read_u32::<LittleEndian>()
    }

    pub fn read_f64_le(&mut self) -> io::Result<f64> {
        self.slice.read_f64::<LittleEndian>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_read() {
        let mut bytes = SnapshotBytes::with_capacity(15);
        bytes.write_u8(7);
        bytes.write_u16_le(0x0102);
        bytes.write_u32_le(20);
        bytes.write_f64_le(-0.1);
        let bytes = bytes.into_bytes();
        assert_eq!(bytes.len(), 15);
        assert_eq!(&bytes[1..3], &[0x02, 0x01]);

        let mut cursor = SnapshotSlice::new(&bytes);
        assert_eq!(cursor.read_u8().unwrap(), 7);
        assert_eq!(cursor.read_u16_le().unwrap(), 0x0102);
        assert_eq!(cursor.read_u32_le().unwrap(), 20);
        assert_eq!(cursor.remaining(), 8);
        assert_eq!(cursor.read_f64_le().unwrap(), -0.1);
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.read_u8().is_err());
    }
}
