#![allow(dead_code)]

use std::cmp::Ordering;
use std::mem::{offset_of, size_of};

use dtable::ColumnDesc;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub id: i32,
    pub value: f32,
}

pub const SAMPLE_SIZE: usize = size_of::<Sample>();

pub static SAMPLE_COLUMNS: [ColumnDesc; 2] = [
    ColumnDesc::new(offset_of!(Sample, id), size_of::<i32>()),
    ColumnDesc::new(offset_of!(Sample, value), size_of::<f32>()),
];

pub fn row(id: i32, value: f32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(SAMPLE_SIZE);
    bytes.extend_from_slice(&id.to_ne_bytes());
    bytes.extend_from_slice(&value.to_ne_bytes());
    bytes
}

pub fn rows(samples: &[(i32, f32)]) -> Vec<u8> {
    samples.iter().flat_map(|&(id, value)| row(id, value)).collect()
}

pub fn read_sample(bytes: &[u8]) -> Sample {
    Sample {
        id: i32::from_ne_bytes(bytes[0..4].try_into().unwrap()),
        value: f32::from_ne_bytes(bytes[4..8].try_into().unwrap()),
    }
}

pub fn read_int(bytes: &[u8]) -> i32 {
    i32::from_ne_bytes(bytes.try_into().unwrap())
}

pub fn read_float(bytes: &[u8]) -> f32 {
    f32::from_ne_bytes(bytes.try_into().unwrap())
}

pub fn compare_ints(a: &[u8], b: &[u8]) -> Ordering {
    read_int(a).cmp(&read_int(b))
}

pub fn compare_floats(a: &[u8], b: &[u8]) -> Ordering {
    read_float(a).total_cmp(&read_float(b))
}

pub fn ids(table: &dtable::DTable<'_>) -> Vec<i32> {
    table.rows().map(|r| read_sample(r).id).collect()
}
