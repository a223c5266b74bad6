#![allow(dead_code)]

use std::cmp::Ordering;

pub const INT: usize = std::mem::size_of::<i32>();

pub fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

pub fn int(value: i32) -> [u8; INT] {
    value.to_ne_bytes()
}

pub fn read_int(bytes: &[u8]) -> i32 {
    i32::from_ne_bytes(bytes.try_into().unwrap())
}

pub fn compare_ints(a: &[u8], b: &[u8]) -> Ordering {
    read_int(a).cmp(&read_int(b))
}
