mod common;

use common::{ints, read_int, INT};
use darray::{DArray, DArraySized};

#[test]
fn test_basic_iteration() {
    let array = DArray::from_slice(INT, &ints(&[1, 2, 3])).unwrap();

    let mut iter = array.iter(INT);
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next().map(read_int), Some(1));
    assert_eq!(iter.next_back().map(read_int), Some(3));
    assert_eq!(iter.next().map(read_int), Some(2));
    assert_eq!(iter.next(), None);
}

#[test]
fn test_reverse_iteration() {
    let array = DArray::from_slice(INT, &ints(&[1, 2, 3])).unwrap();
    let values: Vec<i32> = array.iter_rev(INT).map(read_int).collect();
    assert_eq!(values, vec![3, 2, 1]);
}

#[test]
fn test_iteration_stops_at_count() {
    let mut array = DArray::from_slice(INT, &ints(&[1, 2, 3])).unwrap();
    array.remove(INT, 0).unwrap();
    array.reserve(INT, 32).unwrap();

    let values: Vec<i32> = array.iter(INT).map(read_int).collect();
    assert_eq!(values, vec![2, 3]);
}

#[test]
fn test_for_loop_over_sized() {
    let array = DArraySized::from_slice(INT, &ints(&[4, 5])).unwrap();
    let mut sum = 0;
    for element in &array {
        sum += read_int(element);
    }
    assert_eq!(sum, 9);
}

#[test]
fn test_iterator_clone() {
    let array = DArraySized::from_slice(INT, &ints(&[4, 5])).unwrap();
    let iter = array.iter();
    let copy = iter.clone();
    assert_eq!(iter.count(), 2);
    assert_eq!(copy.count(), 2);
}

#[test]
fn test_empty_and_zero_size() {
    let array = DArray::new(INT, 4).unwrap();
    assert_eq!(array.iter(INT).count(), 0);
    assert_eq!(array.iter(0).count(), 0);
}
