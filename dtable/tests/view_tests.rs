mod common;

use common::{compare_ints, ids, read_int, row, rows, SAMPLE_COLUMNS, SAMPLE_SIZE};
use dtable::{DTable, DTableError, TableFlags, DEFAULT_CAPACITY};

const GUARD: u8 = 0xA5;

fn memory_with_guard(samples: &[(i32, f32)]) -> Vec<u8> {
    let mut memory = rows(samples);
    memory.push(GUARD);
    memory
}

#[test]
fn test_view_does_not_allocate() {
    let mut memory = rows(&[(1, 1.0), (2, 2.0)]);
    let table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();

    assert!(table.is_view());
    assert_eq!(table.flags(), TableFlags::empty());
    assert_eq!(table.capacity(), 0);
    assert_eq!(table.len(), 2);
    assert_eq!(ids(&table), vec![1, 2]);
}

#[test]
fn test_view_rejects_partial_row() {
    let mut memory = vec![0u8; SAMPLE_SIZE + 3];
    assert_eq!(
        DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap_err(),
        DTableError::RowSizeMismatch {
            expected: SAMPLE_SIZE,
            actual: SAMPLE_SIZE + 3
        }
    );
}

#[test]
fn test_empty_view() {
    let mut memory: Vec<u8> = Vec::new();
    let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
    assert!(table.is_empty());

    table.push_row(&row(1, 1.0)).unwrap();
    assert!(!table.is_view());
    assert_eq!(table.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn test_push_promotes_and_leaves_caller_memory() {
    let mut memory = memory_with_guard(&[(1, 1.0), (2, 2.0)]);
    let original = memory.clone();
    let used = memory.len() - 1;

    {
        let mut table =
            DTable::view(&mut memory[..used], &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
        table.push_row(&row(3, 3.0)).unwrap();
        table.set_cell(0, 0, &10i32.to_ne_bytes()).unwrap();

        assert_eq!(table.flags(), TableFlags::OWNS_DATA);
        assert_eq!(ids(&table), vec![10, 2, 3]);
    }

    assert_eq!(memory, original);
    assert_eq!(memory[used], GUARD);
}

#[test]
fn test_remove_promotes() {
    let mut memory = rows(&[(1, 1.0), (2, 2.0), (3, 3.0)]);
    let original = memory.clone();

    {
        let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
        table.remove_row(0).unwrap();
        assert!(!table.is_view());
        assert_eq!(ids(&table), vec![2, 3]);
    }

    assert_eq!(memory, original);
}

#[test]
fn test_failed_remove_keeps_view() {
    let mut memory = rows(&[(1, 1.0)]);
    let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();

    assert!(table.remove_row(5).is_err());
    assert!(table.push_row(&[0u8; 3]).is_err());
    assert!(table.is_view());
}

#[test]
fn test_cell_writes_stay_in_place() {
    let mut memory = rows(&[(1, 1.0), (2, 2.0)]);

    {
        let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
        table.set_cell(1, 0, &20i32.to_ne_bytes()).unwrap();
        assert!(table.is_view());
    }

    assert_eq!(read_int(&memory[SAMPLE_SIZE..SAMPLE_SIZE + 4]), 20);
}

#[test]
fn test_sort_view_in_place() {
    let mut memory = rows(&[(3, 0.0), (1, 0.0), (2, 0.0)]);

    {
        let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
        table.sort_by_column(0, compare_ints).unwrap();
        assert!(table.is_view());
    }

    assert_eq!(memory, rows(&[(1, 0.0), (2, 0.0), (3, 0.0)]));
}

#[test]
fn test_promote_is_one_way() {
    let mut memory = rows(&[(1, 1.0)]);
    let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();

    table.promote().unwrap();
    let capacity = table.capacity();
    table.promote().unwrap();

    assert!(!table.is_view());
    assert_eq!(table.capacity(), capacity);
    table.clear();
    assert!(!table.is_view());
}

#[test]
fn test_reserve_promotes_with_requested_capacity() {
    let mut memory = rows(&[(1, 1.0)]);
    let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();

    table.reserve(100).unwrap();

    assert_eq!(table.capacity(), 100);
    assert_eq!(ids(&table), vec![1]);
}

#[test]
fn test_pop_promotes() {
    let mut memory = rows(&[(1, 1.0), (2, 2.0)]);
    let original = memory.clone();

    {
        let mut table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
        table.pop_row(None).unwrap();
        assert_eq!(ids(&table), vec![1]);
        assert!(!table.is_view());
    }

    assert_eq!(memory, original);
}

#[test]
fn test_deep_copy_of_view() {
    let mut memory = rows(&[(1, 1.0), (2, 2.0)]);
    let copy = {
        let table = DTable::view(&mut memory, &SAMPLE_COLUMNS, SAMPLE_SIZE).unwrap();
        table.deep_copy().unwrap()
    };
    memory.fill(0);

    assert_eq!(ids(&copy), vec![1, 2]);
}
