mod common;

use common::{
    compare_floats, compare_ints, ids, read_float, read_int, read_sample, row, rows, Sample,
    SAMPLE_COLUMNS, SAMPLE_SIZE,
};
use dtable::{ColumnDesc, DTable, DTableError, GrowthFactor, TableFlags, DEFAULT_CAPACITY};

fn sample_table() -> DTable<'static> {
    let mut table = DTable::new(&SAMPLE_COLUMNS, SAMPLE_SIZE, 4).unwrap();
    table.push_row(&row(1, 1.0)).unwrap();
    table.push_row(&row(2, 2.0)).unwrap();
    table.push_row(&row(3, 3.0)).unwrap();
    table
}

#[test]
fn test_new_table() {
    let table = DTable::new(&SAMPLE_COLUMNS, SAMPLE_SIZE, 4).unwrap();

    assert!(table.is_empty());
    assert_eq!(table.capacity(), 4);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.struct_size(), SAMPLE_SIZE);
    assert_eq!(table.flags(), TableFlags::OWNS_DATA);
}

#[test]
fn test_new_zero_capacity_uses_default() {
    let table = DTable::new(&SAMPLE_COLUMNS, SAMPLE_SIZE, 0).unwrap();
    assert_eq!(table.capacity(), DEFAULT_CAPACITY);
}

#[test]
fn test_new_rejects_zero_row_size() {
    assert!(matches!(
        DTable::new(&SAMPLE_COLUMNS, 0, 4),
        Err(DTableError::InvalidLayout { .. })
    ));
}

#[test]
fn test_owned_columns() {
    let columns = vec![ColumnDesc::new(0, 4), ColumnDesc::new(4, 4)];
    let table = DTable::new_with_owned_columns(&columns, SAMPLE_SIZE, 2).unwrap();
    drop(columns);

    assert_eq!(
        table.flags(),
        TableFlags::OWNS_DATA | TableFlags::OWNS_DESCS
    );
    assert_eq!(table.columns()[1], ColumnDesc::new(4, 4));
}

#[test]
fn test_push_and_remove_row() {
    let mut table = sample_table();
    assert_eq!(table.len(), 3);

    table.remove_row(1).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(
        read_sample(table.row(0).unwrap()),
        Sample { id: 1, value: 1.0 }
    );
    assert_eq!(
        read_sample(table.row(1).unwrap()),
        Sample { id: 3, value: 3.0 }
    );
}

#[test]
fn test_push_row_wrong_size() {
    let mut table = sample_table();
    assert_eq!(
        table.push_row(&[0u8; 5]),
        Err(DTableError::RowSizeMismatch {
            expected: SAMPLE_SIZE,
            actual: 5
        })
    );
    assert_eq!(table.len(), 3);
}

#[test]
fn test_push_rows_and_growth() {
    let mut table = DTable::new(&SAMPLE_COLUMNS, SAMPLE_SIZE, 2).unwrap();
    let many: Vec<(i32, f32)> = (0..40).map(|i| (i, i as f32)).collect();

    table.push_rows(&rows(&many)).unwrap();

    assert_eq!(table.len(), 40);
    assert!(table.capacity() >= 40);
    assert_eq!(ids(&table), (0..40).collect::<Vec<_>>());
}

#[test]
fn test_custom_growth() {
    let mut table = DTable::new(&SAMPLE_COLUMNS, SAMPLE_SIZE, 16)
        .unwrap()
        .with_growth(GrowthFactor::new(2, 1).unwrap());
    for i in 0..17 {
        table.push_row(&row(i, 0.0)).unwrap();
    }
    assert_eq!(table.capacity(), 32);
}

#[test]
fn test_push_row_empty() {
    let mut table = sample_table();
    table.push_row_empty().unwrap();

    assert_eq!(table.len(), 4);
    assert_eq!(table.row(-1).unwrap(), &[0u8; SAMPLE_SIZE][..]);
}

#[test]
fn test_insert_rows() {
    let mut table = sample_table();

    table.insert_row(0, &row(0, 0.0)).unwrap();
    table.insert_row(-1, &row(9, 9.0)).unwrap();
    table.insert_rows(5, &rows(&[(10, 0.0), (11, 0.0)])).unwrap();

    assert_eq!(ids(&table), vec![0, 1, 2, 9, 3, 10, 11]);
    assert!(matches!(
        table.insert_row(99, &row(0, 0.0)),
        Err(DTableError::Buffer(_))
    ));
}

#[test]
fn test_remove_rows_inclusive() {
    let mut table = sample_table();
    table.push_row(&row(4, 4.0)).unwrap();

    table.remove_rows(1, -2).unwrap();

    assert_eq!(ids(&table), vec![1, 4]);
}

#[test]
fn test_pop_row() {
    let mut table = sample_table();
    let mut out = [0u8; SAMPLE_SIZE];

    table.pop_row(Some(&mut out)).unwrap();
    table.pop_row(None).unwrap();

    assert_eq!(read_sample(&out), Sample { id: 3, value: 3.0 });
    assert_eq!(ids(&table), vec![1]);

    table.pop_row(None).unwrap();
    assert_eq!(table.pop_row(None), Err(DTableError::EmptyTable));
}

#[test]
fn test_clear_keeps_capacity() {
    let mut table = sample_table();
    let capacity = table.capacity();

    table.clear();

    assert!(table.is_empty());
    assert_eq!(table.capacity(), capacity);
}

#[test]
fn test_shrink_to_fit() {
    let mut table = sample_table();
    table.reserve(64).unwrap();
    assert_eq!(table.capacity(), 64);

    table.shrink_to_fit().unwrap();
    assert_eq!(table.capacity(), 3);
    assert_eq!(ids(&table), vec![1, 2, 3]);
}

#[test]
fn test_get_and_set_row() {
    let mut table = sample_table();
    let mut out = [0u8; SAMPLE_SIZE];

    table.set_row(-1, &row(30, 0.5)).unwrap();
    table.get_row(2, &mut out).unwrap();

    assert_eq!(read_sample(&out), Sample { id: 30, value: 0.5 });
    assert!(table.get_row(3, &mut out).is_err());
}

#[test]
fn test_cells() {
    let mut table = sample_table();

    assert_eq!(read_int(table.cell(1, 0).unwrap()), 2);
    assert_eq!(read_float(table.cell(-1, -1).unwrap()), 3.0);

    table.set_cell(0, 1, &7.5f32.to_ne_bytes()).unwrap();
    let mut out = [0u8; 4];
    table.get_cell(0, 1, &mut out).unwrap();
    assert_eq!(f32::from_ne_bytes(out), 7.5);

    table.cell_mut(2, 0).unwrap().copy_from_slice(&42i32.to_ne_bytes());
    assert_eq!(read_sample(table.row(2).unwrap()).id, 42);
}

#[test]
fn test_cell_errors() {
    let mut table = sample_table();

    assert!(matches!(table.cell(3, 0), Err(DTableError::Buffer(_))));
    assert!(matches!(table.cell(0, 2), Err(DTableError::Buffer(_))));
    assert_eq!(
        table.set_cell(0, 0, &[1, 2]),
        Err(DTableError::CellSizeMismatch {
            column: 0,
            expected: 4,
            actual: 2
        })
    );
}

#[test]
fn test_find_row() {
    let mut table = sample_table();
    table.push_row(&row(2, 9.0)).unwrap();
    let two = 2i32.to_ne_bytes();

    assert_eq!(table.find_row(0, &two, compare_ints), Ok(Some(1)));
    assert_eq!(table.find_row_last(0, &two, compare_ints), Ok(Some(3)));
    assert_eq!(
        table.find_row(1, &5.0f32.to_ne_bytes(), compare_floats),
        Ok(None)
    );
}

#[test]
fn test_sort_by_column() {
    let mut table = DTable::from_rows(
        &rows(&[(1, 3.0), (2, 1.0), (3, 2.0)]),
        &SAMPLE_COLUMNS,
        SAMPLE_SIZE,
    )
    .unwrap();

    table.sort_by_column(1, compare_floats).unwrap();
    assert_eq!(ids(&table), vec![2, 3, 1]);

    table.sort_by_column(0, compare_ints).unwrap();
    assert_eq!(ids(&table), vec![1, 2, 3]);
}

#[test]
fn test_sort_rejects_column_outside_row() {
    static WIDE: [ColumnDesc; 1] = [ColumnDesc::new(6, 4)];
    let mut table = DTable::from_rows(&rows(&[(1, 1.0)]), &WIDE, SAMPLE_SIZE).unwrap();

    assert!(matches!(
        table.sort_by_column(0, compare_ints),
        Err(DTableError::InvalidColumn { column: 0, .. })
    ));
}

#[test]
fn test_validate() {
    let table = sample_table();
    assert!(table.validate().is_ok());

    static BROKEN: [ColumnDesc; 2] = [ColumnDesc::new(0, 4), ColumnDesc::new(6, 4)];
    let table = DTable::new(&BROKEN, SAMPLE_SIZE, 1).unwrap();
    assert_eq!(
        table.validate(),
        Err(DTableError::InvalidColumn {
            column: 1,
            offset: 6,
            element_size: 4,
            limit: SAMPLE_SIZE
        })
    );
}

#[test]
fn test_cell_may_spill_into_next_row() {
    static SPILL: [ColumnDesc; 1] = [ColumnDesc::new(6, 4)];
    let table = DTable::from_rows(&rows(&[(1, 1.0), (2, 2.0)]), &SPILL, SAMPLE_SIZE).unwrap();

    assert_eq!(table.cell(0, 0).unwrap().len(), 4);
}

#[test]
fn test_deep_copy() {
    let table = sample_table();
    let copy = table.deep_copy().unwrap();
    drop(table);

    assert_eq!(ids(&copy), vec![1, 2, 3]);
    assert_eq!(
        copy.flags(),
        TableFlags::OWNS_DATA | TableFlags::OWNS_DESCS
    );
}

#[test]
fn test_free_deep_visits_pointer_sized_cells() {
    const WORD: usize = std::mem::size_of::<usize>();
    static COLUMNS: [ColumnDesc; 2] = [ColumnDesc::new(0, WORD), ColumnDesc::new(WORD, 1)];
    let row_size = WORD + 1;

    let mut table = DTable::new(&COLUMNS, row_size, 4).unwrap();
    for word in [0usize, 11, 22] {
        let mut bytes = word.to_ne_bytes().to_vec();
        bytes.push(0xFF);
        table.push_row(&bytes).unwrap();
    }

    let mut released = Vec::new();
    table.free_deep(|word| released.push(word));

    assert_eq!(released, vec![11, 22]);
}
