// Tape behavior shared by every memory implementation

use bftty::memory::{
    ContiguousMemory, Dump, Memory, MemoryConfig, MemoryError, Overflow, SparseMemory,
};

fn tapes(config: MemoryConfig) -> Vec<Box<dyn Memory>> {
    vec![
        Box::new(SparseMemory::new(config).unwrap()),
        Box::new(ContiguousMemory::new(config).unwrap()),
    ]
}

#[test]
fn test_fresh_cells_read_zero() {
    for memory in tapes(MemoryConfig::default()) {
        assert_eq!(memory.get(0), Ok(0));
        assert_eq!(memory.get(29_999), Ok(0));
        assert_eq!(memory.extent(), 0);
    }
}

#[test]
fn test_out_of_range_access() {
    let config = MemoryConfig::default().with_memsize(Some(8));
    for mut memory in tapes(config) {
        let expected = Err(MemoryError::OutOfRange {
            index: 8,
            memsize: Some(8),
        });
        assert_eq!(memory.get(8), expected);
        assert_eq!(memory.set(8, 1), Err(MemoryError::OutOfRange {
            index: 8,
            memsize: Some(8),
        }));
        assert!(memory.reset(8).is_err());
    }
}

#[test]
fn test_wrap_normalizes_every_write() {
    for mut memory in tapes(MemoryConfig::default()) {
        memory.set(0, 256).unwrap();
        memory.set(1, -1).unwrap();
        memory.set(2, 513).unwrap();
        assert_eq!(memory.get(0), Ok(0));
        assert_eq!(memory.get(1), Ok(255));
        assert_eq!(memory.get(2), Ok(1));
    }
}

#[test]
fn test_clamp_saturates_every_write() {
    let config = MemoryConfig::default()
        .with_cellsize(Some(16))
        .with_overflow(Overflow::Clamp);
    for mut memory in tapes(config) {
        memory.set(0, 100).unwrap();
        memory.set(1, -100).unwrap();
        assert_eq!(memory.get(0), Ok(15));
        assert_eq!(memory.get(1), Ok(0));
        assert_eq!(memory.overflow(), Overflow::Clamp);
        assert_eq!(memory.cellsize(), Some(16));
    }
}

#[test]
fn test_reset_and_extent() {
    for mut memory in tapes(MemoryConfig::default()) {
        memory.set(3, 7).unwrap();
        memory.set(40, 1).unwrap();
        assert_eq!(memory.extent(), 41);

        memory.reset(40).unwrap();
        assert_eq!(memory.get(40), Ok(0));
        assert_eq!(memory.extent(), 4);
    }
}

#[test]
fn test_invalid_configurations() {
    let empty = MemoryConfig::default().with_memsize(Some(0));
    assert_eq!(SparseMemory::new(empty).unwrap_err(), MemoryError::EmptyTape);
    assert_eq!(
        ContiguousMemory::new(empty).unwrap_err(),
        MemoryError::EmptyTape
    );

    let zero_width = MemoryConfig::default().with_cellsize(Some(0));
    assert!(SparseMemory::new(zero_width).is_err());
    assert!(ContiguousMemory::new(zero_width).is_err());
}

#[test]
fn test_sparse_tape_is_sparse() {
    let config = MemoryConfig::default()
        .with_memsize(None)
        .with_cellsize(None);
    let mut memory = SparseMemory::new(config).unwrap();

    memory.set(1 << 40, 12_345_678).unwrap();
    memory.set(7, -9).unwrap();
    memory.set(7, 0).unwrap();

    assert_eq!(memory.len(), 1);
    assert_eq!(memory.get(1 << 40), Ok(12_345_678));
    assert_eq!(memory.extent(), (1 << 40) + 1);
}

#[test]
fn test_contiguous_runs() {
    let mut memory = ContiguousMemory::default();
    memory.write_run(10, &[72, 105, 256, -1]).unwrap();
    assert_eq!(&*memory.read_run(10, 4).unwrap(), &[72, 105, 0, 255]);

    // A failing run leaves the tape untouched
    assert!(memory.write_run(29_998, &[1, 2, 3]).is_err());
    assert_eq!(memory.get(29_998), Ok(0));
}

#[test]
fn test_dump_is_identical_across_tapes() {
    let dumps: Vec<String> = tapes(MemoryConfig::default())
        .into_iter()
        .map(|mut memory| {
            memory.set(0, 0x48).unwrap();
            memory.set(100, 0x21).unwrap();
            Dump(&*memory).to_string()
        })
        .collect();

    assert_eq!(dumps[0], dumps[1]);
    assert!(dumps[0].starts_with("Memory[30000]{\n  48 00"));
    assert!(dumps[0].contains("... 5 null rows ..."));
    assert!(dumps[0].ends_with("}"));
}
