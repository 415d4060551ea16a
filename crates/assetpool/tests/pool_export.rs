//! End-to-end pool walks against a mock address space.

use assetpool::{
    AssetPool, AssetRegistry, AssetSchema, Error, ExportOutcome, FieldContext, FieldKind,
    FieldMetadata, MockMemoryBuilder, MockMemoryReader, PoolTable, ReadMemory, RecordStore,
    Value, physpreset_schema, read_descriptor, ttf_schema,
};

const BASE: u64 = 0x1_4000_0000;
const TABLE_OFFSET: u64 = 0x9_0000;

const PHYS_POOL: u64 = 0x2000_0000;
const PHYS_STRIDE: u32 = 0x78;
const TTF_POOL: u64 = 0x2100_0000;
const TTF_STRIDE: u32 = 0x18;

const STRINGS: u64 = 0x3000_0000;
const FONT_DATA: u64 = 0x3100_0000;

fn table() -> PoolTable {
    PoolTable {
        table_offset: TABLE_OFFSET,
        descriptor_stride: 0x20,
        pool_count: Some(128),
    }
}

fn write_descriptor(mem: &mut MockMemoryReader, index: u64, start: u64, stride: u32, count: u32) {
    let addr = BASE + TABLE_OFFSET + index * 0x20;
    mem.write_u64(addr, start);
    mem.write(addr + 8, &stride.to_le_bytes());
    mem.write(addr + 12, &count.to_le_bytes());
}

/// Four physpreset slots (one empty by zero, one pointing into the pool) and
/// one ttf slot.
fn process() -> MockMemoryReader {
    let mut mem = MockMemoryBuilder::new()
        .with_zeroed(PHYS_POOL, PHYS_STRIDE as usize * 4)
        .with_zeroed(TTF_POOL, TTF_STRIDE as usize)
        .with_cstring(STRINGS, "default")
        .with_cstring(STRINGS + 0x100, "wood")
        .with_cstring(STRINGS + 0x200, "fonts/main.ttf")
        .with_bytes(FONT_DATA, b"\x00\x01\x00\x00OTTO-font-bytes")
        .build();

    write_descriptor(&mut mem, 0, PHYS_POOL, PHYS_STRIDE, 4);
    write_descriptor(&mut mem, 80, TTF_POOL, TTF_STRIDE, 1);

    let slot = |i: u64| PHYS_POOL + i * u64::from(PHYS_STRIDE);

    mem.write_u64(slot(0), STRINGS);
    mem.write(slot(0) + 0xc, &0.005f32.to_le_bytes());
    mem.write(slot(0) + 0x10, &0.4f32.to_le_bytes());

    // Freed slot: identity points at the pool start
    mem.write_u64(slot(1), PHYS_POOL);

    mem.write_u64(slot(2), 0);

    mem.write_u64(slot(3), STRINGS + 0x100);
    mem.write(slot(3) + 0xc, &0.02f32.to_le_bytes());

    mem.write_u64(TTF_POOL, STRINGS + 0x200);
    mem.write(TTF_POOL + 8, &19i64.to_le_bytes());
    mem.write_u64(TTF_POOL + 0x10, FONT_DATA);

    mem
}

#[test]
fn test_enumerate_physpreset_pool() {
    let mem = process();
    let schema = physpreset_schema();
    let pool = AssetPool::open(&mem, BASE, &table(), &schema).unwrap();

    assert_eq!(pool.descriptor().slot_count, 4);
    assert_eq!(
        pool.descriptor().end_address(),
        PHYS_POOL + 4 * u64::from(PHYS_STRIDE)
    );

    let handles = pool.load(&mem);
    let names: Vec<_> = handles.iter().map(|h| h.display_name.as_str()).collect();
    assert_eq!(names, ["default", "wood"]);

    let desc = pool.descriptor();
    for handle in &handles {
        assert_ne!(handle.identity_address, 0);
        assert!(!desc.is_empty_slot(handle.identity_address));
        assert_eq!(handle.size, PHYS_STRIDE);
    }
}

#[test]
fn test_export_physpreset_mass_is_rescaled() {
    let mem = process();
    let schema = physpreset_schema();
    let pool = AssetPool::open(&mem, BASE, &table(), &schema).unwrap();
    let handles = pool.load(&mem);

    let mut store = RecordStore::new();
    for handle in &handles {
        assert_eq!(
            pool.export(&mem, handle, &mut store).unwrap(),
            ExportOutcome::Success
        );
    }

    let default = store.get("physpreset", "default").unwrap();
    let mass = default.get("mass").and_then(Value::as_f32).unwrap();
    assert!((mass - 5.0).abs() < 1e-4);

    let wood = store.get("physpreset", "wood").unwrap();
    let mass = wood.get("mass").and_then(Value::as_f32).unwrap();
    assert!((mass - 20.0).abs() < 1e-3);

    // Only declared names ever appear
    for (_, record) in store.records("physpreset") {
        for name in record.names() {
            assert!(schema.field(name).is_some(), "unexpected field {}", name);
        }
    }
}

#[test]
fn test_export_is_repeatable() {
    let mem = process();
    let schema = physpreset_schema();
    let pool = AssetPool::open(&mem, BASE, &table(), &schema).unwrap();
    let handle = &pool.load(&mem)[0];

    let mut first = RecordStore::new();
    let mut second = RecordStore::new();
    pool.export(&mem, handle, &mut first).unwrap();
    pool.export(&mem, handle, &mut second).unwrap();

    assert_eq!(
        first.get("physpreset", "default"),
        second.get("physpreset", "default")
    );
}

#[test]
fn test_mutated_identity_reports_memory_changed() {
    let mut mem = process();
    let schema = physpreset_schema();
    let table = table();

    let handles = {
        let pool = AssetPool::open(&mem, BASE, &table, &schema).unwrap();
        pool.load(&mem)
    };

    // Slot reused for another asset after enumeration
    mem.write_cstring(STRINGS, "metal");

    let pool = AssetPool::open(&mem, BASE, &table, &schema).unwrap();
    let mut store = RecordStore::new();
    let outcome = pool.export(&mem, &handles[0], &mut store).unwrap();

    assert_eq!(outcome, ExportOutcome::MemoryChanged);
    assert!(store.is_empty());

    // The untouched slot still exports
    let outcome = pool.export(&mem, &handles[1], &mut store).unwrap();
    assert_eq!(outcome, ExportOutcome::Success);
}

#[test]
fn test_freed_slot_reports_memory_changed() {
    let mut mem = process();
    let schema = physpreset_schema();
    let pool = AssetPool::open(&mem, BASE, &table(), &schema).unwrap();
    let handles = pool.load(&mem);

    mem.write_u64(PHYS_POOL, 0);

    let mut store = RecordStore::new();
    let outcome = pool.export(&mem, &handles[0], &mut store).unwrap();
    assert_eq!(outcome, ExportOutcome::MemoryChanged);
}

#[test]
fn test_export_ttf_blob() {
    let mem = process();
    let schema = ttf_schema();
    let pool = AssetPool::open(&mem, BASE, &table(), &schema).unwrap();
    let handles = pool.load(&mem);

    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].display_name, "fonts/main.ttf");
    assert_eq!(handles[0].information, "Size: 0x13");

    let mut store = RecordStore::new();
    pool.export(&mem, &handles[0], &mut store).unwrap();

    let record = store.get("ttf", "fonts/main.ttf").unwrap();
    let data = record.get("data").and_then(Value::as_bytes).unwrap();
    assert_eq!(data.len(), 19);
    assert_eq!(data, &mem.read_bytes(FONT_DATA, 19).unwrap()[..]);
    assert_eq!(record.get("size"), Some(&Value::Int64(19)));
}

#[test]
fn test_invalid_pool_index_yields_no_descriptor() {
    let mem = process();
    let schema = AssetSchema::new(
        "bogus",
        500,
        vec![FieldMetadata::new("name", 0, FieldKind::String)],
    );

    assert!(matches!(
        AssetPool::open(&mem, BASE, &table(), &schema),
        Err(Error::InvalidPoolIndex(500))
    ));

    // Without a pool count the unmapped descriptor read fails instead
    let open_table = PoolTable {
        pool_count: None,
        ..table()
    };
    let err = read_descriptor(&mem, BASE, &open_table, 500).unwrap_err();
    assert!(err.is_read_failure());
}

fn claim_floats(
    ctx: &FieldContext<'_>,
    _reader: &dyn ReadMemory,
) -> assetpool::Result<Option<Value>> {
    match ctx.field.kind {
        FieldKind::Float => Ok(Some(Value::String("claimed".into()))),
        _ => Ok(None),
    }
}

#[test]
fn test_override_hook_wins() {
    let mem = process();
    let schema = AssetSchema::new(
        "physpreset",
        0,
        vec![
            FieldMetadata::new("name", 0, FieldKind::String),
            FieldMetadata::new("bounce", 0x10, FieldKind::Float),
        ],
    )
    .with_hook(claim_floats);

    let pool = AssetPool::open(&mem, BASE, &table(), &schema).unwrap();
    let handles = pool.load(&mem);
    let mut store = RecordStore::new();
    pool.export(&mem, &handles[0], &mut store).unwrap();

    let record = store.get("physpreset", "default").unwrap();
    assert_eq!(record.get("bounce"), Some(&Value::String("claimed".into())));
}

#[test]
fn test_registry_drives_all_pools() {
    let mem = process();
    let registry = AssetRegistry::builtin();
    let schemas: Vec<_> = registry.iter().collect();

    let loaded = assetpool::load_pools(&mem, BASE, &table(), &schemas);
    let counts: Vec<_> = loaded
        .iter()
        .map(|p| p.result.as_ref().map(|(_, h)| h.len()).unwrap_or(0))
        .collect();
    assert_eq!(counts, [2, 1]);
}
