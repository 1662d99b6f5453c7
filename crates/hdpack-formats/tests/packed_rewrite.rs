#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for rewriting packed archives
//!
//! Builds archives through the public API, replaces variant buffers with
//! payloads of different sizes and checks that everything else survives the
//! trip through the chunked envelope byte for byte.

use hdpack_formats::packed::{HEADER_BLOCK_SIZE, HeaderBlock, PackedType};
use hdpack_formats::{
    Archive, ArchiveVersion, KnownType, PackedArchive, PackedFile, ScriptFormat, ScriptResource,
    TYPE_LUA, Variant, chunked, name_hash,
};

fn script(name: &str, body: &[u8]) -> PackedFile {
    let envelope = ScriptResource::new(ScriptFormat::LuaJit2, body.to_vec())
        .build()
        .expect("envelope");
    PackedFile {
        type_hash: TYPE_LUA,
        name_hash: name_hash(name),
        stream_offset: 0,
        variants: vec![Variant::new(1, 0, envelope), Variant::new(2, 9, b"debug info".to_vec())],
    }
}

fn texture(name: &str, size: usize) -> PackedFile {
    PackedFile {
        type_hash: KnownType::Texture.hash(),
        name_hash: name_hash(name),
        stream_offset: 0x1000,
        variants: vec![Variant::new(0, 0, (0..size).map(|i| (i * 31 % 256) as u8).collect())],
    }
}

fn archive(files: Vec<PackedFile>) -> PackedArchive {
    let mut header = HeaderBlock::default();
    header.0[0..4].copy_from_slice(b"HDR!");
    header.0[255] = 0x7F;
    PackedArchive {
        header,
        types: files
            .iter()
            .map(|f| PackedType {
                type_hash: f.type_hash,
                name_hash: f.name_hash,
            })
            .collect(),
        files,
    }
}

#[test]
fn replaced_variant_leaves_siblings_untouched() {
    let original = archive(vec![
        texture("textures/sky", 200_000),
        script("scripts/main.lua", b"old-script"),
        texture("textures/ground", 70_000),
    ]);
    let bytes = original.build().expect("build");

    let mut parsed = PackedArchive::parse(&bytes).expect("parse");
    let compiled = ScriptResource::new(ScriptFormat::LuaJit2, vec![0x1B, 0x4C, 0x4A, 0x02, 9, 9])
        .build()
        .expect("envelope");
    let previous = parsed.files[1].replace_variant(0, compiled.clone());
    assert!(previous.is_some());

    let rebuilt = PackedArchive::parse(&parsed.build().expect("rebuild")).expect("reparse");
    assert_eq!(rebuilt.header, original.header);
    assert_eq!(rebuilt.types, original.types);
    assert_eq!(rebuilt.files[0], original.files[0]);
    assert_eq!(rebuilt.files[2], original.files[2]);

    let script_file = &rebuilt.files[1];
    assert_eq!(script_file.variants.len(), 2);
    assert_eq!(script_file.variants[0].data, compiled);
    assert_eq!(script_file.variants[0].header.size as usize, compiled.len());
    assert_eq!(script_file.variants[0].header.unknown, 1);
    assert_eq!(script_file.variants[1], original.files[1].variants[1]);

    let resource = ScriptResource::parse(&script_file.variants[0].data).expect("resource");
    assert_eq!(resource.format, ScriptFormat::LuaJit2);
    assert_eq!(resource.data, vec![0x1B, 0x4C, 0x4A, 0x02, 9, 9]);
}

#[test]
fn added_variant_updates_count() {
    let mut original = archive(vec![script("a.lua", b"x")]);
    original.files[0]
        .variants
        .push(Variant::new(3, 0, b"extra".to_vec()));
    let parsed = PackedArchive::parse(&original.build().expect("build")).expect("parse");
    assert_eq!(parsed.files[0].variants.len(), 3);
    assert_eq!(parsed.files[0].variants[2].data, b"extra");
}

#[test]
fn large_archive_spans_many_chunks() {
    let original = archive(
        (0..8)
            .map(|i| texture(&format!("textures/{i}"), 50_000))
            .collect(),
    );
    let bytes = original.build().expect("build");
    let envelope = chunked::ChunkEnvelope::parse(&bytes).expect("envelope");
    assert!(envelope.chunks.len() > 6);
    assert_eq!(
        envelope.declared_size as usize,
        original.build_exploded().expect("exploded").len()
    );

    match Archive::parse(&bytes).expect("facade") {
        Archive::Packed(parsed) => assert_eq!(parsed, original),
        Archive::Direct(_) => panic!("expected a packed archive"),
    }
}

#[test]
fn file_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("00000000DEADBEEF");
    let original = archive(vec![script("boot.lua", b"print('hi')")]);
    std::fs::write(&path, original.build().expect("build")).expect("write");

    let archive = Archive::from_file(&path).expect("read");
    assert_eq!(archive.version(), ArchiveVersion::Packed);
    let files = archive.files();
    let resource = ScriptResource::parse(&files[0].inline_buffer()).expect("resource");
    assert_eq!(resource.data, b"print('hi')");
}

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::TestCaseError;

    fn variant() -> impl Strategy<Value = Variant> {
        (
            any::<u32>(),
            any::<u32>(),
            prop::collection::vec(any::<u8>(), 0..512),
        )
            .prop_map(|(unknown, stream_size, data)| Variant::new(unknown, stream_size, data))
    }

    fn packed_file() -> impl Strategy<Value = PackedFile> {
        (
            any::<u64>(),
            any::<u64>(),
            any::<u32>(),
            prop::collection::vec(variant(), 0..4),
        )
            .prop_map(|(type_hash, name_hash, stream_offset, variants)| PackedFile {
                type_hash,
                name_hash,
                stream_offset,
                variants,
            })
    }

    fn packed_archive() -> impl Strategy<Value = PackedArchive> {
        (
            prop::collection::vec(any::<u8>(), HEADER_BLOCK_SIZE),
            prop::collection::vec(packed_file(), 0..6),
        )
            .prop_map(|(header, files)| {
                let mut block = HeaderBlock::default();
                block.0.copy_from_slice(&header);
                PackedArchive {
                    header: block,
                    types: files
                        .iter()
                        .map(|f| PackedType {
                            type_hash: f.type_hash,
                            name_hash: f.name_hash,
                        })
                        .collect(),
                    files,
                }
            })
    }

    fn fail(e: impl std::fmt::Display) -> TestCaseError {
        TestCaseError::fail(e.to_string())
    }

    proptest! {
        #[test]
        fn decode_encode_decode_is_stable(original in packed_archive()) {
            let bytes = original.build().map_err(fail)?;
            let parsed = PackedArchive::parse(&bytes).map_err(fail)?;
            prop_assert_eq!(&parsed, &original);

            let rebuilt = parsed.build().map_err(fail)?;
            prop_assert_eq!(&rebuilt, &bytes);
            prop_assert_eq!(PackedArchive::parse(&rebuilt).map_err(fail)?, parsed);
        }

        #[test]
        fn replaced_variant_survives_with_siblings(
            original in packed_archive(),
            pick in any::<prop::sample::Index>(),
            replacement in prop::collection::vec(any::<u8>(), 0..2048)
        ) {
            let slots: Vec<(usize, usize)> = original
                .files
                .iter()
                .enumerate()
                .flat_map(|(f, file)| (0..file.variants.len()).map(move |v| (f, v)))
                .collect();
            prop_assume!(!slots.is_empty());
            let (file_index, variant_index) = slots[pick.index(slots.len())];

            let mut patched = original.clone();
            patched.files[file_index].replace_variant(variant_index, replacement.clone());
            let parsed = PackedArchive::parse(&patched.build().map_err(fail)?).map_err(fail)?;

            prop_assert_eq!(&parsed.header, &original.header);
            prop_assert_eq!(&parsed.types, &original.types);
            for (f, (got, before)) in parsed.files.iter().zip(&original.files).enumerate() {
                prop_assert_eq!(got.variants.len(), before.variants.len());
                for (v, (got, before)) in got.variants.iter().zip(&before.variants).enumerate() {
                    let expected = if (f, v) == (file_index, variant_index) {
                        &replacement
                    } else {
                        &before.data
                    };
                    prop_assert_eq!(&got.data, expected);
                    prop_assert_eq!(got.header.size as usize, expected.len());
                    prop_assert_eq!(got.header.unknown, before.header.unknown);
                }
            }
        }
    }
}
