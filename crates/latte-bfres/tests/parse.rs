//! End-to-end parsing tests over synthetic BFRES containers.

mod common;

use common::{yaz0_wrap, Fixture};
use latte_bfres::sections::{IndexFormat, PrimitiveType};
use latte_bfres::{is_bfres, BfresFile, Error, PixelFormat};
use latte_common::Endian;

#[test]
fn test_minimal_document() {
    let data = Fixture::default().build();
    let file = BfresFile::parse(&data).unwrap();

    assert_eq!(file.name(), "course");
    assert_eq!(file.version(), [3, 4, 0, 4]);
    assert_eq!(file.endian(), Endian::Big);
    assert_eq!(file.models().len(), 1);
    assert_eq!(file.textures().len(), 1);
    assert!(file.embedded_files().is_empty());

    let model = file.models().get("course_model").unwrap();
    assert_eq!(model.name(), "course_model");
    assert_eq!(model.vertex_buffers().len(), 1);
    assert_eq!(model.shapes().len(), 1);
    assert_eq!(model.materials().len(), 1);

    let shape = model.shapes().get("shape_body").unwrap();
    assert_eq!(shape.lods().len(), 1);
    let lod = shape.highest_detail().unwrap();
    assert_eq!(lod.primitive_type(), PrimitiveType::Triangles);
    assert_eq!(lod.index_format(), IndexFormat::U16BigEndian);
    assert_eq!(lod.indices(), &[0, 1, 2]);

    let material = model.material_for(shape).unwrap();
    assert_eq!(material.name(), "mat_body");
    let sampler = material.sampler("_a0").unwrap();
    assert_eq!(sampler.texture_name(), "tex_albedo");

    let texture = file.sampler_texture(sampler).unwrap();
    assert_eq!(texture.name(), "tex_albedo");
    assert_eq!((texture.width(), texture.height()), (4, 4));
    assert_eq!(texture.depth(), 1);
    assert_eq!(texture.mip_count(), 1);
    assert_eq!(texture.pixel_format(), PixelFormat::R8G8B8A8Unorm);
    assert_eq!(texture.data(), &[0x5A; 64]);
    assert!(texture.mipmap_data().is_empty());
}

#[test]
fn test_vertex_positions_decode() {
    let data = Fixture::default().build();
    let file = BfresFile::parse(&data).unwrap();

    let model = file.models().get("course_model").unwrap();
    let shape = model.shapes().get("shape_body").unwrap();
    let buffer = model.vertex_buffer_for(shape).unwrap();

    assert_eq!(buffer.vertex_count(), 3);
    let positions = buffer.positions().unwrap().unwrap();
    assert_eq!(
        positions,
        [
            [0.0, 0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
        ]
    );
    assert!(buffer.normals().is_none());
}

#[test]
fn test_index_widths_normalize_identically() {
    let expected = [
        (2u32, IndexFormat::U8),
        (0, IndexFormat::U16LittleEndian),
        (4, IndexFormat::U16BigEndian),
        (1, IndexFormat::U32LittleEndian),
        (9, IndexFormat::U32BigEndian),
    ];

    for (raw, format) in expected {
        let data = Fixture {
            index_format: raw,
            ..Fixture::default()
        }
        .build();
        let file = BfresFile::parse(&data).unwrap();

        let model = file.models().get("course_model").unwrap();
        let lod = model
            .shapes()
            .get("shape_body")
            .unwrap()
            .highest_detail()
            .unwrap();

        assert_eq!(lod.index_format(), format);
        assert_eq!(lod.indices(), &[0, 1, 2], "format {raw:#x}");
    }
}

#[test]
fn test_absent_visibility_group_offset_is_accepted() {
    let data = Fixture {
        null_visibility_offset: true,
        ..Fixture::default()
    }
    .build();
    let file = BfresFile::parse(&data).unwrap();

    let model = file.models().get("course_model").unwrap();
    let lod = model
        .shapes()
        .get("shape_body")
        .unwrap()
        .highest_detail()
        .unwrap();

    assert!(lod.visibility_groups().is_empty());
    assert_eq!(lod.indices(), &[0, 1, 2]);
}

#[test]
fn test_dangling_texture_reference_fails() {
    let data = Fixture {
        sampler_texture: "tex_missing",
        ..Fixture::default()
    }
    .build();

    let err = BfresFile::parse(&data).unwrap_err();
    assert!(matches!(
        err,
        Error::DanglingTextureReference {
            ref material,
            ref sampler,
            ref texture,
        } if material.as_str() == "mat_body"
            && sampler.as_str() == "_a0"
            && texture.as_str() == "tex_missing"
    ));
}

#[test]
fn test_unsupported_primitive_type_fails() {
    let data = Fixture {
        primitive_type: 0x99,
        ..Fixture::default()
    }
    .build();

    // Shape decoding happens inside the model group, so the error carries
    // the section context.
    let err = BfresFile::parse(&data).unwrap_err();
    match err {
        Error::Section { section, source, .. } => {
            assert_eq!(section, "FMDL");
            assert!(matches!(
                *source,
                Error::UnsupportedPrimitiveType { value: 0x99, .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_pixel_format_fails() {
    let data = Fixture {
        pixel_format: 0x999,
        ..Fixture::default()
    }
    .build();

    let err = BfresFile::parse(&data).unwrap_err();
    match err {
        Error::Section { section, source, .. } => {
            assert_eq!(section, "FTEX");
            assert!(matches!(
                *source,
                Error::UnsupportedPixelFormat { value: 0x999, .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_corrupted_string_offset_fails() {
    let mut data = Fixture::default().build();
    // Point the file name reference far past the end of the buffer.
    data[0x14..0x18].copy_from_slice(&0x7F00_0000u32.to_be_bytes());

    let err = BfresFile::parse(&data).unwrap_err();
    assert!(matches!(err, Error::MalformedString { .. }));
}

#[test]
fn test_truncated_buffer_fails() {
    let data = Fixture::default().build();

    assert!(BfresFile::parse(&[]).is_err());
    assert!(BfresFile::parse(&data[..9]).is_err());
    assert!(BfresFile::parse(&data[..0x40]).is_err());
}

#[test]
fn test_rejects_wrong_magic() {
    let mut data = Fixture::default().build();
    data[0] = b'X';

    assert!(!is_bfres(&data));
    assert!(matches!(BfresFile::parse(&data), Err(Error::Common(_))));
}

#[test]
fn test_rejects_unknown_byte_order() {
    let mut data = Fixture::default().build();
    data[8] = 0x12;
    data[9] = 0x34;

    assert!(matches!(
        BfresFile::parse(&data),
        Err(Error::InvalidByteOrder { bom: [0x12, 0x34] })
    ));
}

#[test]
fn test_duplicate_texture_entries_keep_first() {
    let data = Fixture {
        duplicate_texture: true,
        ..Fixture::default()
    }
    .build();
    let file = BfresFile::parse(&data).unwrap();

    assert_eq!(file.textures().len(), 1);

    // The sampler still resolves against the surviving entry.
    let model = file.models().get("course_model").unwrap();
    let material = model.materials().get("mat_body").unwrap();
    let sampler = material.sampler("_a0").unwrap();
    assert_eq!(sampler.texture_index(), Some(0));
}

#[test]
fn test_embedded_file() {
    let data = Fixture {
        embedded: Some(b"collision blob"),
        ..Fixture::default()
    }
    .build();
    let file = BfresFile::parse(&data).unwrap();

    assert_eq!(file.embedded_files().len(), 1);
    let embedded = file.embedded_files().get("collision.bin").unwrap();
    assert_eq!(embedded.data(), b"collision blob");
}

#[test]
fn test_texture_gtx_handoff() {
    let data = Fixture::default().build();
    let file = BfresFile::parse(&data).unwrap();

    let texture = file.textures().get("tex_albedo").unwrap();
    let gtx = texture.to_gtx().unwrap();

    assert_eq!(&gtx[..4], b"Gfx2");
    // The encoded payload is carried through untouched.
    assert!(gtx.windows(64).any(|window| window == texture.data()));
}

#[test]
fn test_open_decompresses_yaz0() {
    let data = Fixture::default().build();
    let compressed = yaz0_wrap(&data);

    let path = std::env::temp_dir().join("latte_bfres_open_test.szs");
    std::fs::write(&path, &compressed).unwrap();
    let file = BfresFile::open(&path);
    std::fs::remove_file(&path).ok();

    let file = file.unwrap();
    assert_eq!(file.name(), "course");
    assert_eq!(file.models().len(), 1);
}
