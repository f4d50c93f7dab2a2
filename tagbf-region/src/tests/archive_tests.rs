use std::io::Cursor;

use tagbf::{Compound, Document, Tag};

use crate::sector::SECTOR_SIZE;
use crate::RegionArchive;

fn sample_document(label: &str) -> Document {
    let mut compound = Compound::new();
    compound.insert("label", Tag::String(label.to_owned()));
    compound.insert("value", Tag::Int(42));
    Document::new("", Tag::Compound(compound))
}

#[test]
fn round_trips_several_chunks() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(0, 0, sample_document("origin"));
    archive.set_chunk(5, 7, sample_document("five-seven"));
    archive.set_chunk(31, 31, sample_document("corner"));

    let mut buf = Cursor::new(Vec::new());
    archive.save(&mut buf).unwrap();

    buf.set_position(0);
    let reloaded = RegionArchive::load(buf).unwrap();

    assert_eq!(reloaded.chunk_count(), 3);
    assert_eq!(
        reloaded.get_chunk(5, 7).unwrap().root.as_compound().unwrap().get("label"),
        Some(&Tag::String("five-seven".to_owned()))
    );
    assert!(reloaded.diagnostics().is_empty());
}

#[test]
fn saved_file_is_sector_aligned() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(1, 1, sample_document("padded"));

    let mut buf = Cursor::new(Vec::new());
    archive.save(&mut buf).unwrap();

    assert_eq!(buf.get_ref().len() % SECTOR_SIZE, 0);
}

#[test]
fn negative_and_overflowing_coordinates_wrap_into_range() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(-1, 32, sample_document("wrapped"));

    assert_eq!(
        archive.get_chunk(31, 0).unwrap().root.as_compound().unwrap().get("label"),
        Some(&Tag::String("wrapped".to_owned()))
    );
}

#[test]
fn remove_chunk_clears_the_slot() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(3, 3, sample_document("gone-soon"));
    assert!(archive.remove_chunk(3, 3).is_some());
    assert!(archive.get_chunk(3, 3).is_none());
    assert_eq!(archive.chunk_count(), 0);
}

#[test]
fn extract_reads_a_path_within_a_chunk() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(2, 2, sample_document("pathed"));
    assert_eq!(
        archive.extract(2, 2, "label"),
        Some(&Tag::String("pathed".to_owned()))
    );
    assert_eq!(archive.extract(2, 2, "missing"), None);
    assert_eq!(archive.extract(9, 9, "label"), None);
}

#[test]
fn iteration_preserves_insertion_order_not_coordinate_order() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(10, 10, sample_document("second-inserted"));
    archive.set_chunk(1, 1, sample_document("first-inserted"));

    let order: Vec<(u8, u8)> = archive.all_chunks().map(|(coord, _)| coord).collect();
    assert_eq!(order, vec![(10, 10), (1, 1)]);
}

#[test]
fn json_view_round_trips_through_an_archive() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(4, 4, sample_document("json-chunk"));

    let json = archive.to_json().unwrap();
    let rebuilt = RegionArchive::from_json(&json).unwrap();

    assert_eq!(
        rebuilt.get_chunk(4, 4).unwrap().root.as_compound().unwrap().get("label"),
        Some(&Tag::String("json-chunk".to_owned()))
    );
}

#[test]
fn load_skips_a_corrupt_chunk_and_records_a_diagnostic() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(0, 0, sample_document("healthy"));
    archive.set_chunk(1, 0, sample_document("also-healthy"));

    let mut buf = Cursor::new(Vec::new());
    archive.save(&mut buf).unwrap();

    // Stomp the compression byte of the first chunk's blob header so it no
    // longer names a known scheme, without disturbing sector alignment.
    let bytes = buf.get_mut();
    bytes[2 * SECTOR_SIZE + 4] = 0xff;

    buf.set_position(0);
    let reloaded = RegionArchive::load(buf).unwrap();

    assert_eq!(reloaded.chunk_count(), 1);
    assert_eq!(reloaded.diagnostics().len(), 1);
}

#[test]
fn load_records_a_diagnostic_for_a_zero_payload_length_header() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(0, 0, sample_document("healthy"));
    archive.set_chunk(1, 0, sample_document("also-healthy"));

    let mut buf = Cursor::new(Vec::new());
    archive.save(&mut buf).unwrap();

    // Zero out the first chunk's 4-byte payload_length field. Naively
    // subtracting 1 from this to size a read buffer would panic with
    // "attempt to subtract with overflow" instead of producing a
    // diagnostic.
    let bytes = buf.get_mut();
    bytes[2 * SECTOR_SIZE..2 * SECTOR_SIZE + 4].copy_from_slice(&[0, 0, 0, 0]);

    buf.set_position(0);
    let reloaded = RegionArchive::load(buf).unwrap();

    assert_eq!(reloaded.chunk_count(), 1);
    assert_eq!(reloaded.diagnostics().len(), 1);
}

#[test]
fn load_records_a_diagnostic_for_a_location_pointing_past_the_file() {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(0, 0, sample_document("healthy"));

    let mut buf = Cursor::new(Vec::new());
    archive.save(&mut buf).unwrap();

    // Location-table entry 0 is `sector_offset:u24 | sector_count:u8`; push
    // the offset far beyond the end of the (small, single-chunk) file.
    let bytes = buf.get_mut();
    bytes[0..4].copy_from_slice(&[0x00, 0xFF, 0x00, 0x01]);

    buf.set_position(0);
    let reloaded = RegionArchive::load(buf).unwrap();

    assert_eq!(reloaded.chunk_count(), 0);
    assert_eq!(reloaded.diagnostics().len(), 1);
}
