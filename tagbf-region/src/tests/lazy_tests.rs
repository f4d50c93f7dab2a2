use std::io::Cursor;

use tagbf::{Compound, Document, Tag};

use crate::{LazyRegionArchive, RegionArchive};

fn sample_document(label: &str) -> Document {
    let mut compound = Compound::new();
    compound.insert("label", Tag::String(label.to_owned()));
    Document::new("", Tag::Compound(compound))
}

fn sample_bytes() -> Vec<u8> {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(0, 0, sample_document("lazy-a"));
    archive.set_chunk(17, 3, sample_document("lazy-b"));
    let mut buf = Cursor::new(Vec::new());
    archive.save(&mut buf).unwrap();
    buf.into_inner()
}

#[test]
fn get_chunk_materializes_only_the_requested_slot() {
    let lazy = LazyRegionArchive::load_lazy(Cursor::new(sample_bytes())).unwrap();

    let chunk = lazy.get_chunk(0, 0).unwrap().unwrap();
    assert_eq!(
        chunk.root.as_compound().unwrap().get("label"),
        Some(&Tag::String("lazy-a".to_owned()))
    );
    assert!(lazy.get_chunk(9, 9).unwrap().is_none());
}

#[test]
fn get_chunk_caches_across_repeated_calls() {
    let lazy = LazyRegionArchive::load_lazy(Cursor::new(sample_bytes())).unwrap();

    let first = lazy.get_chunk(17, 3).unwrap().unwrap();
    let second = lazy.get_chunk(17, 3).unwrap().unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));

    lazy.clear_cache();
    let third = lazy.get_chunk(17, 3).unwrap().unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &third));
    assert_eq!(first, third);
}

#[test]
fn get_chunk_async_matches_get_chunk() {
    let lazy = LazyRegionArchive::load_lazy(Cursor::new(sample_bytes())).unwrap();
    let chunk = lazy.get_chunk_async(0, 0).unwrap().unwrap();
    assert_eq!(
        chunk.root.as_compound().unwrap().get("label"),
        Some(&Tag::String("lazy-a".to_owned()))
    );
}

#[test]
fn timestamp_is_available_without_materializing_the_chunk() {
    let lazy = LazyRegionArchive::load_lazy(Cursor::new(sample_bytes())).unwrap();
    assert!(lazy.timestamp(0, 0).is_some());
    assert!(lazy.timestamp(9, 9).is_none());
}
