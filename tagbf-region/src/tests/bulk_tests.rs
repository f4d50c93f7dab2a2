use tagbf::{Compound, Document, Tag};
use tempfile::tempdir;

use crate::archive::RegionArchive;
use crate::bulk::{load_many, process_directory, save_many};

fn sample_document(label: &str) -> Document {
    let mut compound = Compound::new();
    compound.insert("label", Tag::String(label.to_owned()));
    Document::new("", Tag::Compound(compound))
}

fn sample_archive(label: &str) -> RegionArchive {
    let mut archive = RegionArchive::empty();
    archive.set_chunk(0, 0, sample_document(label));
    archive
}

#[test]
fn save_many_then_load_many_round_trips_in_order() {
    let dir = tempdir().unwrap();
    let paths = vec![dir.path().join("a.tbfr"), dir.path().join("b.tbfr")];
    let items = vec![
        (paths[0].clone(), sample_archive("first")),
        (paths[1].clone(), sample_archive("second")),
    ];

    let save_diagnostics = save_many(&items);
    assert!(save_diagnostics.is_empty());

    let (loaded, load_diagnostics) = load_many(&paths);
    assert!(load_diagnostics.is_empty());
    assert_eq!(loaded.len(), 2);
    assert_eq!(
        loaded[0]
            .as_ref()
            .unwrap()
            .get_chunk(0, 0)
            .unwrap()
            .root
            .as_compound()
            .unwrap()
            .get("label"),
        Some(&Tag::String("first".to_owned()))
    );
    assert_eq!(
        loaded[1]
            .as_ref()
            .unwrap()
            .get_chunk(0, 0)
            .unwrap()
            .root
            .as_compound()
            .unwrap()
            .get("label"),
        Some(&Tag::String("second".to_owned()))
    );
}

#[test]
fn load_many_records_a_diagnostic_for_a_missing_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist.tbfr");

    let (loaded, diagnostics) = load_many(&[missing.clone()]);
    assert_eq!(loaded, vec![None]);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].path, missing);
}

#[test]
fn process_directory_picks_up_only_tbfr_files() {
    let dir = tempdir().unwrap();
    let region_path = dir.path().join("r.0.0.tbfr");
    let other_path = dir.path().join("notes.txt");
    save_many(&[(region_path.clone(), sample_archive("in-directory"))]);
    std::fs::write(&other_path, b"not a region file").unwrap();

    let (loaded, diagnostics) = process_directory(dir.path()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].0, region_path);
    assert!(diagnostics.is_empty());
}
