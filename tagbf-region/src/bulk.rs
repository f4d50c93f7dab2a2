//! Batch operations over many Region-Archive files on disk (§5 "bulk
//! mode"): a bounded `rayon` pool, order-preserving results, and
//! per-file diagnostics instead of an all-or-nothing abort (§7).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::warn;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::archive::RegionArchive;
use crate::error::{FileDiagnostic, Result};

/// Default bound on concurrent per-file work (§5).
pub const DEFAULT_FILE_CONCURRENCY: usize = 5;

fn pool(max_concurrency: usize) -> ThreadPool {
    ThreadPoolBuilder::new()
        .num_threads(max_concurrency.max(1))
        .build()
        .expect("building the bounded bulk-file pool")
}

/// Loads every path in `paths`, in order, using a pool bounded to
/// [`DEFAULT_FILE_CONCURRENCY`] concurrent files. A path that fails to
/// load becomes `None` in the returned vector and a [`FileDiagnostic`] in
/// the second; the batch itself never aborts (§7).
pub fn load_many<P: AsRef<Path> + Sync>(paths: &[P]) -> (Vec<Option<RegionArchive>>, Vec<FileDiagnostic>) {
    load_many_with_concurrency(paths, DEFAULT_FILE_CONCURRENCY)
}

/// As [`load_many`], with an explicit bound on concurrent file work.
pub fn load_many_with_concurrency<P: AsRef<Path> + Sync>(
    paths: &[P],
    max_concurrency: usize,
) -> (Vec<Option<RegionArchive>>, Vec<FileDiagnostic>) {
    let pool = pool(max_concurrency);
    let results: Vec<Result<RegionArchive>> = pool.install(|| {
        use rayon::prelude::*;
        paths
            .par_iter()
            .map(|path| load_one(path.as_ref()))
            .collect()
    });

    let mut archives = Vec::with_capacity(results.len());
    let mut diagnostics = Vec::new();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(archive) => archives.push(Some(archive)),
            Err(e) => {
                warn!("skipping unreadable region file {:?}: {e}", path.as_ref());
                diagnostics.push(FileDiagnostic {
                    path: path.as_ref().to_path_buf(),
                    cause: e.to_string(),
                });
                archives.push(None);
            }
        }
    }
    (archives, diagnostics)
}

fn load_one(path: &Path) -> Result<RegionArchive> {
    let file = std::fs::File::open(path)?;
    RegionArchive::load(std::io::BufReader::new(file))
}

/// Saves each `(path, archive)` pair, in order, using a pool bounded to
/// [`DEFAULT_FILE_CONCURRENCY`] concurrent files. Returns diagnostics for
/// paths that failed to write; the batch never aborts (§7).
pub fn save_many<P: AsRef<Path> + Sync>(items: &[(P, RegionArchive)]) -> Vec<FileDiagnostic> {
    save_many_with_concurrency(items, DEFAULT_FILE_CONCURRENCY)
}

/// As [`save_many`], with an explicit bound on concurrent file work.
pub fn save_many_with_concurrency<P: AsRef<Path> + Sync>(
    items: &[(P, RegionArchive)],
    max_concurrency: usize,
) -> Vec<FileDiagnostic> {
    let pool = pool(max_concurrency);
    let results: Vec<Result<()>> = pool.install(|| {
        use rayon::prelude::*;
        items
            .par_iter()
            .map(|(path, archive)| save_one(path.as_ref(), archive))
            .collect()
    });

    let mut diagnostics = Vec::new();
    for ((path, _), result) in items.iter().zip(results) {
        if let Err(e) = result {
            warn!("failed to write region file {:?}: {e}", path.as_ref());
            diagnostics.push(FileDiagnostic {
                path: path.as_ref().to_path_buf(),
                cause: e.to_string(),
            });
        }
    }
    diagnostics
}

fn save_one(path: &Path, archive: &RegionArchive) -> Result<()> {
    let file = File::create(path)?;
    archive.save(BufWriter::new(file))
}

/// Loads every `*.tbfr` region file directly under `dir` (non-recursive),
/// in directory-listing order, bounded to [`DEFAULT_FILE_CONCURRENCY`]
/// concurrent files. Returns each file's path alongside its archive, plus
/// diagnostics for files that failed to load.
pub fn process_directory(dir: &Path) -> Result<(Vec<(PathBuf, RegionArchive)>, Vec<FileDiagnostic>)> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "tbfr").unwrap_or(false))
        .collect();
    paths.sort();

    let (archives, diagnostics) = load_many(&paths);
    let loaded = paths
        .into_iter()
        .zip(archives)
        .filter_map(|(path, archive)| archive.map(|a| (path, a)))
        .collect();
    Ok((loaded, diagnostics))
}
