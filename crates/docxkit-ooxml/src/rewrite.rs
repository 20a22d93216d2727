//! In-place package rewriting
//!
//! [`rewrite_package`] streams every part of an existing package through a
//! [`PartTransformer`] into a temporary file next to the source, then renames
//! the temporary file over the source. The source is never modified in place:
//! if anything fails before the rename, the temporary file is removed and the
//! original is left untouched.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::{DocxError, Result};
use crate::transform::PartTransformer;

/// Rewrite the package at `path`, transforming every text part
///
/// Parts that are not valid UTF-8 (embedded media) are copied verbatim.
/// Parts contributed through [`PartTransformer::extra_parts`] are written
/// first; a source part with the same path is dropped in their favor.
pub fn rewrite_package<P: AsRef<Path>>(path: P, transformer: &dyn PartTransformer) -> Result<()> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DocxError::NotFound(path.to_path_buf()));
    }
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let permissions = std::fs::metadata(path)?.permissions();
    let source = File::open(path)?;
    let mut archive = ZipArchive::new(source)?;
    let mut temp = NamedTempFile::new_in(dir)?;

    {
        let mut zip = ZipWriter::new(temp.as_file_mut());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let extras = transformer.extra_parts();
        for extra in &extras {
            debug!(part = %extra.path, bytes = extra.contents.len(), "adding part");
            zip.start_file(extra.path.as_str(), options)?;
            zip.write_all(&extra.contents)?;
        }

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            if name.ends_with('/') || extras.iter().any(|e| e.path == name) {
                continue;
            }

            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;

            let output = match String::from_utf8(contents) {
                Ok(text) => {
                    debug!(part = %name, "transforming part");
                    transformer.transform(&name, &text)?.into_bytes()
                }
                Err(binary) => {
                    debug!(part = %name, "copying binary part");
                    binary.into_bytes()
                }
            };

            zip.start_file(name.as_str(), options)?;
            zip.write_all(&output)?;
        }

        zip.finish()?.flush()?;
    }
    drop(archive);

    // The temp file is created 0600; keep the source's mode across the rename.
    std::fs::set_permissions(temp.path(), permissions)?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;
    info!(path = %path.display(), "package rewritten");
    Ok(())
}
