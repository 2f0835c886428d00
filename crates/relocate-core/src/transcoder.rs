//! Streaming chart archive transcoding
//!
//! Reads a `.tgz` chart entry by entry and writes an equivalent `.tgz`,
//! substituting the content of the chart's `values.yaml`. Headers are copied
//! as-is; only the rewritten entry gets a new size and checksum.
//!
//! Entries are read in raw mode: GNU long-name and PAX extension entries are
//! copied like any other entry, and the path they announce is used to match
//! the entry that follows them.

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tar::{Archive, Builder, EntryType, Header};

use crate::body::{CopyFailure, EntryBody, materialize};
use crate::error::{RelocateError, Result};
use crate::matcher::is_main_values_file;
use crate::relocation::Relocation;
use crate::rewriter::rewrite_values;

/// Output settings for a transcode
#[derive(Debug, Clone, Copy)]
pub struct TranscodeOptions {
    /// Gzip level of the output archive
    pub compression: Compression,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
        }
    }
}

/// What a transcode did
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscodeReport {
    /// Number of tar headers copied, extension headers included
    pub entries: usize,
    /// The rewritten values file, if the archive had one
    pub rewritten: Option<RewrittenEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenEntry {
    pub path: String,
    pub original_size: u64,
    pub new_size: u64,
}

/// Relocate the chart archive at `source` into a new archive at `dest`
///
/// `dest` is created or truncated. If anything fails, the partially written
/// file is removed before the error is returned.
pub fn relocate_file(
    source: &Path,
    dest: &Path,
    relocation: &Relocation,
    options: &TranscodeOptions,
) -> Result<TranscodeReport> {
    let input = File::open(source).map_err(|e| RelocateError::SourceOpen { source: e })?;
    let output = File::create(dest).map_err(|e| RelocateError::SinkCreate { source: e })?;

    let result = transcode(
        BufReader::new(input),
        BufWriter::new(output),
        relocation,
        options,
    );

    if result.is_err() {
        if let Err(e) = std::fs::remove_file(dest) {
            tracing::warn!("Failed to remove partial output {}: {}", dest.display(), e);
        }
    }

    result
}

/// Copy a gzipped tar stream from `input` to `output`, relocating the values file
///
/// The output is only complete when this returns `Ok`; on error it must be
/// discarded.
pub fn transcode<R: Read, W: Write>(
    input: R,
    output: W,
    relocation: &Relocation,
    options: &TranscodeOptions,
) -> Result<TranscodeReport> {
    // Concatenated gzip members form one stream
    let mut archive = Archive::new(MultiGzDecoder::new(input));
    let entries = archive
        .entries()
        .map_err(|e| RelocateError::SourceOpen { source: e })?
        .raw(true);

    let mut builder = Builder::new(GzEncoder::new(output, options.compression));
    let mut report = TranscodeReport::default();
    // Path announced by a preceding long-name or PAX entry
    let mut announced: Option<String> = None;

    for entry in entries {
        let mut entry = entry.map_err(|e| {
            if report.entries == 0 {
                RelocateError::SourceOpen { source: e }
            } else {
                RelocateError::read(None, e)
            }
        })?;
        let mut header = entry.header().clone();
        let entry_type = header.entry_type();
        let declared = header.size().map_err(|e| RelocateError::read(None, e))?;

        if is_path_extension(entry_type) {
            let path = header_path(&header);
            let content =
                materialize(&mut entry, declared).map_err(|e| RelocateError::read(Some(&path), e))?;
            if let Some(next) = announced_path(entry_type, &content) {
                announced = Some(next);
            }
            tracing::debug!("Copying {:?} extension entry {}", entry_type, path);
            append(&mut builder, &header, &path, EntryBody::buffered(content))?;
            report.entries += 1;
            continue;
        }

        let path = announced.take().unwrap_or_else(|| header_path(&header));
        if entry_type.is_file() && is_main_values_file(&path) {
            let original =
                materialize(&mut entry, declared).map_err(|e| RelocateError::read(Some(&path), e))?;
            let rewritten = rewrite_values(&path, &original, relocation)?;
            let new_size = rewritten.len() as u64;

            header.set_size(new_size);
            header.set_cksum();
            tracing::info!(
                "Relocated {} to {} ({} -> {} bytes)",
                path,
                relocation.image_prefix(),
                original.len(),
                new_size
            );

            append(&mut builder, &header, &path, EntryBody::buffered(rewritten))?;
            if report.rewritten.is_none() {
                report.rewritten = Some(RewrittenEntry {
                    path,
                    original_size: original.len() as u64,
                    new_size,
                });
            }
        } else {
            tracing::debug!("Copying {} ({} bytes)", path, declared);
            append(&mut builder, &header, &path, EntryBody::Stream(&mut entry))?;
        }
        report.entries += 1;
    }

    if report.rewritten.is_none() {
        tracing::debug!("No chart values file found, archive copied unchanged");
    }

    // Tar trailer, then gzip footer, then the sink itself
    let encoder = builder
        .into_inner()
        .map_err(|e| RelocateError::write(None, e))?;
    let mut sink = encoder.finish().map_err(|e| RelocateError::write(None, e))?;
    sink.flush().map_err(|e| RelocateError::write(None, e))?;

    Ok(report)
}

fn append<W: Write>(
    builder: &mut Builder<W>,
    header: &Header,
    path: &str,
    body: EntryBody<'_>,
) -> Result<()> {
    builder
        .append(header, body)
        .map_err(|e| match CopyFailure::classify(e) {
            CopyFailure::Read(e) => RelocateError::read(Some(path), e),
            CopyFailure::Write(e) => RelocateError::write(Some(path), e),
        })
}

fn is_path_extension(entry_type: EntryType) -> bool {
    entry_type.is_gnu_longname() || entry_type.is_pax_local_extensions()
}

fn header_path(header: &Header) -> String {
    String::from_utf8_lossy(&header.path_bytes()).into_owned()
}

/// Path carried by a GNU long-name or PAX extension entry body
fn announced_path(entry_type: EntryType, content: &[u8]) -> Option<String> {
    if entry_type.is_gnu_longname() {
        let end = content
            .iter()
            .rposition(|b| *b != 0)
            .map_or(0, |last| last + 1);
        return Some(String::from_utf8_lossy(&content[..end]).into_owned());
    }
    pax_path(content)
}

/// Extract the `path` record from PAX extended header data
///
/// Records have the form `"<len> <key>=<value>\n"`, where `len` counts the
/// whole record.
fn pax_path(mut data: &[u8]) -> Option<String> {
    let mut path = None;

    while !data.is_empty() {
        let space = data.iter().position(|b| *b == b' ')?;
        let len: usize = std::str::from_utf8(&data[..space]).ok()?.parse().ok()?;
        if len <= space || len > data.len() {
            break;
        }

        let record = &data[space + 1..len];
        let record = record.strip_suffix(b"\n").unwrap_or(record);
        if let Some(value) = record.strip_prefix(b"path=") {
            path = Some(String::from_utf8_lossy(value).into_owned());
        }
        data = &data[len..];
    }

    path
}
