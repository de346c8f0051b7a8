//! Tar archive writer with single-pass content hashing.
//!
//! Every regular file is read once: the bytes go through a
//! [`HashingReader`] on their way into the tar builder, so the manifest
//! digest always describes exactly what was written.

use std::fs::File;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::io::{self};
use std::path::Component;
use std::path::Path;
use std::time::Instant;

use tar::Builder;
use tar::Header;

use crate::ProgressCallback;
use crate::Result;
use crate::VeritarError;
use crate::creation::compression::ArchiveEncoder;
use crate::creation::config::CreationConfig;
use crate::creation::progress::ProgressReader;
use crate::creation::progress::ProgressTracker;
use crate::creation::report::AddedEntry;
use crate::creation::report::CreationReport;
use crate::creation::walker::SourceEntry;
use crate::creation::walker::SourceKind;
use crate::creation::walker::collect_entries;
use crate::creation::walker::resolve_path;
use crate::digest::HashingReader;
use crate::io::CountingWriter;
use crate::manifest::format_manifest_line;
use crate::manifest::is_representable;
use crate::types::MemberKind;

type ArchiveWriter = ArchiveEncoder<CountingWriter<BufWriter<File>>>;

/// Writes `sources` into a tar archive at `output` and its manifest next to
/// it.
///
/// The output file is created before the sources are walked; if it lies
/// inside a source tree it is left out with a warning.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a source is missing,
/// the output cannot be written, or a file changes size while it is being
/// archived.
pub fn write_tar_archive<P: AsRef<Path>>(
    output: &Path,
    sources: &[P],
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CreationReport> {
    config.validate()?;
    let start = Instant::now();
    let codec = config.resolve_codec(output);
    let manifest_path = config.resolve_manifest_path(output);

    let file = File::create(output)?;
    let output_identity = output.canonicalize()?;
    let encoder = ArchiveEncoder::new(
        CountingWriter::new(BufWriter::new(file)),
        codec,
        config.compression_level,
    )?;
    let mut builder = Builder::new(encoder);
    let manifest_identity = resolve_path(&manifest_path).ok();

    let entries = collect_entries(sources, config)?;
    tracing::debug!(
        output = %output.display(),
        codec = codec.map_or("none", |c| c.name()),
        entries = entries.len(),
        "creating archive"
    );

    let mut report = CreationReport::new();
    report.codec = codec;
    let mut tracker = ProgressTracker::new(progress, entries.len());

    for entry in &entries {
        if entry.path == output_identity || Some(&entry.path) == manifest_identity.as_ref() {
            report.add_warning(format!(
                "{}: file is the archive output, not added",
                entry.path.display()
            ));
            continue;
        }

        tracker.on_entry_start(&entry.archive_path);
        let added = append_entry(&mut builder, entry, config, tracker.callback())?;
        tracker.on_entry_complete(&entry.archive_path);

        match added {
            Some(added) => report.record(added),
            None => {
                tracing::warn!(path = %entry.path.display(), "unsupported file type, skipped");
                report.add_warning(format!(
                    "{}: unsupported file type, not added",
                    entry.path.display()
                ));
            }
        }
    }

    builder.finish()?;
    let encoder: ArchiveWriter = builder.into_inner()?;
    let mut counting = encoder.finish()?;
    counting.flush()?;
    report.bytes_compressed = counting.total_bytes();
    drop(counting);

    write_manifest(&manifest_path, &mut report)?;
    report.manifest_path = manifest_path;
    report.duration = start.elapsed();

    tracker.on_complete();
    Ok(report)
}

fn append_entry<W: Write>(
    builder: &mut Builder<W>,
    entry: &SourceEntry,
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<Option<AddedEntry>> {
    let name = archive_name(&entry.archive_path);
    tracing::trace!(path = %name, "adding entry");

    let added = match &entry.kind {
        SourceKind::File => append_file(builder, entry, &name, config, progress)?,
        SourceKind::Directory => {
            let metadata = std::fs::metadata(&entry.path)?;
            let mut header = Header::new_gnu();
            header.set_entry_type(MemberKind::Directory.to_tar());
            header.set_size(0);
            apply_metadata(&mut header, &metadata, config, 0o755);
            builder.append_data(&mut header, &name, io::empty())?;
            AddedEntry {
                archive_path: name,
                kind: MemberKind::Directory,
                digest: None,
                size: 0,
            }
        }
        SourceKind::Symlink { target } => {
            let metadata = std::fs::symlink_metadata(&entry.path)?;
            let mut header = Header::new_gnu();
            header.set_entry_type(MemberKind::Symlink.to_tar());
            header.set_size(0);
            apply_metadata(&mut header, &metadata, config, 0o777);
            builder.append_link(&mut header, &name, target)?;
            AddedEntry {
                archive_path: name,
                kind: MemberKind::Symlink,
                digest: None,
                size: 0,
            }
        }
        SourceKind::Unsupported => return Ok(None),
    };

    Ok(Some(added))
}

fn append_file<W: Write>(
    builder: &mut Builder<W>,
    entry: &SourceEntry,
    name: &str,
    config: &CreationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<AddedEntry> {
    let file = File::open(&entry.path)?;
    let metadata = file.metadata()?;
    let size = metadata.len();

    let mut header = Header::new_gnu();
    header.set_entry_type(MemberKind::Regular.to_tar());
    header.set_size(size);
    apply_metadata(&mut header, &metadata, config, 0o644);

    let mut reader = HashingReader::new(ProgressReader::new(file.take(size), progress));
    builder.append_data(&mut header, name, &mut reader)?;

    if reader.bytes_read() != size {
        return Err(VeritarError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "{} shrank while being archived ({} of {size} bytes)",
                entry.path.display(),
                reader.bytes_read()
            ),
        )));
    }

    Ok(AddedEntry {
        archive_path: name.to_string(),
        kind: MemberKind::Regular,
        digest: Some(reader.finalize()),
        size,
    })
}

fn write_manifest(path: &Path, report: &mut CreationReport) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut skipped = Vec::new();
    let mut written = 0;

    for entry in &report.entries {
        let Some(digest) = &entry.digest else {
            continue;
        };
        if !is_representable(&entry.archive_path) {
            skipped.push(entry.archive_path.escape_debug().to_string());
            continue;
        }
        writer.write_all(format_manifest_line(digest, &entry.archive_path).as_bytes())?;
        written += 1;
    }
    writer.flush()?;

    for name in skipped {
        report.add_warning(format!(
            "{name}: path cannot be stored in the manifest, no checksum recorded"
        ));
    }
    report.manifest_entries = written;
    tracing::debug!(manifest = %path.display(), entries = written, "manifest written");
    Ok(())
}

/// Archive name with `/` separators regardless of platform.
fn archive_name(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn apply_metadata(
    header: &mut Header,
    metadata: &std::fs::Metadata,
    config: &CreationConfig,
    default_mode: u32,
) {
    if config.preserve_permissions {
        set_permissions(header, metadata);
    } else {
        header.set_mode(default_mode);
        set_mtime(header, metadata);
    }
}

/// Sets file permissions in TAR header from metadata.
#[cfg(unix)]
fn set_permissions(header: &mut Header, metadata: &std::fs::Metadata) {
    use std::os::unix::fs::MetadataExt;
    header.set_mode(metadata.mode() & 0o7777);
    header.set_uid(u64::from(metadata.uid()));
    header.set_gid(u64::from(metadata.gid()));
    set_mtime(header, metadata);
}

#[cfg(not(unix))]
fn set_permissions(header: &mut Header, metadata: &std::fs::Metadata) {
    let mode = if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    };
    header.set_mode(mode);
    set_mtime(header, metadata);
}

fn set_mtime(header: &mut Header, metadata: &std::fs::Metadata) {
    // pre-epoch times are clamped to 0
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|modified| modified.duration_since(std::time::UNIX_EPOCH).ok())
        .map_or(0, |duration| duration.as_secs());
    header.set_mtime(mtime);
}
