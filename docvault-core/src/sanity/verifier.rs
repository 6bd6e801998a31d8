use std::io::{self, ErrorKind};
use std::path::Path;

use docvault_model::{CatalogRecord, DocumentId};
use tracing::debug;

use crate::checksum::{checksums_match, drain, md5_hex};
use crate::fs::{FileReader, FileSystem};
use crate::sanity::messages::SanityCheckMessages;

enum Artifact {
    Missing,
    Unreadable(io::Error),
    Readable(FileReader),
}

/// Existence first, then readability. A path that is not a regular file
/// counts as missing.
async fn inspect_artifact<F>(fs: &F, path: &Path) -> Artifact
where
    F: FileSystem + ?Sized,
{
    match fs.metadata(path).await {
        Ok(meta) if meta.is_file => {}
        Ok(_) => return Artifact::Missing,
        Err(err) if err.kind() == ErrorKind::NotFound => return Artifact::Missing,
        Err(err) => return Artifact::Unreadable(err),
    }

    match fs.open(path).await {
        Ok(reader) => Artifact::Readable(reader),
        Err(err) if err.kind() == ErrorKind::NotFound => Artifact::Missing,
        Err(err) => Artifact::Unreadable(err),
    }
}

/// Run every per-document check against `record` and return the findings,
/// all attributed to the record's id.
///
/// Checks are independent: a missing original does not stop the archive
/// or thumbnail from being inspected.
pub async fn verify_record<F>(fs: &F, record: &CatalogRecord) -> SanityCheckMessages
where
    F: FileSystem + ?Sized,
{
    let mut messages = SanityCheckMessages::new();
    let id = record.id;
    debug!(target: "docvault::sanity::verify", document = id.get(), "verifying document artifacts");

    check_original(fs, record, &mut messages).await;
    check_archive(fs, record, &mut messages).await;
    check_thumbnail(fs, record, &mut messages).await;

    if record.content.is_empty() {
        messages.info(id, format!("Document {id} has no content."));
    }

    messages
}

async fn check_original<F>(fs: &F, record: &CatalogRecord, messages: &mut SanityCheckMessages)
where
    F: FileSystem + ?Sized,
{
    let id = record.id;
    let mut reader = match inspect_artifact(fs, &record.original_path).await {
        Artifact::Missing => {
            messages.error(id, format!("Original of document {id} does not exist."));
            return;
        }
        Artifact::Unreadable(err) => {
            messages.error(id, format!("Cannot read original file of document {id}: {err}"));
            return;
        }
        Artifact::Readable(reader) => reader,
    };

    let actual = match md5_hex(&mut reader).await {
        Ok(actual) => actual,
        Err(err) => {
            messages.error(id, format!("Cannot read original file of document {id}: {err}"));
            return;
        }
    };

    let stored = record.original_checksum.as_deref();
    if !stored.is_some_and(|stored| checksums_match(stored, &actual)) {
        messages.error(
            id,
            format!(
                "Checksum mismatch of document {id}. Stored: {}, actual: {actual}.",
                stored.unwrap_or("none")
            ),
        );
    }
}

async fn check_archive<F>(fs: &F, record: &CatalogRecord, messages: &mut SanityCheckMessages)
where
    F: FileSystem + ?Sized,
{
    let id = record.id;
    match (record.has_archive_version(), &record.archive_checksum) {
        (true, None) => messages.error(
            id,
            format!("Document {id} has an archive file, but its checksum is missing."),
        ),
        (false, Some(_)) => messages.error(
            id,
            format!("Document {id} has an archive file checksum, but no archive filename."),
        ),
        _ => {}
    }

    let Some(path) = record.archive_path.as_deref() else {
        return;
    };

    let mut reader = match inspect_artifact(fs, path).await {
        Artifact::Missing => {
            messages.error(id, format!("Archived version of document {id} does not exist."));
            return;
        }
        Artifact::Unreadable(err) => {
            messages.error(id, archive_unreadable(id, &err));
            return;
        }
        Artifact::Readable(reader) => reader,
    };

    let actual = match md5_hex(&mut reader).await {
        Ok(actual) => actual,
        Err(err) => {
            messages.error(id, archive_unreadable(id, &err));
            return;
        }
    };

    if let Some(stored) = record.archive_checksum.as_deref()
        && !checksums_match(stored, &actual)
    {
        messages.error(
            id,
            format!(
                "Checksum mismatch of archived document {id}. Stored: {stored}, actual: {actual}."
            ),
        );
    }
}

fn archive_unreadable(id: DocumentId, err: &io::Error) -> String {
    format!("Cannot read archive file of document {id}: {err}")
}

async fn check_thumbnail<F>(fs: &F, record: &CatalogRecord, messages: &mut SanityCheckMessages)
where
    F: FileSystem + ?Sized,
{
    let id = record.id;
    let result = match inspect_artifact(fs, &record.thumbnail_path).await {
        Artifact::Missing => {
            messages.error(id, format!("Thumbnail of document {id} does not exist."));
            return;
        }
        Artifact::Unreadable(err) => Err(err),
        Artifact::Readable(mut reader) => drain(&mut reader).await.map(|_| ()),
    };

    if let Err(err) = result {
        messages.error(id, format!("Cannot read thumbnail file of document {id}: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::md5_hex_bytes;
    use crate::fs::{FileAccess, InMemoryFs};
    use crate::sanity::messages::MessageLevel;
    use std::path::PathBuf;

    const ORIGINAL: &[u8] = b"%PDF-1.4 original";
    const ARCHIVE: &[u8] = b"%PDF-1.4 archived";
    const THUMB: &[u8] = b"\x89PNG thumbnail";

    fn fixture() -> (InMemoryFs, CatalogRecord) {
        let record = CatalogRecord {
            id: DocumentId(1),
            original_checksum: Some(md5_hex_bytes(ORIGINAL)),
            archive_checksum: Some(md5_hex_bytes(ARCHIVE)),
            content: "test".into(),
            original_path: PathBuf::from("/media/originals/0000001.pdf"),
            archive_path: Some(PathBuf::from("/media/archive/0000001.pdf")),
            thumbnail_path: PathBuf::from("/media/thumbnails/0000001.webp"),
        };
        let mut fs = InMemoryFs::new();
        fs.add_file(&record.original_path, ORIGINAL);
        fs.add_file("/media/archive/0000001.pdf", ARCHIVE);
        fs.add_file(&record.thumbnail_path, THUMB);
        (fs, record)
    }

    fn texts(messages: &SanityCheckMessages) -> Vec<&str> {
        messages.iter().map(|m| m.message.as_str()).collect()
    }

    #[tokio::test]
    async fn healthy_record_yields_nothing() {
        let (fs, record) = fixture();
        assert!(verify_record(&fs, &record).await.is_empty());
    }

    #[tokio::test]
    async fn checksum_comparison_is_case_insensitive() {
        let (fs, mut record) = fixture();
        record.original_checksum = record.original_checksum.map(|c| c.to_uppercase());
        assert!(verify_record(&fs, &record).await.is_empty());
    }

    #[tokio::test]
    async fn unreadable_original_skips_checksum() {
        let (mut fs, mut record) = fixture();
        record.original_checksum = Some("WOW".into());
        fs.set_access(&record.original_path, FileAccess::Denied);

        let messages = verify_record(&fs, &record).await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0]
            .message
            .starts_with("Cannot read original file of document 1: "));
    }

    #[tokio::test]
    async fn read_failure_while_hashing_is_reported_as_unreadable() {
        let (mut fs, record) = fixture();
        fs.set_access(Path::new("/media/archive/0000001.pdf"), FileAccess::Broken);

        let messages = verify_record(&fs, &record).await;
        assert_eq!(messages.len(), 1);
        assert!(messages[0]
            .message
            .starts_with("Cannot read archive file of document 1"));
    }

    #[tokio::test]
    async fn missing_stored_checksum_is_a_mismatch() {
        let (fs, mut record) = fixture();
        record.original_checksum = None;

        let messages = verify_record(&fs, &record).await;
        assert_eq!(
            texts(&messages),
            vec![format!(
                "Checksum mismatch of document 1. Stored: none, actual: {}.",
                md5_hex_bytes(ORIGINAL)
            )]
        );
    }

    #[tokio::test]
    async fn independent_failures_are_all_reported_in_order() {
        let (mut fs, mut record) = fixture();
        fs.remove(&record.original_path);
        fs.set_access(&record.thumbnail_path, FileAccess::Denied);
        record.archive_checksum = Some("deadbeef".into());
        record.content.clear();

        let messages = verify_record(&fs, &record).await;
        let texts = texts(&messages);
        assert_eq!(texts.len(), 4);
        assert_eq!(texts[0], "Original of document 1 does not exist.");
        assert!(texts[1].starts_with("Checksum mismatch of archived document 1. Stored: deadbeef"));
        assert!(texts[2].starts_with("Cannot read thumbnail file of document 1"));
        assert_eq!(texts[3], "Document 1 has no content.");
        assert_eq!(messages[3].level, MessageLevel::Info);
        assert!(messages.iter().all(|m| m.document == Some(DocumentId(1))));
    }

    #[tokio::test]
    async fn archive_path_without_checksum_still_checks_existence() {
        let (mut fs, mut record) = fixture();
        record.archive_checksum = None;
        fs.remove(Path::new("/media/archive/0000001.pdf"));

        let messages = verify_record(&fs, &record).await;
        assert_eq!(
            texts(&messages),
            vec![
                "Document 1 has an archive file, but its checksum is missing.",
                "Archived version of document 1 does not exist.",
            ]
        );
    }

    #[tokio::test]
    async fn directory_in_place_of_thumbnail_counts_as_missing() {
        let (mut fs, record) = fixture();
        fs.remove(&record.thumbnail_path);
        fs.add_dir(&record.thumbnail_path);

        let messages = verify_record(&fs, &record).await;
        assert_eq!(
            texts(&messages),
            vec!["Thumbnail of document 1 does not exist."]
        );
    }
}
