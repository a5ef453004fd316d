//! ZIP container extraction.
//!
//! Member names and sizes are read from the central directory first and go
//! through the same checks as loose files. Only recognized members are then
//! decompressed, and reads are capped so a lying header cannot force an
//! unbounded allocation.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::classify::classify_name;
use crate::config::Limits;
use crate::error::ReconError;
use crate::model::{FileRole, UploadFile};
use crate::preflight::{check_upload, FileHeader};

/// Extract the recognized members of `container`, in archive order.
pub fn extract_archive(container: &UploadFile, limits: &Limits) -> Result<Vec<UploadFile>, ReconError> {
    let mut archive = ZipArchive::new(Cursor::new(container.bytes.as_slice()))
        .map_err(|e| ReconError::Format(format!("{}: cannot read archive: {e}", container.name)))?;

    // (index, name, declared size); nothing is decompressed yet
    let mut headers = Vec::new();
    for index in 0..archive.len() {
        let member = archive.by_index_raw(index).map_err(|e| {
            ReconError::Format(format!("{}: cannot read entry #{index}: {e}", container.name))
        })?;
        if member.is_dir() || classify_name(member.name()) == FileRole::Ignored {
            continue;
        }
        headers.push((index, member.name().to_string(), member.size()));
    }

    check_upload(
        headers.iter().map(|(_, name, size)| FileHeader { name, size: *size }),
        limits,
    )?;

    let mut members = Vec::with_capacity(headers.len());
    for (index, name, declared_size) in headers {
        let member = archive
            .by_index(index)
            .map_err(|e| ReconError::Format(format!("{name}: cannot open entry: {e}")))?;

        let mut bytes = Vec::with_capacity(declared_size as usize);
        member
            .take(limits.max_file_bytes.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|e| ReconError::Format(format!("{name}: cannot decompress: {e}")))?;

        if bytes.len() as u64 > limits.max_file_bytes {
            return Err(ReconError::too_large(&name, limits.max_file_bytes));
        }

        log::debug!("extracted {name} ({} bytes)", bytes.len());
        members.push(UploadFile {
            name,
            declared_size,
            bytes,
        });
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(entries: &[(&str, &[u8])]) -> UploadFile {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(data).unwrap();
            }
        }
        let bytes = writer.finish().unwrap().into_inner();
        UploadFile::new("export.zip", bytes)
    }

    #[test]
    fn extracts_only_recognized_members_in_order() {
        let zip = build_zip(&[
            ("connections/", b""),
            ("connections/followers_1.json", b"[]"),
            ("media/photo.jpg", b"\xff\xd8"),
            ("connections/close_friends.json", b"{}"),
            ("connections/following.json", b"{}"),
            ("index.html", b"<html>"),
        ]);
        let members = extract_archive(&zip, &Limits::default()).unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["connections/followers_1.json", "connections/following.json"]);
        assert_eq!(members[0].bytes, b"[]");
    }

    #[test]
    fn no_recognized_members_is_format_error() {
        let zip = build_zip(&[("readme.txt", b"hello"), ("posts_1.json", b"[]")]);
        let err = extract_archive(&zip, &Limits::default()).unwrap_err();
        assert!(matches!(err, ReconError::Format(_)));
    }

    #[test]
    fn missing_followers_before_size_limit() {
        let big = vec![b' '; 64];
        let zip = build_zip(&[("following.json", &big)]);
        let limits = Limits { max_file_bytes: 32, max_entries: 10 };
        assert_eq!(extract_archive(&zip, &limits).unwrap_err(), ReconError::MissingFollowers);
    }

    #[test]
    fn garbage_container_is_format_error() {
        let blob = UploadFile::new("export.zip", b"definitely not a zip".to_vec());
        let err = extract_archive(&blob, &Limits::default()).unwrap_err();
        assert!(matches!(err, ReconError::Format(_)));
    }

    #[test]
    fn oversized_member_names_offender() {
        let big = vec![b' '; 64];
        let zip = build_zip(&[("following.json", b"{}"), ("followers_1.json", &big)]);
        let limits = Limits { max_file_bytes: 32, max_entries: 10 };
        let err = extract_archive(&zip, &limits).unwrap_err();
        assert_eq!(err.file(), Some("followers_1.json"));
        assert!(matches!(err, ReconError::SizeLimit { .. }));
    }

    #[test]
    fn oversized_unrelated_member_is_skipped() {
        let big = vec![b' '; 64];
        let zip = build_zip(&[
            ("media/posts_1.json", &big),
            ("following.json", b"{}"),
            ("followers_1.json", b"[]"),
        ]);
        let limits = Limits { max_file_bytes: 32, max_entries: 10 };
        let members = extract_archive(&zip, &limits).unwrap();
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn entry_count_limit_names_first_member_past_limit() {
        let zip = build_zip(&[
            ("following.json", b"{}"),
            ("followers_1.json", b"[]"),
            ("followers_2.json", b"[]"),
            ("followers_3.json", b"[]"),
        ]);
        let limits = Limits { max_file_bytes: 1024, max_entries: 2 };
        let err = extract_archive(&zip, &limits).unwrap_err();
        assert_eq!(err.file(), Some("followers_2.json"));
    }

    #[test]
    fn unrecognized_members_do_not_count_toward_limits() {
        let big = vec![0u8; 128];
        let zip = build_zip(&[
            ("video.mp4", &big),
            ("notes.json", &big),
            ("following.json", b"{}"),
            ("followers_1.json", b"[]"),
        ]);
        let limits = Limits { max_file_bytes: 16, max_entries: 2 };
        let members = extract_archive(&zip, &limits).unwrap();
        assert_eq!(members.len(), 2);
    }
}
