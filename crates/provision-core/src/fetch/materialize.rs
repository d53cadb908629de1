//! Turning a staged download into files under the target directory.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::config::MaterializeMode;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const USTAR_MAGIC: &[u8] = b"ustar";
const USTAR_OFFSET: usize = 257;

/// What a staged file looks like on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Tar,
    TarGz,
    Plain,
}

/// Outcome of materializing one staged file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    /// Archive unpacked into the target directory.
    Extracted(ArtifactKind),
    /// File copied verbatim to this path.
    Copied(PathBuf),
}

/// Classifies a file by its leading bytes (gzip magic, or POSIX `ustar` header).
pub fn sniff(path: &Path) -> Result<ArtifactKind> {
    let mut head = Vec::with_capacity(512);
    File::open(path)
        .with_context(|| format!("open {}", path.display()))?
        .take(512)
        .read_to_end(&mut head)
        .with_context(|| format!("read {}", path.display()))?;

    if head.starts_with(&GZIP_MAGIC) {
        Ok(ArtifactKind::TarGz)
    } else if head.get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()) == Some(USTAR_MAGIC) {
        Ok(ArtifactKind::Tar)
    } else {
        Ok(ArtifactKind::Plain)
    }
}

/// Unpacks a tar archive (gzip-compressed or not) into `target`.
///
/// Files without a gzip header are read as plain tar, so pre-POSIX archives
/// without the `ustar` magic still unpack. Entries escaping `target` are skipped
/// by the `tar` crate.
pub fn extract_archive(archive: &Path, target: &Path) -> Result<ArtifactKind> {
    let kind = match sniff(archive)? {
        ArtifactKind::TarGz => ArtifactKind::TarGz,
        _ => ArtifactKind::Tar,
    };
    let file = BufReader::new(
        File::open(archive).with_context(|| format!("open {}", archive.display()))?,
    );
    let result = match kind {
        ArtifactKind::TarGz => tar::Archive::new(GzDecoder::new(file)).unpack(target),
        _ => tar::Archive::new(file).unpack(target),
    };
    result.with_context(|| {
        format!(
            "extract {} into {}",
            archive.display(),
            target.display()
        )
    })?;
    Ok(kind)
}

/// Copies `source` to `target/file_name`, overwriting any existing file.
pub fn copy_into(source: &Path, target: &Path, file_name: &str) -> Result<PathBuf> {
    let dest = target.join(file_name);
    fs::copy(source, &dest)
        .with_context(|| format!("copy {} to {}", source.display(), dest.display()))?;
    Ok(dest)
}

/// Whether a staged file should be unpacked (as opposed to copied) under `mode`.
pub fn should_extract(mode: MaterializeMode, staged: &Path) -> Result<bool> {
    Ok(match mode {
        MaterializeMode::Extract => true,
        MaterializeMode::Copy => false,
        MaterializeMode::Auto => sniff(staged)? != ArtifactKind::Plain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;

    fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, data.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn gz(bytes: &[u8]) -> Vec<u8> {
        use std::io::Write;
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn sniff_detects_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let tar_path = dir.path().join("a.tar");
        fs::write(&tar_path, tar_bytes(&[("x.txt", "x")])).unwrap();
        let gz_path = dir.path().join("a.tar.gz");
        fs::write(&gz_path, gz(&tar_bytes(&[("x.txt", "x")]))).unwrap();
        let plain = dir.path().join("VGG_mean.binaryproto");
        fs::write(&plain, b"\x08\x01\x10\x03").unwrap();

        assert_eq!(sniff(&tar_path).unwrap(), ArtifactKind::Tar);
        assert_eq!(sniff(&gz_path).unwrap(), ArtifactKind::TarGz);
        assert_eq!(sniff(&plain).unwrap(), ArtifactKind::Plain);
    }

    #[test]
    fn extract_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        fs::create_dir(&target).unwrap();

        let tar_path = dir.path().join("val.tar");
        fs::write(
            &tar_path,
            tar_bytes(&[("VOCdevkit/VOC2007/JPEGImages/000001.jpg", "jpeg")]),
        )
        .unwrap();
        assert_eq!(extract_archive(&tar_path, &target).unwrap(), ArtifactKind::Tar);

        let gz_path = dir.path().join("neg.tar.gz");
        fs::write(&gz_path, gz(&tar_bytes(&[("neg/0001.jpg", "neg")]))).unwrap();
        assert_eq!(extract_archive(&gz_path, &target).unwrap(), ArtifactKind::TarGz);

        assert_eq!(
            fs::read(target.join("VOCdevkit/VOC2007/JPEGImages/000001.jpg")).unwrap(),
            b"jpeg"
        );
        assert_eq!(fs::read(target.join("neg/0001.jpg")).unwrap(), b"neg");
    }

    #[test]
    fn extract_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.tar");
        fs::write(&bogus, b"<html>not found</html>").unwrap();
        assert!(extract_archive(&bogus, dir.path()).is_err());
    }

    #[test]
    fn auto_mode_copies_plain_files() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("02-model.caffemodel");
        fs::write(&staged, b"weights").unwrap();
        let target = dir.path().join("model_data");
        fs::create_dir(&target).unwrap();

        assert!(!should_extract(MaterializeMode::Auto, &staged).unwrap());
        let dest = copy_into(&staged, &target, "model.caffemodel").unwrap();
        assert_eq!(dest, target.join("model.caffemodel"));
        assert_eq!(fs::read(dest).unwrap(), b"weights");
    }

    #[test]
    fn explicit_modes_ignore_content() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("bundle.tar");
        fs::write(&staged, tar_bytes(&[("inner.txt", "inner")])).unwrap();
        let plain = dir.path().join("plain.bin");
        fs::write(&plain, b"plain").unwrap();

        assert!(should_extract(MaterializeMode::Auto, &staged).unwrap());
        assert!(!should_extract(MaterializeMode::Copy, &staged).unwrap());
        assert!(should_extract(MaterializeMode::Extract, &plain).unwrap());
    }
}
