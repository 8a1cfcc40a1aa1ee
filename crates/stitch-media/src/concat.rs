//! Concat-demuxer manifest writing.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write an FFmpeg concat manifest listing `paths` in the given order.
///
/// Callers are responsible for ordering; the audio collector passes chunks
/// by ascending original index, gaps simply absent.
pub async fn write_concat_manifest(paths: &[PathBuf], manifest: &Path) -> io::Result<()> {
    let mut contents = String::new();
    for path in paths {
        contents.push_str("file '");
        contents.push_str(&escape_path(path));
        contents.push_str("'\n");
    }
    fs::write(manifest, contents).await?;
    Ok(())
}

/// Escape a path for the concat demuxer's single-quoted syntax.
fn escape_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "'\\''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manifest_preserves_order() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("chunks.txt");

        let paths = vec![
            PathBuf::from("/work/audio/chunk_1.wav"),
            PathBuf::from("/work/audio/chunk_2.wav"),
            PathBuf::from("/work/audio/chunk_5.wav"),
        ];
        write_concat_manifest(&paths, &manifest).await.unwrap();

        let contents = fs::read_to_string(&manifest).await.unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "file '/work/audio/chunk_1.wav'",
                "file '/work/audio/chunk_2.wav'",
                "file '/work/audio/chunk_5.wav'",
            ]
        );
    }

    #[test]
    fn test_single_quote_escaping() {
        let escaped = escape_path(Path::new("/work/it's here/chunk_1.wav"));
        assert_eq!(escaped, "/work/it'\\''s here/chunk_1.wav");
    }

    #[tokio::test]
    async fn test_empty_manifest_is_empty_file() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("chunks.txt");

        write_concat_manifest(&[], &manifest).await.unwrap();
        assert_eq!(fs::read_to_string(&manifest).await.unwrap(), "");
    }
}
