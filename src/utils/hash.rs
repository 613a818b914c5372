use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::fs;

/// Compute SHA-256 hash of a string
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute SHA-256 hash of a file's contents, or `None` if the file is absent
pub async fn compute_file_hash(path: &Path) -> Result<Option<String>, std::io::Error> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(compute_hash(&content))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash("hello world");
        assert_eq!(
            hash,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[tokio::test]
    async fn test_compute_file_hash_missing_file() {
        let temp = TempDir::new().unwrap();
        let hash = compute_file_hash(&temp.path().join("nope.json")).await.unwrap();
        assert!(hash.is_none());
    }

    #[tokio::test]
    async fn test_compute_file_hash_matches_content_hash() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.json");
        fs::write(&path, "{}").await.unwrap();

        let hash = compute_file_hash(&path).await.unwrap();
        assert_eq!(hash, Some(compute_hash("{}")));
    }
}
