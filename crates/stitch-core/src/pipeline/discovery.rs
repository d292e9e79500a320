//! Model directory discovery and image set matching.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ordering::{comparator_for, StringComparator};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::types::ModelGroup;

/// Finds model directories and their images, and checks the sets line up.
pub struct GroupMatcher {
    supported_formats: Vec<String>,
    output_dir_name: String,
    comparator: Box<dyn StringComparator>,
}

impl GroupMatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            supported_formats: config
                .processing
                .supported_formats
                .iter()
                .map(|f| f.to_lowercase())
                .collect(),
            output_dir_name: config.output.dir_name.clone(),
            comparator: comparator_for(config.processing.sort),
        }
    }

    /// Scan `root` for model directories.
    ///
    /// Every group is returned with its files sorted; fails if the groups
    /// hold different numbers of images.
    pub fn scan(&self, root: &Path) -> PipelineResult<Vec<ModelGroup>> {
        let mut dirs: Vec<(String, PathBuf)> = immediate_children(root)
            .filter(|(_, path)| path.is_dir())
            .filter(|(name, _)| !name.starts_with('.') && *name != self.output_dir_name)
            .collect();
        if dirs.is_empty() {
            return Err(PipelineError::NoModelGroups(root.to_path_buf()));
        }
        dirs.sort_by(|(a, _), (b, _)| self.comparator.compare(a, b));

        let groups: Vec<ModelGroup> = dirs
            .into_iter()
            .map(|(name, dir)| {
                let files = self.list_images(&dir);
                tracing::info!("{} : {}", name, files.len());
                ModelGroup { name, dir, files }
            })
            .collect();

        Self::check_counts(&groups)?;
        Ok(groups)
    }

    /// Ensure every group has the same number of images; returns that number.
    pub fn check_counts(groups: &[ModelGroup]) -> PipelineResult<usize> {
        let expected = groups.first().map(ModelGroup::len).unwrap_or(0);
        if groups.iter().all(|g| g.len() == expected) {
            return Ok(expected);
        }
        Err(PipelineError::GroupCountMismatch {
            counts: groups.iter().map(|g| (g.name.clone(), g.len())).collect(),
        })
    }

    /// Supported image filenames directly inside `dir`, in display order.
    fn list_images(&self, dir: &Path) -> Vec<String> {
        let mut files: Vec<String> = immediate_children(dir)
            .filter(|(_, path)| path.is_file() && self.is_supported(path))
            .map(|(name, _)| name)
            .collect();
        files.sort_by(|a, b| self.comparator.compare(a, b));
        files
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.supported_formats.iter().any(|fmt| *fmt == ext_lower)
            })
            .unwrap_or(false)
    }
}

/// `(name, path)` of each entry directly inside `dir`; unreadable entries
/// and non-UTF-8 names are skipped.
fn immediate_children(dir: &Path) -> impl Iterator<Item = (String, PathBuf)> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            Some((name, entry.into_path()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortOrder;
    use std::fs;

    fn touch(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            fs::write(dir.join(name), b"x").unwrap();
        }
    }

    fn matcher() -> GroupMatcher {
        GroupMatcher::new(&Config::default())
    }

    #[test]
    fn test_is_supported() {
        let m = matcher();
        assert!(m.is_supported(Path::new("test.jpg")));
        assert!(m.is_supported(Path::new("test.JPG")));
        assert!(m.is_supported(Path::new("test.jpeg")));
        assert!(m.is_supported(Path::new("test.png")));
        assert!(m.is_supported(Path::new("test.Bmp")));
        assert!(!m.is_supported(Path::new("test.webp")));
        assert!(!m.is_supported(Path::new("test.txt")));
        assert!(!m.is_supported(Path::new("jpg")));
    }

    #[test]
    fn test_scan_sorts_models_and_files() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("cam10"), &["img10.jpg", "img2.JPG", "notes.txt"]);
        touch(&root.path().join("cam2"), &["b.png", "a.bmp"]);
        touch(&root.path().join(".hidden"), &["x.jpg"]);
        touch(&root.path().join("Results"), &["old-1.jpg"]);
        fs::write(root.path().join("loose.jpg"), b"x").unwrap();

        let groups = matcher().scan(root.path()).unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["cam2", "cam10"]);
        assert_eq!(groups[0].files, vec!["a.bmp", "b.png"]);
        assert_eq!(groups[1].files, vec!["img2.JPG", "img10.jpg"]);
        assert_eq!(groups[1].dir, root.path().join("cam10"));
    }

    #[test]
    fn test_lexical_sort_order() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("A"), &["img10.jpg", "img2.jpg"]);

        let mut config = Config::default();
        config.processing.sort = SortOrder::Lexical;
        let groups = GroupMatcher::new(&config).scan(root.path()).unwrap();
        assert_eq!(groups[0].files, vec!["img10.jpg", "img2.jpg"]);
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let root = tempfile::tempdir().unwrap();
        touch(&root.path().join("A"), &["1.jpg", "2.jpg"]);
        touch(&root.path().join("B"), &["1.jpg", "2.jpg", "3.jpg"]);

        let err = matcher().scan(root.path()).unwrap_err();
        match err {
            PipelineError::GroupCountMismatch { counts } => {
                assert_eq!(counts, vec![("A".to_string(), 2), ("B".to_string(), 3)]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_no_model_directories() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("photo.jpg"), b"x").unwrap();
        let err = matcher().scan(root.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NoModelGroups(_)));
    }

    #[test]
    fn test_check_counts() {
        let group = |name: &str, n: usize| ModelGroup {
            name: name.to_string(),
            dir: PathBuf::from(name),
            files: (0..n).map(|i| format!("{i}.jpg")).collect(),
        };
        assert_eq!(GroupMatcher::check_counts(&[group("A", 3), group("B", 3)]).unwrap(), 3);
        assert_eq!(GroupMatcher::check_counts(&[]).unwrap(), 0);
        assert!(GroupMatcher::check_counts(&[group("A", 3), group("B", 0)]).is_err());
    }
}
