use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a file's bytes could not be turned into measurement text.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not UTF-8 text", .path.display())]
    NotText { path: PathBuf },

    #[error("unsupported file type .{extension} (export spreadsheets as CSV first)")]
    UnsupportedFormat { extension: String },
}

// ---------------------------------------------------------------------------
// File classification
// ---------------------------------------------------------------------------

/// Role of a user-selected file, decided by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Delimited tracer export (`.csv`, `.txt`).
    Measurement,
    /// Module datasheet (`.pdf`); only its name is used.
    Datasheet,
    /// Anything else, including binary spreadsheets.
    Unsupported,
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

pub fn classify(path: &Path) -> FileKind {
    match extension_of(path).as_str() {
        "csv" | "txt" => FileKind::Measurement,
        "pdf" => FileKind::Datasheet,
        _ => FileKind::Unsupported,
    }
}

/// A user selection split by [`FileKind`], in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub measurements: Vec<PathBuf>,
    pub datasheets: Vec<PathBuf>,
    pub unsupported: Vec<PathBuf>,
}

pub fn sort_selection(paths: impl IntoIterator<Item = PathBuf>) -> Selection {
    let mut selection = Selection::default();
    for path in paths {
        match classify(&path) {
            FileKind::Measurement => selection.measurements.push(path),
            FileKind::Datasheet => selection.datasheets.push(path),
            FileKind::Unsupported => selection.unsupported.push(path),
        }
    }
    selection
}

// ---------------------------------------------------------------------------
// Byte acquisition
// ---------------------------------------------------------------------------

/// The outcome of reading one file, keyed by its file name.
#[derive(Debug)]
pub struct LoadedFile {
    pub name: String,
    pub contents: Result<String, LoadError>,
}

impl LoadedFile {
    /// An already acquired file, e.g. from a drop event or a test.
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: Ok(text.into()),
        }
    }
}

/// File name used as the session key for `path`.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read a tracer export as text.
pub fn read_measurement(path: &Path) -> Result<String, LoadError> {
    if classify(path) != FileKind::Measurement {
        return Err(LoadError::UnsupportedFormat {
            extension: extension_of(path),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LoadError::NotText {
        path: path.to_path_buf(),
    })
}

/// Read every path in parallel. The result keeps the order of `paths`, not
/// the order in which reads finish.
pub fn load_batch(paths: &[PathBuf]) -> Vec<LoadedFile> {
    paths
        .par_iter()
        .map(|path| {
            let contents = read_measurement(path);
            match &contents {
                Ok(text) => log::debug!("read {} ({} bytes)", path.display(), text.len()),
                Err(e) => log::warn!("{e}"),
            }
            LoadedFile {
                name: source_name(path),
                contents,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_extension() {
        assert_eq!(classify(Path::new("a.csv")), FileKind::Measurement);
        assert_eq!(classify(Path::new("A.CSV")), FileKind::Measurement);
        assert_eq!(classify(Path::new("sweep.txt")), FileKind::Measurement);
        assert_eq!(classify(Path::new("module.pdf")), FileKind::Datasheet);
        assert_eq!(classify(Path::new("book.xlsx")), FileKind::Unsupported);
        assert_eq!(classify(Path::new("noext")), FileKind::Unsupported);
    }

    #[test]
    fn selection_keeps_order_per_kind() {
        let selection = sort_selection(
            ["b.csv", "ds.pdf", "a.csv", "x.xlsx", "ds2.pdf"]
                .into_iter()
                .map(PathBuf::from),
        );
        assert_eq!(
            selection.measurements,
            vec![PathBuf::from("b.csv"), PathBuf::from("a.csv")]
        );
        assert_eq!(
            selection.datasheets,
            vec![PathBuf::from("ds.pdf"), PathBuf::from("ds2.pdf")]
        );
        assert_eq!(selection.unsupported, vec![PathBuf::from("x.xlsx")]);
    }

    #[test]
    fn read_rejects_spreadsheets_without_touching_disk() {
        let err = read_measurement(Path::new("/nonexistent/book.xlsx")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { ref extension } if extension == "xlsx"));
    }

    #[test]
    fn batch_reports_failures_in_submission_order() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        let binary = dir.path().join("binary.csv");
        let missing = dir.path().join("missing.csv");
        std::fs::write(&good, "V,I,Vc,Ic\n1,2,1,2\n").unwrap();
        std::fs::write(&binary, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let loaded = load_batch(&[missing, good, binary]);

        let names: Vec<&str> = loaded.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["missing.csv", "good.csv", "binary.csv"]);
        assert!(matches!(loaded[0].contents, Err(LoadError::Unreadable { .. })));
        assert_eq!(loaded[1].contents.as_deref().unwrap(), "V,I,Vc,Ic\n1,2,1,2\n");
        assert!(matches!(loaded[2].contents, Err(LoadError::NotText { .. })));
    }

    #[test]
    fn error_messages_name_the_file() {
        let err = read_measurement(Path::new("/nonexistent/dir/gone.csv")).unwrap_err();
        assert!(err.to_string().contains("gone.csv"));
    }
}
