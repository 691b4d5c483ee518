use rayon::prelude::*;
use thiserror::Error;

use super::loader::{LoadError, LoadedFile};
use super::model::Curve;
use super::parser::ParseOptions;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no curve named '{0}' in this session")]
    UnknownKey(String),
}

/// A file from a batch that produced no curve.
#[derive(Debug)]
pub struct FileFailure {
    pub name: String,
    pub error: LoadError,
}

/// Names accepted and files rejected by one [`Session::add_batch`] call.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub accepted: Vec<String>,
    pub failures: Vec<String>,
}

// ---------------------------------------------------------------------------
// Session – analysed curves keyed by source name
// ---------------------------------------------------------------------------

/// All curves of one analysis session plus the curve currently on display.
///
/// Keys are unique. Curves keep the position of their first insertion; a
/// re-upload under the same name replaces the curve in place.
#[derive(Debug, Default)]
pub struct Session {
    curves: Vec<Curve>,
    selected: Option<String>,
    failures: Vec<FileFailure>,
    options: ParseOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse and analyse `text`, then store the curve under `name`.
    pub fn add_file(&mut self, name: &str, text: &str) -> &Curve {
        let curve = Curve::from_text(name, text, &self.options);
        self.insert(curve)
    }

    /// Store an analysed curve, replacing any curve with the same name.
    ///
    /// The first curve added to an empty session becomes the selection;
    /// later additions leave the selection alone.
    pub fn insert(&mut self, curve: Curve) -> &Curve {
        let was_empty = self.curves.is_empty();
        self.failures.retain(|f| f.name != curve.source_name());

        let idx = match self.position(curve.source_name()) {
            Some(idx) => {
                log::info!("replacing curve {}", curve.source_name());
                self.curves[idx] = curve;
                idx
            }
            None => {
                self.curves.push(curve);
                self.curves.len() - 1
            }
        };

        if was_empty {
            self.selected = Some(self.curves[0].source_name().to_string());
        }
        &self.curves[idx]
    }

    /// Analyse an acquired batch and merge it in submission order.
    ///
    /// Files are parsed in parallel; a file that could not be read is
    /// recorded in [`Session::failures`] and does not affect its siblings.
    /// Failures from earlier batches are cleared.
    pub fn add_batch(&mut self, files: Vec<LoadedFile>) -> BatchReport {
        let options = &self.options;
        let results: Vec<Result<Curve, FileFailure>> = files
            .into_par_iter()
            .map(|file| match file.contents {
                Ok(text) => Ok(Curve::from_text(file.name, &text, options)),
                Err(error) => Err(FileFailure {
                    name: file.name,
                    error,
                }),
            })
            .collect();

        self.failures.clear();
        let mut report = BatchReport::default();
        for result in results {
            match result {
                Ok(curve) => {
                    report.accepted.push(curve.source_name().to_string());
                    self.insert(curve);
                }
                Err(failure) => {
                    log::warn!("{}: {}", failure.name, failure.error);
                    report.failures.push(failure.name.clone());
                    self.failures.push(failure);
                }
            }
        }
        log::info!(
            "batch merged: {} accepted, {} failed, {} curve(s) in session",
            report.accepted.len(),
            report.failures.len(),
            self.curves.len()
        );
        report
    }

    /// Make `key` the displayed curve.
    pub fn select(&mut self, key: &str) -> Result<&Curve, SessionError> {
        let idx = self
            .position(key)
            .ok_or_else(|| SessionError::UnknownKey(key.to_string()))?;
        self.selected = Some(key.to_string());
        Ok(&self.curves[idx])
    }

    /// The displayed curve, or `None` for an empty session.
    pub fn current(&self) -> Option<&Curve> {
        self.selected.as_deref().and_then(|key| self.get(key))
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Curve> {
        self.position(key).map(|idx| &self.curves[idx])
    }

    /// Drop a curve. If it was selected, the selection moves to the first
    /// remaining curve.
    pub fn remove(&mut self, key: &str) -> Result<Curve, SessionError> {
        let idx = self
            .position(key)
            .ok_or_else(|| SessionError::UnknownKey(key.to_string()))?;
        let removed = self.curves.remove(idx);
        if self.selected.as_deref() == Some(key) {
            self.selected = self.curves.first().map(|c| c.source_name().to_string());
        }
        Ok(removed)
    }

    /// Failures of the most recent batch.
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.curves.iter().map(Curve::source_name)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.curves.iter().position(|c| c.source_name() == key)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const T1: &str = "V,I,Vc,Ic\n10,2,10,2\n";
    const T2: &str = "V,I,Vc,Ic\n20,3,20,3\n";

    fn unreadable(name: &str) -> LoadedFile {
        LoadedFile {
            name: name.to_string(),
            contents: Err(LoadError::Unreadable {
                path: PathBuf::from(name),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            }),
        }
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(session.current().is_none());
        assert!(session.selected_key().is_none());
    }

    #[test]
    fn first_insert_selects_and_later_ones_do_not() {
        let mut session = Session::new();
        session.add_file("a.csv", T1);
        session.add_file("b.csv", T2);

        assert_eq!(session.selected_key(), Some("a.csv"));
        assert_eq!(session.current().unwrap().source_name(), "a.csv");
        assert_eq!(session.keys().collect::<Vec<_>>(), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn reupload_overwrites_in_place() {
        let mut session = Session::new();
        session.add_file("a.csv", T1);
        session.add_file("b.csv", T1);
        session.add_file("a.csv", T2);

        assert_eq!(session.len(), 2);
        assert_eq!(session.keys().collect::<Vec<_>>(), vec!["a.csv", "b.csv"]);
        let a = session.get("a.csv").unwrap();
        assert_eq!(a.open_circuit_voltage(), 20.0);
        assert_eq!(a.measured_max_power(), 60.0);
    }

    #[test]
    fn select_switches_curve() {
        let mut session = Session::new();
        session.add_file("a.csv", T1);
        session.add_file("b.csv", T2);

        let curve = session.select("b.csv").unwrap();
        assert_eq!(curve.source_name(), "b.csv");
        assert_eq!(session.current().unwrap().source_name(), "b.csv");
    }

    #[test]
    fn select_unknown_key_fails_without_fallback() {
        let mut session = Session::new();
        session.add_file("a.csv", T1);

        let err = session.select("nope.csv").unwrap_err();
        assert!(matches!(err, SessionError::UnknownKey(ref k) if k == "nope.csv"));
        assert_eq!(session.selected_key(), Some("a.csv"));
    }

    #[test]
    fn batch_isolates_unreadable_files() {
        let mut session = Session::new();
        let report = session.add_batch(vec![
            LoadedFile::from_text("good.csv", T1),
            unreadable("bad.csv"),
        ]);

        assert_eq!(report.accepted, vec!["good.csv"]);
        assert_eq!(report.failures, vec!["bad.csv"]);
        assert_eq!(session.len(), 1);
        assert!(session.get("good.csv").is_some());
        assert!(session.get("bad.csv").is_none());
        assert_eq!(session.failures().len(), 1);
        assert_eq!(session.failures()[0].name, "bad.csv");
        assert_eq!(session.selected_key(), Some("good.csv"));
    }

    #[test]
    fn batch_merge_follows_submission_order() {
        let mut session = Session::new();
        let files: Vec<LoadedFile> = (0..32)
            .map(|i| LoadedFile::from_text(format!("s{i:02}.csv"), T1))
            .chain(std::iter::once(LoadedFile::from_text("s00.csv", T2)))
            .collect();
        session.add_batch(files);

        assert_eq!(session.len(), 32);
        assert_eq!(session.keys().next(), Some("s00.csv"));
        assert_eq!(session.selected_key(), Some("s00.csv"));
        // The later submission of s00 wins.
        assert_eq!(session.get("s00.csv").unwrap().open_circuit_voltage(), 20.0);
    }

    #[test]
    fn new_batch_clears_old_failures() {
        let mut session = Session::new();
        session.add_batch(vec![unreadable("bad.csv")]);
        assert_eq!(session.failures().len(), 1);
        assert!(session.current().is_none());

        session.add_batch(vec![LoadedFile::from_text("bad.csv", T1)]);
        assert!(session.failures().is_empty());
        assert_eq!(session.selected_key(), Some("bad.csv"));
    }

    #[test]
    fn removing_selected_curve_moves_selection() {
        let mut session = Session::new();
        session.add_file("a.csv", T1);
        session.add_file("b.csv", T2);

        let removed = session.remove("a.csv").unwrap();
        assert_eq!(removed.source_name(), "a.csv");
        assert_eq!(session.selected_key(), Some("b.csv"));

        session.remove("b.csv").unwrap();
        assert!(session.selected_key().is_none());
        assert!(session.remove("b.csv").is_err());
    }

    #[test]
    fn emptied_session_reselects_on_next_insert() {
        let mut session = Session::new();
        session.add_file("a.csv", T1);
        session.remove("a.csv").unwrap();
        session.add_file("c.csv", T2);
        assert_eq!(session.selected_key(), Some("c.csv"));
    }

    #[test]
    fn empty_file_gives_zero_curve_not_error() {
        let mut session = Session::new();
        let curve = session.add_file("empty.csv", "V,I,Vc,Ic\n");
        assert!(curve.is_empty());
        assert_eq!(curve.measured_max_power(), 0.0);
    }
}
