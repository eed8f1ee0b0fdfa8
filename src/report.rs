use crate::collision::{CollisionRecord, SearchOutcome};
use crate::nonce::NonceStrategy;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const RESULTS_FILE: &str = "collision_results.txt";

const RULE: &str = "--------------------------------------------------";

/// Renders the plain-text report for a collision
///
/// The numeric-suffix report includes both full candidate texts; the newline report gives the
/// number of newlines appended instead.
pub fn render_report(
    record: &CollisionRecord,
    strategy: NonceStrategy,
    base_a: &str,
    base_b: &str,
) -> String {
    match strategy {
        NonceStrategy::NumericSuffix => format!(
            "Collision found with {n} matching hex digits: {suffix}\n\
             {rule}\n\
             File 1 :\n\
             Content: {base_a}{nonce_a}\n\
             Full Hash: {digest_a}\n\
             {rule}\n\
             File 2 :\n\
             Content: {base_b}{nonce_b}\n\
             Full Hash: {digest_b}\n",
            n = record.num_digits,
            suffix = record.suffix(),
            rule = RULE,
            base_a = base_a,
            nonce_a = strategy.render(record.nonce_a),
            digest_a = record.digest_a,
            base_b = base_b,
            nonce_b = strategy.render(record.nonce_b),
            digest_b = record.digest_b,
        ),
        NonceStrategy::Newlines => format!(
            "Collision found with {n} matching hex digits: {suffix}\n\
             (Method: Adding newlines)\n\
             {rule}\n\
             File 1:\n\
             Newlines Added: {nonce_a}\n\
             Full Hash: {digest_a}\n\
             {rule}\n\
             File 2:\n\
             Newlines Added: {nonce_b}\n\
             Full Hash: {digest_b}\n",
            n = record.num_digits,
            suffix = record.suffix(),
            rule = RULE,
            nonce_a = record.nonce_a,
            digest_a = record.digest_a,
            nonce_b = record.nonce_b,
            digest_b = record.digest_b,
        ),
    }
}

/// The directory collision reports are written to
#[derive(Debug, Clone)]
pub struct ResultsDir {
    path: PathBuf,
}

impl ResultsDir {
    /// Creates the directory if needed and removes a report left by a previous run
    ///
    /// Returns whether a stale report was wiped.
    pub fn prepare<P: AsRef<Path>>(path: P) -> io::Result<(Self, bool)> {
        let path = path.as_ref().to_path_buf();
        fs::create_dir_all(&path)?;

        let report = path.join(RESULTS_FILE);
        let wiped = match fs::remove_file(&report) {
            Ok(()) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e),
        };

        Ok((ResultsDir { path }, wiped))
    }

    pub fn report_path(&self) -> PathBuf {
        self.path.join(RESULTS_FILE)
    }

    /// Writes the report for a found collision; other outcomes leave the directory untouched
    pub fn publish(
        &self,
        outcome: &SearchOutcome,
        strategy: NonceStrategy,
        base_a: &str,
        base_b: &str,
    ) -> io::Result<Option<PathBuf>> {
        let record = match outcome.collision() {
            Some(record) => record,
            None => return Ok(None),
        };

        let path = self.report_path();
        fs::write(&path, render_report(record, strategy, base_a, base_b))?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CollisionRecord {
        CollisionRecord {
            num_digits: 3,
            nonce_a: 12,
            nonce_b: 0,
            digest_a: "0123abc".to_owned(),
            digest_b: "9876abc".to_owned(),
        }
    }

    #[test]
    fn numeric_report_layout() {
        let report = render_report(&record(), NonceStrategy::NumericSuffix, "cat", "dog");
        assert_eq!(
            report,
            "Collision found with 3 matching hex digits: abc\n\
             --------------------------------------------------\n\
             File 1 :\n\
             Content: cat12\n\
             Full Hash: 0123abc\n\
             --------------------------------------------------\n\
             File 2 :\n\
             Content: dog0\n\
             Full Hash: 9876abc\n"
        );
    }

    #[test]
    fn newline_report_layout() {
        let report = render_report(&record(), NonceStrategy::Newlines, "cat", "dog");
        assert_eq!(
            report,
            "Collision found with 3 matching hex digits: abc\n\
             (Method: Adding newlines)\n\
             --------------------------------------------------\n\
             File 1:\n\
             Newlines Added: 12\n\
             Full Hash: 0123abc\n\
             --------------------------------------------------\n\
             File 2:\n\
             Newlines Added: 0\n\
             Full Hash: 9876abc\n"
        );
    }

    #[test]
    fn prepare_wipes_stale_report() {
        let dir = tempfile::tempdir().unwrap();
        let results = dir.path().join("results");

        let (_, wiped) = ResultsDir::prepare(&results).unwrap();
        assert!(!wiped);

        fs::write(results.join(RESULTS_FILE), "old").unwrap();
        let (prepared, wiped) = ResultsDir::prepare(&results).unwrap();
        assert!(wiped);
        assert!(!prepared.report_path().exists());
    }

    #[test]
    fn only_found_outcomes_are_published() {
        let dir = tempfile::tempdir().unwrap();
        let (results, _) = ResultsDir::prepare(dir.path()).unwrap();

        for outcome in [SearchOutcome::Cancelled, SearchOutcome::Exhausted].iter() {
            let written = results.publish(outcome, NonceStrategy::Newlines, "cat", "dog").unwrap();
            assert_eq!(written, None);
            assert!(!results.report_path().exists());
        }

        let found = SearchOutcome::Found(record());
        let written = results.publish(&found, NonceStrategy::Newlines, "cat", "dog").unwrap();
        assert_eq!(written.as_deref(), Some(results.report_path().as_path()));
        assert_eq!(
            fs::read_to_string(results.report_path()).unwrap(),
            render_report(&record(), NonceStrategy::Newlines, "cat", "dog")
        );
    }
}
