use permute_bridge::permute::{Filter, ValueTracker};
use serde::Serialize;
use std::io::Write;

/// Final (or interrupted) state of a `run`, ready for printing.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub symbols: &'a [String],
    pub permutations: u128,
    pub permutations_without_repetitions: u128,
    pub total_computations: u64,
    pub unique_results: usize,
    pub matching_results: usize,
    pub shown_results: usize,
    pub complete: bool,
    pub results: Vec<&'a str>,
}

impl<'a> Report<'a> {
    /// Applies `filter` to the tracker's results and keeps at most `limit` of
    /// the matches for display. Counters always describe the full result set.
    pub fn new(
        symbols: &'a [String],
        tracker: &'a ValueTracker,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Self {
        let matching: Vec<&str> = filter
            .apply(tracker.results().iter().map(String::as_str))
            .collect();
        let matching_results = matching.len();
        let results = match limit {
            Some(limit) => matching.into_iter().take(limit).collect(),
            None => matching,
        };

        Self {
            symbols,
            permutations: tracker.permutations(),
            permutations_without_repetitions: tracker.permutations_without_repetitions(),
            total_computations: tracker.total_computations(),
            unique_results: tracker.len(),
            matching_results,
            shown_results: results.len(),
            complete: tracker.is_complete(),
            results,
        }
    }

    /// Writes one result per line followed by a statistics block.
    pub fn write_text(&self, mut out: impl Write) -> std::io::Result<()> {
        for result in &self.results {
            writeln!(out, "{result}")?;
        }
        if self.results.len() < self.matching_results {
            writeln!(
                out,
                "... {} more",
                self.matching_results - self.results.len()
            )?;
        }
        writeln!(out)?;
        writeln!(out, "symbols:                          {}", self.symbols.len())?;
        writeln!(out, "permutations:                     {}", self.permutations)?;
        writeln!(
            out,
            "permutations without repetitions: {}",
            self.permutations_without_repetitions
        )?;
        writeln!(out, "total computations:               {}", self.total_computations)?;
        writeln!(out, "unique results:                   {}", self.unique_results)?;
        writeln!(out, "matching results:                 {}", self.matching_results)?;
        writeln!(out, "shown results:                    {}", self.shown_results)?;
        if !self.complete {
            writeln!(out, "(incomplete)")?;
        }
        Ok(())
    }

    /// Writes the report as a single JSON document.
    pub fn write_json(&self, mut out: impl Write) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ValueTracker {
        let mut tracker = ValueTracker::new();
        tracker.init(&["a", "a", "b"]).unwrap();
        tracker.add_values(["aab", "aba", "aab", "aba", "baa", "baa"]);
        tracker
    }

    #[test]
    fn text_report_lists_filtered_results_and_counters() {
        let symbols: Vec<String> = vec!["a".into(), "a".into(), "b".into()];
        let tracker = tracker();
        let filter = Filter::default().starts_with("a");
        let report = Report::new(&symbols, &tracker, &filter, Some(1));

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("aab\n... 1 more\n"));
        assert!(text.contains("permutations:                     6\n"));
        assert!(text.contains("permutations without repetitions: 3\n"));
        assert!(text.contains("total computations:               6\n"));
        assert!(text.contains("unique results:                   3\n"));
        assert!(text.contains("matching results:                 2\n"));
        assert!(text.contains("shown results:                    1\n"));
        assert!(!text.contains("incomplete"));
    }

    #[test]
    fn json_report_shape() {
        let symbols: Vec<String> = vec!["a".into(), "a".into(), "b".into()];
        let tracker = tracker();
        let report = Report::new(&symbols, &tracker, &Filter::default(), None);

        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["results"], serde_json::json!(["aab", "aba", "baa"]));
        assert_eq!(value["permutations"], 6);
        assert_eq!(value["permutations_without_repetitions"], 3);
        assert_eq!(value["total_computations"], 6);
        assert_eq!(value["complete"], true);
    }
}
