//! Plain-text rendering of prediction outcomes and reports.

use vifeed_core::{
  batch::{BatchProgress, BatchReport, LineResult},
  dimension::GroupBy,
  predict::PredictionOutcome,
  report::{self, CrossFilter, CrossTab, DimensionOptions, Distribution},
  sentence::SentenceRow,
};

/// One `aspect: sentiment` line per detected pair.
pub fn outcome(outcome: &PredictionOutcome) -> String {
  match outcome {
    PredictionOutcome::Failed { reason } => format!("prediction failed: {reason}\n"),
    PredictionOutcome::Success { predictions } if predictions.is_empty() => {
      "no aspect detected\n".to_string()
    }
    PredictionOutcome::Success { predictions } => predictions
      .iter()
      .map(|p| format!("{}: {}\n", p.aspect, p.sentiment))
      .collect(),
  }
}

pub fn line_result(result: &LineResult, progress: BatchProgress) -> String {
  let mut out = format!(
    "[{}/{} {:>3.0}%] {}\n",
    progress.processed,
    progress.total,
    progress.fraction() * 100.0,
    result.text
  );
  for line in outcome(&result.outcome).lines() {
    out.push_str(&format!("  {line}\n"));
  }
  out
}

/// `stored` is `None` when no database was given.
pub fn batch_summary(report: &BatchReport, stored: Option<usize>) -> String {
  let mut out = format!(
    "{} of {} lines analysed, {} failed",
    report.processed(),
    report.total,
    report.failures()
  );
  if report.stopped {
    out.push_str(" (stopped)");
  }
  if let Some(n) = stored {
    out.push_str(&format!(", {n} sentences stored"));
  }
  out
}

/// The distribution over the rows that pass the full sidebar selection,
/// followed by a cross-tab over every row.
///
/// The cross-tab does not go through the five-dimension filter, so rows
/// missing a semester, course or class still count towards their group.
pub fn report(
  rows: &[SentenceRow],
  options: &DimensionOptions,
  group_by: GroupBy,
) -> String {
  let selected = report::filter_rows(rows, &options.select_all());
  let dist = report::distribution(selected);
  let tab = report::cross_tab(rows, &CrossFilter::default(), group_by);
  format!("{}\n{}", distribution(&dist), cross_tab(&tab))
}

fn counts(title: &str, items: &[report::Count]) -> String {
  let lines: String = items
    .iter()
    .map(|c| format!("  {:<24} {:>6}\n", c.label, c.count))
    .collect();
  format!("{title}\n{lines}")
}

pub fn distribution(dist: &Distribution) -> String {
  if dist.is_empty() {
    return "no sentences match\n".to_string();
  }
  format!(
    "{} sentences\n\n{}\n{}",
    dist.total,
    counts("Sentiment", &dist.sentiment),
    counts("Aspect", &dist.aspect)
  )
}

/// Groups as rows, sentiments as columns.
pub fn cross_tab(tab: &CrossTab) -> String {
  if tab.is_empty() {
    return format!("no data to group by {}\n", tab.group_by);
  }
  let width = tab
    .groups
    .iter()
    .map(|g| g.chars().count())
    .chain([tab.group_by.as_ref().len()])
    .max()
    .unwrap_or_default();

  let mut out = format!("{:<width$}", tab.group_by.as_ref());
  for s in &tab.sentiments {
    out.push_str(&format!(" {s:>10}"));
  }
  out.push('\n');
  for g in &tab.groups {
    out.push_str(&format!("{g:<width$}"));
    for s in &tab.sentiments {
      out.push_str(&format!(" {:>10}", tab.count(g, s)));
    }
    out.push('\n');
  }
  out
}
