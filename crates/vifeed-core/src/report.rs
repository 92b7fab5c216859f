//! The reporting pipeline: filtering and grouped counts over the
//! denormalized sentence view.
//!
//! Every function here is pure. Callers load the view once from a
//! [`FeedbackStore`](crate::store::FeedbackStore) and derive as many reports
//! from it as they like. Empty input is always valid and yields an empty
//! report; selector values that never occur yield zero counts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{
  dimension::{Dimension, GroupBy},
  sentence::{SentenceRow, course_label},
};

/// The sidebar shows at most this many semesters and classes.
pub const SIDEBAR_OPTION_CAP: usize = 8;

// ─── Options ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOption {
  pub code: String,
  pub name: String,
}

impl CourseOption {
  pub fn label(&self) -> String { course_label(&self.code, Some(&self.name)) }
}

/// The selectable values of each dimension, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionOptions {
  pub aspects:    Vec<String>,
  pub sentiments: Vec<String>,
  pub semesters:  Vec<String>,
  pub courses:    Vec<CourseOption>,
  pub classes:    Vec<String>,
}

impl DimensionOptions {
  /// The lists as shown in the sidebar: semesters and classes are capped at
  /// [`SIDEBAR_OPTION_CAP`]. Cross-tab and trend selectors use the full lists.
  pub fn sidebar(&self) -> Self {
    let mut capped = self.clone();
    capped.semesters.truncate(SIDEBAR_OPTION_CAP);
    capped.classes.truncate(SIDEBAR_OPTION_CAP);
    capped
  }

  /// A filter with every listed value selected, the sidebar's default.
  pub fn select_all(&self) -> DimensionFilter {
    DimensionFilter {
      aspects:    self.aspects.iter().cloned().collect(),
      sentiments: self.sentiments.iter().cloned().collect(),
      semesters:  self.semesters.iter().cloned().collect(),
      courses:    self.courses.iter().map(|c| c.code.clone()).collect(),
      classes:    self.classes.iter().cloned().collect(),
    }
  }
}

// ─── Multi-dimension filter ──────────────────────────────────────────────────

/// Allowed values per dimension. A row passes only if each of its five
/// labels is in the corresponding set, so an empty set rejects everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionFilter {
  #[serde(default)]
  pub aspects:    BTreeSet<String>,
  #[serde(default)]
  pub sentiments: BTreeSet<String>,
  #[serde(default)]
  pub semesters:  BTreeSet<String>,
  /// Course codes.
  #[serde(default)]
  pub courses:    BTreeSet<String>,
  #[serde(default)]
  pub classes:    BTreeSet<String>,
}

impl DimensionFilter {
  pub fn allowed(&self, dimension: Dimension) -> &BTreeSet<String> {
    match dimension {
      Dimension::Aspect => &self.aspects,
      Dimension::Sentiment => &self.sentiments,
      Dimension::Semester => &self.semesters,
      Dimension::Course => &self.courses,
      Dimension::Class => &self.classes,
    }
  }

  /// A missing label is never a member.
  pub fn matches(&self, row: &SentenceRow) -> bool {
    [
      Dimension::Aspect,
      Dimension::Sentiment,
      Dimension::Semester,
      Dimension::Course,
      Dimension::Class,
    ]
    .into_iter()
    .all(|dim| {
      dim
        .value_of(row)
        .is_some_and(|value| self.allowed(dim).contains(value))
    })
  }
}

pub fn filter_rows<'a, I>(rows: I, filter: &DimensionFilter) -> Vec<&'a SentenceRow>
where
  I: IntoIterator<Item = &'a SentenceRow>,
{
  rows.into_iter().filter(|row| filter.matches(row)).collect()
}

// ─── Single-value selectors ──────────────────────────────────────────────────

/// Either every value of a dimension or exactly one. Serialised as an
/// optional string, `null` meaning "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Selector {
  #[default]
  All,
  Only(String),
}

impl Selector {
  /// `All` admits rows with a missing label too.
  pub fn admits(&self, value: Option<&str>) -> bool {
    match self {
      Self::All => true,
      Self::Only(wanted) => value == Some(wanted.as_str()),
    }
  }
}

impl From<Option<String>> for Selector {
  fn from(value: Option<String>) -> Self {
    match value {
      Some(v) if !v.is_empty() => Self::Only(v),
      _ => Self::All,
    }
  }
}

impl From<Selector> for Option<String> {
  fn from(s: Selector) -> Self {
    match s {
      Selector::All => None,
      Selector::Only(v) => Some(v),
    }
  }
}

/// Sub-filter applied to the full view before cross-tabulating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossFilter {
  #[serde(default)]
  pub semester: Selector,
  #[serde(default)]
  pub course:   Selector,
  #[serde(default)]
  pub class:    Selector,
}

impl CrossFilter {
  pub fn admits(&self, row: &SentenceRow) -> bool {
    self.semester.admits(row.semester.as_deref())
      && self.course.admits(row.course.as_deref())
      && self.class.admits(row.class.as_deref())
  }
}

// ─── Distribution ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
  pub label: String,
  pub count: u64,
}

/// Independent frequency counts of sentiment and aspect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
  /// Number of rows counted.
  pub total:     usize,
  pub sentiment: Vec<Count>,
  pub aspect:    Vec<Count>,
}

impl Distribution {
  pub fn is_empty(&self) -> bool { self.total == 0 }
}

pub fn distribution<'a, I>(rows: I) -> Distribution
where
  I: IntoIterator<Item = &'a SentenceRow>,
{
  let rows: Vec<&SentenceRow> = rows.into_iter().collect();
  Distribution {
    total:     rows.len(),
    sentiment: value_counts(&rows, Dimension::Sentiment),
    aspect:    value_counts(&rows, Dimension::Aspect),
  }
}

/// Counts per label, most frequent first; ties by label. Missing labels are
/// not counted.
pub fn value_counts(rows: &[&SentenceRow], dimension: Dimension) -> Vec<Count> {
  let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
  for value in rows.iter().filter_map(|row| dimension.value_of(row)) {
    *counts.entry(value).or_default() += 1;
  }

  let mut out: Vec<Count> = counts
    .into_iter()
    .map(|(label, count)| Count { label: label.to_owned(), count })
    .collect();
  // BTreeMap order gives the label tiebreak; the sort is stable.
  out.sort_by(|a, b| b.count.cmp(&a.count));
  out
}

// ─── Cross-tabulation ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
  pub group:     String,
  pub sentiment: String,
  pub count:     u64,
}

/// Sentiment counts per group value, in long form for stacked charts.
///
/// `cells` holds every `(group, sentiment)` combination of `groups` ×
/// `sentiments`, zero-filled, groups outermost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
  pub group_by:   GroupBy,
  pub groups:     Vec<String>,
  pub sentiments: Vec<String>,
  pub cells:      Vec<Cell>,
}

impl CrossTab {
  pub fn is_empty(&self) -> bool { self.cells.is_empty() }

  pub fn count(&self, group: &str, sentiment: &str) -> u64 {
    self
      .cells
      .iter()
      .find(|c| c.group == group && c.sentiment == sentiment)
      .map_or(0, |c| c.count)
  }
}

pub fn cross_tab<'a, I>(rows: I, filter: &CrossFilter, group_by: GroupBy) -> CrossTab
where
  I: IntoIterator<Item = &'a SentenceRow>,
{
  let dimension = Dimension::from(group_by);
  let pivot = Pivot::build(
    rows
      .into_iter()
      .filter(|row| filter.admits(row))
      .filter_map(|row| Some((dimension.value_of(row)?, row.sentiment.as_deref()?))),
  );

  CrossTab {
    group_by,
    cells: pivot.cells(),
    groups: pivot.groups,
    sentiments: pivot.sentiments,
  }
}

// ─── Trend ───────────────────────────────────────────────────────────────────

/// Fewer distinct semesters than this and there is no trend to draw.
pub const MIN_TREND_SEMESTERS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendQuery {
  pub aspect: String,
  #[serde(default)]
  pub course: Selector,
  #[serde(default)]
  pub class:  Selector,
}

impl TrendQuery {
  pub fn new(aspect: impl Into<String>) -> Self {
    Self {
      aspect: aspect.into(),
      course: Selector::All,
      class:  Selector::All,
    }
  }
}

/// Sentiment counts per semester for one aspect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Trend {
  /// Informational: not enough semesters remain after filtering.
  Insufficient { semesters: usize },
  Series {
    aspect:     String,
    /// One entry per distinct semester, chronological.
    semesters:  Vec<String>,
    sentiments: Vec<String>,
    /// `group` is the semester; zero-filled like [`CrossTab::cells`].
    points:     Vec<Cell>,
  },
}

impl Trend {
  pub fn is_sufficient(&self) -> bool { matches!(self, Self::Series { .. }) }
}

pub fn trend<'a, I>(rows: I, query: &TrendQuery) -> Trend
where
  I: IntoIterator<Item = &'a SentenceRow>,
{
  let pivot = Pivot::build(
    rows
      .into_iter()
      .filter(|row| {
        query.course.admits(row.course.as_deref())
          && query.class.admits(row.class.as_deref())
          && row.aspect.as_deref() == Some(query.aspect.as_str())
      })
      .filter_map(|row| Some((row.semester.as_deref()?, row.sentiment.as_deref()?))),
  );

  if pivot.groups.len() < MIN_TREND_SEMESTERS {
    return Trend::Insufficient { semesters: pivot.groups.len() };
  }

  Trend::Series {
    aspect:     query.aspect.clone(),
    points:     pivot.cells(),
    semesters:  pivot.groups,
    sentiments: pivot.sentiments,
  }
}

// ─── Pivot ───────────────────────────────────────────────────────────────────

/// Two-level count table with sorted axes.
struct Pivot {
  groups:     Vec<String>,
  sentiments: Vec<String>,
  counts:     BTreeMap<(String, String), u64>,
}

impl Pivot {
  fn build<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> Self {
    let mut groups = BTreeSet::new();
    let mut sentiments = BTreeSet::new();
    let mut counts = BTreeMap::new();

    for (group, sentiment) in pairs {
      groups.insert(group.to_owned());
      sentiments.insert(sentiment.to_owned());
      *counts
        .entry((group.to_owned(), sentiment.to_owned()))
        .or_default() += 1;
    }

    Self {
      groups: groups.into_iter().collect(),
      sentiments: sentiments.into_iter().collect(),
      counts,
    }
  }

  fn cells(&self) -> Vec<Cell> {
    self
      .groups
      .iter()
      .flat_map(|group| {
        self.sentiments.iter().map(move |sentiment| Cell {
          group:     group.clone(),
          sentiment: sentiment.clone(),
          count:     self
            .counts
            .get(&(group.clone(), sentiment.clone()))
            .copied()
            .unwrap_or(0),
        })
      })
      .collect()
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn row(
    aspect: &str,
    sentiment: &str,
    semester: &str,
    course: &str,
    class: &str,
  ) -> SentenceRow {
    SentenceRow {
      id: format!("{aspect}/{sentiment}/{semester}/{course}/{class}"),
      text: "câu phản hồi".into(),
      aspect: Some(aspect.into()),
      sentiment: Some(sentiment.into()),
      semester: Some(semester.into()),
      course: Some(course.into()),
      course_name: None,
      academic_year: None,
      class: Some(class.into()),
      student_code: None,
    }
  }

  /// Ten rows over two aspects × two sentiments.
  fn sample() -> Vec<SentenceRow> {
    vec![
      row("A1", "S1", "2024HK1", "CS101", "K47A"),
      row("A1", "S1", "2024HK2", "CS101", "K47A"),
      row("A1", "S1", "2024HK1", "DB303", "K47B"),
      row("A1", "S2", "2024HK1", "CS101", "K47A"),
      row("A1", "S2", "2024HK2", "DB303", "K47B"),
      row("A2", "S1", "2024HK1", "CS101", "K47A"),
      row("A2", "S1", "2024HK2", "CS101", "K47B"),
      row("A2", "S2", "2024HK1", "DB303", "K47A"),
      row("A2", "S2", "2024HK2", "DB303", "K47B"),
      row("A2", "S2", "2024HK2", "CS101", "K47A"),
    ]
  }

  fn options(rows: &[SentenceRow]) -> DimensionOptions {
    let collect = |dim: Dimension| {
      rows
        .iter()
        .filter_map(|r| dim.value_of(r).map(str::to_owned))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
    };
    DimensionOptions {
      aspects:    collect(Dimension::Aspect),
      sentiments: collect(Dimension::Sentiment),
      semesters:  collect(Dimension::Semester),
      courses:    collect(Dimension::Course)
        .into_iter()
        .map(|code| CourseOption { code, name: String::new() })
        .collect(),
      classes:    collect(Dimension::Class),
    }
  }

  fn set(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
  }

  // ── Filter ──────────────────────────────────────────────────────────────

  #[test]
  fn select_all_keeps_every_row() {
    let rows = sample();
    let filter = options(&rows).select_all();
    assert_eq!(filter_rows(&rows, &filter).len(), rows.len());
  }

  #[test]
  fn filter_is_and_of_memberships() {
    let rows = sample();
    let mut filter = options(&rows).select_all();
    filter.aspects = set(&["A1"]);
    filter.sentiments = set(&["S1"]);

    let kept = filter_rows(&rows, &filter);
    let expected = rows
      .iter()
      .filter(|r| r.aspect.as_deref() == Some("A1") && r.sentiment.as_deref() == Some("S1"))
      .count();
    assert_eq!(kept.len(), expected);
    assert_eq!(kept.len(), 3);
    assert!(kept.iter().all(|r| {
      r.aspect.as_deref() == Some("A1") && r.sentiment.as_deref() == Some("S1")
    }));
  }

  #[test]
  fn empty_allowed_set_rejects_everything() {
    let rows = sample();
    for dim in [
      Dimension::Aspect,
      Dimension::Sentiment,
      Dimension::Semester,
      Dimension::Course,
      Dimension::Class,
    ] {
      let mut filter = options(&rows).select_all();
      match dim {
        Dimension::Aspect => filter.aspects.clear(),
        Dimension::Sentiment => filter.sentiments.clear(),
        Dimension::Semester => filter.semesters.clear(),
        Dimension::Course => filter.courses.clear(),
        Dimension::Class => filter.classes.clear(),
      }
      assert!(filter_rows(&rows, &filter).is_empty(), "{dim}");
    }
  }

  #[test]
  fn missing_label_fails_membership() {
    let mut rows = sample();
    let filter = options(&rows).select_all();
    rows.push(SentenceRow {
      aspect: Some("A1".into()),
      sentiment: Some("S1".into()),
      ..Default::default()
    });
    assert_eq!(filter_rows(&rows, &filter).len(), 10);
  }

  #[test]
  fn unknown_values_match_nothing() {
    let rows = sample();
    let mut filter = options(&rows).select_all();
    filter.classes = set(&["K99Z"]);
    assert!(filter_rows(&rows, &filter).is_empty());
  }

  // ── Options ─────────────────────────────────────────────────────────────

  #[test]
  fn sidebar_caps_semesters_and_classes() {
    let opts = DimensionOptions {
      aspects:    (0..9).map(|i| format!("a{i}")).collect(),
      sentiments: vec!["Negative".into()],
      semesters:  (0..12).map(|i| format!("s{i}")).collect(),
      courses:    vec![],
      classes:    (0..10).map(|i| format!("c{i}")).collect(),
    };
    let sidebar = opts.sidebar();
    assert_eq!(sidebar.semesters.len(), SIDEBAR_OPTION_CAP);
    assert_eq!(sidebar.classes.len(), SIDEBAR_OPTION_CAP);
    assert_eq!(sidebar.aspects.len(), 9);
    assert_eq!(sidebar.semesters[0], "s0");
  }

  // ── Distribution ────────────────────────────────────────────────────────

  #[test]
  fn distribution_sums_to_row_count() {
    let rows = sample();
    let mut filter = options(&rows).select_all();
    filter.semesters = set(&["2024HK2"]);
    let kept = filter_rows(&rows, &filter);
    let dist = distribution(kept.iter().copied());

    assert_eq!(dist.total, kept.len());
    assert_eq!(
      dist.sentiment.iter().map(|c| c.count).sum::<u64>(),
      kept.len() as u64
    );
    assert_eq!(dist.aspect.iter().map(|c| c.count).sum::<u64>(), kept.len() as u64);
  }

  #[test]
  fn distribution_orders_by_frequency() {
    let rows = sample();
    let dist = distribution(&rows);
    assert_eq!(dist.sentiment[0], Count { label: "S1".into(), count: 5 });
    assert_eq!(dist.sentiment[1], Count { label: "S2".into(), count: 5 });
    assert_eq!(dist.aspect.len(), 2);
  }

  #[test]
  fn distribution_of_nothing_is_empty() {
    let dist = distribution(std::iter::empty());
    assert!(dist.is_empty());
    assert!(dist.sentiment.is_empty());
    assert!(dist.aspect.is_empty());
  }

  // ── Cross-tab ───────────────────────────────────────────────────────────

  #[test]
  fn cross_tab_zero_fills_missing_combinations() {
    let rows = vec![
      row("A1", "Positive", "2024HK1", "CS101", "K47A"),
      row("A1", "Positive", "2024HK1", "CS101", "K47A"),
      row("A2", "Negative", "2024HK1", "CS101", "K47A"),
    ];
    let tab = cross_tab(&rows, &CrossFilter::default(), GroupBy::Aspect);

    assert_eq!(tab.groups, vec!["A1", "A2"]);
    assert_eq!(tab.sentiments, vec!["Negative", "Positive"]);
    assert_eq!(tab.cells.len(), 4);
    assert_eq!(tab.count("A1", "Positive"), 2);
    assert_eq!(tab.count("A1", "Negative"), 0);
    assert_eq!(tab.count("A2", "Positive"), 0);
    assert!(tab.cells.iter().any(|c| c.group == "A1" && c.sentiment == "Negative"));
  }

  #[test]
  fn cross_tab_applies_selectors() {
    let rows = sample();
    let filter = CrossFilter {
      semester: Selector::Only("2024HK1".into()),
      course:   Selector::All,
      class:    Selector::Only("K47A".into()),
    };
    let tab = cross_tab(&rows, &filter, GroupBy::Course);

    assert_eq!(tab.groups, vec!["CS101", "DB303"]);
    assert_eq!(tab.count("CS101", "S1"), 2);
    assert_eq!(tab.count("CS101", "S2"), 1);
    assert_eq!(tab.count("DB303", "S2"), 1);
    assert_eq!(tab.count("DB303", "S1"), 0);
    let total: u64 = tab.cells.iter().map(|c| c.count).sum();
    assert_eq!(total, 4);
  }

  #[test]
  fn cross_tab_with_absent_selector_value_is_empty() {
    let rows = sample();
    let filter = CrossFilter {
      semester: Selector::Only("2019HK1".into()),
      ..Default::default()
    };
    assert!(cross_tab(&rows, &filter, GroupBy::Class).is_empty());
  }

  #[test]
  fn selector_serialises_as_optional_string() {
    let filter: CrossFilter =
      serde_json::from_str(r#"{"semester":"2024HK1","course":null}"#).unwrap();
    assert_eq!(filter.semester, Selector::Only("2024HK1".into()));
    assert_eq!(filter.course, Selector::All);
    assert_eq!(filter.class, Selector::All);
  }

  // ── Trend ───────────────────────────────────────────────────────────────

  #[test]
  fn trend_over_one_semester_is_insufficient() {
    let rows = vec![
      row("A1", "S1", "2024HK1", "CS101", "K47A"),
      row("A1", "S2", "2024HK1", "CS101", "K47A"),
      row("A2", "S2", "2024HK2", "CS101", "K47A"),
    ];
    let t = trend(&rows, &TrendQuery::new("A1"));
    assert_eq!(t, Trend::Insufficient { semesters: 1 });
  }

  #[test]
  fn trend_with_no_matching_aspect_is_insufficient() {
    let t = trend(&sample(), &TrendQuery::new("Workload"));
    assert_eq!(t, Trend::Insufficient { semesters: 0 });
  }

  #[test]
  fn trend_has_one_entry_per_semester() {
    let rows = sample();
    let t = trend(&rows, &TrendQuery::new("A2"));
    let Trend::Series { semesters, sentiments, points, .. } = t else {
      panic!("expected a series");
    };
    assert_eq!(semesters, vec!["2024HK1", "2024HK2"]);
    assert_eq!(sentiments, vec!["S1", "S2"]);
    assert_eq!(points.len(), 4);
    let hk2_s2 = points
      .iter()
      .find(|p| p.group == "2024HK2" && p.sentiment == "S2")
      .unwrap();
    assert_eq!(hk2_s2.count, 2);
  }

  #[test]
  fn trend_respects_course_filter() {
    let rows = sample();
    let query = TrendQuery {
      aspect: "A1".into(),
      course: Selector::Only("DB303".into()),
      class:  Selector::All,
    };
    let t = trend(&rows, &query);
    assert!(t.is_sufficient());
    let Trend::Series { points, .. } = t else { unreachable!() };
    assert_eq!(points.iter().map(|p| p.count).sum::<u64>(), 2);
  }
}
