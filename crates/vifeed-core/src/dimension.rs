//! The dimensions sentences are filtered and grouped by.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, sentence::SentenceRow};

/// Any of the five labelled columns of the sentence view.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Dimension {
  Aspect,
  Sentiment,
  Semester,
  Course,
  Class,
}

impl Dimension {
  /// The row's label in this dimension. Courses are keyed by code.
  pub fn value_of(self, row: &SentenceRow) -> Option<&str> {
    match self {
      Self::Aspect => row.aspect.as_deref(),
      Self::Sentiment => row.sentiment.as_deref(),
      Self::Semester => row.semester.as_deref(),
      Self::Course => row.course.as_deref(),
      Self::Class => row.class.as_deref(),
    }
  }

  pub fn parse(s: &str) -> crate::Result<Self> {
    s.parse().map_err(|_| Error::UnknownDimension(s.to_owned()))
  }
}

/// The dimensions a cross-tabulation may be grouped by. Sentiment is always
/// the second axis, so it is not a valid grouping.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupBy {
  #[default]
  Aspect,
  Semester,
  Course,
  Class,
}

impl From<GroupBy> for Dimension {
  fn from(g: GroupBy) -> Self {
    match g {
      GroupBy::Aspect => Self::Aspect,
      GroupBy::Semester => Self::Semester,
      GroupBy::Course => Self::Course,
      GroupBy::Class => Self::Class,
    }
  }
}

impl TryFrom<Dimension> for GroupBy {
  type Error = Error;

  fn try_from(d: Dimension) -> crate::Result<Self> {
    match d {
      Dimension::Aspect => Ok(Self::Aspect),
      Dimension::Semester => Ok(Self::Semester),
      Dimension::Course => Ok(Self::Course),
      Dimension::Class => Ok(Self::Class),
      Dimension::Sentiment => Err(Error::UnsupportedGrouping(d.to_string())),
    }
  }
}

impl GroupBy {
  pub fn parse(s: &str) -> crate::Result<Self> {
    Dimension::parse(s)?.try_into()
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn dimensions_round_trip_through_strings() {
    for dim in Dimension::iter() {
      assert_eq!(Dimension::parse(dim.as_ref()).unwrap(), dim);
    }
    assert!(matches!(
      Dimension::parse("student"),
      Err(Error::UnknownDimension(_))
    ));
  }

  #[test]
  fn sentiment_is_not_a_grouping() {
    assert_eq!(GroupBy::parse("class").unwrap(), GroupBy::Class);
    assert!(matches!(
      GroupBy::parse("sentiment"),
      Err(Error::UnsupportedGrouping(_))
    ));
  }

  #[test]
  fn value_of_reads_course_code() {
    let row = SentenceRow {
      course: Some("DB303".into()),
      course_name: Some("Cơ sở Dữ liệu".into()),
      ..Default::default()
    };
    assert_eq!(Dimension::Course.value_of(&row), Some("DB303"));
    assert_eq!(Dimension::Class.value_of(&row), None);
  }
}
