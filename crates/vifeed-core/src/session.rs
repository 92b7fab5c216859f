//! Per-session state: the selected model, display preferences and the stop
//! token of the batch currently running.
//!
//! A session is created with defaults, threaded by reference into whatever
//! needs it, and dropped with the process. Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, batch::StopToken, predict::PredictionModel};

/// Fonts offered for the dashboard.
pub const FONTS: [&str; 7] = [
  "Roboto",
  "Inter",
  "Helvetica",
  "Arial",
  "Times New Roman",
  "Georgia",
  "Courier New",
];

// ─── Display settings ────────────────────────────────────────────────────────

/// Chart colour per sentiment, as `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartColors {
  pub positive: String,
  pub negative: String,
  pub neutral:  String,
}

impl Default for ChartColors {
  fn default() -> Self {
    Self {
      positive: "#2ECC71".into(),
      negative: "#E74C3C".into(),
      neutral:  "#F1C40F".into(),
    }
  }
}

impl ChartColors {
  /// Colour for a sentiment label, if it is one of the three classes.
  pub fn for_sentiment(&self, sentiment: &str) -> Option<&str> {
    match sentiment.to_ascii_lowercase().as_str() {
      "positive" => Some(&self.positive),
      "negative" => Some(&self.negative),
      "neutral" => Some(&self.neutral),
      _ => None,
    }
  }

  pub fn validate(&self) -> Result<()> {
    for color in [&self.positive, &self.negative, &self.neutral] {
      validate_hex_color(color)?;
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
  pub chart_colors: ChartColors,
  pub font:         String,
}

impl Default for DisplaySettings {
  fn default() -> Self {
    Self {
      chart_colors: ChartColors::default(),
      font:         FONTS[0].to_owned(),
    }
  }
}

impl DisplaySettings {
  pub fn validate(&self) -> Result<()> {
    self.chart_colors.validate()?;
    if !FONTS.contains(&self.font.as_str()) {
      return Err(Error::UnknownFont(self.font.clone()));
    }
    Ok(())
  }
}

fn validate_hex_color(color: &str) -> Result<()> {
  let valid = color
    .strip_prefix('#')
    .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));
  if valid {
    Ok(())
  } else {
    Err(Error::InvalidColor(color.to_owned()))
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Session {
  pub model:    PredictionModel,
  pub settings: DisplaySettings,
  pub stop:     StopToken,
}

impl Session {
  /// Replace the display settings after validating them. On error the
  /// current settings are kept.
  pub fn update_settings(&mut self, settings: DisplaySettings) -> Result<()> {
    settings.validate()?;
    self.settings = settings;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_are_valid() {
    let settings = DisplaySettings::default();
    settings.validate().unwrap();
    assert_eq!(settings.font, "Roboto");
    assert_eq!(settings.chart_colors.for_sentiment("Positive"), Some("#2ECC71"));
    assert_eq!(settings.chart_colors.for_sentiment("Mixed"), None);
  }

  #[test]
  fn bad_colour_is_rejected_and_settings_kept() {
    let mut session = Session::default();
    let mut next = DisplaySettings::default();
    next.chart_colors.negative = "red".into();

    let err = session.update_settings(next).unwrap_err();
    assert!(matches!(err, Error::InvalidColor(c) if c == "red"));
    assert_eq!(session.settings, DisplaySettings::default());
  }

  #[test]
  fn unknown_font_is_rejected() {
    let next = DisplaySettings {
      font: "Comic Sans MS".into(),
      ..Default::default()
    };
    assert!(matches!(next.validate(), Err(Error::UnknownFont(_))));
  }

  #[test]
  fn valid_update_applies() {
    let mut session = Session::default();
    let next = DisplaySettings {
      chart_colors: ChartColors {
        positive: "#00ff00".into(),
        negative: "#FF0000".into(),
        neutral:  "#cccccc".into(),
      },
      font:         "Georgia".into(),
    };
    session.update_settings(next.clone()).unwrap();
    assert_eq!(session.settings, next);
  }
}
