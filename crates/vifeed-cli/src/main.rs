//! `vifeed` — command-line front end for the prediction service and the
//! feedback store.
//!
//! # Usage
//!
//! ```
//! vifeed predict "Giảng viên dạy rất nhiệt tình"
//! vifeed batch feedback.txt --model CNN_LSTM_ATTENTION --db aspect_sa.db --class K47A
//! vifeed report --db aspect_sa.db --group-by semester
//! vifeed --config ~/.config/vifeed/config.toml predict "..."
//! ```

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vifeed_core::{
  batch::{self, StopToken},
  dimension::GroupBy,
  predict::{PredictionModel, Predictor},
  sentence::{NewSentence, SentenceContext},
  store::FeedbackStore,
};
use vifeed_predict::{DEFAULT_BASE_URL, PredictConfig, PredictionClient};
use vifeed_store_sqlite::{SeedOptions, SqliteStore};

const DEFAULT_DB: &str = "aspect_sa.db";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vifeed", about = "Aspect-based sentiment review for student feedback")]
struct Cli {
  /// Path to a TOML config file (predict_url, timeout_secs, model, db, ...).
  #[arg(short, long, value_name = "FILE", global = true)]
  config: Option<PathBuf>,

  /// Base URL of the prediction service (default: http://localhost:5000).
  #[arg(long, env = "VIFEED_PREDICT_URL", global = true)]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Analyse one sentence.
  Predict {
    text:  String,
    /// PhoBert_CNN_LSTM or CNN_LSTM_ATTENTION.
    #[arg(long, value_parser = PredictionModel::parse)]
    model: Option<PredictionModel>,
  },

  /// Analyse a text file line by line. Ctrl-C stops before the next line.
  Batch {
    file:    PathBuf,
    #[arg(long, value_parser = PredictionModel::parse)]
    model:   Option<PredictionModel>,
    /// Store every detected pair in this database.
    #[arg(long, value_name = "PATH")]
    db:      Option<PathBuf>,
    #[command(flatten)]
    context: ContextArgs,
  },

  /// Print the sentiment distribution and a cross-tab of the stored sentences.
  Report {
    #[arg(long, value_name = "PATH")]
    db:       Option<PathBuf>,
    /// aspect, semester, course or class.
    #[arg(long, value_parser = GroupBy::parse, default_value = "aspect")]
    group_by: GroupBy,
  },
}

/// Context attached to sentences stored by `batch --db`.
#[derive(Args, Debug, Default)]
struct ContextArgs {
  /// Semester name, e.g. 2024HK1.
  #[arg(long)]
  semester: Option<String>,
  /// Course code, e.g. CS101.
  #[arg(long)]
  course:   Option<String>,
  /// Class name, e.g. K47A.
  #[arg(long)]
  class:    Option<String>,
  /// Student code, e.g. SVK47A001.
  #[arg(long)]
  student:  Option<String>,
  /// Academic year, e.g. 2023-2024.
  #[arg(long)]
  year:     Option<String>,
}

impl From<ContextArgs> for SentenceContext {
  fn from(a: ContextArgs) -> Self {
    Self {
      semester:      a.semester,
      course_code:   a.course,
      academic_year: a.year,
      class_name:    a.class,
      student_code:  a.student,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct ConfigFile {
  predict_url:  Option<String>,
  timeout_secs: Option<u64>,
  model:        Option<PredictionModel>,
  db:           Option<PathBuf>,
  students:     Option<usize>,
  seed:         Option<u64>,
}

impl ConfigFile {
  fn load(path: Option<&PathBuf>) -> Result<Self> {
    let Some(path) = path else { return Ok(Self::default()) };
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")
  }

  fn seed_options(&self) -> SeedOptions {
    let mut seed = SeedOptions::default();
    if let Some(students) = self.students {
      seed.students = students;
    }
    seed.rng_seed = self.seed;
    seed
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let file_cfg = ConfigFile::load(cli.config.as_ref())?;

  // CLI flags override config file, which overrides defaults.
  let predict_config = PredictConfig {
    base_url:     cli
      .url
      .or_else(|| file_cfg.predict_url.clone())
      .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
    timeout_secs: file_cfg
      .timeout_secs
      .unwrap_or(PredictConfig::default().timeout_secs),
  };

  match cli.command {
    Command::Predict { text, model } => {
      let client = PredictionClient::new(predict_config)?;
      let model = model.or(file_cfg.model).unwrap_or_default();
      predict(&client, &text, model).await
    }
    Command::Batch { file, model, db, context } => {
      let client = PredictionClient::new(predict_config)?;
      let model = model.or(file_cfg.model).unwrap_or_default();
      let store = match db.or_else(|| file_cfg.db.clone()) {
        Some(path) => Some(open_store(&path, &file_cfg).await?),
        None => None,
      };
      run_batch(&client, &file, model, store.as_ref(), context.into()).await
    }
    Command::Report { db, group_by } => {
      let path = db
        .or_else(|| file_cfg.db.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
      let store = open_store(&path, &file_cfg).await?;
      print_report(&store, group_by).await
    }
  }
}

async fn open_store(path: &Path, cfg: &ConfigFile) -> Result<SqliteStore> {
  SqliteStore::open(path, cfg.seed_options())
    .await
    .with_context(|| format!("opening store at {}", path.display()))
}

// ─── Commands ─────────────────────────────────────────────────────────────────

async fn predict(client: &PredictionClient, text: &str, model: PredictionModel) -> Result<()> {
  anyhow::ensure!(!text.trim().is_empty(), "text must not be empty");

  let outcome = client.predict(text, model).await;
  print!("{}", render::outcome(&outcome));
  Ok(())
}

async fn run_batch(
  client: &PredictionClient,
  file: &Path,
  model: PredictionModel,
  store: Option<&SqliteStore>,
  context: SentenceContext,
) -> Result<()> {
  let content = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("reading {}", file.display()))?;
  let lines = batch::batch_lines(&content);

  let stop = StopToken::new();
  let on_signal = stop.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      tracing::warn!("stop requested; finishing the current line");
      on_signal.request_stop();
    }
  });

  let report = batch::run_batch(client, &lines, model, &stop, |result, progress| {
    print!("{}", render::line_result(result, progress));
  })
  .await;

  let mut stored = 0;
  if let Some(store) = store {
    for result in &report.results {
      for p in result.outcome.predictions() {
        let input =
          NewSentence::new(result.text.as_str(), p.aspect.as_str(), p.sentiment.as_str())
            .with_context(context.clone());
        store.insert_sentence(input).await.context("storing sentence")?;
        stored += 1;
      }
    }
  }

  println!("{}", render::batch_summary(&report, store.map(|_| stored)));
  Ok(())
}

async fn print_report(store: &SqliteStore, group_by: GroupBy) -> Result<()> {
  let rows = store.sentence_view().await.context("reading sentences")?;
  let options = store
    .dimension_options()
    .await
    .context("reading dimension options")?;

  print!("{}", render::report(&rows, &options, group_by));
  Ok(())
}
