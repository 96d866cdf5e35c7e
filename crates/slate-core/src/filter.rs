use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{
  Deserialize,
  Serialize
};
use tracing::trace;

use crate::calendar::add_days;
use crate::task::{
  Category,
  Task
};

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize
)]
pub enum TimeRange {
  #[default]
  #[serde(rename = "all")]
  All,
  #[serde(rename = "1week")]
  OneWeek,
  #[serde(rename = "2weeks")]
  TwoWeeks,
  #[serde(rename = "3weeks")]
  ThreeWeeks
}

impl TimeRange {
  pub fn days(self) -> Option<i64> {
    match self {
      | TimeRange::All => None,
      | TimeRange::OneWeek => Some(7),
      | TimeRange::TwoWeeks => {
        Some(14)
      }
      | TimeRange::ThreeWeeks => {
        Some(21)
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize
)]
#[serde(default)]
pub struct FilterState {
  pub categories: BTreeSet<Category>,
  pub time_range: TimeRange,
  pub search: String
}

pub fn matches(
  task: &Task,
  filters: &FilterState,
  today: NaiveDate
) -> bool {
  let pass = eval_categories(
    task,
    &filters.categories
  ) && eval_search(
    task,
    &filters.search
  ) && eval_time_range(
    task,
    filters.time_range,
    today
  );

  trace!(
    id = %task.id,
    pass,
    "filter check"
  );
  pass
}

pub fn filter_tasks(
  tasks: &[Task],
  filters: &FilterState,
  today: NaiveDate
) -> Vec<Task> {
  tasks
    .iter()
    .filter(|task| {
      matches(task, filters, today)
    })
    .cloned()
    .collect()
}

fn eval_categories(
  task: &Task,
  categories: &BTreeSet<Category>
) -> bool {
  categories.is_empty()
    || categories
      .contains(&task.category)
}

fn eval_search(
  task: &Task,
  search: &str
) -> bool {
  if search.is_empty() {
    return true;
  }
  task
    .name
    .to_ascii_lowercase()
    .contains(
      &search.to_ascii_lowercase()
    )
}

// Upper bound only: tasks already
// underway stay visible.
fn eval_time_range(
  task: &Task,
  range: TimeRange,
  today: NaiveDate
) -> bool {
  match range.days() {
    | None => true,
    | Some(days) => {
      task.start_date
        <= add_days(today, days)
    }
  }
}
