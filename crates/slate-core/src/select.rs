use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default
)]
enum State {
  #[default]
  Idle,
  AnchorSet(NaiveDate),
  PromptPending {
    start: NaiveDate,
    end:   NaiveDate
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq
)]
pub enum SelectionEvent {
  Anchored { day: NaiveDate },
  RangeReady {
    start: NaiveDate,
    end:   NaiveDate
  },
  Cleared,
  Ignored
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize
)]
pub struct SelectionRange {
  pub start: Option<NaiveDate>,
  pub end:   Option<NaiveDate>
}

#[derive(Debug, Default)]
pub struct SelectionController {
  state: State
}

impl SelectionController {
  pub fn new() -> Self {
    Self::default()
  }

  #[tracing::instrument(skip(self))]
  pub fn day_select(
    &mut self,
    day: NaiveDate
  ) -> SelectionEvent {
    match self.state {
      | State::PromptPending {
        ..
      } => SelectionEvent::Ignored,
      | State::Idle => {
        self.state =
          State::AnchorSet(day);
        debug!(%day, "anchor set");
        SelectionEvent::Anchored {
          day
        }
      }
      | State::AnchorSet(anchor)
        if anchor == day =>
      {
        self.state = State::Idle;
        debug!(
          %day,
          "same day; cleared"
        );
        SelectionEvent::Cleared
      }
      | State::AnchorSet(anchor) => {
        let start = anchor.min(day);
        let end = anchor.max(day);
        self.state =
          State::PromptPending {
            start,
            end
          };
        debug!(
          %start,
          %end,
          "range ready"
        );
        SelectionEvent::RangeReady {
          start,
          end
        }
      }
    }
  }

  pub fn take_pending(
    &mut self
  ) -> Option<(NaiveDate, NaiveDate)>
  {
    match self.state {
      | State::PromptPending {
        start,
        end
      } => {
        self.state = State::Idle;
        Some((start, end))
      }
      | _ => None
    }
  }

  pub fn clear(&mut self) {
    self.state = State::Idle;
  }

  pub fn prompt_pending(
    &self
  ) -> bool {
    matches!(
      self.state,
      State::PromptPending { .. }
    )
  }

  pub fn range(
    &self
  ) -> SelectionRange {
    match self.state {
      | State::Idle => {
        SelectionRange::default()
      }
      | State::AnchorSet(anchor) => {
        SelectionRange {
          start: Some(anchor),
          end:   Some(anchor)
        }
      }
      | State::PromptPending {
        start,
        end
      } => SelectionRange {
        start: Some(start),
        end:   Some(end)
      }
    }
  }

  pub fn contains(
    &self,
    day: NaiveDate
  ) -> bool {
    match self.range() {
      | SelectionRange {
        start: Some(start),
        end: Some(end)
      } => {
        start <= day && day <= end
      }
      | _ => false
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn same_day_twice_toggles_off() {
    let mut sel =
      SelectionController::new();

    sel.day_select(day(2024, 3, 5));
    let event = sel
      .day_select(day(2024, 3, 5));

    assert_eq!(
      event,
      SelectionEvent::Cleared
    );
    assert_eq!(
      sel.range(),
      SelectionRange::default()
    );
  }

  #[test]
  fn distinct_day_commits_normalized_range()
  {
    let mut sel =
      SelectionController::new();

    sel.day_select(day(2024, 3, 8));
    let event = sel
      .day_select(day(2024, 3, 5));

    assert_eq!(
      event,
      SelectionEvent::RangeReady {
        start: day(2024, 3, 5),
        end:   day(2024, 3, 8)
      }
    );
    assert!(sel.prompt_pending());
    assert!(
      sel.contains(day(2024, 3, 6))
    );
    assert!(
      !sel.contains(day(2024, 3, 9))
    );
  }

  #[test]
  fn clicks_are_ignored_while_prompt_pending()
  {
    let mut sel =
      SelectionController::new();
    sel.day_select(day(2024, 3, 5));
    sel.day_select(day(2024, 3, 7));

    let event = sel
      .day_select(day(2024, 3, 9));

    assert_eq!(
      event,
      SelectionEvent::Ignored
    );
    assert_eq!(
      sel.range().end,
      Some(day(2024, 3, 7))
    );
  }

  #[test]
  fn take_pending_consumes_the_range()
  {
    let mut sel =
      SelectionController::new();
    sel.day_select(day(2024, 3, 5));
    sel.day_select(day(2024, 3, 7));

    assert_eq!(
      sel.take_pending(),
      Some((
        day(2024, 3, 5),
        day(2024, 3, 7)
      ))
    );
    assert_eq!(
      sel.take_pending(),
      None
    );
    assert!(!sel.prompt_pending());
  }

  #[test]
  fn anchor_highlights_itself() {
    let mut sel =
      SelectionController::new();

    let event = sel
      .day_select(day(2024, 3, 5));

    assert_eq!(
      event,
      SelectionEvent::Anchored {
        day: day(2024, 3, 5)
      }
    );
    assert!(
      sel.contains(day(2024, 3, 5))
    );
    assert!(
      !sel.contains(day(2024, 3, 6))
    );
  }

  #[test]
  fn clear_resets_any_state() {
    let mut sel =
      SelectionController::new();
    sel.day_select(day(2024, 3, 5));

    sel.clear();

    assert_eq!(
      sel.range(),
      SelectionRange::default()
    );
  }
}
