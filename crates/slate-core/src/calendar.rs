use chrono::{
  Datelike,
  Duration,
  Local,
  NaiveDate
};
use tracing::warn;

pub const WEEKDAY_LABELS: [&str; 7] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat"
];

pub fn calendar_days(
  year: i32,
  month: u32
) -> Vec<NaiveDate> {
  let Some(first) =
    NaiveDate::from_ymd_opt(
      year, month, 1
    )
  else {
    warn!(
      year,
      month,
      "month out of range; empty grid"
    );
    return Vec::new();
  };

  let last =
    last_day_of_month(year, month);
  days_in_interval(
    start_of_week(first),
    end_of_week(last)
  )
}

pub fn month_title(
  year: i32,
  month: u32
) -> String {
  first_day_of_month(year, month)
    .format("%B %Y")
    .to_string()
}

#[must_use]
pub fn is_same_day(
  a: NaiveDate,
  b: NaiveDate
) -> bool {
  a == b
}

#[must_use]
pub fn is_same_month(
  a: NaiveDate,
  b: NaiveDate
) -> bool {
  a.year() == b.year()
    && a.month() == b.month()
}

#[must_use]
pub fn is_today(day: NaiveDate) -> bool {
  day == today()
}

pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

pub fn days_in_interval(
  start: NaiveDate,
  end: NaiveDate
) -> Vec<NaiveDate> {
  if end < start {
    return Vec::new();
  }

  let mut out = Vec::new();
  let mut day = start;
  loop {
    out.push(day);
    if day >= end {
      break;
    }
    day = add_days(day, 1);
  }
  out
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

// Week start is fixed to Sunday.
pub fn start_of_week(
  day: NaiveDate
) -> NaiveDate {
  let offset = day
    .weekday()
    .num_days_from_sunday()
    as i64;
  add_days(day, -offset)
}

pub fn end_of_week(
  day: NaiveDate
) -> NaiveDate {
  add_days(start_of_week(day), 6)
}

pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

#[cfg(test)]
mod tests {
  use chrono::{
    Datelike,
    NaiveDate,
    Weekday
  };

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
  fn march_2024_grid_runs_sunday_to_saturday()
  {
    let grid = calendar_days(2024, 3);

    assert_eq!(
      grid.first().copied(),
      Some(day(2024, 2, 25))
    );
    assert_eq!(
      grid
        .first()
        .map(|d| d.weekday()),
      Some(Weekday::Sun)
    );
    assert_eq!(
      grid.last().map(|d| d.weekday()),
      Some(Weekday::Sat)
    );
    assert_eq!(grid.len() % 7, 0);
    assert_eq!(grid.len(), 42);
    assert_eq!(
      grid.last().copied(),
      Some(day(2024, 4, 6))
    );
  }

  #[test]
  fn april_2024_grid_is_five_weeks() {
    let grid = calendar_days(2024, 4);

    assert_eq!(grid.len(), 35);
    assert_eq!(
      grid.first().copied(),
      Some(day(2024, 3, 31))
    );
    assert_eq!(
      grid.last().copied(),
      Some(day(2024, 5, 4))
    );
  }

  #[test]
  fn february_2026_grid_is_four_weeks()
  {
    let grid = calendar_days(2026, 2);

    assert_eq!(grid.len(), 28);
    assert_eq!(
      grid.first().copied(),
      Some(day(2026, 2, 1))
    );
    assert_eq!(
      grid.last().copied(),
      Some(day(2026, 2, 28))
    );
  }

  #[test]
  fn grid_is_ascending_with_no_gaps()
  {
    let grid = calendar_days(2024, 3);

    for pair in grid.windows(2) {
      assert_eq!(
        add_days(pair[0], 1),
        pair[1]
      );
    }
  }

  #[test]
  fn grid_covers_every_day_of_month()
  {
    let grid = calendar_days(2024, 3);

    for d in 1..=31 {
      assert!(grid
        .contains(&day(2024, 3, d)));
    }
  }

  #[test]
  fn out_of_range_month_yields_empty_grid()
  {
    assert!(
      calendar_days(2024, 13).is_empty()
    );
    assert!(
      calendar_days(2024, 0).is_empty()
    );
  }

  #[test]
  fn inverted_interval_is_empty() {
    let days = days_in_interval(
      day(2024, 3, 10),
      day(2024, 3, 3)
    );
    assert!(days.is_empty());
  }

  #[test]
  fn single_day_interval_has_one_entry()
  {
    let days = days_in_interval(
      day(2024, 3, 5),
      day(2024, 3, 5)
    );
    assert_eq!(
      days,
      vec![day(2024, 3, 5)]
    );
  }

  #[test]
  fn equality_is_day_and_month_scoped()
  {
    assert!(is_same_day(
      day(2024, 3, 5),
      day(2024, 3, 5)
    ));
    assert!(!is_same_day(
      day(2024, 3, 5),
      day(2024, 3, 6)
    ));
    assert!(is_same_month(
      day(2024, 3, 1),
      day(2024, 3, 31)
    ));
    assert!(!is_same_month(
      day(2024, 3, 1),
      day(2025, 3, 1)
    ));
    assert!(is_today(today()));
    assert!(
      !is_today(add_days(today(), 1))
    );
  }

  #[test]
  fn week_starts_sunday_ends_saturday()
  {
    let wednesday = day(2024, 3, 6);
    assert_eq!(
      start_of_week(wednesday),
      day(2024, 3, 3)
    );
    assert_eq!(
      end_of_week(wednesday),
      day(2024, 3, 9)
    );

    let sunday = day(2024, 3, 3);
    assert_eq!(
      start_of_week(sunday),
      sunday
    );
  }

  #[test]
  fn shift_months_clamps_short_months()
  {
    assert_eq!(
      shift_months(day(2024, 1, 31), 1),
      day(2024, 2, 29)
    );
    assert_eq!(
      shift_months(
        day(2024, 3, 31),
        -1
      ),
      day(2024, 2, 29)
    );
    assert_eq!(
      shift_months(
        day(2024, 12, 15),
        1
      ),
      day(2025, 1, 15)
    );
  }

  #[test]
  fn month_title_formats_header() {
    assert_eq!(
      month_title(2024, 3),
      "March 2024"
    );
  }
}
