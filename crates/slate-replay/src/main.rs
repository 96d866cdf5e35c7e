use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::Parser;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

use slate_core::calendar;
use slate_core::drag::{Point, PointerKind, Rect, TaskEdge};
use slate_core::filter::{FilterState, TimeRange};
use slate_core::planner::Planner;
use slate_core::select::SelectionRange;
use slate_core::task::{Category, Task};

const CELL_W: f32 = 100.0;
const CELL_H: f32 = 80.0;

#[derive(Parser, Debug)]
#[command(
    name = "slate-replay",
    about = "Replays recorded planner interaction scenarios and reports the resulting board"
)]
struct Args {
    #[arg(long, default_value = "crates/slate-replay/scenarios/release_planning.json")]
    scenario: Vec<PathBuf>,

    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    today: Option<NaiveDate>,

    #[arg(long)]
    only: Option<String>,

    #[arg(long)]
    pretty: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Default, Deserialize)]
struct ReplayConfig {
    today: Option<NaiveDate>,
    color: Option<bool>,
    pretty: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    // The clock the session was recorded against; pointer coordinates
    // address that month's grid.
    #[serde(default)]
    today: Option<NaiveDate>,
    steps: Vec<Step>,
}

// Task references count saved tasks from 1 in creation order.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum Step {
    DaySelect {
        day: NaiveDate,
    },
    PressTask {
        task: usize,
        x: f32,
        y: f32,
        #[serde(default = "default_pointer_kind")]
        kind: PointerKind,
        #[serde(default)]
        at: u64,
    },
    PressHandle {
        task: usize,
        edge: TaskEdge,
        x: f32,
        y: f32,
        #[serde(default)]
        at: u64,
    },
    PointerMove {
        x: f32,
        y: f32,
        at: u64,
    },
    PointerUp {
        #[serde(default)]
        drop: Option<NaiveDate>,
    },
    Save {
        name: String,
        #[serde(default)]
        category: Category,
    },
    CancelSave,
    Filters {
        #[serde(default)]
        categories: Vec<Category>,
        #[serde(default)]
        time_range: TimeRange,
        #[serde(default)]
        search: String,
    },
    NextMonth,
    PrevMonth,
    Remove {
        task: usize,
    },
}

fn default_pointer_kind() -> PointerKind {
    PointerKind::Mouse
}

#[derive(Debug)]
struct ReplayOutcome {
    scenario: String,
    month: String,
    tasks: Vec<(usize, Task)>,
    visible: usize,
    selection: SelectionRange,
    today: NaiveDate,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = load_config(args.config.as_deref())?;
    let pretty = args.pretty || config.pretty.unwrap_or(false);
    let color = config.color.unwrap_or(true);

    let scenarios = load_scenarios(&args.scenario)?;
    let scenarios = filter_scenarios(scenarios, args.only.as_deref())?;
    if scenarios.is_empty() {
        return Err(anyhow!("no scenarios to replay"));
    }

    for scenario in &scenarios {
        let today = args
            .today
            .or(scenario.today)
            .or(config.today)
            .unwrap_or_else(calendar::today);
        info!(scenario = %scenario.name, %today, "replaying scenario");
        let outcome = run_scenario(scenario, today)?;
        print_report(&outcome, color, pretty)?;
    }

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("warn"))
        .map_err(|e| anyhow!("invalid log level: {e}"))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ReplayConfig> {
    let Some(path) = path else {
        return Ok(ReplayConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn load_scenarios(paths: &[PathBuf]) -> anyhow::Result<Vec<Scenario>> {
    let mut out = Vec::new();

    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse scenario {}", path.display()))?;
        out.push(scenario);
    }

    Ok(out)
}

fn filter_scenarios(scenarios: Vec<Scenario>, only: Option<&str>) -> anyhow::Result<Vec<Scenario>> {
    let Some(pattern) = only else {
        return Ok(scenarios);
    };
    let matcher =
        Regex::new(pattern).with_context(|| format!("invalid --only pattern {pattern}"))?;
    Ok(scenarios
        .into_iter()
        .filter(|scenario| matcher.is_match(&scenario.name))
        .collect())
}

fn run_scenario(scenario: &Scenario, today: NaiveDate) -> anyhow::Result<ReplayOutcome> {
    let mut planner = Planner::new(today);
    publish_grid(&mut planner);
    let mut created: Vec<Uuid> = Vec::new();

    for (idx, step) in scenario.steps.iter().enumerate() {
        apply_step(&mut planner, &mut created, step)
            .with_context(|| format!("scenario {} step {}", scenario.name, idx + 1))?;
    }

    let tasks = created
        .iter()
        .enumerate()
        .filter_map(|(pos, id)| {
            planner
                .tasks()
                .iter()
                .find(|task| task.id == *id)
                .map(|task| (pos + 1, task.clone()))
        })
        .collect();

    Ok(ReplayOutcome {
        scenario: scenario.name.clone(),
        month: planner.month_title(),
        visible: planner.visible_tasks(today).len(),
        selection: planner.selection(),
        tasks,
        today,
    })
}

fn apply_step(planner: &mut Planner, created: &mut Vec<Uuid>, step: &Step) -> anyhow::Result<()> {
    match step {
        Step::DaySelect { day } => {
            planner.day_select(*day);
        }
        Step::PressTask { task, x, y, kind, at } => {
            let id = resolve_task(created, *task)?;
            planner.press_task(id, Point::new(*x, *y), *kind, *at);
        }
        Step::PressHandle { task, edge, x, y, at } => {
            let id = resolve_task(created, *task)?;
            planner.press_handle(id, *edge, Point::new(*x, *y), *at);
        }
        Step::PointerMove { x, y, at } => {
            planner.pointer_move(Point::new(*x, *y), *at);
        }
        Step::PointerUp { drop } => {
            planner.pointer_up(*drop);
        }
        Step::Save { name, category } => match planner.task_save(name, *category) {
            Some(id) => created.push(id),
            None => debug!(%name, "save produced no task"),
        },
        Step::CancelSave => planner.task_save_cancelled(),
        Step::Filters {
            categories,
            time_range,
            search,
        } => {
            planner.filters_changed(FilterState {
                categories: categories.iter().copied().collect(),
                time_range: *time_range,
                search: search.clone(),
            });
        }
        Step::NextMonth => {
            planner.next_month();
            publish_grid(planner);
        }
        Step::PrevMonth => {
            planner.prev_month();
            publish_grid(planner);
        }
        Step::Remove { task } => {
            let id = resolve_task(created, *task)?;
            planner.remove_task(id);
        }
    }
    Ok(())
}

fn resolve_task(created: &[Uuid], reference: usize) -> anyhow::Result<Uuid> {
    reference
        .checked_sub(1)
        .and_then(|idx| created.get(idx))
        .copied()
        .ok_or_else(|| anyhow!("unknown task reference {reference}"))
}

// Seven columns of fixed-size cells; replayed pointer coordinates address
// this layout.
fn publish_grid(planner: &mut Planner) {
    planner.clear_day_bounds();
    for (idx, day) in planner.grid().into_iter().enumerate() {
        let col = (idx % 7) as f32;
        let row = (idx / 7) as f32;
        planner.publish_day_bounds(day, Rect::new(col * CELL_W, row * CELL_H, CELL_W, CELL_H));
    }
}

fn print_report(outcome: &ReplayOutcome, color: bool, pretty: bool) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "Scenario: {}", outcome.scenario)?;
    writeln!(out, "  {}", outcome.month)?;
    writeln!(out, "  {}", calendar::WEEKDAY_LABELS.join(" "))?;

    let headers = vec![
        "Ref".to_string(),
        "Name".to_string(),
        "Category".to_string(),
        "Start".to_string(),
        "End".to_string(),
        "Days".to_string(),
    ];

    let mut rows = Vec::with_capacity(outcome.tasks.len());
    for (reference, task) in &outcome.tasks {
        let end = task.end_date.format("%Y-%m-%d").to_string();
        let end = if task.end_date < outcome.today {
            paint(&end, "31", color)
        } else {
            end
        };

        rows.push(vec![
            paint(&reference.to_string(), "33", color),
            task.name.clone(),
            task.category.label().to_string(),
            task.start_date.format("%Y-%m-%d").to_string(),
            end,
            task.duration_days().to_string(),
        ]);
    }

    write_table(&mut out, headers, rows)?;
    writeln!(out, "  visible under current filters: {}", outcome.visible)?;

    if pretty {
        let tasks = outcome
            .tasks
            .iter()
            .map(|(reference, task)| {
                serde_json::json!({ "ref": reference, "task": task })
            })
            .collect::<Vec<_>>();
        let summary = serde_json::json!({
            "scenario": outcome.scenario,
            "month": outcome.month,
            "visible": outcome.visible,
            "selection": outcome.selection,
            "tasks": tasks,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    }

    Ok(())
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if !color || !io::stdout().is_terminal() {
        return text.to_string();
    }
    format!("\x1b[{code}m{text}\x1b[0m")
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

use std::io::IsTerminal;
