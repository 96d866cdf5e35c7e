use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::calendar;
use crate::task::{Category, Task};

pub fn tasks_on_day(tasks: &[Task], day: NaiveDate) -> Vec<Task> {
    tasks.iter().filter(|task| task.covers(day)).cloned().collect()
}

#[tracing::instrument]
pub fn create_task(
    name: &str,
    category: Category,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Option<Task> {
    let name = name.trim();
    if name.is_empty() {
        debug!("blank name; task rejected");
        return None;
    }

    let (start_date, end_date) = if start_date <= end_date {
        (start_date, end_date)
    } else {
        (end_date, start_date)
    };

    let task = Task::new(name, start_date, end_date, category);
    debug!(id = %task.id, %start_date, %end_date, "task created");
    Some(task)
}

#[tracing::instrument(skip(tasks))]
pub fn move_task(tasks: &[Task], id: Uuid, new_start: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if task.id != id {
                return task.clone();
            }
            let span_days = (task.end_date - task.start_date).num_days();
            debug!(%id, %new_start, span_days, "task moved");
            Task {
                start_date: new_start,
                end_date: calendar::add_days(new_start, span_days),
                ..task.clone()
            }
        })
        .collect()
}

#[tracing::instrument(skip(tasks))]
pub fn resize_task_start(tasks: &[Task], id: Uuid, candidate: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if task.id != id {
                return task.clone();
            }
            if candidate > task.end_date {
                debug!(%id, %candidate, end = %task.end_date, "start past end; rejected");
                return task.clone();
            }
            Task {
                start_date: candidate,
                ..task.clone()
            }
        })
        .collect()
}

#[tracing::instrument(skip(tasks))]
pub fn resize_task_end(tasks: &[Task], id: Uuid, candidate: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if task.id != id {
                return task.clone();
            }
            if candidate < task.start_date {
                debug!(%id, %candidate, start = %task.start_date, "end before start; rejected");
                return task.clone();
            }
            Task {
                end_date: candidate,
                ..task.clone()
            }
        })
        .collect()
}

#[tracing::instrument(skip(tasks))]
pub fn remove_task(tasks: &[Task], id: Uuid) -> Vec<Task> {
    let kept: Vec<Task> = tasks.iter().filter(|task| task.id != id).cloned().collect();
    if kept.len() < tasks.len() {
        debug!(%id, "task removed");
    }
    kept
}
