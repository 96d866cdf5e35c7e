use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};
use uuid::Uuid;

use crate::calendar;
use crate::drag::{
    DayHitMap, DragController, DragEvent, DragSession, Point, PointerKind, Rect, TaskEdge,
};
use crate::filter::{self, FilterState};
use crate::select::{SelectionController, SelectionEvent, SelectionRange};
use crate::store;
use crate::task::{Category, Task};

#[derive(Debug)]
pub struct Planner {
    tasks: Vec<Task>,
    filters: FilterState,
    selection: SelectionController,
    drag: DragController,
    hit_map: DayHitMap,
    focus: NaiveDate,
}

impl Planner {
    pub fn new(focus_day: NaiveDate) -> Self {
        Planner {
            tasks: Vec::new(),
            filters: FilterState::default(),
            selection: SelectionController::new(),
            drag: DragController::new(),
            hit_map: DayHitMap::new(),
            focus: calendar::first_day_of_month(focus_day.year(), focus_day.month()),
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn day_select(&mut self, day: NaiveDate) -> SelectionEvent {
        if self.drag.is_capturing() {
            debug!(%day, "day click ignored; pointer captured");
            return SelectionEvent::Ignored;
        }
        self.selection.day_select(day)
    }

    #[tracing::instrument(skip(self))]
    pub fn press_task(&mut self, task_id: Uuid, pos: Point, kind: PointerKind, at_ms: u64) {
        if self.selection.prompt_pending() {
            debug!(%task_id, "press ignored; prompt open");
            return;
        }
        if !self.tasks.iter().any(|task| task.id == task_id) {
            debug!(%task_id, "press ignored; unknown task");
            return;
        }
        self.drag.press_task(task_id, pos, kind, at_ms);
    }

    #[tracing::instrument(skip(self))]
    pub fn press_handle(&mut self, task_id: Uuid, edge: TaskEdge, pos: Point, at_ms: u64) {
        if self.selection.prompt_pending() {
            debug!(%task_id, "handle press ignored; prompt open");
            return;
        }
        let Some(task) = self.tasks.iter().find(|task| task.id == task_id) else {
            debug!(%task_id, "handle press ignored; unknown task");
            return;
        };
        let anchor = match edge {
            TaskEdge::Start => task.end_date,
            TaskEdge::End => task.start_date,
        };
        self.drag.press_handle(task_id, edge, anchor, pos, at_ms);
    }

    pub fn pointer_move(&mut self, pos: Point, at_ms: u64) -> DragEvent {
        let day_under_pointer = self.hit_map.day_at(pos);
        let event = self.drag.pointer_move(pos, at_ms, day_under_pointer);
        if let DragEvent::ResizeStep { task_id, edge, day } = event {
            self.tasks = match edge {
                TaskEdge::Start => store::resize_task_start(&self.tasks, task_id, day),
                TaskEdge::End => store::resize_task_end(&self.tasks, task_id, day),
            };
        }
        event
    }

    #[tracing::instrument(skip(self))]
    pub fn pointer_up(&mut self, drop: Option<NaiveDate>) -> DragEvent {
        let event = self.drag.pointer_up(drop);
        if let DragEvent::MoveDropped { task_id, day } = event {
            self.tasks = store::move_task(&self.tasks, task_id, day);
        }
        event
    }

    #[tracing::instrument(skip(self))]
    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    #[tracing::instrument(skip(self))]
    pub fn filters_changed(&mut self, filters: FilterState) {
        debug!(?filters, "filters replaced");
        self.filters = filters;
    }

    // The selection is spent once the prompt resolves, saved or not.
    #[tracing::instrument(skip(self))]
    pub fn task_save(&mut self, name: &str, category: Category) -> Option<Uuid> {
        let (start, end) = self.selection.take_pending()?;
        let task = store::create_task(name, category, start, end)?;
        let id = task.id;
        info!(%id, name = %task.name, "task saved");
        self.tasks.push(task);
        Some(id)
    }

    #[tracing::instrument(skip(self))]
    pub fn task_save_cancelled(&mut self) {
        debug!("prompt dismissed");
        self.selection.clear();
    }

    #[tracing::instrument(skip(self))]
    pub fn remove_task(&mut self, task_id: Uuid) {
        self.tasks = store::remove_task(&self.tasks, task_id);
    }

    pub fn publish_day_bounds(&mut self, day: NaiveDate, rect: Rect) {
        self.hit_map.insert(day, rect);
    }

    pub fn clear_day_bounds(&mut self) {
        self.hit_map.clear();
    }

    #[tracing::instrument(skip(self))]
    pub fn next_month(&mut self) {
        self.focus = calendar::shift_months(self.focus, 1);
    }

    #[tracing::instrument(skip(self))]
    pub fn prev_month(&mut self) {
        self.focus = calendar::shift_months(self.focus, -1);
    }

    pub fn grid(&self) -> Vec<NaiveDate> {
        calendar::calendar_days(self.focus.year(), self.focus.month())
    }

    pub fn month_title(&self) -> String {
        calendar::month_title(self.focus.year(), self.focus.month())
    }

    pub fn visible_tasks(&self, today: NaiveDate) -> Vec<Task> {
        filter::filter_tasks(&self.tasks, &self.filters, today)
    }

    pub fn tasks_on_day(&self, day: NaiveDate, today: NaiveDate) -> Vec<Task> {
        store::tasks_on_day(&self.visible_tasks(today), day)
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection.range()
    }

    pub fn selection_contains(&self, day: NaiveDate) -> bool {
        self.selection.contains(day)
    }

    pub fn prompt_pending(&self) -> bool {
        self.selection.prompt_pending()
    }

    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag.session()
    }

    // Resizes render in place; only move sessions float an overlay.
    pub fn dragging_task(&self) -> Option<&Task> {
        let session = self.drag.session()?;
        if session.mode.edge().is_some() {
            return None;
        }
        self.tasks.iter().find(|task| task.id == session.task_id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn focus(&self) -> NaiveDate {
        self.focus
    }
}
