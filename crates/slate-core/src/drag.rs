use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

pub const MOVE_ACTIVATION_DISTANCE: f32 = 8.0;
pub const TOUCH_HOLD_MS: u64 = 200;
pub const TOUCH_TOLERANCE: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    // Half-open right and bottom so adjacent cells never both claim an edge.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }
}

#[derive(Debug, Clone, Default)]
pub struct DayHitMap {
    cells: Vec<(NaiveDate, Rect)>,
}

impl DayHitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, day: NaiveDate, rect: Rect) {
        self.cells.retain(|(d, _)| *d != day);
        self.cells.push((day, rect));
    }

    // Newest entry wins, matching a topmost hit test.
    pub fn day_at(&self, pos: Point) -> Option<NaiveDate> {
        self.cells
            .iter()
            .rev()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(day, _)| *day)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerKind {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskEdge {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    ResizeStart,
    ResizeEnd,
}

impl From<TaskEdge> for DragMode {
    fn from(edge: TaskEdge) -> Self {
        match edge {
            TaskEdge::Start => DragMode::ResizeStart,
            TaskEdge::End => DragMode::ResizeEnd,
        }
    }
}

impl DragMode {
    pub fn edge(self) -> Option<TaskEdge> {
        match self {
            DragMode::Move => None,
            DragMode::ResizeStart => Some(TaskEdge::Start),
            DragMode::ResizeEnd => Some(TaskEdge::End),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub task_id: Uuid,
    pub mode: DragMode,
    // The endpoint a resize leaves fixed; None for moves.
    pub anchor: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    task_id: Uuid,
    kind: PointerKind,
    origin: Point,
    at_ms: u64,
}

#[derive(Debug, Clone, Copy, Default)]
enum State {
    #[default]
    Idle,
    Pending(Press),
    Active(DragSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    None,
    MoveStarted { task_id: Uuid },
    ResizeStep { task_id: Uuid, edge: TaskEdge, day: NaiveDate },
    MoveDropped { task_id: Uuid, day: NaiveDate },
    MoveCancelled { task_id: Uuid },
    SessionEnded,
}

#[derive(Debug, Default)]
pub struct DragController {
    state: State,
    hover: Option<NaiveDate>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    #[tracing::instrument(skip(self))]
    pub fn press_task(&mut self, task_id: Uuid, pos: Point, kind: PointerKind, at_ms: u64) {
        if !matches!(self.state, State::Idle) {
            debug!(%task_id, "press ignored; gesture in progress");
            return;
        }
        self.state = State::Pending(Press {
            task_id,
            kind,
            origin: pos,
            at_ms,
        });
        debug!(%task_id, ?kind, "press armed");
    }

    #[tracing::instrument(skip(self))]
    pub fn press_handle(
        &mut self,
        task_id: Uuid,
        edge: TaskEdge,
        anchor: NaiveDate,
        pos: Point,
        at_ms: u64,
    ) {
        if !matches!(self.state, State::Idle) {
            debug!(%task_id, "handle press ignored; gesture in progress");
            return;
        }
        self.state = State::Active(DragSession {
            task_id,
            mode: edge.into(),
            anchor: Some(anchor),
        });
        self.hover = None;
        debug!(%task_id, ?edge, "resize started");
    }

    pub fn pointer_move(
        &mut self,
        pos: Point,
        at_ms: u64,
        day_under_pointer: Option<NaiveDate>,
    ) -> DragEvent {
        match self.state {
            State::Idle => DragEvent::None,
            State::Pending(press) => self.advance_press(press, pos, at_ms),
            State::Active(session) => match session.mode.edge() {
                None => DragEvent::None,
                Some(edge) => {
                    let Some(day) = day_under_pointer else {
                        return DragEvent::None;
                    };
                    if self.hover == Some(day) {
                        return DragEvent::None;
                    }
                    self.hover = Some(day);
                    trace!(task_id = %session.task_id, %day, "resize step");
                    DragEvent::ResizeStep {
                        task_id: session.task_id,
                        edge,
                        day,
                    }
                }
            },
        }
    }

    fn advance_press(&mut self, press: Press, pos: Point, at_ms: u64) -> DragEvent {
        let travelled = press.origin.distance_to(pos);
        match press.kind {
            PointerKind::Mouse => {
                if travelled < MOVE_ACTIVATION_DISTANCE {
                    return DragEvent::None;
                }
            }
            PointerKind::Touch => {
                let held = at_ms.saturating_sub(press.at_ms);
                if held < TOUCH_HOLD_MS {
                    if travelled > TOUCH_TOLERANCE {
                        // Finger is scrolling, not holding.
                        self.state = State::Idle;
                        debug!(task_id = %press.task_id, "touch press aborted");
                    }
                    return DragEvent::None;
                }
            }
        }

        self.state = State::Active(DragSession {
            task_id: press.task_id,
            mode: DragMode::Move,
            anchor: None,
        });
        self.hover = None;
        debug!(task_id = %press.task_id, "move started");
        DragEvent::MoveStarted {
            task_id: press.task_id,
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn pointer_up(&mut self, drop: Option<NaiveDate>) -> DragEvent {
        let state = std::mem::take(&mut self.state);
        self.hover = None;
        match state {
            State::Idle => DragEvent::None,
            State::Pending(press) => {
                debug!(task_id = %press.task_id, "press released as click");
                DragEvent::None
            }
            State::Active(session) => match session.mode {
                DragMode::Move => match drop {
                    Some(day) => {
                        debug!(task_id = %session.task_id, %day, "move dropped");
                        DragEvent::MoveDropped {
                            task_id: session.task_id,
                            day,
                        }
                    }
                    None => {
                        debug!(task_id = %session.task_id, "move cancelled; no target");
                        DragEvent::MoveCancelled {
                            task_id: session.task_id,
                        }
                    }
                },
                DragMode::ResizeStart | DragMode::ResizeEnd => {
                    debug!(task_id = %session.task_id, "resize ended");
                    DragEvent::SessionEnded
                }
            },
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn cancel(&mut self) {
        if !matches!(self.state, State::Idle) {
            debug!("gesture cancelled");
        }
        self.state = State::Idle;
        self.hover = None;
    }

    // True from press to release; the owner holds pointer listeners while set.
    pub fn is_capturing(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    pub fn session(&self) -> Option<DragSession> {
        match self.state {
            State::Active(session) => Some(session),
            _ => None,
        }
    }
}
