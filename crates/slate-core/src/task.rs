use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[default]
    ToDo,
    InProgress,
    Review,
    Completed,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ToDo,
        Category::InProgress,
        Category::Review,
        Category::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ToDo => "To Do",
            Category::InProgress => "In Progress",
            Category::Review => "Review",
            Category::Completed => "Completed",
        }
    }

    pub fn accent_color(self) -> &'static str {
        match self {
            Category::ToDo => "#3b82f6",
            Category::InProgress => "#eab308",
            Category::Review => "#a855f7",
            Category::Completed => "#22c55e",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub category: Category,
}

impl Task {
    pub fn new(name: &str, start_date: NaiveDate, end_date: NaiveDate, category: Category) -> Self {
        Task {
            id: Uuid::new_v4(),
            name: name.to_string(),
            start_date,
            end_date,
            category,
        }
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}
