use crate::record::Alignment;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: Vec<bool>,
}

impl Exercise {
    pub fn new(name: impl Into<String>, set_count: usize) -> Self {
        Self {
            name: name.into(),
            sets: vec![false; set_count],
        }
    }

    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|done| **done).count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutBlock {
    pub time: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
}

/// Ordered workout blocks shared by every day until edited.
pub type WorkoutTemplate = Vec<WorkoutBlock>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Protein,
    Carbs,
    Fiber,
    Sugar,
    Fat,
    Salt,
    Calories,
}

impl Nutrient {
    pub const ALL: [Nutrient; 7] = [
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Fat,
        Nutrient::Salt,
        Nutrient::Calories,
    ];

    /// Nutrients that take part in the food score. Calories are tracked but never scored.
    pub const SCORED: [Nutrient; 6] = [
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Fat,
        Nutrient::Salt,
    ];
}

/// Per-nutrient amounts. Used both for a day's intake and for the daily targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Nutrition {
    #[serde(deserialize_with = "lenient_number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fiber: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub sugar: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fat: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub salt: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub calories: f64,
}

impl Nutrition {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Protein => self.protein,
            Nutrient::Carbs => self.carbs,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
            Nutrient::Fat => self.fat,
            Nutrient::Salt => self.salt,
            Nutrient::Calories => self.calories,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        let slot = match nutrient {
            Nutrient::Protein => &mut self.protein,
            Nutrient::Carbs => &mut self.carbs,
            Nutrient::Fiber => &mut self.fiber,
            Nutrient::Sugar => &mut self.sugar,
            Nutrient::Fat => &mut self.fat,
            Nutrient::Salt => &mut self.salt,
            Nutrient::Calories => &mut self.calories,
        };
        *slot = sanitize_number(value);
    }
}

pub type NutritionTargets = Nutrition;

pub fn default_nutrition_targets() -> NutritionTargets {
    Nutrition {
        protein: 175.0,
        carbs: 300.0,
        fiber: 22.0,
        sugar: 75.0,
        fat: 205.0,
        salt: 4000.0,
        calories: 2400.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepTarget {
    pub min: f64,
    pub max: f64,
}

impl SleepTarget {
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl Default for SleepTarget {
    fn default() -> Self {
        Self { min: 7.0, max: 9.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Scores {
    pub fitness: i64,
    pub tasks: i64,
    pub food: i64,
    pub sleep: i64,
}

/// One calendar day's activity plus the scores computed when it was saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    #[serde(default)]
    pub workouts: Vec<WorkoutBlock>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sleep_hours: f64,
    #[serde(default)]
    pub scores: Scores,
}

/// Raw activity inputs submitted for a save. Workouts, tasks and numbers are
/// normalized by `record::build_record` before anything is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DailyInput {
    pub workouts: Vec<WorkoutBlock>,
    pub tasks: Vec<Task>,
    pub nutrition: Nutrition,
    #[serde(deserialize_with = "lenient_number")]
    pub sleep_hours: f64,
}

#[derive(Debug, Deserialize)]
pub struct NewBlockRequest {
    pub time: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewExerciseRequest {
    pub name: String,
    pub sets: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SetCountRequest {
    pub count: usize,
}

#[derive(Debug, Deserialize, Default)]
pub struct ViewQuery {
    #[serde(default)]
    pub align: Alignment,
}

#[derive(Debug, Deserialize, Default)]
pub struct HistoryQuery {
    pub days: Option<u32>,
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScorePoint {
    pub date: String,
    pub fitness: i64,
    pub tasks: i64,
    pub food: i64,
    pub sleep: i64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyScoreAverage {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub days_counted: u8,
    pub avg_fitness: f64,
    pub avg_tasks: f64,
    pub avg_food: f64,
    pub avg_sleep: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub days: Vec<ScorePoint>,
    pub weekly_averages: Vec<WeeklyScoreAverage>,
}

/// Non-finite numbers collapse to zero.
pub fn sanitize_number(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Accepts numbers, numeric strings and null. Anything unparseable becomes 0.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(sanitize_number(number))
}
