use crate::config::Configuration;
use crate::models::{
    DailyInput, DailyRecord, Exercise, Nutrient, Nutrition, Scores, Task, WorkoutBlock,
    WorkoutTemplate, sanitize_number,
};
use crate::scoring::compute_scores;
use serde::Deserialize;

/// How saved workout sets are matched back onto the current template.
///
/// `Index` is the default and pairs blocks and exercises by position, so a
/// reordered template lines old sets up with whatever now sits at that slot.
/// `Name` pairs blocks by time and name and exercises by name instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Index,
    Name,
}

impl DailyRecord {
    pub fn empty(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            workouts: Vec::new(),
            tasks: Vec::new(),
            nutrition: Nutrition::default(),
            sleep_hours: 0.0,
            scores: Scores::default(),
        }
    }
}

/// Projects the template onto saved workouts: the template decides the shape,
/// saved sets fill in where a matching exercise exists.
pub fn materialize(
    template: &WorkoutTemplate,
    saved: &[WorkoutBlock],
    alignment: Alignment,
) -> Vec<WorkoutBlock> {
    template
        .iter()
        .enumerate()
        .map(|(block_index, block)| {
            let saved_block = match alignment {
                Alignment::Index => saved.get(block_index),
                Alignment::Name => saved
                    .iter()
                    .find(|candidate| candidate.time == block.time && candidate.name == block.name),
            };

            let exercises = block
                .exercises
                .iter()
                .enumerate()
                .map(|(exercise_index, exercise)| {
                    let saved_sets = saved_block
                        .and_then(|saved_block| match alignment {
                            Alignment::Index => saved_block.exercises.get(exercise_index),
                            Alignment::Name => saved_block
                                .exercises
                                .iter()
                                .find(|candidate| candidate.name == exercise.name),
                        })
                        .map(|saved| saved.sets.clone());

                    Exercise {
                        name: exercise.name.clone(),
                        sets: saved_sets.unwrap_or_else(|| exercise.sets.clone()),
                    }
                })
                .collect();

            WorkoutBlock {
                time: block.time.clone(),
                name: block.name.clone(),
                exercises,
            }
        })
        .collect()
}

/// Loaded record with its workouts reshaped for editing against the template.
pub fn materialize_record(
    record: &DailyRecord,
    config: &Configuration,
    alignment: Alignment,
) -> DailyRecord {
    DailyRecord {
        workouts: materialize(&config.template, &record.workouts, alignment),
        ..record.clone()
    }
}

/// Drops tasks whose text is blank and trims the rest.
pub fn clean_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter_map(|task| {
            let text = task.text.trim();
            (!text.is_empty()).then(|| Task {
                text: text.to_string(),
                completed: task.completed,
            })
        })
        .collect()
}

/// Builds the full record persisted for `date`, scores included.
pub fn build_record(date: impl Into<String>, input: &DailyInput, config: &Configuration) -> DailyRecord {
    let workouts = materialize(&config.template, &input.workouts, Alignment::Index);
    let tasks = clean_tasks(&input.tasks);

    let mut nutrition = Nutrition::default();
    for nutrient in Nutrient::ALL {
        nutrition.set(nutrient, input.nutrition.get(nutrient));
    }
    let sleep_hours = sanitize_number(input.sleep_hours).max(0.0);

    let scores = compute_scores(&workouts, &tasks, &nutrition, sleep_hours, config);

    DailyRecord {
        date: date.into(),
        workouts,
        tasks,
        nutrition,
        sleep_hours,
        scores,
    }
}
