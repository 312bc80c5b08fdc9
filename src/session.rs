//! Editing session for the currently viewed day.
//!
//! A session moves `Idle -> Loading -> Ready`. While `Loading`, edits are
//! applied to the draft but never saved, so populating the view from a freshly
//! loaded record cannot write it back over itself. The caller acknowledges the
//! end of rendering with [`DaySession::render_complete`]; from then on every
//! edit saves the whole day.

use crate::config::{ConfigEditError, Configuration};
use crate::models::{DailyInput, DailyRecord, Nutrient, Scores, Task};
use crate::record::{Alignment, build_record, clean_tasks, materialize};
use crate::repository::Repository;
use crate::scoring::compute_scores;
use crate::storage::{KeyValueStore, StoreError};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DayEdit {
    SetCompleted {
        block: usize,
        exercise: usize,
        set: usize,
        done: bool,
    },
    AddTask,
    SetTaskText { index: usize, text: String },
    SetTaskCompleted { index: usize, completed: bool },
    SetNutrient { nutrient: Nutrient, value: f64 },
    SetSleepHours(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Applied to the draft while loading; nothing was written.
    Suppressed,
    Saved(Scores),
    SaveFailed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no day has been loaded")]
    NoDayLoaded,
    #[error("the day is still loading")]
    NotReady,
    #[error("set {set} of exercise {exercise} in block {block} does not exist")]
    NoSuchSet {
        block: usize,
        exercise: usize,
        set: usize,
    },
    #[error("task {0} does not exist")]
    NoSuchTask(usize),
    #[error(transparent)]
    Config(#[from] ConfigEditError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct DaySession {
    config: Configuration,
    alignment: Alignment,
    phase: Phase,
    status: SaveStatus,
    date: Option<NaiveDate>,
    draft: DailyInput,
    scores: Scores,
}

impl DaySession {
    pub fn new(config: Configuration) -> Self {
        Self {
            config,
            alignment: Alignment::Index,
            phase: Phase::Idle,
            status: SaveStatus::Idle,
            date: None,
            draft: DailyInput::default(),
            scores: Scores::default(),
        }
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &SaveStatus {
        &self.status
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn draft(&self) -> &DailyInput {
        &self.draft
    }

    /// Scores as last loaded or saved.
    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Scores the current draft would get, without saving anything.
    pub fn preview_scores(&self) -> Scores {
        let tasks = clean_tasks(&self.draft.tasks);
        compute_scores(
            &self.draft.workouts,
            &tasks,
            &self.draft.nutrition,
            self.draft.sleep_hours,
            &self.config,
        )
    }

    /// Replaces the draft with the stored day and disarms saving until
    /// [`render_complete`](Self::render_complete).
    pub fn begin_load<S: KeyValueStore>(&mut self, repo: &Repository<'_, S>, date: NaiveDate) {
        self.phase = Phase::Loading;
        self.status = SaveStatus::Idle;

        let record = repo.load_record(date);
        self.draft = DailyInput {
            workouts: materialize(&self.config.template, &record.workouts, self.alignment),
            tasks: record.tasks,
            nutrition: record.nutrition,
            sleep_hours: record.sleep_hours,
        };
        self.scores = record.scores;
        self.date = Some(date);
    }

    pub fn render_complete(&mut self) {
        if self.phase == Phase::Loading {
            self.phase = Phase::Ready;
        }
    }

    pub fn apply_edit<S: KeyValueStore>(
        &mut self,
        repo: &mut Repository<'_, S>,
        edit: DayEdit,
    ) -> Result<EditOutcome, SessionError> {
        if self.phase == Phase::Idle {
            return Err(SessionError::NoDayLoaded);
        }

        self.apply_to_draft(edit)?;

        if self.phase == Phase::Loading {
            return Ok(EditOutcome::Suppressed);
        }

        Ok(match self.save(repo) {
            Ok(record) => EditOutcome::Saved(record.scores),
            Err(_) => EditOutcome::SaveFailed,
        })
    }

    /// Builds the day from the draft and overwrites the stored record.
    /// On a store failure the draft stays as it is and the status reads `Failed`.
    pub fn save<S: KeyValueStore>(
        &mut self,
        repo: &mut Repository<'_, S>,
    ) -> Result<DailyRecord, SessionError> {
        let date = self.date.ok_or(SessionError::NoDayLoaded)?;
        if self.phase != Phase::Ready {
            return Err(SessionError::NotReady);
        }

        let record = build_record(date.format("%Y-%m-%d").to_string(), &self.draft, &self.config);
        self.status = SaveStatus::Saving;
        match repo.save_record(date, &record) {
            Ok(()) => {
                self.status = SaveStatus::Saved;
                self.scores = record.scores;
                Ok(record)
            }
            Err(err) => {
                error!(%date, "failed to save daily record: {err}");
                self.status = SaveStatus::Failed(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Persists the whole configuration, re-projects the draft onto the new
    /// template and, once ready, saves the day so its cached scores follow.
    ///
    /// An error from saving the day comes back after the configuration has
    /// already been stored; the status then reads `Failed`.
    pub fn save_configuration<S: KeyValueStore>(
        &mut self,
        repo: &mut Repository<'_, S>,
        config: Configuration,
    ) -> Result<Scores, SessionError> {
        config.validate()?;
        repo.save_configuration(&config)?;
        info!(blocks = config.template.len(), "configuration saved");

        self.draft.workouts = materialize(&config.template, &self.draft.workouts, self.alignment);
        self.config = config;

        if self.phase == Phase::Ready {
            let record = self.save(repo)?;
            return Ok(record.scores);
        }
        Ok(self.preview_scores())
    }

    fn apply_to_draft(&mut self, edit: DayEdit) -> Result<(), SessionError> {
        match edit {
            DayEdit::SetCompleted {
                block,
                exercise,
                set,
                done,
            } => {
                let slot = self
                    .draft
                    .workouts
                    .get_mut(block)
                    .and_then(|b| b.exercises.get_mut(exercise))
                    .and_then(|e| e.sets.get_mut(set))
                    .ok_or(SessionError::NoSuchSet {
                        block,
                        exercise,
                        set,
                    })?;
                *slot = done;
            }
            DayEdit::AddTask => self.draft.tasks.push(Task {
                text: String::new(),
                completed: false,
            }),
            DayEdit::SetTaskText { index, text } => {
                self.task_mut(index)?.text = text;
            }
            DayEdit::SetTaskCompleted { index, completed } => {
                self.task_mut(index)?.completed = completed;
            }
            DayEdit::SetNutrient { nutrient, value } => self.draft.nutrition.set(nutrient, value),
            DayEdit::SetSleepHours(hours) => {
                self.draft.sleep_hours = if hours.is_finite() { hours } else { 0.0 };
            }
        }
        Ok(())
    }

    fn task_mut(&mut self, index: usize) -> Result<&mut Task, SessionError> {
        self.draft
            .tasks
            .get_mut(index)
            .ok_or(SessionError::NoSuchTask(index))
    }
}
