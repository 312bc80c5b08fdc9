use crate::models::{
    Exercise, Nutrient, NutritionTargets, SleepTarget, WorkoutBlock, WorkoutTemplate,
    default_nutrition_targets,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sets given to exercises created without an explicit count.
pub const DEFAULT_SET_COUNT: usize = 8;
/// Upper bound on sets per exercise.
pub const MAX_SET_COUNT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigEditError {
    #[error("the last workout block cannot be removed")]
    LastBlock,
    #[error("the last exercise in a block cannot be removed")]
    LastExercise,
    #[error("workout block {0} does not exist")]
    NoSuchBlock(usize),
    #[error("exercise {exercise} does not exist in block {block}")]
    NoSuchExercise { block: usize, exercise: usize },
    #[error("an exercise needs at least one set")]
    NoSets,
    #[error("an exercise can have at most {max} sets, got {0}", max = MAX_SET_COUNT)]
    TooManySets(usize),
    #[error("the workout template needs at least one block")]
    EmptyTemplate,
    #[error("workout block {0} needs at least one exercise")]
    EmptyBlock(usize),
    #[error("target for {0:?} must be a positive number")]
    InvalidTarget(Nutrient),
    #[error("sleep target must satisfy 0 < min <= max")]
    InvalidSleepTarget,
}

/// Date-independent settings every score and every day view depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub template: WorkoutTemplate,
    pub nutrition_targets: NutritionTargets,
    pub sleep_target: SleepTarget,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            template: default_template(),
            nutrition_targets: default_nutrition_targets(),
            sleep_target: SleepTarget::default(),
        }
    }
}

impl Configuration {
    pub fn validate(&self) -> Result<(), ConfigEditError> {
        validate_template(&self.template)?;
        validate_targets(&self.nutrition_targets)?;
        validate_sleep_target(&self.sleep_target)
    }

    pub fn add_block(&mut self, time: impl Into<String>, name: impl Into<String>) -> usize {
        self.template.push(WorkoutBlock {
            time: time.into(),
            name: name.into(),
            exercises: vec![Exercise::new("new exercise", DEFAULT_SET_COUNT)],
        });
        self.template.len() - 1
    }

    pub fn remove_block(&mut self, block: usize) -> Result<WorkoutBlock, ConfigEditError> {
        if block >= self.template.len() {
            return Err(ConfigEditError::NoSuchBlock(block));
        }
        if self.template.len() == 1 {
            return Err(ConfigEditError::LastBlock);
        }
        Ok(self.template.remove(block))
    }

    pub fn add_exercise(
        &mut self,
        block: usize,
        name: impl Into<String>,
        set_count: usize,
    ) -> Result<usize, ConfigEditError> {
        check_set_count(set_count)?;
        let exercises = &mut self.block_mut(block)?.exercises;
        exercises.push(Exercise::new(name, set_count));
        Ok(exercises.len() - 1)
    }

    pub fn remove_exercise(
        &mut self,
        block: usize,
        exercise: usize,
    ) -> Result<Exercise, ConfigEditError> {
        let exercises = &mut self.block_mut(block)?.exercises;
        if exercise >= exercises.len() {
            return Err(ConfigEditError::NoSuchExercise { block, exercise });
        }
        if exercises.len() == 1 {
            return Err(ConfigEditError::LastExercise);
        }
        Ok(exercises.remove(exercise))
    }

    /// Resizes an exercise to `count` unchecked sets.
    pub fn set_set_count(
        &mut self,
        block: usize,
        exercise: usize,
        count: usize,
    ) -> Result<(), ConfigEditError> {
        check_set_count(count)?;
        let target = self
            .block_mut(block)?
            .exercises
            .get_mut(exercise)
            .ok_or(ConfigEditError::NoSuchExercise { block, exercise })?;
        target.sets = vec![false; count];
        Ok(())
    }

    pub fn set_nutrition_targets(&mut self, targets: NutritionTargets) -> Result<(), ConfigEditError> {
        validate_targets(&targets)?;
        self.nutrition_targets = targets;
        Ok(())
    }

    pub fn set_sleep_target(&mut self, target: SleepTarget) -> Result<(), ConfigEditError> {
        validate_sleep_target(&target)?;
        self.sleep_target = target;
        Ok(())
    }

    fn block_mut(&mut self, block: usize) -> Result<&mut WorkoutBlock, ConfigEditError> {
        self.template
            .get_mut(block)
            .ok_or(ConfigEditError::NoSuchBlock(block))
    }
}

pub fn default_template() -> WorkoutTemplate {
    vec![
        WorkoutBlock {
            time: "5AM".into(),
            name: "σθενος".into(),
            exercises: vec![Exercise::new("[0*][10] - barbell press", 8)],
        },
        WorkoutBlock {
            time: "6AM".into(),
            name: String::new(),
            exercises: vec![
                Exercise::new("[30*][10] - dumbell curl", 8),
                Exercise::new("[8] wide", 1),
            ],
        },
        WorkoutBlock {
            time: "7AM".into(),
            name: String::new(),
            exercises: vec![Exercise::new("machine row", 8)],
        },
    ]
}

pub fn validate_template(template: &WorkoutTemplate) -> Result<(), ConfigEditError> {
    if template.is_empty() {
        return Err(ConfigEditError::EmptyTemplate);
    }
    for (index, block) in template.iter().enumerate() {
        if block.exercises.is_empty() {
            return Err(ConfigEditError::EmptyBlock(index));
        }
        for exercise in &block.exercises {
            check_set_count(exercise.sets.len())?;
        }
    }
    Ok(())
}

fn check_set_count(count: usize) -> Result<(), ConfigEditError> {
    match count {
        0 => Err(ConfigEditError::NoSets),
        count if count > MAX_SET_COUNT => Err(ConfigEditError::TooManySets(count)),
        _ => Ok(()),
    }
}

pub fn validate_targets(targets: &NutritionTargets) -> Result<(), ConfigEditError> {
    for nutrient in Nutrient::SCORED {
        let value = targets.get(nutrient);
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigEditError::InvalidTarget(nutrient));
        }
    }
    Ok(())
}

pub fn validate_sleep_target(target: &SleepTarget) -> Result<(), ConfigEditError> {
    let valid = target.min.is_finite()
        && target.max.is_finite()
        && target.min > 0.0
        && target.min <= target.max;
    if valid {
        Ok(())
    } else {
        Err(ConfigEditError::InvalidSleepTarget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Configuration::default();
        assert_eq!(config.template.len(), 3);
        assert_eq!(config.template[1].exercises.len(), 2);
        assert_eq!(config.sleep_target.midpoint(), 8.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn removing_last_block_is_refused() {
        let mut config = Configuration::default();
        config.remove_block(2).unwrap();
        config.remove_block(1).unwrap();
        let before = config.clone();

        assert_eq!(config.remove_block(0), Err(ConfigEditError::LastBlock));
        assert_eq!(config, before);
    }

    #[test]
    fn removing_last_exercise_is_refused() {
        let mut config = Configuration::default();
        let before = config.clone();

        assert_eq!(config.remove_exercise(0, 0), Err(ConfigEditError::LastExercise));
        assert_eq!(config, before);

        let removed = config.remove_exercise(1, 0).unwrap();
        assert_eq!(removed.name, "[30*][10] - dumbell curl");
        assert_eq!(config.template[1].exercises.len(), 1);
    }

    #[test]
    fn edits_reject_unknown_indices() {
        let mut config = Configuration::default();
        assert_eq!(config.remove_block(9), Err(ConfigEditError::NoSuchBlock(9)));
        assert_eq!(
            config.remove_exercise(0, 4),
            Err(ConfigEditError::NoSuchExercise { block: 0, exercise: 4 })
        );
        assert_eq!(config.add_exercise(7, "row", 3), Err(ConfigEditError::NoSuchBlock(7)));
    }

    #[test]
    fn set_count_changes_reset_sets() {
        let mut config = Configuration::default();
        config.set_set_count(1, 1, 4).unwrap();
        assert_eq!(config.template[1].exercises[1].sets, vec![false; 4]);
        assert_eq!(config.set_set_count(1, 1, 0), Err(ConfigEditError::NoSets));
    }

    #[test]
    fn set_counts_are_bounded() {
        let mut config = Configuration::default();
        let before = config.clone();

        assert_eq!(
            config.set_set_count(0, 0, usize::MAX),
            Err(ConfigEditError::TooManySets(usize::MAX))
        );
        assert_eq!(
            config.add_exercise(0, "burpees", MAX_SET_COUNT + 1),
            Err(ConfigEditError::TooManySets(MAX_SET_COUNT + 1))
        );
        assert_eq!(config, before);

        config.set_set_count(0, 0, MAX_SET_COUNT).unwrap();
        assert_eq!(config.template[0].exercises[0].sets.len(), MAX_SET_COUNT);

        let mut template = default_template();
        template[1].exercises[0].sets = vec![false; MAX_SET_COUNT + 1];
        assert_eq!(
            validate_template(&template),
            Err(ConfigEditError::TooManySets(MAX_SET_COUNT + 1))
        );
    }

    #[test]
    fn added_blocks_start_with_one_exercise() {
        let mut config = Configuration::default();
        let index = config.add_block("8PM", "mobility");
        assert_eq!(index, 3);
        assert_eq!(config.template[3].exercises.len(), 1);
        assert!(config.validate().is_ok());

        let exercise = config.add_exercise(index, "hip openers", 2).unwrap();
        assert_eq!(exercise, 1);
    }

    #[test]
    fn targets_must_be_positive() {
        let mut config = Configuration::default();
        let mut targets = default_nutrition_targets();
        targets.fiber = 0.0;
        assert_eq!(
            config.set_nutrition_targets(targets),
            Err(ConfigEditError::InvalidTarget(Nutrient::Fiber))
        );

        assert_eq!(
            config.set_sleep_target(SleepTarget { min: 9.0, max: 7.0 }),
            Err(ConfigEditError::InvalidSleepTarget)
        );
        assert!(config.set_sleep_target(SleepTarget { min: 6.0, max: 8.0 }).is_ok());
        assert_eq!(config.sleep_target.midpoint(), 7.0);
    }

    #[test]
    fn template_validation_catches_empty_structures() {
        assert_eq!(validate_template(&vec![]), Err(ConfigEditError::EmptyTemplate));

        let mut template = default_template();
        template[2].exercises.clear();
        assert_eq!(validate_template(&template), Err(ConfigEditError::EmptyBlock(2)));
    }
}
