//! Daily scores derived from a record's activity and the active configuration.
//!
//! Fitness and tasks are bounded to 0..=100 by construction. Food and sleep are
//! plain ratios against their targets and are left unclamped, so overshooting a
//! target reads above 100.

use crate::config::Configuration;
use crate::models::{Nutrient, Nutrition, NutritionTargets, Scores, SleepTarget, Task, WorkoutBlock};

pub fn fitness_score(workouts: &[WorkoutBlock]) -> i64 {
    let (total, completed) = workouts
        .iter()
        .flat_map(|block| block.exercises.iter())
        .fold((0usize, 0usize), |(total, completed), exercise| {
            (total + exercise.sets.len(), completed + exercise.completed_sets())
        });

    percentage(completed as f64, total as f64)
}

pub fn tasks_score(tasks: &[Task]) -> i64 {
    let completed = tasks.iter().filter(|task| task.completed).count();
    percentage(completed as f64, tasks.len() as f64)
}

/// Average percentage of target reached across scored nutrients with a positive target.
/// A day with nothing entered scores 0 rather than "0% of every target".
pub fn food_score(nutrition: &Nutrition, targets: &NutritionTargets) -> i64 {
    let nothing_entered = Nutrient::SCORED
        .iter()
        .all(|nutrient| nutrition.get(*nutrient) == 0.0);
    if nothing_entered {
        return 0;
    }

    let percentages: Vec<f64> = Nutrient::SCORED
        .iter()
        .filter_map(|nutrient| {
            let target = targets.get(*nutrient);
            (target > 0.0).then(|| 100.0 * nutrition.get(*nutrient) / target)
        })
        .collect();

    if percentages.is_empty() {
        return 0;
    }

    let average = percentages.iter().sum::<f64>() / percentages.len() as f64;
    round_half_up(average)
}

pub fn sleep_score(hours: f64, target: &SleepTarget) -> i64 {
    if !hours.is_finite() || hours <= 0.0 {
        return 0;
    }

    let midpoint = target.midpoint();
    if !midpoint.is_finite() || midpoint <= 0.0 {
        return 0;
    }

    round_half_up(100.0 * hours / midpoint)
}

pub fn compute_scores(
    workouts: &[WorkoutBlock],
    tasks: &[Task],
    nutrition: &Nutrition,
    sleep_hours: f64,
    config: &Configuration,
) -> Scores {
    Scores {
        fitness: fitness_score(workouts),
        tasks: tasks_score(tasks),
        food: food_score(nutrition, &config.nutrition_targets),
        sleep: sleep_score(sleep_hours, &config.sleep_target),
    }
}

fn percentage(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return 0;
    }
    round_half_up(100.0 * part / whole)
}

/// Halves round toward positive infinity, so -0.5 becomes 0 and -1.5 becomes -1.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Exercise, default_nutrition_targets};

    fn block(sets: &[&[bool]]) -> WorkoutBlock {
        WorkoutBlock {
            time: "6AM".into(),
            name: String::new(),
            exercises: sets
                .iter()
                .enumerate()
                .map(|(i, sets)| Exercise {
                    name: format!("exercise {i}"),
                    sets: sets.to_vec(),
                })
                .collect(),
        }
    }

    fn task(text: &str, completed: bool) -> Task {
        Task {
            text: text.into(),
            completed,
        }
    }

    #[test]
    fn fitness_is_zero_without_sets() {
        assert_eq!(fitness_score(&[]), 0);
        assert_eq!(fitness_score(&[block(&[&[]])]), 0);
        assert_eq!(
            fitness_score(&[WorkoutBlock {
                time: "5AM".into(),
                name: String::new(),
                exercises: vec![],
            }]),
            0
        );
    }

    #[test]
    fn fitness_counts_completed_sets_across_blocks() {
        let workouts = vec![block(&[&[true, false, false]]), block(&[&[true, true, false]])];
        assert_eq!(fitness_score(&workouts), 50);

        let workouts = vec![block(&[&[true, true, false]])];
        assert_eq!(fitness_score(&workouts), 67);
    }

    #[test]
    fn fitness_never_drops_as_sets_are_completed() {
        let mut workouts = vec![block(&[&[false; 8], &[false; 3]]), block(&[&[false; 5]])];
        let mut previous = fitness_score(&workouts);
        assert_eq!(previous, 0);

        for b in 0..workouts.len() {
            for e in 0..workouts[b].exercises.len() {
                for s in 0..workouts[b].exercises[e].sets.len() {
                    workouts[b].exercises[e].sets[s] = true;
                    let current = fitness_score(&workouts);
                    assert!(current >= previous);
                    previous = current;
                }
            }
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn tasks_score_tracks_completion_ratio() {
        assert_eq!(tasks_score(&[]), 0);
        assert_eq!(tasks_score(&[task("a", true), task("b", true)]), 100);
        assert_eq!(tasks_score(&[task("a", true), task("b", false), task("c", false)]), 33);
        assert_eq!(tasks_score(&[task("a", false)]), 0);
    }

    #[test]
    fn food_is_zero_when_nothing_entered() {
        let targets = default_nutrition_targets();
        assert_eq!(food_score(&Nutrition::default(), &targets), 0);

        let calories_only = Nutrition {
            calories: 2400.0,
            ..Nutrition::default()
        };
        assert_eq!(food_score(&calories_only, &targets), 0);
    }

    #[test]
    fn food_averages_zero_nutrients_with_targets() {
        let nutrition = Nutrition {
            protein: 175.0,
            ..Nutrition::default()
        };
        // [100, 0, 0, 0, 0, 0] averaged over six nutrients
        assert_eq!(food_score(&nutrition, &default_nutrition_targets()), 17);
    }

    #[test]
    fn food_is_not_clamped() {
        let targets = default_nutrition_targets();
        let mut nutrition = Nutrition::default();
        for nutrient in Nutrient::SCORED {
            nutrition.set(nutrient, targets.get(nutrient) * 3.0);
        }
        assert_eq!(food_score(&nutrition, &targets), 300);
    }

    #[test]
    fn food_skips_nutrients_without_positive_target() {
        let targets = Nutrition {
            protein: 100.0,
            carbs: 200.0,
            ..Nutrition::default()
        };
        let nutrition = Nutrition {
            protein: 50.0,
            carbs: 200.0,
            salt: 9000.0,
            ..Nutrition::default()
        };
        // (50 + 100) / 2
        assert_eq!(food_score(&nutrition, &targets), 75);
    }

    #[test]
    fn halves_round_toward_positive_infinity() {
        let targets = Nutrition {
            protein: 100.0,
            ..Nutrition::default()
        };
        let score = |protein: f64| {
            food_score(
                &Nutrition {
                    protein,
                    ..Nutrition::default()
                },
                &targets,
            )
        };
        assert_eq!(score(0.5), 1);
        assert_eq!(score(-0.5), 0);
        assert_eq!(score(-1.5), -1);
        assert_eq!(score(-2.5), -2);

        assert_eq!(round_half_up(16.5), 17);
        assert_eq!(round_half_up(-16.5), -16);
    }

    #[test]
    fn sleep_handles_invalid_hours() {
        let target = SleepTarget::default();
        assert_eq!(sleep_score(0.0, &target), 0);
        assert_eq!(sleep_score(-3.0, &target), 0);
        assert_eq!(sleep_score(f64::NAN, &target), 0);
        assert_eq!(sleep_score(f64::INFINITY, &target), 0);
    }

    #[test]
    fn sleep_is_relative_to_target_midpoint() {
        let target = SleepTarget::default();
        assert_eq!(sleep_score(8.0, &target), 100);
        assert_eq!(sleep_score(6.0, &target), 75);
        assert_eq!(sleep_score(12.0, &target), 150);

        let custom = SleepTarget { min: 6.0, max: 7.0 };
        assert_eq!(sleep_score(6.5, &custom), 100);
    }

    #[test]
    fn compute_scores_uses_configuration() {
        let mut config = Configuration::default();
        config.sleep_target = SleepTarget { min: 4.0, max: 4.0 };

        let scores = compute_scores(
            &[block(&[&[true, false]])],
            &[task("write", true)],
            &Nutrition::default(),
            8.0,
            &config,
        );
        assert_eq!(
            scores,
            Scores {
                fitness: 50,
                tasks: 100,
                food: 0,
                sleep: 200,
            }
        );
    }
}
