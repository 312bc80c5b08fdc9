use crate::models::{HistoryResponse, Scores, ScorePoint, WeeklyScoreAverage};
use crate::repository::Repository;
use crate::storage::KeyValueStore;
use chrono::{Datelike, Days, Local, NaiveDate};
use thiserror::Error;

pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const MAX_HISTORY_DAYS: u32 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("a {days}-day history ending {end} falls outside the supported date range")]
    OutOfRange { end: NaiveDate, days: u32 },
}

pub fn build_history<S: KeyValueStore>(
    repo: &Repository<'_, S>,
    days: u32,
) -> Result<HistoryResponse, HistoryError> {
    build_history_at(Local::now().date_naive(), days, repo)
}

/// Stored scores for the `days` days ending at `end`, oldest first. Days with
/// no record count as all-zero. Windows whose weeks reach past the calendar
/// chrono can represent are refused.
pub fn build_history_at<S: KeyValueStore>(
    end: NaiveDate,
    days: u32,
    repo: &Repository<'_, S>,
) -> Result<HistoryResponse, HistoryError> {
    let days = days.clamp(1, MAX_HISTORY_DAYS);
    let out_of_range = HistoryError::OutOfRange { end, days };

    let start = end
        .checked_sub_days(Days::new(u64::from(days) - 1))
        .ok_or_else(|| out_of_range.clone())?;
    let first_week = week_start(start).ok_or_else(|| out_of_range.clone())?;
    // The last week shown starts on or before `end` and runs six days past it at most.
    end.checked_add_days(Days::new(7))
        .ok_or_else(|| out_of_range.clone())?;

    let mut points = Vec::with_capacity(days as usize);
    let mut date = start;
    while date <= end {
        let scores = repo
            .find_record(date)
            .map(|record| record.scores)
            .unwrap_or_default();
        points.push(to_point(date, scores));
        date = date.checked_add_days(Days::new(1)).ok_or_else(|| out_of_range.clone())?;
    }

    let mut weekly_averages = Vec::new();
    let mut week = first_week;
    while week <= end {
        let week_end = week
            .checked_add_days(Days::new(6))
            .ok_or_else(|| out_of_range.clone())?;
        let (from, to) = (date_key(week), date_key(week_end));
        let in_range: Vec<&ScorePoint> = points
            .iter()
            .filter(|point| point.date >= from && point.date <= to)
            .collect();

        let days_counted = in_range.len() as u8;
        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };
        let average = |pick: fn(&ScorePoint) -> i64| {
            in_range.iter().map(|point| pick(point) as f64).sum::<f64>() / denom
        };

        weekly_averages.push(WeeklyScoreAverage {
            week: week_label(week),
            start_date: week.to_string(),
            end_date: week_end.to_string(),
            days_counted,
            avg_fitness: average(|point| point.fitness),
            avg_tasks: average(|point| point.tasks),
            avg_food: average(|point| point.food),
            avg_sleep: average(|point| point.sleep),
        });

        week = week
            .checked_add_days(Days::new(7))
            .ok_or_else(|| out_of_range.clone())?;
    }

    Ok(HistoryResponse {
        days: points,
        weekly_averages,
    })
}

fn to_point(date: NaiveDate, scores: Scores) -> ScorePoint {
    ScorePoint {
        date: date_key(date),
        fitness: scores.fitness,
        tasks: scores.tasks,
        food: scores.food,
        sleep: scores.sleep,
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
