use crate::config::{ConfigEditError, Configuration, DEFAULT_SET_COUNT};
use crate::errors::AppError;
use crate::history::{DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS, build_history_at};
use crate::models::{
    DailyInput, DailyRecord, HistoryQuery, HistoryResponse, NewBlockRequest, NewExerciseRequest,
    NutritionTargets, SetCountRequest, SleepTarget, ViewQuery, WorkoutTemplate,
};
use crate::record::{Alignment, build_record, materialize_record};
use crate::repository::Repository;
use crate::state::AppState;
use crate::storage::persist_data;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{Local, NaiveDate};
use tracing::info;

pub async fn get_daily(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyRecord>, AppError> {
    let date = parse_date(&date)?;
    let mut data = state.data.lock().await;
    let repo = Repository::new(&mut *data, &state.namespace);
    Ok(Json(repo.load_record(date)))
}

pub async fn get_daily_view(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<DailyRecord>, AppError> {
    let date = parse_date(&date)?;
    let mut data = state.data.lock().await;
    let repo = Repository::new(&mut *data, &state.namespace);
    let config = repo.load_configuration();
    let record = repo.load_record(date);
    Ok(Json(materialize_record(&record, &config, query.align)))
}

pub async fn save_daily(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<DailyInput>,
) -> Result<Json<DailyRecord>, AppError> {
    let date = parse_date(&date)?;
    let mut data = state.data.lock().await;
    let record = {
        let mut repo = Repository::new(&mut *data, &state.namespace);
        let config = repo.load_configuration();
        let record = build_record(date_key(date), &payload, &config);
        repo.save_record(date, &record)?;
        record
    };

    persist_data(&state.data_path, &data).await?;

    Ok(Json(record))
}

pub async fn get_template(State(state): State<AppState>) -> Json<WorkoutTemplate> {
    Json(load_configuration(&state).await.template)
}

pub async fn get_nutrition_targets(State(state): State<AppState>) -> Json<NutritionTargets> {
    Json(load_configuration(&state).await.nutrition_targets)
}

pub async fn get_sleep_target(State(state): State<AppState>) -> Json<SleepTarget> {
    Json(load_configuration(&state).await.sleep_target)
}

pub async fn get_config(State(state): State<AppState>) -> Json<Configuration> {
    Json(load_configuration(&state).await)
}

pub async fn put_config(
    State(state): State<AppState>,
    Json(payload): Json<Configuration>,
) -> Result<Json<Configuration>, AppError> {
    update_configuration(&state, |config| {
        *config = payload;
        Ok(())
    })
    .await
}

pub async fn add_block(
    State(state): State<AppState>,
    Json(payload): Json<NewBlockRequest>,
) -> Result<Json<Configuration>, AppError> {
    if payload.time.trim().is_empty() {
        return Err(AppError::bad_request("time must not be empty"));
    }
    update_configuration(&state, |config| {
        config.add_block(payload.time.trim(), payload.name.trim());
        Ok(())
    })
    .await
}

pub async fn remove_block(
    State(state): State<AppState>,
    Path(block): Path<usize>,
) -> Result<Json<Configuration>, AppError> {
    update_configuration(&state, |config| config.remove_block(block).map(|_| ())).await
}

pub async fn add_exercise(
    State(state): State<AppState>,
    Path(block): Path<usize>,
    Json(payload): Json<NewExerciseRequest>,
) -> Result<Json<Configuration>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("exercise name must not be empty"));
    }
    let sets = payload.sets.unwrap_or(DEFAULT_SET_COUNT);
    update_configuration(&state, |config| {
        config
            .add_exercise(block, payload.name.trim(), sets)
            .map(|_| ())
    })
    .await
}

pub async fn remove_exercise(
    State(state): State<AppState>,
    Path((block, exercise)): Path<(usize, usize)>,
) -> Result<Json<Configuration>, AppError> {
    update_configuration(&state, |config| {
        config.remove_exercise(block, exercise).map(|_| ())
    })
    .await
}

pub async fn set_set_count(
    State(state): State<AppState>,
    Path((block, exercise)): Path<(usize, usize)>,
    Json(payload): Json<SetCountRequest>,
) -> Result<Json<Configuration>, AppError> {
    update_configuration(&state, |config| {
        config.set_set_count(block, exercise, payload.count)
    })
    .await
}

pub async fn put_nutrition_targets(
    State(state): State<AppState>,
    Json(payload): Json<NutritionTargets>,
) -> Result<Json<Configuration>, AppError> {
    update_configuration(&state, |config| config.set_nutrition_targets(payload)).await
}

pub async fn put_sleep_target(
    State(state): State<AppState>,
    Json(payload): Json<SleepTarget>,
) -> Result<Json<Configuration>, AppError> {
    update_configuration(&state, |config| config.set_sleep_target(payload)).await
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(AppError::bad_request(format!(
            "days must be between 1 and {MAX_HISTORY_DAYS}"
        )));
    }
    let end = match query.end.as_deref() {
        Some(end) => parse_date(end)?,
        None => today(),
    };

    let mut data = state.data.lock().await;
    let repo = Repository::new(&mut *data, &state.namespace);
    Ok(Json(build_history_at(end, days, &repo)?))
}

async fn load_configuration(state: &AppState) -> Configuration {
    let mut data = state.data.lock().await;
    Repository::new(&mut *data, &state.namespace).load_configuration()
}

/// Applies `edit` to the stored configuration and saves it whole. A refused
/// edit leaves the stored configuration untouched. Today's record, if one
/// exists, is rebuilt so its cached scores follow the new configuration.
async fn update_configuration<F>(state: &AppState, edit: F) -> Result<Json<Configuration>, AppError>
where
    F: FnOnce(&mut Configuration) -> Result<(), ConfigEditError>,
{
    let mut data = state.data.lock().await;
    let config = {
        let mut repo = Repository::new(&mut *data, &state.namespace);
        let mut config = repo.load_configuration();
        edit(&mut config)?;
        config.validate()?;
        repo.save_configuration(&config)?;

        let today = today();
        if let Some(record) = repo.find_record(today) {
            let view = materialize_record(&record, &config, Alignment::Index);
            let input = DailyInput {
                workouts: view.workouts,
                tasks: view.tasks,
                nutrition: view.nutrition,
                sleep_hours: view.sleep_hours,
            };
            repo.save_record(today, &build_record(date_key(today), &input, &config))?;
        }
        config
    };

    persist_data(&state.data_path, &data).await?;
    info!(blocks = config.template.len(), "configuration saved");

    Ok(Json(config))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("invalid date '{value}', expected YYYY-MM-DD")))
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
