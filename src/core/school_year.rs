//! School year business logic - Persists enrollment windows and keeps their status current.
//!
//! Rows are converted to [`EnrollmentWindow`] through [`window_of`], which re-runs the window
//! validation so a row edited by hand surfaces as `InvalidWindow` instead of a wrong answer.
//! [`sync_window_statuses`] is the step a scheduled job runs to move rows between
//! `upcoming`, `open` and `closed`.

use crate::{
    core::window::{EnrollmentWindow, WindowDates, WindowStatus},
    entities::{SchoolYear, school_year},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info};

/// One status change written by [`sync_window_statuses`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// School year that changed
    pub school_year_id: i64,
    /// Its name, for logging and notifications
    pub name: String,
    /// Previously stored status string
    pub from: String,
    /// Newly stored status
    pub to: WindowStatus,
}

/// Rebuilds the validated window from a stored row.
pub fn window_of(model: &school_year::Model) -> Result<EnrollmentWindow> {
    EnrollmentWindow::new(WindowDates {
        start_date: model.start_date,
        end_date: model.end_date,
        early_deadline: model.early_deadline,
        regular_deadline: model.regular_deadline,
        late_deadline: model.late_deadline,
        allow_new_students: model.allow_new_students,
        allow_returning_students: model.allow_returning_students,
    })
}

/// Inserts a school year for an already validated window.
///
/// The initial `status` is the window's classification on `today`.
pub async fn create_school_year(
    db: &DatabaseConnection,
    name: String,
    window: &EnrollmentWindow,
    today: NaiveDate,
) -> Result<school_year::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "School year name cannot be empty".to_string(),
        });
    }

    let dates = window.dates();
    let school_year = school_year::ActiveModel {
        name: Set(name.trim().to_string()),
        start_date: Set(dates.start_date),
        end_date: Set(dates.end_date),
        early_deadline: Set(dates.early_deadline),
        regular_deadline: Set(dates.regular_deadline),
        late_deadline: Set(dates.late_deadline),
        allow_new_students: Set(dates.allow_new_students),
        allow_returning_students: Set(dates.allow_returning_students),
        status: Set(window.status(today).as_str().to_string()),
        ..Default::default()
    };

    let result = school_year.insert(db).await?;
    info!("Created school year '{}' ({})", result.name, result.status);
    Ok(result)
}

/// Finds a school year by its primary key.
pub async fn get_school_year_by_id(
    db: &DatabaseConnection,
    school_year_id: i64,
) -> Result<Option<school_year::Model>> {
    SchoolYear::find_by_id(school_year_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a school year by its unique name.
pub async fn get_school_year_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<school_year::Model>> {
    SchoolYear::find()
        .filter(school_year::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// All school years, oldest window first.
pub async fn get_all_school_years(db: &DatabaseConnection) -> Result<Vec<school_year::Model>> {
    SchoolYear::find()
        .order_by_asc(school_year::Column::StartDate)
        .order_by_asc(school_year::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// School years whose window is open on `today`.
///
/// More than one row can match; keeping a single active cycle is up to the administrator.
pub async fn find_open_school_years(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<school_year::Model>> {
    let mut open = Vec::new();
    for model in get_all_school_years(db).await? {
        if window_of(&model)?.is_open(today) {
            open.push(model);
        }
    }
    Ok(open)
}

/// Reclassifies every school year against `today` and stores any status that changed.
///
/// All updates happen in one database transaction. The returned transitions are what a
/// caller would use to send notifications.
pub async fn sync_window_statuses(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<StatusTransition>> {
    let txn = db.begin().await?;

    let school_years = SchoolYear::find()
        .order_by_asc(school_year::Column::Id)
        .all(&txn)
        .await?;

    let mut transitions = Vec::new();
    for model in school_years {
        let status = window_of(&model)?.status(today);
        if model.status == status.as_str() {
            continue;
        }

        debug!(
            "School year '{}' moves from {} to {}",
            model.name, model.status, status
        );
        let transition = StatusTransition {
            school_year_id: model.id,
            name: model.name.clone(),
            from: model.status.clone(),
            to: status,
        };

        let mut active_model: school_year::ActiveModel = model.into();
        active_model.status = Set(status.as_str().to_string());
        active_model.update(&txn).await?;

        transitions.push(transition);
    }

    txn.commit().await?;

    info!(
        "Window status sync for {}: {} change(s)",
        today,
        transitions.len()
    );
    Ok(transitions)
}
