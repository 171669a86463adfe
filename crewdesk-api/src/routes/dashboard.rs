/// Dashboard statistics endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/dashboard/stats
/// ```
///
/// Admins see totals across the whole system; team members see the same
/// shape scoped to their own projects and assigned tasks. Both variants
/// carry the caller's unread-notification count. "Due today" uses UTC day
/// boundaries and excludes tasks already done.

use axum::{extract::State, Extension, Json};
use chrono::{Duration, NaiveTime, Utc};
use serde::Serialize;

use crate::{app::AppState, error::ApiResult, middleware::auth::CurrentUser};
use crewdesk_shared::store::{StatusCounts, TaskFilter};

/// Role-scoped statistics payload
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Admin {
        total_projects: u64,
        total_tasks: u64,
        total_users: u64,
        tasks_by_status: StatusCounts,
        tasks_due_today: u64,
        unread_notifications: u64,
    },
    Member {
        my_projects: u64,
        my_total_tasks: u64,
        my_tasks_by_status: StatusCounts,
        my_tasks_due_today: u64,
        unread_notifications: u64,
    },
}

/// Returns role-scoped dashboard statistics
pub async fn stats(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<DashboardStats>> {
    let store = state.store.as_ref();

    let today_start = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let today_end = today_start + Duration::days(1);

    let stats = if user.is_admin() {
        let all = TaskFilter::default();
        DashboardStats::Admin {
            total_projects: store.count_projects().await?,
            total_tasks: store.count_tasks(&all).await?,
            total_users: store.count_users().await?,
            tasks_by_status: store.task_status_counts(&all).await?,
            tasks_due_today: store
                .count_tasks_due_between(today_start, today_end, None)
                .await?,
            unread_notifications: store.count_unread_notifications(user.id).await?,
        }
    } else {
        let my_projects = store.projects_for_user(user.id).await?;
        let mine = TaskFilter::for_assignee(user.id);
        DashboardStats::Member {
            my_projects: my_projects.len() as u64,
            my_total_tasks: store.count_tasks(&mine).await?,
            my_tasks_by_status: store.task_status_counts(&mine).await?,
            my_tasks_due_today: store
                .count_tasks_due_between(today_start, today_end, Some(user.id))
                .await?,
            unread_notifications: store.count_unread_notifications(user.id).await?,
        }
    };

    Ok(Json(stats))
}
