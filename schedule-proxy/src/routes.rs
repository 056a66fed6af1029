use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use log::{debug, info};
use quick_cache::sync::Cache;
use serde::Deserialize;
use tokio::sync::RwLock;

use schedule_parser::{
    parse_course, DateKey, Export, ScheduleStore, ScheduleTable, CONTENT_TYPE, FILE_NAME,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<ScheduleStore>>,
    exports: Option<Arc<Cache<u64, Arc<Export>>>>,
}

impl AppState {
    /// `cache_capacity` of `None` renders every export from scratch.
    pub fn new(cache_capacity: Option<usize>) -> Self {
        Self {
            store: Arc::default(),
            exports: cache_capacity.map(|capacity| Arc::new(Cache::new(capacity))),
        }
    }

    fn export(&self, store: &ScheduleStore) -> Arc<Export> {
        let Some(cache) = &self.exports else {
            return Arc::new(store.export());
        };

        if let Some(export) = cache.get(&store.revision()) {
            debug!("Reusing export for revision {}", store.revision());
            return export;
        }

        let export = Arc::new(store.export());
        cache.insert(store.revision(), Arc::clone(&export));
        export
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/courses", post(handle_add_course))
        .route("/tasks", put(handle_set_task).post(handle_add_task))
        .route("/links", put(handle_set_teacher_link))
        .route("/schedule", get(handle_schedule))
        .route(&format!("/{FILE_NAME}"), get(handle_export))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .with_state(state)
}

#[derive(Deserialize)]
struct CourseBody {
    name: String,
    text: String,
}

#[derive(Deserialize)]
struct TaskBody {
    date: DateKey,
    text: String,
}

#[derive(Deserialize)]
struct NewTaskBody {
    date: NaiveDate,
    text: String,
}

#[derive(Deserialize)]
struct TeacherLinkBody {
    course: String,
    teacher: String,
    url: String,
}

async fn handle_add_course(State(state): State<AppState>, Json(body): Json<CourseBody>) -> StatusCode {
    if body.name.is_empty() || body.text.is_empty() {
        debug!("Ignoring course without name or schedule");
        return StatusCode::NO_CONTENT;
    }

    let parsed = parse_course(&body.text);
    info!(
        "Adding course `{}` with {} sessions",
        body.name,
        parsed.sessions.len()
    );

    state.store.write().await.merge_course(&body.name, parsed);
    StatusCode::NO_CONTENT
}

async fn handle_set_task(State(state): State<AppState>, Json(body): Json<TaskBody>) -> StatusCode {
    debug!("Setting task on {}", body.date);
    state.store.write().await.set_task(body.date, body.text);
    StatusCode::NO_CONTENT
}

async fn handle_add_task(State(state): State<AppState>, Json(body): Json<NewTaskBody>) -> StatusCode {
    debug!("Adding task on {}", body.date);
    state.store.write().await.add_task_on(body.date, &body.text);
    StatusCode::NO_CONTENT
}

async fn handle_set_teacher_link(
    State(state): State<AppState>,
    Json(body): Json<TeacherLinkBody>,
) -> StatusCode {
    debug!("Setting link of `{}` in `{}`", body.teacher, body.course);
    state
        .store
        .write()
        .await
        .set_teacher_link(&body.course, &body.teacher, &body.url);
    StatusCode::NO_CONTENT
}

async fn handle_schedule(State(state): State<AppState>) -> Json<ScheduleTable> {
    Json(state.store.read().await.table())
}

async fn handle_export(State(state): State<AppState>) -> Response {
    let export = {
        let store = state.store.read().await;
        state.export(&store)
    };

    info!(
        "Exporting calendar, {} cells skipped",
        export.skipped.len()
    );

    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{FILE_NAME}\""),
            ),
        ],
        export.calendar.clone(),
    )
        .into_response()
}
