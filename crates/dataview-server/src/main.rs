use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use dataview_core::{FilterValue, Record, SortState, ViewConfig, ViewError};
use dataview_engine::{DataView, ExportFormat};
use parking_lot::RwLock;
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod metrics;
use metrics::{track, ACTIVE_VIEWS, EXPORT_TOTAL};

#[derive(Clone)]
struct AppState {
    views: Arc<RwLock<HashMap<String, DataView>>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_env_filter("info")
        .init();

    let state = AppState {
        views: Arc::new(RwLock::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/views", get(list_views))
        .route("/v1/views/:name", post(create_view).get(get_view))
        .route("/v1/views/:name/records", put(set_records))
        .route(
            "/v1/views/:name/state",
            put(set_state).delete(clear_state),
        )
        .route("/v1/views/:name/projection", get(projection))
        .route(
            "/v1/views/:name/presets",
            post(save_preset).get(list_presets),
        )
        .route("/v1/views/:name/presets/:id/apply", post(apply_preset))
        .route(
            "/v1/views/:name/presets/:id",
            axum::routing::delete(remove_preset),
        )
        .route("/v1/views/:name/export", get(export_view))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = std::env::var("BIND")
        .unwrap_or_else(|_| {
            let port = std::env::var("PORT").unwrap_or_else(|_| "8080".into());
            format!("0.0.0.0:{port}")
        })
        .parse()?;
    info!("http listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn error_response(err: &ViewError) -> (StatusCode, Json<serde_json::Value>) {
    let code = match err {
        ViewError::ViewNotFound | ViewError::PresetNotFound => StatusCode::NOT_FOUND,
        ViewError::Validation(_) => StatusCode::BAD_REQUEST,
    };
    (code, Json(json!({"error": err.to_string()})))
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buf = Vec::new();
    let _ = encoder.encode(&metric_families, &mut buf);
    (StatusCode::OK, String::from_utf8(buf).unwrap_or_default())
}

#[derive(serde::Deserialize)]
struct CreateViewReq {
    config: ViewConfig,
    #[serde(default)]
    records: Vec<Record>,
}

async fn create_view(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<CreateViewReq>,
) -> impl IntoResponse {
    let _timer = track("create_view");
    let mut view = DataView::new(req.config);
    let count = req.records.len();
    view.set_records(req.records);
    let mut views = app.views.write();
    views.insert(name.clone(), view);
    ACTIVE_VIEWS.set(views.len() as f64);
    info!(view = %name, records = count, "view registered");
    (StatusCode::OK, Json(json!({"name": name, "records": count})))
}

async fn list_views(State(app): State<AppState>) -> impl IntoResponse {
    let _timer = track("list_views");
    let views = app.views.read();
    let mut out: Vec<serde_json::Value> = views
        .iter()
        .map(|(name, view)| {
            json!({
                "name": name,
                "records": view.records().len(),
                "presets": view.presets().len(),
            })
        })
        .collect();
    out.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
    (StatusCode::OK, Json(out))
}

async fn get_view(State(app): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let _timer = track("get_view");
    let views = app.views.read();
    match views.get(&name) {
        Some(view) => (
            StatusCode::OK,
            Json(json!({
                "config": view.config(),
                "state": view.state(),
                "records": view.records().len(),
                "matched": view.projection().len(),
            })),
        )
            .into_response(),
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

async fn set_records(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(records): Json<Vec<Record>>,
) -> impl IntoResponse {
    let _timer = track("set_records");
    let mut views = app.views.write();
    match views.get_mut(&name) {
        Some(view) => {
            let count = records.len();
            view.set_records(records);
            (StatusCode::OK, Json(json!({"records": count}))).into_response()
        }
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

#[derive(serde::Deserialize)]
struct StatePatch {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    filters: Option<BTreeMap<String, FilterValue>>,
    #[serde(default)]
    sort: Option<SortState>,
}

async fn set_state(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(patch): Json<StatePatch>,
) -> impl IntoResponse {
    let _timer = track("set_state");
    let mut views = app.views.write();
    match views.get_mut(&name) {
        Some(view) => {
            if let Some(search) = patch.search {
                view.set_search(search);
            }
            if let Some(filters) = patch.filters {
                let stale: Vec<String> = view.state().filters.keys().cloned().collect();
                for key in stale {
                    view.clear_filter(&key);
                }
                for (key, value) in filters {
                    view.set_filter(key, value);
                }
            }
            if let Some(sort) = patch.sort {
                view.set_sort(sort);
            }
            (StatusCode::OK, Json(json!({"state": view.state(), "matched": view.projection().len()})))
                .into_response()
        }
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

async fn clear_state(State(app): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let _timer = track("clear_state");
    let mut views = app.views.write();
    match views.get_mut(&name) {
        Some(view) => {
            view.clear_all();
            (StatusCode::OK, Json(json!({"state": view.state()}))).into_response()
        }
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

async fn projection(State(app): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let _timer = track("projection");
    let views = app.views.read();
    match views.get(&name) {
        Some(view) => (StatusCode::OK, Json(view.projection())).into_response(),
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

#[derive(serde::Deserialize)]
struct SavePresetReq {
    name: String,
}

async fn save_preset(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<SavePresetReq>,
) -> impl IntoResponse {
    let _timer = track("save_preset");
    let mut views = app.views.write();
    match views.get_mut(&name) {
        Some(view) => match view.save_preset(&req.name) {
            Ok(preset) => (StatusCode::OK, Json(json!(preset))).into_response(),
            Err(e) => error_response(&e).into_response(),
        },
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

async fn list_presets(State(app): State<AppState>, Path(name): Path<String>) -> impl IntoResponse {
    let _timer = track("list_presets");
    let views = app.views.read();
    match views.get(&name) {
        Some(view) => (StatusCode::OK, Json(json!(view.presets()))).into_response(),
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

async fn apply_preset(
    State(app): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let _timer = track("apply_preset");
    let mut views = app.views.write();
    match views.get_mut(&name) {
        Some(view) => match view.apply_preset(&id) {
            Ok(()) => (
                StatusCode::OK,
                Json(json!({"state": view.state(), "matched": view.projection().len()})),
            )
                .into_response(),
            Err(e) => error_response(&e).into_response(),
        },
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

async fn remove_preset(
    State(app): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> impl IntoResponse {
    let _timer = track("remove_preset");
    let mut views = app.views.write();
    match views.get_mut(&name) {
        Some(view) => {
            view.remove_preset(&id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}

#[derive(serde::Deserialize)]
struct ExportQuery {
    #[serde(default)]
    format: Option<String>,
}

async fn export_view(
    State(app): State<AppState>,
    Path(name): Path<String>,
    Query(q): Query<ExportQuery>,
) -> impl IntoResponse {
    let _timer = track("export");
    let format = match q
        .format
        .as_deref()
        .unwrap_or("csv")
        .parse::<ExportFormat>()
    {
        Ok(f) => f,
        Err(e) => return error_response(&e).into_response(),
    };
    let views = app.views.read();
    match views.get(&name) {
        Some(view) => {
            let payload = view.export(format);
            EXPORT_TOTAL
                .with_label_values(&[format.extension()])
                .inc();
            (
                StatusCode::OK,
                [(axum::http::header::CONTENT_TYPE, format.content_type())],
                payload,
            )
                .into_response()
        }
        None => error_response(&ViewError::ViewNotFound).into_response(),
    }
}
