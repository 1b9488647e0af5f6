//! HTTP server: router, middleware and widget handlers.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::AppState;
use crate::commentator::CommentarySnapshot;
use crate::config::AppConfig;
use crate::llm::ChatCompletionsClient;
use crate::patient::PatientInfo;
use crate::rating::{RatingDialog, RatingError, RatingSubmission, TracingRatingSink};
use crate::transcript::Transcript;
use crate::ui::{
    html::{closed_dialog, html_shell},
    patient_dialog, rating_dialog, render_commentator_panel, render_patient_dialog,
    render_rating_dialog,
};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "commentator.config.loaded",
        base_url = %config.commentator.base_url,
        model = %config.commentator.model,
        has_api_key = config.commentator.api_key().is_some(),
        "Commentator configuration loaded"
    );

    let client = Arc::new(ChatCompletionsClient::new(&config.commentator));
    let state = AppState::new(Arc::clone(&config), client, Arc::new(TracingRatingSink));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    // A very long timeout stands in for "disabled" so the layer type stays fixed.
    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(state.config.resilience.request_timeout_secs)
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(|| async { "ok" }))
        .route(
            "/api/conversations/{id}/commentary",
            post(api_observe_commentary).get(api_get_commentary),
        )
        .route("/api/patients/details", post(api_patient_details))
        .route("/api/rating/dialog", get(api_rating_dialog))
        .route("/api/rating", post(api_submit_rating))
        .route("/api/dialogs/{id}/close", get(api_close_dialog))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Directory served under `/static`, relative to the working directory.
const STATIC_DIR: &str = "static";

const DEMO_CONVERSATION: &str = "demo";

/// Sample transcripts posted by the demo buttons, one message apart.
const DEMO_TRANSCRIPT_ONE: &str = r#"{"messages": [{"id": 1, "role": "user", "content": "医生您好，我最近血糖有点高。"}]}"#;
const DEMO_TRANSCRIPT_TWO: &str = r#"{"messages": [{"id": 1, "role": "user", "content": "医生您好，我最近血糖有点高。"}, {"id": 2, "role": "ai", "content": "您好，请问最近有按时服药吗？"}]}"#;

const DEMO_PATIENT: &str = r#"{"basicInfo": {"name": "张三", "gender": "男", "age": 58, "height": 172, "weight": 70, "bloodType": "A"}, "medicalHistory": [{"condition": "2型糖尿病", "diagnosisDate": "2019-03-12", "details": "饮食控制加口服药"}], "medications": [{"name": "二甲双胍", "dosage": "500mg", "frequency": "每日两次", "startDate": "2019-03-15"}], "consultations": [{"date": "2024-05-20", "doctor": "李医生", "department": "内分泌科", "diagnosis": "血糖控制尚可", "prescription": "继续当前用药"}]}"#;

/// Index page handler.
async fn index_handler() -> impl IntoResponse {
    let content = format!(
        r##"<section class="space-y-4">
    {panel}
    <div class="flex gap-3">
        <button type="button" class="h-10 px-4 rounded-md bg-primary text-white"
            hx-post="/api/conversations/{conversation}/commentary" hx-ext="json-enc" hx-vals='{transcript_one}'
            hx-target="#commentator-{conversation}" hx-swap="outerHTML">患者发言</button>
        <button type="button" class="h-10 px-4 rounded-md bg-primary text-white"
            hx-post="/api/conversations/{conversation}/commentary" hx-ext="json-enc" hx-vals='{transcript_two}'
            hx-target="#commentator-{conversation}" hx-swap="outerHTML">AI 回复</button>
        <button type="button" class="h-10 px-4 rounded-md bg-primary text-white"
            hx-post="/api/patients/details" hx-ext="json-enc" hx-vals='{patient}'
            hx-target="#{patient_id}" hx-swap="outerHTML">查看患者信息</button>
        <button type="button" class="h-10 px-4 rounded-md bg-primary text-white"
            hx-get="/api/rating/dialog" hx-target="#{rating_id}" hx-swap="outerHTML">评价本次随访</button>
    </div>
    {patient_dialog}
    {rating_dialog}
</section>"##,
        panel = render_commentator_panel(DEMO_CONVERSATION, &CommentarySnapshot::default()),
        conversation = DEMO_CONVERSATION,
        transcript_one = DEMO_TRANSCRIPT_ONE,
        transcript_two = DEMO_TRANSCRIPT_TWO,
        patient = DEMO_PATIENT,
        patient_id = patient_dialog::DIALOG_ID,
        rating_id = rating_dialog::DIALOG_ID,
        patient_dialog = closed_dialog(patient_dialog::DIALOG_ID),
        rating_dialog = closed_dialog(rating_dialog::DIALOG_ID),
    );
    Html(html_shell("随访", &content))
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Request body for the commentary API.
#[derive(Debug, Deserialize)]
struct CommentaryRequest {
    /// Full transcript as the chat view currently holds it.
    messages: Transcript,
}

/// POST /api/conversations/:id/commentary - Observe a transcript change.
async fn api_observe_commentary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommentaryRequest>,
) -> Html<String> {
    tracing::debug!(
        conversation_id = %id,
        message_count = req.messages.len(),
        "Transcript changed"
    );

    let commentator = state.commentators.get_or_create(&id);
    let observation = commentator.observe(&req.messages).await;

    tracing::debug!(conversation_id = %id, ?observation, "Observation finished");
    Html(render_commentator_panel(&id, &commentator.snapshot()))
}

/// GET /api/conversations/:id/commentary - Current commentator state.
async fn api_get_commentary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommentarySnapshot>, StatusCode> {
    state
        .commentators
        .get(&id)
        .map(|c| Json(c.snapshot()))
        .ok_or(StatusCode::NOT_FOUND)
}

/// POST /api/patients/details - Render the patient dialog.
async fn api_patient_details(Json(info): Json<PatientInfo>) -> Html<String> {
    Html(render_patient_dialog(&info))
}

/// Query parameters for the rating dialog.
#[derive(Debug, Deserialize)]
struct RatingDialogQuery {
    /// Selected stars; 0 or absent means nothing selected.
    #[serde(default)]
    rating: Option<u8>,
}

/// GET /api/rating/dialog - Open dialog with an optional selection.
async fn api_rating_dialog(
    Query(query): Query<RatingDialogQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut dialog = RatingDialog::opened();
    if let Some(stars) = query.rating.filter(|&n| n != 0) {
        dialog.select(stars).map_err(unprocessable)?;
    }
    Ok(Html(render_rating_dialog(&dialog)))
}

/// Request body for rating submission.
#[derive(Debug, Deserialize)]
struct RatingRequest {
    rating: u8,
}

/// POST /api/rating - Submit a rating and close the dialog.
async fn api_submit_rating(
    State(state): State<AppState>,
    Json(req): Json<RatingRequest>,
) -> Result<Html<String>, (StatusCode, String)> {
    let mut dialog = RatingDialog::opened();
    if req.rating != 0 {
        dialog.select(req.rating).map_err(unprocessable)?;
    }

    dialog
        .submit(|rating| state.rating_sink.record(RatingSubmission::now(rating)))
        .map_err(unprocessable)?;

    Ok(Html(render_rating_dialog(&dialog)))
}

/// GET /api/dialogs/:id/close - Dismiss a dialog without submitting.
async fn api_close_dialog(Path(id): Path<String>) -> Html<String> {
    Html(closed_dialog(&id))
}

fn unprocessable(e: RatingError) -> (StatusCode, String) {
    tracing::warn!(error = %e, "Rejected rating request");
    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
}
