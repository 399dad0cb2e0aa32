//! Admin handlers.

use axum::Json;

use pixsim_core::headers;

use crate::api::dto::ScenarioListResponse;
use crate::scenario::Scenario;

/// `GET /admin/scenarios` — the recognized scenario tokens.
pub async fn scenarios() -> Json<ScenarioListResponse> {
    Json(ScenarioListResponse {
        header: headers::MOCK_SCENARIO,
        scenarios: Scenario::ALL.into_iter().map(Scenario::token).collect(),
    })
}
