use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::RoutePlan;
use crate::error::{missing_endpoints_error, Error};
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct PlanParams {
    start: Option<String>,
    end: Option<String>,
}

pub async fn plan(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<PlanParams>,
) -> Result<Json<RoutePlan>, Error> {
    let (start, end) = match (non_blank(params.start), non_blank(params.end)) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(missing_endpoints_error()),
    };

    let plan = api.plan_route(start, end).await?;

    Ok(plan.into())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
