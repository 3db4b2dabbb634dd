use axum::response::Json;

use crate::{
    error::AppResult,
    services::fairness::{self, FairnessReport, FairnessRequest, RatesTable},
};

pub async fn calculate(Json(req): Json<FairnessRequest>) -> AppResult<Json<FairnessReport>> {
    Ok(Json(fairness::evaluate(&req.yours, &req.theirs)?))
}

pub async fn rates() -> Json<RatesTable> {
    Json(fairness::rates_table())
}
