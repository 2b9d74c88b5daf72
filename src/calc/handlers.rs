use axum::{http::StatusCode, routing::post, Json, Router};
use tracing::instrument;

use crate::calc::dto::{
    BmiRequest, BmiResponse, BmrRequest, BmrResponse, BodyFatMethod, BodyFatRequest,
    BodyFatResponse, CaloriesRequest, CaloriesResponse, MacrosRequest, TdeeRequest, TdeeResponse,
    VitaminRequest, VitaminResponse,
};
use crate::calc::energy::MacroSplit;
use crate::calc::{bmi, bmr, bodyfat, energy, vitamins};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculators/bmi", post(calc_bmi))
        .route("/calculators/bmr", post(calc_bmr))
        .route("/calculators/tdee", post(calc_tdee))
        .route("/calculators/calories", post(calc_calories))
        .route("/calculators/macros", post(calc_macros))
        .route("/calculators/body-fat", post(calc_body_fat))
        .route("/calculators/vitamin", post(calc_vitamin))
}

fn bad_input() -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, "Invalid input".into())
}

#[instrument]
async fn calc_bmi(Json(payload): Json<BmiRequest>) -> Result<Json<BmiResponse>, (StatusCode, String)> {
    let value = bmi::bmi(payload.weight_kg, payload.height_cm).ok_or_else(bad_input)?;
    Ok(Json(BmiResponse {
        bmi: value,
        category: bmi::classify(value).label(),
    }))
}

fn run_bmr(payload: &BmrRequest) -> Option<f64> {
    bmr::bmr(
        payload.equation,
        payload.sex,
        payload.weight_kg,
        payload.height_cm,
        payload.age_years,
        payload.body_fat_percent,
    )
}

#[instrument]
async fn calc_bmr(Json(payload): Json<BmrRequest>) -> Result<Json<BmrResponse>, (StatusCode, String)> {
    let bmr = run_bmr(&payload).ok_or_else(bad_input)?;
    Ok(Json(BmrResponse { bmr }))
}

#[instrument]
async fn calc_tdee(
    Json(payload): Json<TdeeRequest>,
) -> Result<Json<TdeeResponse>, (StatusCode, String)> {
    let bmr = run_bmr(&payload.bmr).ok_or_else(bad_input)?;
    let tdee = energy::tdee(bmr, payload.activity).ok_or_else(bad_input)?;
    Ok(Json(TdeeResponse { bmr, tdee }))
}

#[instrument]
async fn calc_calories(
    Json(payload): Json<CaloriesRequest>,
) -> Result<Json<CaloriesResponse>, (StatusCode, String)> {
    let bmr = run_bmr(&payload.tdee.bmr).ok_or_else(bad_input)?;
    let tdee = energy::tdee(bmr, payload.tdee.activity).ok_or_else(bad_input)?;
    let calories = energy::goal_calories(tdee, payload.plan).ok_or_else(bad_input)?;
    Ok(Json(CaloriesResponse { bmr, tdee, calories }))
}

#[instrument]
async fn calc_macros(
    Json(payload): Json<MacrosRequest>,
) -> Result<Json<MacroSplit>, (StatusCode, String)> {
    let split = energy::macro_split(
        payload.calories,
        payload.protein_percent,
        payload.carb_percent,
        payload.fat_percent,
    )
    .ok_or_else(bad_input)?;
    Ok(Json(split))
}

#[instrument]
async fn calc_body_fat(
    Json(payload): Json<BodyFatRequest>,
) -> Result<Json<BodyFatResponse>, (StatusCode, String)> {
    let body_fat_percent = match payload.method {
        BodyFatMethod::Navy => bodyfat::navy_body_fat(
            payload.sex,
            payload.height_cm,
            payload.neck_cm.ok_or_else(bad_input)?,
            payload.waist_cm.ok_or_else(bad_input)?,
            payload.hip_cm,
        ),
        BodyFatMethod::Bmi => bodyfat::bmi_body_fat(
            payload.sex,
            payload.weight_kg.ok_or_else(bad_input)?,
            payload.height_cm,
            payload.age_years.ok_or_else(bad_input)?,
        ),
    }
    .ok_or_else(bad_input)?;

    let ideal_body_fat_percent = payload
        .age_years
        .and_then(|age| bodyfat::ideal_body_fat(payload.sex, age));

    Ok(Json(BodyFatResponse {
        body_fat_percent,
        ideal_body_fat_percent,
    }))
}

#[instrument]
async fn calc_vitamin(
    Json(payload): Json<VitaminRequest>,
) -> Result<Json<VitaminResponse>, (StatusCode, String)> {
    let rda = vitamins::rda(
        payload.vitamin,
        payload.sex,
        payload.age_years,
        &payload.lifestyles,
    )
    .ok_or_else(bad_input)?;
    Ok(Json(VitaminResponse {
        vitamin: payload.vitamin,
        amount: rda.amount,
        unit: rda.unit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bmi_endpoint_returns_category_label() {
        let res = calc_bmi(Json(BmiRequest {
            weight_kg: 70.0,
            height_cm: 175.0,
        }))
        .await
        .expect("valid request");
        assert_eq!(res.0.category, "Normal weight");
        assert!((res.0.bmi - 22.857).abs() < 0.01);
    }

    #[tokio::test]
    async fn bmi_endpoint_rejects_zero_height() {
        let err = calc_bmi(Json(BmiRequest {
            weight_kg: 70.0,
            height_cm: 0.0,
        }))
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn tdee_request_flattens_bmr_fields() {
        let payload: TdeeRequest = serde_json::from_str(
            r#"{"sex":"male","weight_kg":70,"height_cm":175,"age_years":25,"activity":"sedentary"}"#,
        )
        .expect("deserializes");
        assert_eq!(payload.bmr.weight_kg, 70.0);
    }
}
