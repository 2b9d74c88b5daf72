use serde::{Deserialize, Serialize};

use crate::calc::bmr::{BmrEquation, Sex};
use crate::calc::energy::{ActivityLevel, WeightPlan};
use crate::calc::vitamins::{Lifestyle, Vitamin};

#[derive(Debug, Deserialize)]
pub struct BmiRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
}

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
    pub category: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct BmrRequest {
    #[serde(default = "default_equation")]
    pub equation: BmrEquation,
    pub sex: Sex,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: f64,
    pub body_fat_percent: Option<f64>,
}

pub(super) fn default_equation() -> BmrEquation {
    BmrEquation::MifflinStJeor
}

#[derive(Debug, Serialize)]
pub struct BmrResponse {
    pub bmr: f64,
}

#[derive(Debug, Deserialize)]
pub struct TdeeRequest {
    #[serde(flatten)]
    pub bmr: BmrRequest,
    pub activity: ActivityLevel,
}

#[derive(Debug, Serialize)]
pub struct TdeeResponse {
    pub bmr: f64,
    pub tdee: f64,
}

#[derive(Debug, Deserialize)]
pub struct CaloriesRequest {
    #[serde(flatten)]
    pub tdee: TdeeRequest,
    pub plan: WeightPlan,
}

#[derive(Debug, Serialize)]
pub struct CaloriesResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub calories: f64,
}

#[derive(Debug, Deserialize)]
pub struct MacrosRequest {
    pub calories: f64,
    pub protein_percent: f64,
    pub carb_percent: f64,
    pub fat_percent: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFatMethod {
    Navy,
    Bmi,
}

#[derive(Debug, Deserialize)]
pub struct BodyFatRequest {
    pub method: BodyFatMethod,
    pub sex: Sex,
    pub height_cm: f64,
    pub age_years: Option<f64>,
    pub weight_kg: Option<f64>,
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BodyFatResponse {
    pub body_fat_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ideal_body_fat_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct VitaminRequest {
    pub vitamin: Vitamin,
    pub sex: Sex,
    pub age_years: f64,
    #[serde(default)]
    pub lifestyles: Vec<Lifestyle>,
}

#[derive(Debug, Serialize)]
pub struct VitaminResponse {
    pub vitamin: Vitamin,
    pub amount: f64,
    pub unit: &'static str,
}
