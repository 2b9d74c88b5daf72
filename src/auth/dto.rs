use serde::{Deserialize, Serialize};
use time::Date;

use crate::users::dto::UserProfile;

/// One-shot registration payload carrying both steps of the signup form:
/// identity plus body profile, with an optional opening goal.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: Option<String>,
    pub country: Option<String>,
    pub gender: String,
    pub age: i32,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub target_weight_kg: Option<f64>,
    pub target_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SmsForgotPasswordRequest {
    pub mobile: String,
}

#[derive(Debug, Deserialize)]
pub struct SmsVerifyOtpRequest {
    pub mobile: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SmsResetPasswordRequest {
    pub mobile: String,
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
