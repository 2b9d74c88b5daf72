//! Shared formula library behind the calculator endpoints. Every function
//! is pure; invalid numeric input yields `None` rather than an error.

pub mod bmi;
pub mod bmr;
pub mod bodyfat;
mod dto;
pub mod energy;
pub mod handlers;
pub mod units;
pub mod vitamins;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
