use serde::{Deserialize, Serialize};

/// Standard five-tier activity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightPlan {
    FastLose,
    Lose,
    Maintain,
    Gain,
}

impl WeightPlan {
    /// Daily kcal adjustment applied on top of TDEE.
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            WeightPlan::FastLose => -1000.0,
            WeightPlan::Lose => -500.0,
            WeightPlan::Maintain => 0.0,
            WeightPlan::Gain => 500.0,
        }
    }
}

pub fn tdee(bmr: f64, activity: ActivityLevel) -> Option<f64> {
    if !bmr.is_finite() || bmr <= 0.0 {
        return None;
    }
    Some(bmr * activity.multiplier())
}

pub fn goal_calories(tdee: f64, plan: WeightPlan) -> Option<f64> {
    if !tdee.is_finite() || tdee <= 0.0 {
        return None;
    }
    // A heavy deficit can go non-positive for very low TDEEs; floor at zero.
    Some((tdee + plan.calorie_adjustment()).max(0.0))
}

/// Macronutrient grams for a calorie target, 4/4/9 kcal per gram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Percentages are fractions of total calories and must sum to 100 (±0.5).
pub fn macro_split(
    calories: f64,
    protein_percent: f64,
    carb_percent: f64,
    fat_percent: f64,
) -> Option<MacroSplit> {
    let sum = protein_percent + carb_percent + fat_percent;
    if !calories.is_finite()
        || calories <= 0.0
        || protein_percent < 0.0
        || carb_percent < 0.0
        || fat_percent < 0.0
        || (sum - 100.0).abs() > 0.5
    {
        return None;
    }
    Some(MacroSplit {
        protein_g: calories * protein_percent / 100.0 / 4.0,
        carbs_g: calories * carb_percent / 100.0 / 4.0,
        fat_g: calories * fat_percent / 100.0 / 9.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tdee_tier_table() {
        let bmr = 1674.0;
        assert!((tdee(bmr, ActivityLevel::Sedentary).unwrap() - bmr * 1.2).abs() < 1e-9);
        assert!((tdee(bmr, ActivityLevel::ExtraActive).unwrap() - bmr * 1.9).abs() < 1e-9);
    }

    #[test]
    fn goal_adjustments() {
        assert_eq!(goal_calories(2000.0, WeightPlan::Lose).unwrap(), 1500.0);
        assert_eq!(goal_calories(2000.0, WeightPlan::FastLose).unwrap(), 1000.0);
        assert_eq!(goal_calories(2000.0, WeightPlan::Maintain).unwrap(), 2000.0);
        assert_eq!(goal_calories(2000.0, WeightPlan::Gain).unwrap(), 2500.0);
    }

    #[test]
    fn deficit_floors_at_zero() {
        assert_eq!(goal_calories(800.0, WeightPlan::FastLose).unwrap(), 0.0);
    }

    #[test]
    fn macro_split_reference() {
        // 2000 kcal at 30/40/30
        let m = macro_split(2000.0, 30.0, 40.0, 30.0).unwrap();
        assert!((m.protein_g - 150.0).abs() < 1e-9);
        assert!((m.carbs_g - 200.0).abs() < 1e-9);
        assert!((m.fat_g - 2000.0 * 0.30 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn macro_split_rejects_bad_percentages() {
        assert!(macro_split(2000.0, 30.0, 40.0, 20.0).is_none());
        assert!(macro_split(-1.0, 30.0, 40.0, 30.0).is_none());
    }
}
