use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Which published BMR equation to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BmrEquation {
    MifflinStJeor,
    HarrisBenedict,
    KatchMcArdle,
}

fn valid(weight_kg: f64, height_cm: f64, age_years: f64) -> bool {
    weight_kg.is_finite()
        && height_cm.is_finite()
        && age_years.is_finite()
        && weight_kg > 0.0
        && height_cm > 0.0
        && age_years > 0.0
}

/// Mifflin-St Jeor (1990): 10w + 6.25h - 5a, +5 male / -161 female.
pub fn mifflin_st_jeor(sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> Option<f64> {
    if !valid(weight_kg, height_cm, age_years) {
        return None;
    }
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    Some(match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    })
}

/// Revised Harris-Benedict (Roza & Shizgal, 1984).
pub fn harris_benedict(sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> Option<f64> {
    if !valid(weight_kg, height_cm, age_years) {
        return None;
    }
    Some(match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years,
    })
}

/// Katch-McArdle: 370 + 21.6 × lean mass, lean mass derived from body-fat %.
pub fn katch_mcardle(weight_kg: f64, body_fat_percent: f64) -> Option<f64> {
    if !weight_kg.is_finite()
        || !body_fat_percent.is_finite()
        || weight_kg <= 0.0
        || !(0.0..100.0).contains(&body_fat_percent)
    {
        return None;
    }
    let lean_mass_kg = weight_kg * (1.0 - body_fat_percent / 100.0);
    Some(370.0 + 21.6 * lean_mass_kg)
}

/// Dispatch over the three supported equations. Katch-McArdle needs a
/// body-fat percentage and yields None without one.
pub fn bmr(
    equation: BmrEquation,
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    body_fat_percent: Option<f64>,
) -> Option<f64> {
    match equation {
        BmrEquation::MifflinStJeor => mifflin_st_jeor(sex, weight_kg, height_cm, age_years),
        BmrEquation::HarrisBenedict => harris_benedict(sex, weight_kg, height_cm, age_years),
        BmrEquation::KatchMcArdle => katch_mcardle(weight_kg, body_fat_percent?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mifflin_reference_value() {
        // 10·70 + 6.25·175 - 5·25 + 5 = 1673.75
        let v = mifflin_st_jeor(Sex::Male, 70.0, 175.0, 25.0).expect("valid input");
        assert!((v - 1673.75).abs() < 1e-9);
        assert_eq!(v.round() as i64, 1674);
    }

    #[test]
    fn mifflin_female_offset() {
        let male = mifflin_st_jeor(Sex::Male, 60.0, 165.0, 30.0).unwrap();
        let female = mifflin_st_jeor(Sex::Female, 60.0, 165.0, 30.0).unwrap();
        assert!((male - female - 166.0).abs() < 1e-9);
    }

    #[test]
    fn harris_benedict_reference_value() {
        let v = harris_benedict(Sex::Female, 60.0, 165.0, 30.0).unwrap();
        let expected = 447.593 + 9.247 * 60.0 + 3.098 * 165.0 - 4.330 * 30.0;
        assert!((v - expected).abs() < 1e-9);
    }

    #[test]
    fn katch_uses_lean_mass() {
        let v = katch_mcardle(80.0, 20.0).unwrap();
        assert!((v - (370.0 + 21.6 * 64.0)).abs() < 1e-9);
    }

    #[test]
    fn katch_requires_body_fat() {
        assert!(bmr(BmrEquation::KatchMcArdle, Sex::Male, 80.0, 180.0, 30.0, None).is_none());
        assert!(bmr(BmrEquation::MifflinStJeor, Sex::Male, 80.0, 180.0, 30.0, None).is_some());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(mifflin_st_jeor(Sex::Male, -70.0, 175.0, 25.0).is_none());
        assert!(katch_mcardle(80.0, 100.0).is_none());
    }
}
