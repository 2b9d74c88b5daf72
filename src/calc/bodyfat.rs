use crate::calc::bmi::bmi;
use crate::calc::bmr::Sex;

/// U.S. Navy circumference method, all measurements in centimetres.
/// Male needs waist and neck; female additionally needs hip.
pub fn navy_body_fat(
    sex: Sex,
    height_cm: f64,
    neck_cm: f64,
    waist_cm: f64,
    hip_cm: Option<f64>,
) -> Option<f64> {
    if [height_cm, neck_cm, waist_cm]
        .iter()
        .any(|v| !v.is_finite() || *v <= 0.0)
    {
        return None;
    }
    let pct = match sex {
        Sex::Male => {
            let girth = waist_cm - neck_cm;
            if girth <= 0.0 {
                return None;
            }
            495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()) - 450.0
        }
        Sex::Female => {
            let hip = hip_cm?;
            if !hip.is_finite() || hip <= 0.0 {
                return None;
            }
            let girth = waist_cm + hip - neck_cm;
            if girth <= 0.0 {
                return None;
            }
            495.0 / (1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10()) - 450.0
        }
    };
    pct.is_finite().then_some(pct)
}

/// BMI-based estimate (Deurenberg): 1.20·BMI + 0.23·age − 10.8·sex − 5.4.
pub fn bmi_body_fat(sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> Option<f64> {
    if !age_years.is_finite() || age_years <= 0.0 {
        return None;
    }
    let bmi = bmi(weight_kg, height_cm)?;
    let sex_term = match sex {
        Sex::Male => 10.8,
        Sex::Female => 0.0,
    };
    Some(1.20 * bmi + 0.23 * age_years - sex_term - 5.4)
}

// Jackson & Pollock ideal body-fat percentages by age bracket.
const JP_AGES: [f64; 8] = [20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0];
const JP_MALE: [f64; 8] = [8.5, 10.5, 12.7, 13.7, 15.3, 16.4, 18.9, 20.9];
const JP_FEMALE: [f64; 8] = [17.7, 18.4, 19.3, 21.5, 22.2, 22.9, 25.2, 26.3];

/// Ideal body-fat lookup; ages outside the table clamp to the nearest bracket.
pub fn ideal_body_fat(sex: Sex, age_years: f64) -> Option<f64> {
    if !age_years.is_finite() || age_years <= 0.0 {
        return None;
    }
    let table = match sex {
        Sex::Male => &JP_MALE,
        Sex::Female => &JP_FEMALE,
    };
    let idx = JP_AGES
        .iter()
        .rposition(|threshold| age_years >= *threshold)
        .unwrap_or(0);
    Some(table[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navy_male_plausible_band() {
        let pct = navy_body_fat(Sex::Male, 175.0, 37.0, 85.0, None).expect("valid input");
        assert!(pct > 10.0 && pct < 30.0, "got {pct}");
    }

    #[test]
    fn navy_female_requires_hip() {
        assert!(navy_body_fat(Sex::Female, 165.0, 33.0, 75.0, None).is_none());
        let pct = navy_body_fat(Sex::Female, 165.0, 33.0, 75.0, Some(95.0)).expect("valid input");
        assert!(pct > 15.0 && pct < 45.0, "got {pct}");
    }

    #[test]
    fn navy_rejects_degenerate_girth() {
        assert!(navy_body_fat(Sex::Male, 175.0, 40.0, 40.0, None).is_none());
    }

    #[test]
    fn bmi_method_matches_formula() {
        let pct = bmi_body_fat(Sex::Male, 70.0, 175.0, 25.0).unwrap();
        let bmi = 70.0 / (1.75_f64 * 1.75);
        assert!((pct - (1.20 * bmi + 0.23 * 25.0 - 10.8 - 5.4)).abs() < 1e-9);
    }

    #[test]
    fn ideal_lookup_brackets() {
        assert_eq!(ideal_body_fat(Sex::Male, 25.0), Some(10.5));
        assert_eq!(ideal_body_fat(Sex::Male, 27.0), Some(10.5));
        assert_eq!(ideal_body_fat(Sex::Female, 55.0), Some(26.3));
        // below the first bracket clamps down
        assert_eq!(ideal_body_fat(Sex::Male, 18.0), Some(8.5));
        // and far beyond the last clamps up
        assert_eq!(ideal_body_fat(Sex::Male, 70.0), Some(20.9));
    }
}
