use serde::Serialize;

/// WHO adult BMI bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI = weight / height², height taken in centimetres.
/// Returns None for non-finite or non-positive inputs.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !weight_kg.is_finite() || !height_cm.is_finite() || weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

pub fn classify(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmi_reference_value() {
        // 70 kg / 1.75 m² ≈ 22.86
        let v = bmi(70.0, 175.0).expect("valid input");
        assert!((v - 22.857).abs() < 0.01, "got {v}");
        assert_eq!(classify(v), BmiCategory::Normal);
        assert_eq!(classify(v).label(), "Normal weight");
    }

    #[test]
    fn categories_at_boundaries() {
        assert_eq!(classify(18.4), BmiCategory::Underweight);
        assert_eq!(classify(18.5), BmiCategory::Normal);
        assert_eq!(classify(25.0), BmiCategory::Overweight);
        assert_eq!(classify(30.0), BmiCategory::Obese);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(bmi(0.0, 175.0).is_none());
        assert!(bmi(70.0, -1.0).is_none());
        assert!(bmi(f64::NAN, 175.0).is_none());
    }
}
