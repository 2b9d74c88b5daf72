//! Unit conversions shared by the calculator endpoints.

pub const KG_PER_LB: f64 = 0.453592;
pub const LB_PER_KG: f64 = 2.20462;
pub const CM_PER_INCH: f64 = 2.54;
pub const CM_PER_FOOT: f64 = 30.48;

pub fn kg_to_lb(kg: f64) -> f64 {
    kg * LB_PER_KG
}

pub fn lb_to_kg(lb: f64) -> f64 {
    lb * KG_PER_LB
}

pub fn cm_to_inches(cm: f64) -> f64 {
    cm / CM_PER_INCH
}

pub fn inches_to_cm(inches: f64) -> f64 {
    inches * CM_PER_INCH
}

pub fn cm_to_feet(cm: f64) -> f64 {
    cm / CM_PER_FOOT
}

pub fn feet_to_cm(feet: f64) -> f64 {
    feet * CM_PER_FOOT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kg_lb_round_trip() {
        let kg = 70.0;
        let back = lb_to_kg(kg_to_lb(kg));
        assert!((back - kg).abs() < 1e-3, "got {back}");
    }

    #[test]
    fn cm_inch_round_trip() {
        let cm = 175.0;
        let back = inches_to_cm(cm_to_inches(cm));
        assert!((back - cm).abs() < 1e-9);
    }

    #[test]
    fn cm_feet_round_trip() {
        let cm = 180.0;
        let back = feet_to_cm(cm_to_feet(cm));
        assert!((back - cm).abs() < 1e-9);
    }

    #[test]
    fn known_conversions() {
        assert!((kg_to_lb(1.0) - 2.20462).abs() < 1e-9);
        assert!((inches_to_cm(1.0) - 2.54).abs() < 1e-9);
        assert!((feet_to_cm(1.0) - 30.48).abs() < 1e-9);
    }
}
