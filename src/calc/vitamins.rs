use serde::{Deserialize, Serialize};

use crate::calc::bmr::Sex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vitamin {
    A,
    B6,
    B12,
    C,
    D,
    E,
    K,
    Folate,
}

impl Vitamin {
    pub fn unit(&self) -> &'static str {
        match self {
            Vitamin::A | Vitamin::B12 | Vitamin::D | Vitamin::K | Vitamin::Folate => "mcg",
            Vitamin::B6 | Vitamin::C | Vitamin::E => "mg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifestyle {
    Vegetarian,
    Vegan,
    Pregnant,
    Lactating,
    Smoker,
}

/// Age bracket used by the RDA table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeBracket {
    Child,  // 4-8
    Teen,   // 9-18
    Adult,  // 19-50
    Senior, // 51+
}

fn bracket(age_years: f64) -> Option<AgeBracket> {
    if !age_years.is_finite() || age_years < 1.0 {
        return None;
    }
    Some(if age_years < 9.0 {
        AgeBracket::Child
    } else if age_years < 19.0 {
        AgeBracket::Teen
    } else if age_years < 51.0 {
        AgeBracket::Adult
    } else {
        AgeBracket::Senior
    })
}

/// Baseline RDA from the NIH tables, in the vitamin's own unit.
fn base_rda(vitamin: Vitamin, sex: Sex, bracket: AgeBracket) -> f64 {
    use AgeBracket::*;
    use Sex::*;
    match (vitamin, sex, bracket) {
        (Vitamin::A, _, Child) => 400.0,
        (Vitamin::A, Male, Teen) => 900.0,
        (Vitamin::A, Female, Teen) => 700.0,
        (Vitamin::A, Male, _) => 900.0,
        (Vitamin::A, Female, _) => 700.0,

        (Vitamin::B6, _, Child) => 0.6,
        (Vitamin::B6, _, Teen) => 1.3,
        (Vitamin::B6, _, Adult) => 1.3,
        (Vitamin::B6, Male, Senior) => 1.7,
        (Vitamin::B6, Female, Senior) => 1.5,

        (Vitamin::B12, _, Child) => 1.2,
        (Vitamin::B12, _, Teen) => 2.4,
        (Vitamin::B12, _, _) => 2.4,

        (Vitamin::C, _, Child) => 25.0,
        (Vitamin::C, _, Teen) => 75.0,
        (Vitamin::C, Male, _) => 90.0,
        (Vitamin::C, Female, _) => 75.0,

        (Vitamin::D, _, Senior) => 20.0,
        (Vitamin::D, _, _) => 15.0,

        (Vitamin::E, _, Child) => 7.0,
        (Vitamin::E, _, _) => 15.0,

        (Vitamin::K, _, Child) => 55.0,
        (Vitamin::K, _, Teen) => 75.0,
        (Vitamin::K, Male, _) => 120.0,
        (Vitamin::K, Female, _) => 90.0,

        (Vitamin::Folate, _, Child) => 200.0,
        (Vitamin::Folate, _, Teen) => 400.0,
        (Vitamin::Folate, _, _) => 400.0,
    }
}

/// Multiplicative adjustment for a lifestyle factor; 1.0 where the factor
/// does not change the recommendation for that vitamin.
fn lifestyle_factor(vitamin: Vitamin, lifestyle: Lifestyle) -> f64 {
    match (lifestyle, vitamin) {
        (Lifestyle::Vegetarian, Vitamin::B12) => 1.2,
        (Lifestyle::Vegan, Vitamin::B12) => 1.5,
        (Lifestyle::Vegan, Vitamin::D) => 1.2,
        (Lifestyle::Pregnant, Vitamin::Folate) => 1.5,
        (Lifestyle::Pregnant, Vitamin::B6) => 1.45,
        (Lifestyle::Pregnant, Vitamin::C) => 1.15,
        (Lifestyle::Lactating, Vitamin::C) => 1.3,
        (Lifestyle::Lactating, Vitamin::A) => 1.4,
        (Lifestyle::Smoker, Vitamin::C) => 1.35,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Rda {
    pub amount: f64,
    pub unit: &'static str,
}

/// Recommended daily allowance for a vitamin, adjusted for lifestyle factors.
pub fn rda(vitamin: Vitamin, sex: Sex, age_years: f64, lifestyles: &[Lifestyle]) -> Option<Rda> {
    let bracket = bracket(age_years)?;
    let mut amount = base_rda(vitamin, sex, bracket);
    for lifestyle in lifestyles {
        amount *= lifestyle_factor(vitamin, *lifestyle);
    }
    Some(Rda {
        amount,
        unit: vitamin.unit(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_and_age_switch_the_table() {
        let male = rda(Vitamin::C, Sex::Male, 30.0, &[]).unwrap();
        let female = rda(Vitamin::C, Sex::Female, 30.0, &[]).unwrap();
        assert_eq!(male.amount, 90.0);
        assert_eq!(female.amount, 75.0);

        let adult = rda(Vitamin::D, Sex::Male, 40.0, &[]).unwrap();
        let senior = rda(Vitamin::D, Sex::Male, 72.0, &[]).unwrap();
        assert_eq!(adult.amount, 15.0);
        assert_eq!(senior.amount, 20.0);
    }

    #[test]
    fn vegan_b12_multiplier() {
        let plain = rda(Vitamin::B12, Sex::Female, 30.0, &[]).unwrap();
        let vegan = rda(Vitamin::B12, Sex::Female, 30.0, &[Lifestyle::Vegan]).unwrap();
        assert!((vegan.amount - plain.amount * 1.5).abs() < 1e-9);
        assert_eq!(vegan.unit, "mcg");
    }

    #[test]
    fn factors_compose_multiplicatively() {
        let v = rda(
            Vitamin::C,
            Sex::Female,
            28.0,
            &[Lifestyle::Pregnant, Lifestyle::Smoker],
        )
        .unwrap();
        assert!((v.amount - 75.0 * 1.15 * 1.35).abs() < 1e-9);
    }

    #[test]
    fn rejects_infant_age() {
        assert!(rda(Vitamin::A, Sex::Male, 0.5, &[]).is_none());
    }
}
