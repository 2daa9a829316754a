use serde::{Deserialize, Serialize};

use super::{
    color::*,
    error::*
};

/// One weighted entry of a distribution. Serialized as `[name, weight]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "self::_serde::ChoiceSource", into = "self::_serde::ChoiceSource")]
pub struct Choice {
    pub name: String,
    pub weight: f64,
}

impl Choice {
    pub fn new(name: impl Into<String>, weight: f64) -> Choice {
        Choice { name: name.into(), weight }
    }
}

impl<S: Into<String>> From<(S, f64)> for Choice {
    fn from((name, weight): (S, f64)) -> Choice {
        Choice::new(name, weight)
    }
}

/// Rules a request must satisfy before it reaches the generator. The generator
/// itself accepts anything non-empty.
pub fn validate(choices: &[Choice]) -> Result<(), ChoiceError> {
    if choices.is_empty() {
        return Err(ChoiceError::Empty)
    }

    for c in choices {
        if !Palette.contains(&c.name) {
            return Err(ChoiceError::UnknownColor(c.name.clone()))
        }
        if !(c.weight.is_finite() && c.weight > 0.0) {
            return Err(ChoiceError::NonPositiveWeight {
                name: c.name.clone(),
                weight: c.weight
            })
        }
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub name: String,
    pub weight: f64,
    pub rgb: Color,
}

/// Sums weights per unique name, heaviest first. Equal weights keep the order
/// in which the names first appeared.
pub fn legend(choices: &[Choice]) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = Vec::new();

    for c in choices {
        match entries.iter_mut().find(|e| e.name == c.name) {
            Some(entry) => entry.weight += c.weight,
            None => entries.push(LegendEntry {
                name: c.name.clone(),
                weight: c.weight,
                rgb: Palette.sample(&c.name),
            }),
        }
    }

    entries.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    entries
}

mod _serde {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename = "Choice")]
    pub struct ChoiceSource(String, f64);

    impl From<ChoiceSource> for Choice {
        fn from(src: ChoiceSource) -> Choice {
            Choice { name: src.0, weight: src.1 }
        }
    }

    impl From<Choice> for ChoiceSource {
        fn from(choice: Choice) -> ChoiceSource {
            ChoiceSource(choice.name, choice.weight)
        }
    }
}
