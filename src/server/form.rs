use std::collections::HashMap;

use crate::{
    choice::Choice,
    generate::GridConfig,
    page::SLOTS,
};

pub const DEFAULT_WIDTH: &str = "32";
pub const DEFAULT_HEIGHT: &str = "16";
pub const DEFAULT_BLOCK_PX: &str = "12";

/// Distribution used when the form has no usable slot.
pub fn default_choices() -> Vec<Choice> {
    vec![
        Choice::new("pink", 20.),
        Choice::new("magenta", 40.),
        Choice::new("purple", 40.),
    ]
}

/// The browser form after lenient parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRequest {
    pub width: String,
    pub height: String,
    pub block_px: String,
    /// Colors picked for subset randomization, echoed back to the page.
    pub subset: String,
    pub choices: Vec<Choice>,
}

fn field<'a>(fields: &'a HashMap<String, String>, key: &str, default: &'a str) -> &'a str {
    fields.get(key).map(String::as_str).unwrap_or(default)
}

fn parse_or(value: &str, default: &str) -> f64 {
    value.trim().parse()
        .or_else(|_| default.parse())
        .unwrap_or(1.)
}

impl FormRequest {
    /// A slot counts only when it names a color and carries a positive weight.
    /// Unparsable weights count as zero.
    pub fn from_fields(fields: &HashMap<String, String>) -> FormRequest {
        let mut choices = Vec::new();
        for i in 1 ..= SLOTS {
            let name = field(fields, &format!("color_{i}"), "pink").trim();
            let weight: f64 = field(fields, &format!("weight_{i}"), "0").trim().parse().unwrap_or(0.);
            if !name.is_empty() && weight > 0. {
                choices.push(Choice::new(name, weight));
            }
        }

        if choices.is_empty() {
            choices = default_choices();
        }

        FormRequest {
            width: field(fields, "width", DEFAULT_WIDTH).to_string(),
            height: field(fields, "height", DEFAULT_HEIGHT).to_string(),
            block_px: field(fields, "block_px", DEFAULT_BLOCK_PX).to_string(),
            subset: field(fields, "subset", "").to_string(),
            choices,
        }
    }

    /// Dimension fields that fail to parse fall back to the form defaults.
    pub fn grid_config(&self) -> GridConfig {
        GridConfig::new(
            parse_or(&self.width, DEFAULT_WIDTH),
            parse_or(&self.height, DEFAULT_HEIGHT),
            parse_or(&self.block_px, DEFAULT_BLOCK_PX),
        )
    }
}

impl Default for FormRequest {
    fn default() -> Self {
        FormRequest::from_fields(&HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn empty_form_uses_defaults() {
        let req = FormRequest::default();
        assert_eq!(req.choices, default_choices());
        assert_eq!(req.grid_config(), GridConfig { width: 32, height: 16, block_px: 12 });
    }

    #[test]
    fn keeps_positive_named_slots() {
        let req = FormRequest::from_fields(&fields(&[
            ("width", "8"),
            ("color_1", "red"), ("weight_1", "50"),
            ("color_2", "blue"), ("weight_2", "0"),
            ("color_3", ""), ("weight_3", "10"),
            ("color_4", "lime"), ("weight_4", "lots"),
            ("weight_5", "2.5"),
            ("color_6", "red"), ("weight_6", "5"),
        ]));
        assert_eq!(req.choices, vec![
            Choice::new("red", 50.),
            Choice::new("pink", 2.5),
            Choice::new("red", 5.),
        ]);
        assert_eq!(req.grid_config().width, 8);
        assert_eq!(req.subset, "");
    }

    #[test]
    fn subset_is_echoed() {
        let req = FormRequest::from_fields(&fields(&[("subset", "red,lime")]));
        assert_eq!(req.subset, "red,lime");
    }

    #[test]
    fn bad_dimensions_fall_back() {
        let req = FormRequest::from_fields(&fields(&[
            ("width", "wide"), ("height", "-4"), ("block_px", "3.9"),
        ]));
        assert_eq!(req.width, "wide");
        assert_eq!(req.grid_config(), GridConfig { width: 32, height: 1, block_px: 3 });
    }
}
