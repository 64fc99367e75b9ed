//! Form
//!
//! Raw, user-entered costing fields and their validation into a [`CostingInput`].
//!
//! Every field is checked and every failure is collected, so a caller can annotate
//! each input at once instead of stopping at the first problem.

use std::{collections::BTreeMap, fmt, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::{
    costing::{CostingInput, CostingResult, ItemKind},
    items::{LineItem, LineItems},
    pricing::MAX_MARGIN_PERCENT,
};

/// Margin pre-filled when a record without a margin is loaded for editing.
pub const DEFAULT_EDIT_MARGIN_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Why a single field was rejected.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// Required field left empty.
    #[error("required")]
    Required,

    /// Not a number.
    #[error("must be a number")]
    NotANumber,

    /// Negative amount.
    #[error("must not be negative")]
    Negative,

    /// Unit count below one.
    #[error("must be at least 1 unit")]
    BelowOneUnit,

    /// Unit count with a fractional part.
    #[error("must be a whole number")]
    NotWholeNumber,

    /// Unit count beyond what a batch can hold.
    #[error("must be at most 4294967295 units")]
    TooManyUnits,

    /// Line item without a name.
    #[error("item name is required")]
    MissingItemName,

    /// Margin not a number in 0-1000.
    #[error("margin must be a number between 0 and 1000")]
    MarginOutOfRange,
}

/// Every field that failed validation, keyed by field identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.fields.insert(field.into(), error);
    }

    /// The error recorded for a field, if any.
    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.fields.get(field).copied()
    }

    /// Field identifiers and their errors, ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldError)> {
        self.fields
            .iter()
            .map(|(field, error)| (field.as_str(), *error))
    }

    /// Field identifiers mapped to human-readable messages.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(field, error)| (field.to_string(), error.to_string()))
            .collect()
    }

    /// Number of rejected fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field was rejected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input")?;

        for (i, (field, error)) in self.iter().enumerate() {
            let separator = if i == 0 { ": " } else { "; " };
            write!(f, "{separator}{field} {error}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// One editable line item row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemForm {
    /// Item name as typed
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    /// Item cost as typed
    #[serde(default, deserialize_with = "lenient_text")]
    pub cost: String,
}

impl LineItemForm {
    /// Create a row from typed text.
    pub fn new(name: impl Into<String>, cost: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost: cost.into(),
        }
    }
}

/// Costing fields as entered by a user, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostingForm {
    /// Product name as typed
    #[serde(default, deserialize_with = "lenient_text")]
    pub product_name: String,

    /// Unit count as typed
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit_count: String,

    /// Labor cost as typed
    #[serde(default, deserialize_with = "lenient_text")]
    pub labor_cost: String,

    /// Margin as typed; empty means no margin
    #[serde(default, deserialize_with = "lenient_text")]
    pub margin_percent: String,

    /// Raw material rows
    #[serde(default)]
    pub material_items: Vec<LineItemForm>,

    /// Overhead rows
    #[serde(default)]
    pub overhead_items: Vec<LineItemForm>,
}

impl CostingForm {
    /// Validate every field and build a [`CostingInput`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] holding every rejected field.
    pub fn validate(&self) -> Result<CostingInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let product_name = self.product_name.trim();
        if product_name.is_empty() {
            errors.add("productName", FieldError::Required);
        }

        let unit_count = parse_unit_count(&self.unit_count)
            .map_err(|error| errors.add("unitCount", error))
            .ok();

        let labor_cost = parse_amount(&self.labor_cost)
            .map_err(|error| errors.add("laborCost", error))
            .ok();

        let margin_percent = parse_margin(&self.margin_percent)
            .map_err(|error| errors.add("marginPercent", error))
            .ok();

        let material_items = parse_items(ItemKind::Material, &self.material_items, &mut errors);
        let overhead_items = parse_items(ItemKind::Overhead, &self.overhead_items, &mut errors);

        match (unit_count, labor_cost, margin_percent) {
            (Some(unit_count), Some(labor_cost), Some(margin_percent)) if errors.is_empty() => {
                Ok(CostingInput {
                    product_name: product_name.to_string(),
                    unit_count,
                    material_items,
                    labor_cost,
                    overhead_items,
                    margin_percent,
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&CostingResult> for CostingForm {
    fn from(result: &CostingResult) -> Self {
        let input = &result.input;

        let margin = if input.margin_percent.is_zero() {
            DEFAULT_EDIT_MARGIN_PERCENT
        } else {
            input.margin_percent
        };

        Self {
            product_name: input.product_name.clone(),
            unit_count: input.unit_count.to_string(),
            labor_cost: text(input.labor_cost),
            margin_percent: text(margin),
            material_items: rows(&input.material_items),
            overhead_items: rows(&input.overhead_items),
        }
    }
}

fn text(amount: Decimal) -> String {
    amount.normalize().to_string()
}

fn rows(items: &[LineItem]) -> Vec<LineItemForm> {
    items
        .iter()
        .map(|item| LineItemForm::new(item.name(), text(item.cost())))
        .collect()
}

fn parse_number(raw: &str) -> Result<Decimal, FieldError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(FieldError::Required);
    }

    Decimal::from_str(raw).map_err(|_parse| FieldError::NotANumber)
}

fn parse_amount(raw: &str) -> Result<Decimal, FieldError> {
    let amount = parse_number(raw)?;

    if amount < Decimal::ZERO {
        return Err(FieldError::Negative);
    }

    Ok(amount)
}

fn parse_unit_count(raw: &str) -> Result<u32, FieldError> {
    let units = parse_amount(raw)?;

    if units < Decimal::ONE {
        return Err(FieldError::BelowOneUnit);
    }

    if !units.fract().is_zero() {
        return Err(FieldError::NotWholeNumber);
    }

    units.to_u32().ok_or(FieldError::TooManyUnits)
}

fn parse_margin(raw: &str) -> Result<Decimal, FieldError> {
    if raw.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }

    match parse_number(raw) {
        Ok(margin) if margin >= Decimal::ZERO && margin <= MAX_MARGIN_PERCENT => Ok(margin),
        _ => Err(FieldError::MarginOutOfRange),
    }
}

fn parse_items(kind: ItemKind, rows: &[LineItemForm], errors: &mut ValidationErrors) -> LineItems {
    let list = kind.field();

    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let name = row.name.trim();
            if name.is_empty() {
                errors.add(format!("{list}[{i}].name"), FieldError::MissingItemName);
            }

            let cost = parse_amount(&row.cost)
                .map_err(|error| errors.add(format!("{list}[{i}].cost"), error))
                .ok()?;

            (!name.is_empty()).then(|| LineItem::new(name, cost))
        })
        .collect()
}

/// Accept a string, a number or nothing, as typed into a text box.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl de::Visitor<'_> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}
