//! Transcription form: one quantity per catalog entry

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogEntry};

/// A catalog entry and the quantity the user transcribed for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuantityRow {
    pub entry: CatalogEntry,
    pub quantity: u32,
}

/// Rejected quantity input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityInputError {
    #[error("quantities cannot be negative: {0:?}")]
    Negative(String),

    #[error("not a whole number: {0:?}")]
    NotANumber(String),

    #[error("quantity too large: {0:?}")]
    TooLarge(String),

    #[error("no row {0} in the form")]
    NoSuchRow(usize),
}

/// Parse a quantity typed by the user. Empty input means 0.
pub fn parse_quantity(input: &str) -> Result<u32, QuantityInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if trimmed.starts_with('-') {
        return Err(QuantityInputError::Negative(trimmed.to_string()));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuantityInputError::NotANumber(trimmed.to_string()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| QuantityInputError::TooLarge(trimmed.to_string()))
}

/// The editable quantities, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptionForm {
    rows: Vec<QuantityRow>,
}

impl TranscriptionForm {
    /// One zero-quantity row per catalog entry
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            rows: catalog
                .entries()
                .iter()
                .map(|entry| QuantityRow {
                    entry: entry.clone(),
                    quantity: 0,
                })
                .collect(),
        }
    }

    /// Snapshot of every row as currently edited
    pub fn rows(&self) -> Vec<QuantityRow> {
        self.rows.clone()
    }

    pub fn row(&self, index: usize) -> Option<&QuantityRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the row for `category`/`name` (case-insensitive)
    pub fn find(&self, category: &str, name: &str) -> Option<usize> {
        self.rows.iter().position(|row| {
            row.entry.category.eq_ignore_ascii_case(category)
                && row.entry.name.eq_ignore_ascii_case(name)
        })
    }

    fn quantity_mut(&mut self, index: usize) -> Result<&mut u32, QuantityInputError> {
        self.rows
            .get_mut(index)
            .map(|row| &mut row.quantity)
            .ok_or(QuantityInputError::NoSuchRow(index))
    }

    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), QuantityInputError> {
        *self.quantity_mut(index)? = quantity;
        Ok(())
    }

    /// Set a row from raw text; invalid input leaves the row unchanged
    pub fn apply_input(&mut self, index: usize, input: &str) -> Result<u32, QuantityInputError> {
        let slot = self.quantity_mut(index)?;
        let quantity = parse_quantity(input)?;
        *slot = quantity;
        Ok(quantity)
    }

    /// Append a typed digit to a row's quantity
    pub fn push_digit(&mut self, index: usize, digit: char) -> Result<u32, QuantityInputError> {
        let slot = self.quantity_mut(index)?;
        let value = digit
            .to_digit(10)
            .ok_or_else(|| QuantityInputError::NotANumber(digit.to_string()))?;
        let next = slot
            .checked_mul(10)
            .and_then(|q| q.checked_add(value))
            .ok_or_else(|| QuantityInputError::TooLarge(format!("{}{}", slot, digit)))?;
        *slot = next;
        Ok(next)
    }

    /// Remove the last digit of a row's quantity
    pub fn pop_digit(&mut self, index: usize) -> Result<u32, QuantityInputError> {
        let slot = self.quantity_mut(index)?;
        *slot /= 10;
        Ok(*slot)
    }

    pub fn increment(&mut self, index: usize) -> Result<u32, QuantityInputError> {
        let slot = self.quantity_mut(index)?;
        *slot = slot.saturating_add(1);
        Ok(*slot)
    }

    /// Decrease by one, never below zero
    pub fn decrement(&mut self, index: usize) -> Result<u32, QuantityInputError> {
        let slot = self.quantity_mut(index)?;
        *slot = slot.saturating_sub(1);
        Ok(*slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> TranscriptionForm {
        TranscriptionForm::new(&Catalog::from_categories([
            ("Metals", vec!["Iron", "Gold"]),
            ("Cloth", vec!["Felt"]),
        ]))
    }

    #[test]
    fn test_rows_follow_catalog_order_with_zero_default() {
        let rows = form().rows();
        let names: Vec<&str> = rows.iter().map(|r| r.entry.name.as_str()).collect();
        assert_eq!(names, vec!["Iron", "Gold", "Felt"]);
        assert!(rows.iter().all(|r| r.quantity == 0));
    }

    #[test]
    fn test_rows_reflect_latest_edits() {
        let mut form = form();
        let before = form.rows();
        form.set_quantity(1, 7).unwrap();

        assert_eq!(before[1].quantity, 0);
        assert_eq!(form.rows()[1].quantity, 7);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(""), Ok(0));
        assert_eq!(parse_quantity("  42 "), Ok(42));
        assert_eq!(parse_quantity("007"), Ok(7));
        assert!(matches!(parse_quantity("-1"), Err(QuantityInputError::Negative(_))));
        assert!(matches!(parse_quantity("1.5"), Err(QuantityInputError::NotANumber(_))));
        assert!(matches!(parse_quantity("abc"), Err(QuantityInputError::NotANumber(_))));
        assert!(matches!(parse_quantity("+3"), Err(QuantityInputError::NotANumber(_))));
        assert!(matches!(
            parse_quantity("99999999999"),
            Err(QuantityInputError::TooLarge(_))
        ));
    }

    #[test]
    fn test_invalid_input_keeps_previous_value() {
        let mut form = form();
        form.apply_input(0, "12").unwrap();

        assert!(form.apply_input(0, "-5").is_err());
        assert!(form.apply_input(0, "NaN").is_err());
        assert_eq!(form.row(0).unwrap().quantity, 12);
    }

    #[test]
    fn test_digit_editing() {
        let mut form = form();
        form.push_digit(2, '4').unwrap();
        form.push_digit(2, '2').unwrap();
        assert_eq!(form.row(2).unwrap().quantity, 42);

        assert_eq!(form.pop_digit(2), Ok(4));
        assert_eq!(form.pop_digit(2), Ok(0));
        assert_eq!(form.pop_digit(2), Ok(0));
        assert!(form.push_digit(2, 'x').is_err());
    }

    #[test]
    fn test_digit_overflow_rejected() {
        let mut form = form();
        form.set_quantity(0, u32::MAX / 10 + 1).unwrap();
        assert!(matches!(form.push_digit(0, '0'), Err(QuantityInputError::TooLarge(_))));
        assert_eq!(form.row(0).unwrap().quantity, u32::MAX / 10 + 1);
    }

    #[test]
    fn test_decrement_saturates_at_zero() {
        let mut form = form();
        assert_eq!(form.decrement(0), Ok(0));
        assert_eq!(form.increment(0), Ok(1));
        assert_eq!(form.decrement(0), Ok(0));
    }

    #[test]
    fn test_out_of_range_row() {
        let mut form = form();
        assert_eq!(form.set_quantity(9, 1), Err(QuantityInputError::NoSuchRow(9)));
        assert_eq!(form.apply_input(9, "1"), Err(QuantityInputError::NoSuchRow(9)));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let form = form();
        assert_eq!(form.find("metals", "gold"), Some(1));
        assert_eq!(form.find("Cloth", "Iron"), None);
    }
}
