use inquire::Text;
use rust_decimal::Decimal;

use crate::{errors::CrudsError, parse, CrudsConfig};

use super::{total, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Price,
    Taxes,
    Ads,
    Discount,
    Count,
    Category,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Title,
        Field::Price,
        Field::Taxes,
        Field::Ads,
        Field::Discount,
        Field::Count,
        Field::Category,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Price => "price",
            Field::Taxes => "taxes",
            Field::Ads => "ads",
            Field::Discount => "discount",
            Field::Count => "count",
            Field::Category => "category",
        }
    }

    fn is_amount(self) -> bool {
        matches!(
            self,
            Field::Price | Field::Taxes | Field::Ads | Field::Discount
        )
    }
}

/// Raw form input, kept as typed until a submit turns it into a [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub title: String,
    pub price: String,
    pub taxes: String,
    pub ads: String,
    pub discount: String,
    pub count: String,
    pub category: String,
}

impl From<&Product> for ProductFields {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            taxes: product.taxes.to_string(),
            ads: product.ads.to_string(),
            discount: product.discount.to_string(),
            count: String::new(),
            category: product.category.clone(),
        }
    }
}

impl ProductFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Price => &self.price,
            Field::Taxes => &self.taxes,
            Field::Ads => &self.ads,
            Field::Discount => &self.discount,
            Field::Count => &self.count,
            Field::Category => &self.category,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Price => &mut self.price,
            Field::Taxes => &mut self.taxes,
            Field::Ads => &mut self.ads,
            Field::Discount => &mut self.discount,
            Field::Count => &mut self.count,
            Field::Category => &mut self.category,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        [Field::Title, Field::Price, Field::Category]
            .into_iter()
            .filter(|&field| self.get(field).trim().is_empty())
            .map(Field::name)
            .collect()
    }

    /// Total shown while typing; nothing until a price has been entered or
    /// while the sum is out of range.
    pub fn preview_total(&self) -> Option<Decimal> {
        if self.price.trim().is_empty() {
            return None;
        }
        total(
            parse::amount_or_zero(&self.price),
            parse::amount_or_zero(&self.taxes),
            parse::amount_or_zero(&self.ads),
            parse::amount_or_zero(&self.discount),
        )
    }

    pub fn copies(&self) -> Result<u32, CrudsError> {
        parse::copies(&self.count)
    }

    /// Asks for every field, pre-filled with the current input.
    pub fn prompt(&mut self, config: &CrudsConfig, with_count: bool) -> Result<(), CrudsError> {
        for field in Field::ALL {
            if field == Field::Count && !with_count {
                continue;
            }
            let label = format!("{}:", capitalize(field.name()));
            let current = self.get(field).to_string();
            let help = if field.is_amount() {
                format!(
                    "Amount in {}, use a decimal point or comma as separator",
                    config.currency
                )
            } else if field == Field::Count {
                format!("How many copies to create (default 1, at most {})", parse::MAX_COPIES)
            } else {
                String::new()
            };
            let mut text = Text::new(&label).with_initial_value(&current);
            if !help.is_empty() {
                text = text.with_help_message(&help);
            }
            let value = text.prompt()?;
            self.set(field, value);
        }
        match self.preview_total() {
            Some(total) => println!("Total: {:.2}{}", total, config.currency),
            None => println!("Total: -"),
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
