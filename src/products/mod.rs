use std::fmt::Display;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::CrudsError;
use crate::parse::amount_or_zero;

mod fields;

pub use fields::{Field, ProductFields};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// a product line; `total` is fixed when the product is created or overwritten
pub struct Product {
    pub title: String,
    pub price: Decimal,
    pub taxes: Decimal,
    pub ads: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub category: String,
}

impl Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] (Total: {:8.2})",
            self.title, self.category, self.total
        )
    }
}

/// `price + taxes + ads - discount`, or `None` when the sum leaves the `Decimal` range.
pub fn total(price: Decimal, taxes: Decimal, ads: Decimal, discount: Decimal) -> Option<Decimal> {
    price
        .checked_add(taxes)?
        .checked_add(ads)?
        .checked_sub(discount)
}

impl Product {
    /// Builds a product from form input. Required fields are checked by the caller.
    pub fn from_fields(fields: &ProductFields) -> Result<Self, CrudsError> {
        let price = amount_or_zero(&fields.price);
        let taxes = amount_or_zero(&fields.taxes);
        let ads = amount_or_zero(&fields.ads);
        let discount = amount_or_zero(&fields.discount);
        let total = total(price, taxes, ads, discount).ok_or_else(|| {
            CrudsError::InvalidArgument("total is too large to represent".to_string())
        })?;
        Ok(Self {
            title: fields.title.trim().to_string(),
            price,
            taxes,
            ads,
            discount,
            total,
            category: fields.category.trim().to_string(),
        })
    }
}
