//! Marketplace domain types and sell-form logic
//!
//! Everything that crosses the server-function boundary lives here, together
//! with the validation and unit-conversion step that turns a filled-in sell
//! form into the argument list of the contract's `publishProduct` call.

use serde::{Deserialize, Serialize};

/// A product listing as read back from the marketplace contract.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// Price in ETH as a display string ("1.5"), never a float.
    pub price: String,
    /// Price in wei as a decimal integer string, for order totals.
    pub price_wei: String,
    pub quantity: u64,
    pub image: String,
}

/// The sell form, field by field, exactly as typed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

/// Why a draft cannot be published.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("Please set a title before publishing")]
    MissingTitle,
    #[error("Please set a description before publishing")]
    MissingDescription,
    #[error("Please set a price before publishing")]
    MissingPrice,
    #[error("Please set an image URL before publishing")]
    MissingImage,
    #[error("The price could not be converted to wei: {0}")]
    BadPrice(String),
}

impl ProductDraft {
    /// Checks the fields in a fixed order and reports the first empty one.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.title.is_empty() {
            return Err(DraftError::MissingTitle);
        }
        if self.description.is_empty() {
            return Err(DraftError::MissingDescription);
        }
        if self.price.is_empty() {
            return Err(DraftError::MissingPrice);
        }
        if self.image.is_empty() {
            return Err(DraftError::MissingImage);
        }
        Ok(())
    }
}

/// The argument list of the contract's `publishProduct` call, with the price
/// already converted to a smallest-unit integer string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PublishRequest {
    pub title: String,
    pub description: String,
    pub price_wei: String,
    pub image: String,
}

/// Validates a draft and converts its price, yielding the publish call
/// arguments. Validation runs completely before any conversion, so an empty
/// field always wins over a malformed price.
pub fn prepare_publish(draft: &ProductDraft) -> Result<PublishRequest, DraftError> {
    draft.validate()?;
    let wei = crate::wallet::to_wei(&draft.price).map_err(|e| DraftError::BadPrice(e.to_string()))?;
    Ok(PublishRequest {
        title: draft.title.clone(),
        description: draft.description.clone(),
        price_wei: wei.to_string(),
        image: draft.image.clone(),
    })
}

/// Splits a description into the lines the detail page renders, one list item
/// per newline-separated segment. An absent description renders nothing.
pub fn description_lines(description: &str) -> Vec<&str> {
    if description.is_empty() {
        return Vec::new();
    }
    description.split('\n').collect()
}
