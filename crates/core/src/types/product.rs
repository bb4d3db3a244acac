//! Catalog records returned by the catalog service.

use serde::{Deserialize, Serialize};

use super::{Category, ProductId};

/// A product as presented to shoppers.
///
/// Prices are whole currency units (TWD has no minor unit in the storefront).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub texture: String,
    pub wash: String,
    pub place: String,
    pub note: String,
    pub story: String,
    pub main_image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A color option, e.g. `{ "code": "FFFFFF", "name": "白色" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub code: String,
    pub name: String,
}

/// Stock for one color/size combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub color_code: String,
    pub size: String,
    pub stock: u32,
}
