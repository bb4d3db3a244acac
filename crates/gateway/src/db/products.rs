//! Product repository.

use sqlx::PgPool;
use sqlx::types::Json;

use stylish_core::{Category, Color, Product, ProductId, Variant};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, category, title, description, price, texture, wash, place, \
                               note, story, main_image, images, colors, sizes, variants";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    category: String,
    title: String,
    description: String,
    price: i64,
    texture: String,
    wash: String,
    place: String,
    note: String,
    story: String,
    main_image: String,
    images: Json<Vec<String>>,
    colors: Json<Vec<Color>>,
    sizes: Json<Vec<String>>,
    variants: Json<Vec<Variant>>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(|e| {
            RepositoryError::DataCorruption(format!("product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            category,
            title: row.title,
            description: row.description,
            price: row.price,
            texture: row.texture,
            wash: row.wash,
            place: row.place,
            note: row.note,
            story: row.story,
            main_image: row.main_image,
            images: row.images.0,
            colors: row.colors.0,
            sizes: row.sizes.0,
            variants: row.variants.0,
        })
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch up to `limit` products of a category, skipping `offset`.
    ///
    /// `Category::All` matches every stored category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if a row holds an unknown category.
    pub async fn list_by_category(
        &self,
        category: Category,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let filter = (category != Category::All).then_some(category.as_str());
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE ($1::text IS NULL OR category = $1) \
             ORDER BY id LIMIT $2 OFFSET $3"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&query)
            .bind(filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Case-insensitive title search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(
        &self,
        keyword: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let query = format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE title ILIKE $1 ESCAPE '\\' \
             ORDER BY id LIMIT $2 OFFSET $3"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&query)
            .bind(like_pattern(keyword))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1");

        let row: Option<ProductRow> = sqlx::query_as(&query)
            .bind(id.as_i64())
            .fetch_optional(self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }
}

/// Build a `%keyword%` pattern with `LIKE` wildcards in the keyword escaped.
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_keyword() {
        assert_eq!(like_pattern("洋裝"), "%洋裝%");
        assert_eq!(like_pattern(""), "%%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%"), "%100\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
        assert_eq!(like_pattern("c:\\"), "%c:\\\\%");
    }
}
