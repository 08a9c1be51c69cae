use serde::Serialize;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Ingredient amounts summed over every recipe in the user's cart.
pub async fn totals(pool: &SqlitePool, user_id: i64) -> foodgram_shared::Result<Vec<ShoppingItem>> {
    let items = sqlx::query_as::<_, ShoppingItem>(
        r#"
SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
FROM shopping_cart sc
JOIN recipe_ingredient ri ON ri.recipe_id = sc.recipe_id
JOIN ingredient i ON i.id = ri.ingredient_id
WHERE sc.user_id = ?
GROUP BY i.id, i.name, i.measurement_unit
ORDER BY i.name
"#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// One `name - amount unit` line per item.
pub fn render(items: &[ShoppingItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} - {} {}\n",
                item.name, item.total_amount, item.measurement_unit
            )
        })
        .collect()
}
