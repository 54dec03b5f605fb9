//! Recipe lookup in the wide calculations sheet.
//!
//! The sheet holds three side-by-side column blocks, one per [`RecipeTier`]. A block
//! starts with a marker column carrying the crafted item's name, followed by
//! (ingredient, quantity) pairs. Only the simple block has a production time column.
//!
//! ```text
//! A        B..I (4 pairs)   J      | L        M..V (5 pairs) | X        Y..AP (9 pairs)
//! simple   ingredients      time   | medium   ingredients    | complex  ingredients
//! ```
use super::numeric::{is_blank, parse_number};
use super::types::{Ingredient, Recipe, RecipeTier};

/// Column layout of one tier block (0-based column indexes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLayout {
    pub tier: RecipeTier,
    pub marker_column: usize,
    pub ingredient_start: usize,
    pub max_pairs: usize,
    pub time_column: Option<usize>,
}

/// Tier blocks in lookup priority order.
pub const RECIPE_TIERS: [TierLayout; 3] = [
    TierLayout {
        tier: RecipeTier::Simple,
        marker_column: 0,
        ingredient_start: 1,
        max_pairs: 4,
        time_column: Some(9),
    },
    TierLayout {
        tier: RecipeTier::Medium,
        marker_column: 11,
        ingredient_start: 12,
        max_pairs: 5,
        time_column: None,
    },
    TierLayout {
        tier: RecipeTier::Complex,
        marker_column: 23,
        ingredient_start: 24,
        max_pairs: 9,
        time_column: None,
    },
];

const PAIR_WIDTH: usize = 2;

impl TierLayout {
    fn matches(&self, row: &[String], item_name: &str) -> bool {
        row.get(self.marker_column)
            .map(|cell| cell.trim() == item_name)
            .unwrap_or(false)
    }

    fn extract(&self, row: &[String], item_name: &str) -> Recipe {
        let ingredients = (0..self.max_pairs)
            .filter_map(|pair| {
                let col = self.ingredient_start + pair * PAIR_WIDTH;
                let name = row.get(col)?;
                let quantity = row.get(col + 1)?;
                if is_blank(name) || is_blank(quantity) {
                    return None;
                }
                Some(Ingredient {
                    name: name.trim().to_string(),
                    quantity: parse_number(quantity),
                })
            })
            .collect();

        let production_time_minutes = self
            .time_column
            .and_then(|col| row.get(col))
            .filter(|cell| !is_blank(cell))
            .map(|cell| parse_number(cell));

        Recipe {
            item_name: item_name.to_string(),
            tier: self.tier,
            ingredients,
            production_time_minutes,
        }
    }
}

/// Find the first row whose tier marker equals `item_name` (exact match).
///
/// Rows are scanned top to bottom; within a row the tiers are tried in
/// [`RECIPE_TIERS`] order.
pub fn resolve_recipe(item_name: &str, rows: &[Vec<String>]) -> Option<Recipe> {
    let item_name = item_name.trim();
    if item_name.is_empty() {
        return None;
    }
    rows.iter().find_map(|row| {
        RECIPE_TIERS
            .iter()
            .find(|layout| layout.matches(row, item_name))
            .map(|layout| layout.extract(row, item_name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a calculations row with the given (column, value) cells filled in.
    fn sparse_row(cells: &[(usize, &str)]) -> Vec<String> {
        let width = cells.iter().map(|(c, _)| c + 1).max().unwrap_or(0);
        let mut row = vec![String::new(); width];
        for (col, value) in cells {
            row[*col] = value.to_string();
        }
        row
    }

    #[test]
    fn simple_tier_has_production_time() {
        let rows = vec![sparse_row(&[
            (0, "Brett"),
            (1, "Holz"),
            (2, "2"),
            (3, "Nagel"),
            (4, "4"),
            (9, "1,5"),
        ])];
        let recipe = resolve_recipe("Brett", &rows).unwrap();
        assert_eq!(recipe.tier, RecipeTier::Simple);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[1].name, "Nagel");
        assert_eq!(recipe.ingredients[1].quantity, 4.0);
        assert_eq!(recipe.production_time_minutes, Some(1.5));
    }

    #[test]
    fn complex_tier_has_no_production_time() {
        let rows = vec![sparse_row(&[
            (0, "Brett"),
            (9, "3"),
            (23, "Schiff"),
            (24, "Brett"),
            (25, "40"),
            (40, "Segel"),
            (41, "2"),
        ])];
        let recipe = resolve_recipe("Schiff", &rows).unwrap();
        assert_eq!(recipe.tier, RecipeTier::Complex);
        assert_eq!(recipe.production_time_minutes, None);
        let names: Vec<_> = recipe.ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Brett", "Segel"]);
    }

    #[test]
    fn medium_tier_ignores_neighbouring_blocks() {
        let rows = vec![sparse_row(&[
            (11, "Werkbank"),
            (12, "Brett"),
            (13, "6"),
            (20, "Leim"),
            (21, "1"),
            (22, "Fremd"),
            (23, "Anderes"),
        ])];
        let recipe = resolve_recipe("Werkbank", &rows).unwrap();
        assert_eq!(recipe.tier, RecipeTier::Medium);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[1].name, "Leim");
    }

    #[test]
    fn half_filled_pairs_are_skipped() {
        let rows = vec![sparse_row(&[
            (0, "Brett"),
            (1, "Holz"),
            (2, ""),
            (3, ""),
            (4, "3"),
            (5, "Nagel"),
            (6, "2"),
        ])];
        let recipe = resolve_recipe("Brett", &rows).unwrap();
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.ingredients[0].name, "Nagel");
        assert_eq!(recipe.production_time_minutes, None);
    }

    #[test]
    fn first_matching_row_wins_and_match_is_exact() {
        let rows = vec![
            sparse_row(&[(0, "brett"), (1, "Falsch"), (2, "1")]),
            sparse_row(&[(0, "Brett"), (1, "Holz"), (2, "2")]),
            sparse_row(&[(0, "Brett"), (1, "Später"), (2, "9")]),
        ];
        let recipe = resolve_recipe("Brett", &rows).unwrap();
        assert_eq!(recipe.ingredients[0].name, "Holz");
    }

    #[test]
    fn unknown_item_is_none() {
        let rows = vec![sparse_row(&[(0, "Brett")])];
        assert!(resolve_recipe("Schiff", &rows).is_none());
        assert!(resolve_recipe("", &rows).is_none());
    }
}
