//! Category display formatting

use crate::models::BudgetCategory;

/// Format categories with their planned amounts
pub fn format_category_list(categories: &[BudgetCategory], currency_symbol: &str) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'rollover category add <name> <planned>' to create one.\n"
            .to_string();
    }

    let name_width = categories
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:width$}  {:>12}\n",
        "Name",
        "Planned",
        width = name_width
    ));
    output.push_str(&"-".repeat(name_width + 14));
    output.push('\n');

    for category in categories {
        output.push_str(&format!(
            "{:width$}  {:>12}\n",
            category.name,
            category.planned_amount.format_with_symbol(currency_symbol),
            width = name_width
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};

    #[test]
    fn test_category_list() {
        let categories = vec![BudgetCategory {
            id: CategoryId::new(),
            name: "Groceries".into(),
            planned_amount: Money::from_cents(40_000),
        }];
        let output = format_category_list(&categories, "€");
        assert!(output.starts_with("Name"));
        assert!(output.contains("Groceries"));
        assert!(output.contains("€400.00"));
    }

    #[test]
    fn test_empty() {
        assert!(format_category_list(&[], "$").starts_with("No categories found."));
    }
}
