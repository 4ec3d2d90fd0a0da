//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n".to_string();
    }

    let rows = categories.iter().map(|category| CategoryRow {
        id: category.id.to_string(),
        name: category.name.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryId;

    #[test]
    fn test_category_list() {
        let categories = vec![
            Category {
                id: CategoryId::new(1),
                name: "Food".into(),
            },
            Category {
                id: CategoryId::new(2),
                name: "Housing".into(),
            },
        ];
        let output = format_category_list(&categories);
        assert!(output.contains("cat-2"));
        assert!(output.contains("Housing"));
        assert_eq!(format_category_list(&[]), "No categories found.\n");
    }
}
