//! Plain-text output for the terminal.

use std::fmt::Write;

use crate::models::{FieldErrors, Product};

/// Rupiah with `.` thousands and `,` decimals: `Rp 18.500.000`, `Rp 1.234,5`
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    if fraction == 0 {
        format!("Rp {sign}{grouped}")
    } else {
        let decimals = format!("{:02}", fraction);
        format!("Rp {sign}{grouped},{}", decimals.trim_end_matches('0'))
    }
}

pub fn product_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products yet. Add one with `products create`.\n".to_string();
    }

    let rows: Vec<[String; 5]> = products
        .iter()
        .map(|p| {
            [
                p.id.to_string(),
                p.name.clone(),
                format_price(p.price),
                format!("{} pcs", p.stock),
                if p.image.is_some() { "yes" } else { "-" }.to_string(),
            ]
        })
        .collect();

    let headers = ["ID", "NAME", "PRICE", "STOCK", "IMAGE"];
    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut line = |cells: [&str; 5]| {
        let rendered: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        let _ = writeln!(out, "{}", rendered.join("  ").trim_end());
    };

    line(headers);
    for row in &rows {
        line([&row[0], &row[1], &row[2], &row[3], &row[4]]);
    }

    out
}

pub fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", product.id, product.name);
    let _ = writeln!(
        out,
        "  Description: {}",
        product.description.as_deref().unwrap_or("No description")
    );
    let _ = writeln!(out, "  Price:       {}", format_price(product.price));
    let _ = writeln!(out, "  Stock:       {} pcs", product.stock);
    if let Some(url) = &product.image_url {
        let _ = writeln!(out, "  Image:       {}", url);
    }
    let _ = writeln!(out, "  Created:     {}", product.created_at);
    let _ = writeln!(out, "  Updated:     {}", product.updated_at);
    out
}

/// One line per message, grouped under its field
pub fn field_errors(errors: &FieldErrors) -> String {
    let mut out = String::from("The product could not be saved:\n");
    for (field, messages) in errors {
        for message in messages {
            let _ = writeln!(out, "  {}: {}", field, message);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: f64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: None,
            price,
            stock,
            image: None,
            image_url: None,
            created_at: "2025-01-10T08:00:00Z".into(),
            updated_at: "2025-01-10T08:00:00Z".into(),
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(18500000.0), "Rp 18.500.000");
        assert_eq!(format_price(850000.0), "Rp 850.000");
        assert_eq!(format_price(999.0), "Rp 999");
        assert_eq!(format_price(0.0), "Rp 0");
        assert_eq!(format_price(1234.5), "Rp 1.234,5");
        assert_eq!(format_price(19.99), "Rp 19,99");
    }

    #[test]
    fn test_product_table_aligns_columns() {
        let table = product_table(&[
            product(12, "Mouse Logitech G502", 850000.0, 50),
            product(3, "Headset", 1100000.0, 0),
        ]);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID  NAME"));
        assert!(lines[1].starts_with("12  Mouse Logitech G502  Rp 850.000"));
        assert!(lines[2].starts_with("3   Headset"));
        assert!(lines[2].contains("0 pcs"));
    }

    #[test]
    fn test_empty_table() {
        assert!(product_table(&[]).starts_with("No products yet"));
    }

    #[test]
    fn test_detail_without_description() {
        let detail = product_detail(&product(1, "Keyboard", 1200000.0, 30));
        assert!(detail.contains("No description"));
        assert!(detail.contains("Rp 1.200.000"));
        assert!(!detail.contains("Image:"));
    }

    #[test]
    fn test_field_errors_render_every_message() {
        let errors = FieldErrors::from([
            ("price".to_string(), vec!["The price field must be at least 0.".to_string()]),
            (
                "stock".to_string(),
                vec![
                    "The stock field must be an integer.".to_string(),
                    "The stock field must be at least 0.".to_string(),
                ],
            ),
        ]);

        let rendered = field_errors(&errors);
        assert!(rendered.contains("  price: The price field must be at least 0.\n"));
        assert!(rendered.contains("  stock: The stock field must be an integer.\n"));
        assert!(rendered.contains("  stock: The stock field must be at least 0.\n"));
    }
}
