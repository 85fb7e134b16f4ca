//! Text rendering for console output

use chrono::{DateTime, Local, Utc};
use techsolutions_core::Service;

/// Peso amount with dot thousands separators, e.g. `$ 1.000`
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("$ {grouped}")
}

pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// One table row per service
pub fn service_table<'a>(services: impl IntoIterator<Item = &'a Service>) -> String {
    let mut out = format!("{:>4}  {:<32} {:>12}  {:<8}\n", "ID", "NAME", "PRICE", "STATUS");
    let mut empty = true;
    for service in services {
        empty = false;
        out.push_str(&format!(
            "{:>4}  {:<32} {:>12}  {:<8}\n",
            service.id,
            truncate(&service.name, 32),
            format_price(service.price),
            if service.active { "active" } else { "inactive" },
        ));
    }
    if empty {
        out.push_str("  (no services)\n");
    }
    out
}

pub fn service_detail(service: &Service) -> String {
    format!(
        "#{} {}\n  price:    {}\n  quantity: {}\n  status:   {}\n  image:    {}\n\n  {}\n",
        service.id,
        service.name,
        format_price(service.price),
        service.quantity,
        if service.active { "active" } else { "inactive" },
        service.image,
        service.description,
    )
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
