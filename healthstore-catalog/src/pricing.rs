use crate::product::CatalogError;

/// Parse a decimal money string ("10.99", "7", "$5.5") into cents.
///
/// At most two fractional digits are accepted; negative amounts are rejected.
pub fn parse_money(text: &str) -> Result<i64, CatalogError> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let invalid = || CatalogError::InvalidMoney(text.to_string());

    if digits.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if fraction.len() > 2 || (whole.is_empty() && fraction.is_empty()) {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_cents = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<i64>()
            .map_err(|_| invalid())?
            .checked_mul(100)
            .ok_or_else(invalid)?
    };

    let fraction_cents = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => fraction.parse::<i64>().map_err(|_| invalid())?,
    };

    whole_cents.checked_add(fraction_cents).ok_or_else(invalid)
}

/// Convert a numeric price column (dollars as a float) to cents.
pub fn cents_from_major(amount: f64) -> Result<i64, CatalogError> {
    if !amount.is_finite() || amount < 0.0 || amount > (i64::MAX / 100) as f64 {
        return Err(CatalogError::InvalidMoney(amount.to_string()));
    }
    Ok((amount * 100.0).round() as i64)
}

/// Interpret the free-text sale price column.
///
/// Blank means no sale. Unparseable text is logged and treated as no sale.
pub fn parse_sale_price(product_id: &str, raw: Option<&str>) -> Option<i64> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match parse_money(raw) {
        Ok(cents) => Some(cents),
        Err(_) => {
            tracing::warn!("Invalid sale_price format for product {}: {:?}", product_id, raw);
            None
        }
    }
}

/// Render cents as a plain two-decimal amount, e.g. `1099` -> `"10.99"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}
