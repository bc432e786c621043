//! Keyword → product recommendation table.

/// Checked in order; the first keyword found in the message wins.
pub const PRODUCTS: [(&str, &str); 4] = [
    ("backup", "AvePoint Cloud Backup - protects Microsoft 365 data"),
    ("migration", "AvePoint FLY - migrates content to cloud"),
    ("governance", "AvePoint Policies - automates data governance"),
    ("compliance", "Compliance Guardian - ensures regulatory compliance"),
];

pub fn recommend(message: &str) -> Option<&'static str> {
    let text = message.to_lowercase();
    PRODUCTS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, product)| *product)
}

pub fn format_recommendation(product: &str) -> String {
    format!("📦 Recommended Product:\n\n{product}")
}
