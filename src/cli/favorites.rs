use super::ui;
use crate::core::favorites::Favorites;

pub fn render_favorites(favorites: &Favorites) -> String {
    if favorites.is_empty() {
        return ui::style_text("No favorite currency pairs yet.", ui::StyleType::Subtle);
    }
    let mut output = String::from("List of favorite currency pairs:\n");
    for (i, pair) in favorites.iter().enumerate() {
        output.push_str(&format!("\n{}. {}", i + 1, pair));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_currencies;
    use crate::core::currency::CurrencyRegistry;

    #[test]
    fn test_render_favorites() {
        assert!(render_favorites(&Favorites::new()).contains("No favorite currency pairs yet."));

        let registry = CurrencyRegistry::new(default_currencies());
        let mut favorites = Favorites::new();
        favorites.add(&registry, "USD", "VND").unwrap();
        favorites.add(&registry, "EUR", "GBP").unwrap();
        let output = render_favorites(&favorites);
        assert!(output.contains("1. USD → VND"));
        assert!(output.contains("2. EUR → GBP"));
    }
}
