use heck::ToSnakeCase;

/// Converts an identifier such as `TradeNumber` or `userID` to `snake_case`.
pub fn snake_case(src: &str) -> String {
    src.trim().to_snake_case()
}

/// Returns the plural form of an English noun, e.g. `category` -> `categories`.
pub fn pluralize(src: &str) -> String {
    pluralizer::pluralize(src, 2, false)
}
