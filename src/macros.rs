// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression — works for literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! re {
    // Lazily compiled, process-wide regex shorthand!
    // Patterns are literals checked by the tests that exercise them.
    ($pat:expr) => {{
        static RE: ::std::sync::LazyLock<::regex::Regex> =
            ::std::sync::LazyLock::new(|| ::regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! sel {
    // Same idea for CSS selectors.
    ($css:expr) => {{
        static SEL: ::std::sync::LazyLock<::scraper::Selector> =
            ::std::sync::LazyLock::new(|| ::scraper::Selector::parse($css).unwrap());
        &*SEL
    }};
}
