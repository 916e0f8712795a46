pub const SUPPORTED_LOCALES: &[&str] = &["en", "zh-TW"];
pub const FALLBACK_LOCALE: &str = "en";

/// Maps values like `zh_TW.UTF-8` or `en-US` onto a bundled locale.
pub fn resolve_locale(lang: &str) -> &'static str {
    let tag = lang.split('.').next().unwrap_or_default().replace('_', "-");

    if let Some(exact) = SUPPORTED_LOCALES.iter().find(|l| l.eq_ignore_ascii_case(&tag)) {
        return *exact;
    }

    let primary = tag.split('-').next().unwrap_or_default();
    SUPPORTED_LOCALES
        .iter()
        .find(|l| l.split('-').next().is_some_and(|p| p.eq_ignore_ascii_case(primary)))
        .copied()
        .unwrap_or(FALLBACK_LOCALE)
}

pub fn set_locale(lang: &str) {
    rust_i18n::set_locale(resolve_locale(lang));
}
