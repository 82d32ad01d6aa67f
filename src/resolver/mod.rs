//! Translated attribute resolution.
//!
//! Resolution order for a translated attribute:
//!
//! 1. the row for the requested locale (`attribute:locale` overrides the current locale)
//! 2. when fallback is enabled and the attribute is a fallback attribute:
//!    - native mode: the record's own value
//!    - otherwise: the row for the configured fallback key
//! 3. not found
//!
//! Attributes that are not translated pass through to the record's own value.

/// レコード属性の一括シリアライズ
mod serialize;

use serde_json::{
    Map,
    Value,
};

use crate::config::ResolverConfig;
use crate::locale::LocaleProvider;
use crate::model::{
    Translatable,
    TranslationRow,
};
use crate::store::TranslationStore;
use crate::types::LocaleKey;

pub use serialize::to_attribute_map;

/// 属性名と明示ロケールの区切り（`title:en`）
pub const LOCALE_DELIMITER: char = ':';

/// 行はあるが列がない翻訳属性の値
static NULL: Value = Value::Null;

/// 1 属性の解決結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionResult<'a> {
    /// 翻訳行の値
    Resolved(&'a Value),
    /// 翻訳属性だが使える値がない
    NotFound,
    /// レコード自身の値（翻訳対象外の属性、またはネイティブフォールバック）
    PassThrough(Option<&'a Value>),
}

impl<'a> ResolutionResult<'a> {
    /// 呼び出し側が読む値。null は `None`
    #[must_use]
    pub const fn value(&self) -> Option<&'a Value> {
        match *self {
            Self::Resolved(value) => Some(value),
            Self::PassThrough(value) => value,
            Self::NotFound => None,
        }
    }

    /// `NotFound` 以外か
    #[must_use]
    pub const fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// 属性名と明示ロケールに分割した属性キー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeKey<'k> {
    /// 属性名
    pub attribute: &'k str,
    /// `:` 以降のロケール
    pub locale: Option<&'k str>,
}

/// `attribute:locale` を最初の区切りで分割する。空のロケールは指定なし扱い
#[must_use]
pub fn parse_attribute_key(key: &str) -> AttributeKey<'_> {
    match key.split_once(LOCALE_DELIMITER) {
        Some((attribute, locale)) if !locale.is_empty() => {
            AttributeKey { attribute, locale: Some(locale) }
        }
        Some((attribute, _)) => AttributeKey { attribute, locale: None },
        None => AttributeKey { attribute: key, locale: None },
    }
}

/// ロケールフィールドが `locale` と等しい最初の行
///
/// 行はロケールごとに一意の想定。重複している場合は先頭を返す。
#[must_use]
pub fn translation_for_locale<'a>(
    rows: &'a [TranslationRow],
    locale_field: &str,
    locale: &LocaleKey,
) -> Option<&'a TranslationRow> {
    rows.iter().find(|row| row.has_locale(locale_field, locale))
}

/// 現在のロケールの行。フォールバックはしない
#[must_use]
pub fn translation<'a, R>(
    record: &'a R,
    current_locale: Option<&LocaleKey>,
    config: &ResolverConfig,
) -> Option<&'a TranslationRow>
where
    R: Translatable + ?Sized,
{
    let locale_field = record.schema().locale_field(&config.locale_key);
    current_locale
        .and_then(|locale| translation_for_locale(record.translations(), locale_field, locale))
}

/// レコード自身の翻訳行で `key` を解決する
#[must_use]
pub fn resolve<'a, R>(
    record: &'a R,
    key: &str,
    current_locale: Option<&LocaleKey>,
    config: &ResolverConfig,
) -> ResolutionResult<'a>
where
    R: Translatable + ?Sized,
{
    resolve_in(record, record.translations(), key, current_locale, config)
}

/// 呼び出し側が渡した `rows` で `record` の `key` を解決する
///
/// 明示ロケールは [`ResolverConfig::explicit_locale`] で行キーに変換する。
#[must_use]
pub fn resolve_in<'a, R>(
    record: &'a R,
    rows: &'a [TranslationRow],
    key: &str,
    current_locale: Option<&LocaleKey>,
    config: &ResolverConfig,
) -> ResolutionResult<'a>
where
    R: Translatable + ?Sized,
{
    let AttributeKey { attribute, locale } = parse_attribute_key(key);
    let schema = record.schema();

    if !schema.is_translated_attribute(attribute) {
        return ResolutionResult::PassThrough(record.attribute(attribute));
    }

    let explicit = locale.map(|code| config.explicit_locale(code));
    let locale = explicit.as_ref().or(current_locale);
    let lookup =
        Lookup { record, rows, attribute, locale_field: schema.locale_field(&config.locale_key) };

    lookup.resolve(locale, config, true)
}

/// 固定の行集合に対する 1 属性の検索
struct Lookup<'a, 'r, R: ?Sized> {
    /// 解決中のレコード
    record: &'a R,
    /// 候補の行
    rows: &'a [TranslationRow],
    /// 属性名（ロケール指定なし）
    attribute: &'r str,
    /// 行のロケールフィールド
    locale_field: &'r str,
}

impl<'a, R: Translatable + ?Sized> Lookup<'a, '_, R> {
    /// `locale` の行、なければフォールバックの順で解決する
    ///
    /// フォールバック先の解決では `try_fallback` を偽にして 1 段で止める。
    fn resolve(
        &self,
        locale: Option<&LocaleKey>,
        config: &ResolverConfig,
        try_fallback: bool,
    ) -> ResolutionResult<'a> {
        if let Some(row) =
            locale.and_then(|locale| translation_for_locale(self.rows, self.locale_field, locale))
        {
            tracing::trace!("'{}' resolved from row {:?}", self.attribute, locale);
            return ResolutionResult::Resolved(row.get(self.attribute).unwrap_or(&NULL));
        }

        if !try_fallback || !config.use_fallback {
            tracing::trace!("'{}' has no row for {:?}", self.attribute, locale);
            return ResolutionResult::NotFound;
        }

        if !self.record.schema().is_fallback_attribute(self.attribute) {
            tracing::trace!("'{}' is not a fallback attribute", self.attribute);
            return ResolutionResult::NotFound;
        }

        if config.native_mode {
            tracing::trace!("'{}' falls back to the native value", self.attribute);
            return ResolutionResult::PassThrough(self.record.attribute(self.attribute));
        }

        tracing::trace!("'{}' falls back to {:?}", self.attribute, config.fallback_key());
        self.resolve(config.fallback_key(), config, false)
    }
}

/// 設定スナップショットとロケールプロバイダーに束縛された解決サービス
#[derive(Debug, Clone, Copy)]
pub struct Translator<'c, P: ?Sized> {
    /// 設定スナップショット
    config: &'c ResolverConfig,
    /// 現在のロケール
    locale: &'c P,
}

impl<'c, P: LocaleProvider + ?Sized> Translator<'c, P> {
    /// 作成
    #[must_use]
    pub const fn new(config: &'c ResolverConfig, locale: &'c P) -> Self {
        Self { config, locale }
    }

    /// 設定スナップショット
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        self.config
    }

    /// 現在のロケールで `key` を解決する
    #[must_use]
    pub fn get<'a, R>(&self, record: &'a R, key: &str) -> ResolutionResult<'a>
    where
        R: Translatable + ?Sized,
    {
        resolve(record, key, self.locale.current_locale().as_ref(), self.config)
    }

    /// 現在のロケールの行
    #[must_use]
    pub fn translation<'a, R>(&self, record: &'a R) -> Option<&'a TranslationRow>
    where
        R: Translatable + ?Sized,
    {
        translation(record, self.locale.current_locale().as_ref(), self.config)
    }

    /// 翻訳値を適用した属性。[`to_attribute_map`] を参照
    #[must_use]
    pub fn to_attribute_map<R, S>(&self, record: &R, store: Option<&S>) -> Map<String, Value>
    where
        R: Translatable + ?Sized,
        S: TranslationStore + ?Sized,
    {
        to_attribute_map(record, store, self.locale.current_locale().as_ref(), self.config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;
    use crate::model::Record;
    use crate::test_utils::{
        article,
        lang,
        row,
        static_config,
    };

    fn de() -> LocaleKey {
        lang("de")
    }

    fn fr() -> LocaleKey {
        lang("fr")
    }

    fn hallo_hello() -> Record {
        article(vec![row("de", "Hallo"), row("en", "Hello")])
    }

    #[rstest]
    #[case::plain("title", "title", None)]
    #[case::with_locale("title:en", "title", Some("en"))]
    #[case::first_delimiter("title:pt:BR", "title", Some("pt:BR"))]
    #[case::empty_locale("title:", "title", None)]
    fn test_parse_attribute_key(
        #[case] key: &str,
        #[case] attribute: &str,
        #[case] locale: Option<&str>,
    ) {
        assert_eq!(parse_attribute_key(key), AttributeKey { attribute, locale });
    }

    #[rstest]
    fn resolves_requested_locale() {
        let record = hallo_hello();

        let result = resolve(&record, "title", Some(&lang("en")), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Hello")));
    }

    #[rstest]
    fn explicit_locale_overrides_current_locale() {
        let record = hallo_hello();

        let result = resolve(&record, "title:en", Some(&de()), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Hello")));
    }

    #[rstest]
    fn falls_back_to_fallback_row() {
        let record = hallo_hello();

        let result = resolve(&record, "title", Some(&fr()), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Hallo")));
    }

    #[rstest]
    fn missing_fallback_row_is_not_found() {
        let record = article(vec![row("en", "Hello")]);

        let result = resolve(&record, "title", Some(&fr()), &static_config());

        assert_eq!(result, ResolutionResult::NotFound);
    }

    #[rstest]
    #[case::code("title:en")]
    #[case::identifier("title:2")]
    fn explicit_locale_accepts_code_or_identifier(#[case] key: &str) {
        let record = hallo_hello();

        let result = resolve(&record, key, Some(&fr()), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Hello")));
    }

    #[rstest]
    fn unknown_explicit_locale_falls_back() {
        let record = hallo_hello();

        let result = resolve(&record, "title:jp", Some(&lang("en")), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Hallo")));
    }

    #[rstest]
    fn code_keyed_rows_do_not_match_static_identifiers() {
        let record = article(vec![
            TranslationRow::for_locale("language_id", "de").with("title", "Hallo"),
            TranslationRow::for_locale("language_id", "en").with("title", "Hello"),
        ]);

        let result = resolve(&record, "title", Some(&lang("en")), &static_config());

        assert_eq!(result, ResolutionResult::NotFound);
    }

    #[rstest]
    fn fallback_disabled_is_not_found() {
        let record = hallo_hello();
        let config = ResolverConfig { use_fallback: false, ..static_config() };

        let result = resolve(&record, "title", Some(&fr()), &config);

        assert_eq!(result, ResolutionResult::NotFound);
    }

    #[rstest]
    fn non_fallback_attribute_is_not_found_even_with_fallback_row() {
        let record = article(vec![row("de", "Hallo").with("body", "Text")]);

        let result = resolve(&record, "body", Some(&fr()), &static_config());

        assert_eq!(result, ResolutionResult::NotFound);
    }

    #[rstest]
    fn native_mode_returns_record_value() {
        let record = hallo_hello().with_attribute("title", "Native");
        let config = ResolverConfig { native_mode: true, ..static_config() };

        let result = resolve(&record, "title", Some(&fr()), &config);

        assert_eq!(result, ResolutionResult::PassThrough(Some(&json!("Native"))));
    }

    #[rstest]
    fn native_mode_without_record_value() {
        let record = hallo_hello();
        let config = ResolverConfig { native_mode: true, ..static_config() };

        let result = resolve(&record, "title", Some(&fr()), &config);

        assert_eq!(result, ResolutionResult::PassThrough(None));
    }

    #[rstest]
    fn native_mode_still_prefers_existing_row() {
        let record = hallo_hello().with_attribute("title", "Native");
        let config = ResolverConfig { native_mode: true, ..static_config() };

        let result = resolve(&record, "title", Some(&de()), &config);

        assert_eq!(result, ResolutionResult::Resolved(&json!("Hallo")));
    }

    #[rstest]
    fn untranslated_attribute_passes_through() {
        let record = hallo_hello().with_attribute("slug", "hello-world");

        let result = resolve(&record, "slug", Some(&de()), &static_config());

        assert_eq!(result, ResolutionResult::PassThrough(Some(&json!("hello-world"))));
        assert_eq!(
            resolve(&record, "missing", Some(&de()), &static_config()),
            ResolutionResult::PassThrough(None)
        );
    }

    #[rstest]
    fn row_without_column_resolves_to_null() {
        let record = article(vec![row("de", "Hallo")]);

        let result = resolve(&record, "body", Some(&de()), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&Value::Null));
    }

    #[rstest]
    fn unresolved_current_locale_uses_fallback_chain() {
        let record = hallo_hello();

        assert_eq!(
            resolve(&record, "title", None, &static_config()),
            ResolutionResult::Resolved(&json!("Hallo"))
        );
        assert_eq!(resolve(&record, "body", None, &static_config()), ResolutionResult::NotFound);
    }

    #[rstest]
    fn fallback_key_follows_storage_mode() {
        let record = article(vec![
            TranslationRow::for_locale("language_id", 1).with("title", "Hallo"),
            TranslationRow::for_locale("language_id", 2).with("title", "Hello"),
        ]);
        let config = ResolverConfig::default();

        assert_eq!(
            resolve(&record, "title", Some(&LocaleKey::Id(3)), &config),
            ResolutionResult::Resolved(&json!("Hallo"))
        );
        assert_eq!(
            resolve(&record, "title:2", Some(&LocaleKey::Id(3)), &config),
            ResolutionResult::Resolved(&json!("Hello"))
        );
    }

    #[rstest]
    fn missing_fallback_key_is_not_found() {
        let record = hallo_hello();
        let config = ResolverConfig { fallback: None, ..static_config() };

        assert_eq!(resolve(&record, "title", Some(&fr()), &config), ResolutionResult::NotFound);
    }

    #[rstest]
    fn duplicate_rows_first_wins() {
        let record = article(vec![row("de", "Erste"), row("de", "Zweite")]);

        let result = resolve(&record, "title", Some(&de()), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Erste")));
    }

    #[rstest]
    fn repeated_resolution_is_identical() {
        let record = hallo_hello();
        let config = static_config();

        let first = resolve(&record, "title", Some(&fr()), &config);
        let second = resolve(&record, "title", Some(&fr()), &config);

        assert_eq!(first, second);
    }

    #[rstest]
    fn resolve_in_uses_supplied_rows() {
        let record = hallo_hello();
        let rows = vec![row("fr", "Bonjour")];

        let result = resolve_in(&record, &rows, "title", Some(&fr()), &static_config());

        assert_eq!(result, ResolutionResult::Resolved(&json!("Bonjour")));
    }

    #[rstest]
    fn translation_returns_current_row_without_fallback() {
        let record = hallo_hello();
        let config = static_config();

        let row = translation(&record, Some(&lang("en")), &config).unwrap();
        assert_eq!(row.get("title"), Some(&json!("Hello")));

        assert_that!(translation(&record, Some(&fr()), &config), none());
        assert_that!(translation(&record, None, &config), none());
    }

    #[rstest]
    fn result_value_view() {
        let hello = json!("Hello");

        assert_eq!(ResolutionResult::Resolved(&hello).value(), Some(&hello));
        assert_eq!(ResolutionResult::PassThrough(Some(&hello)).value(), Some(&hello));
        assert_eq!(ResolutionResult::PassThrough(None).value(), None);
        assert_eq!(ResolutionResult::NotFound.value(), None);
        assert_that!(ResolutionResult::NotFound.is_found(), eq(false));
        assert_that!(ResolutionResult::PassThrough(None).is_found(), eq(true));
    }

    #[rstest]
    fn translator_reads_locale_from_provider() {
        let record = hallo_hello();
        let config = static_config();
        let locale = lang("en");
        let translator = Translator::new(&config, &locale);

        assert_eq!(translator.get(&record, "title"), ResolutionResult::Resolved(&json!("Hello")));
        assert_eq!(
            translator.get(&record, "title:de"),
            ResolutionResult::Resolved(&json!("Hallo"))
        );
        assert_that!(translator.translation(&record).is_some(), eq(true));
    }
}
