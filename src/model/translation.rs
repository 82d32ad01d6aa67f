//! One locale's values for a record.

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::types::LocaleKey;

/// レコードの 1 ロケール分の値
///
/// 行は平坦な属性マップで、翻訳属性に加えてロケールフィールド（`locale_key` が指す列）と
/// 親レコードへのキー列を持つ。
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TranslationRow {
    /// 列名 -> 値
    attributes: Map<String, Value>,
}

impl TranslationRow {
    #[must_use]
    pub const fn new(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// 指定ロケールの行を作り始める
    #[must_use]
    pub fn for_locale(locale_field: &str, locale: impl Into<LocaleKey>) -> Self {
        Self::default().with(locale_field, locale.into().to_value())
    }

    #[must_use]
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(attribute.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    #[must_use]
    pub const fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// `locale_field` に格納されたロケールキー
    #[must_use]
    pub fn locale(&self, locale_field: &str) -> Option<LocaleKey> {
        self.get(locale_field).and_then(LocaleKey::from_value)
    }

    /// `locale_field` の値が `locale` と等しいか
    #[must_use]
    pub fn has_locale(&self, locale_field: &str, locale: &LocaleKey) -> bool {
        self.get(locale_field).is_some_and(|value| locale.matches_value(value))
    }
}

impl From<Map<String, Value>> for TranslationRow {
    fn from(attributes: Map<String, Value>) -> Self {
        Self::new(attributes)
    }
}
