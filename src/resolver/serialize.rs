use serde_json::{
    Map,
    Value,
};

use super::{
    ResolutionResult,
    resolve_in,
};
use crate::config::ResolverConfig;
use crate::model::Translatable;
use crate::store::{
    TranslationStore,
    fetch_translations,
};
use crate::types::LocaleKey;

/// 翻訳値を適用した、レコードの公開属性を返す
///
/// 非公開属性は含めない。翻訳属性は行の値に解決できた場合だけ置き換える。
/// 翻訳行が未読み込みの場合、`to_array_always_loads_translations` が有効なら
/// `store` から取得し、無効ならレコード自身の属性をそのまま返す。
/// レコードは変更しない。
#[must_use]
pub fn to_attribute_map<R, S>(
    record: &R,
    store: Option<&S>,
    current_locale: Option<&LocaleKey>,
    config: &ResolverConfig,
) -> Map<String, Value>
where
    R: Translatable + ?Sized,
    S: TranslationStore + ?Sized,
{
    let schema = record.schema();
    let mut attributes: Map<String, Value> = record
        .attributes()
        .iter()
        .filter(|(name, _)| !schema.is_hidden(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let fetched;
    let rows = if record.translations_loaded() {
        record.translations()
    } else if config.to_array_always_loads_translations {
        fetched = store
            .map(|store| fetch_translations(store, record, config.polymorphic))
            .unwrap_or_default();
        tracing::debug!("Fetched {} translation rows for serialization", fetched.len());
        fetched.as_slice()
    } else {
        tracing::debug!("Translations not loaded, serializing native attributes only");
        return attributes;
    };

    for attribute in schema.translated_attributes.iter().filter(|name| !schema.is_hidden(name)) {
        if let ResolutionResult::Resolved(value) =
            resolve_in(record, rows, attribute, current_locale, config)
        {
            attributes.insert(attribute.clone(), value.clone());
        }
    }

    attributes
}
