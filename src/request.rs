//! Batch resolution request handled by the command-line host.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

use crate::Translator;
use crate::config::{
    ConfigError,
    ConfigManager,
};
use crate::locale::{
    LanguageLookup,
    LanguageTable,
    RequestLocale,
};
use crate::model::{
    Record,
    Translatable,
    TranslatableSchema,
    TranslationRow,
};
use crate::store::{
    InMemoryTranslationStore,
    load_translations,
};

/// 解決リクエスト
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveRequest {
    /// リクエストの生ロケール（例: "en"）
    pub locale: String,

    /// 言語テーブルの行。`use_db` が有効なときに使う
    #[serde(default)]
    pub languages: Vec<Map<String, Value>>,

    /// 翻訳テーブル名 -> 行。翻訳行を持たないレコードに使う
    #[serde(default)]
    pub translation_tables: HashMap<String, Vec<TranslationRow>>,

    /// 解決対象のレコード
    pub records: Vec<RecordDocument>,

    /// 全レコードで解決する属性キー（`title`, `title:en`）
    pub attributes: Vec<String>,
}

/// リクエスト中の 1 レコード
#[derive(Debug, Clone, Deserialize)]
pub struct RecordDocument {
    /// 属性の宣言
    pub schema: TranslatableSchema,

    /// レコード自身の属性値
    #[serde(default)]
    pub attributes: Map<String, Value>,

    /// 読み込み済みの翻訳行。ない場合は `translation_tables` から取得する
    pub translations: Option<Vec<TranslationRow>>,
}

impl RecordDocument {
    /// レコードを作成する。翻訳行があれば読み込み済みにする
    #[must_use]
    pub fn into_record(self) -> Record {
        let record = Record::new(Arc::new(self.schema)).with_attributes(self.attributes);
        match self.translations {
            Some(rows) => record.with_translations(rows),
            None => record,
        }
    }
}

/// 1 レコード分の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordOutput {
    /// 要求された属性キー -> 値（見つからなければ null）
    pub values: Map<String, Value>,

    /// 一括シリアライズの結果
    pub array: Map<String, Value>,
}

/// リクエストのレコードを解決する
///
/// `array` はレコードを変更する前に作るので、翻訳行の自動取得は
/// `to_array_always_loads_translations` に従う。属性キーの解決では、
/// 翻訳行を持たないレコードに `translation_tables` から行を読み込む。
///
/// # Errors
/// - 設定の `language_model` で言語ストアを構成できない
pub fn handle(
    request: ResolveRequest,
    config: &ConfigManager,
) -> Result<Vec<RecordOutput>, ConfigError> {
    tracing::debug!(
        "Resolving {} attributes on {} records for locale '{}'",
        request.attributes.len(),
        request.records.len(),
        request.locale
    );

    let languages: Arc<dyn LanguageLookup + Send + Sync> = Arc::new(
        request
            .languages
            .into_iter()
            .fold(
                LanguageTable::new(config.settings().language_model.as_str()),
                LanguageTable::with_row,
            ),
    );
    let policy = config.locale_policy(Some(languages))?;
    let locale = RequestLocale::new(&policy, request.locale);
    let translator = Translator::new(config.resolver_config(), &locale);

    let store = request
        .translation_tables
        .into_iter()
        .fold(InMemoryTranslationStore::new(), |store, (table, rows)| {
            store.with_table(table, rows)
        });

    let outputs = request
        .records
        .into_iter()
        .map(|document| {
            let mut record = document.into_record();
            let array = translator.to_attribute_map(&record, Some(&store));

            if !record.translations_loaded() {
                load_translations(&mut record, &store, config.resolver_config());
            }
            let values = request
                .attributes
                .iter()
                .map(|key| {
                    let value = translator.get(&record, key).value().cloned();
                    (key.clone(), value.unwrap_or(Value::Null))
                })
                .collect();

            RecordOutput { values, array }
        })
        .collect();

    Ok(outputs)
}
