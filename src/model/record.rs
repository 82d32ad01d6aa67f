//! Capability trait and the data-driven record.

use std::sync::Arc;

use serde_json::{
    Map,
    Value,
};

use super::{
    TranslatableSchema,
    TranslationRow,
};

/// 翻訳属性を持つレコード型が実装するトレイト
///
/// 解決処理はこのトレイト経由で読むだけで、レコードを変更しない。
pub trait Translatable {
    /// 翻訳・フォールバック・非表示属性の宣言
    fn schema(&self) -> &TranslatableSchema;

    /// レコード自身に格納された値
    fn attributes(&self) -> &Map<String, Value>;

    /// 翻訳行。存在しない・未読み込みのときは空
    fn translations(&self) -> &[TranslationRow];

    /// レコード自身の属性値
    fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes().get(name)
    }

    /// 翻訳行が読み込み済みか
    fn translations_loaded(&self) -> bool {
        true
    }

    /// 主キー列の値
    fn key(&self) -> Option<&Value> {
        self.attribute(&self.schema().primary_key)
    }
}

/// データ駆動のレコード。共有スキーマ・自身の属性・読み込み済みなら翻訳行を持つ
#[derive(Debug, Clone)]
pub struct Record {
    /// 同じ型のレコード間で共有するスキーマ
    schema: Arc<TranslatableSchema>,
    /// レコード自身の属性
    attributes: Map<String, Value>,
    /// 読み込むまでは `None`
    translations: Option<Vec<TranslationRow>>,
}

impl Record {
    #[must_use]
    pub fn new(schema: Arc<TranslatableSchema>) -> Self {
        Self { schema, attributes: Map::new(), translations: None }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    #[must_use]
    pub fn with_translations(mut self, translations: Vec<TranslationRow>) -> Self {
        self.translations = Some(translations);
        self
    }

    pub fn set_translations(&mut self, translations: Vec<TranslationRow>) {
        self.translations = Some(translations);
    }

    /// 読み込み済みの翻訳行を破棄する
    pub fn unload_translations(&mut self) {
        self.translations = None;
    }
}

impl Translatable for Record {
    fn schema(&self) -> &TranslatableSchema {
        &self.schema
    }

    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    fn translations(&self) -> &[TranslationRow] {
        self.translations.as_deref().unwrap_or_default()
    }

    fn translations_loaded(&self) -> bool {
        self.translations.is_some()
    }
}
