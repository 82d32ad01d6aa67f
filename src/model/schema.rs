//! Per-record-type declaration of translated attributes.

use serde::{
    Deserialize,
    Serialize,
};

/// レコード型が指定しない場合の主キー列
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// レコード型のどの属性が翻訳対象かを宣言する
///
/// コンパイル済みのレコード型は `static` に 1 つ持って参照を返し、
/// データ駆動のレコードは JSON からデシリアライズする。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatableSchema {
    /// レコード型名（例: `"Article"`, `"App\\Models\\Article"`）
    pub type_name: String,

    /// 主キー列
    pub primary_key: String,

    /// 値を翻訳行から取る属性
    pub translated_attributes: Vec<String>,

    /// 要求ロケールの行がないときフォールバックしてよい翻訳属性
    pub fallback_attributes: Vec<String>,

    /// 一括シリアライズから除外する属性
    pub hidden_attributes: Vec<String>,

    /// この型の翻訳行に限り設定の `locale_key` を上書きする
    pub locale_key: Option<String>,

    /// 翻訳テーブル名の上書き（既定は `<TypeName>Translation`）
    pub translation_model: Option<String>,

    /// 翻訳テーブルの外部キー列の上書き
    pub translation_foreign_key: Option<String>,
}

impl Default for TranslatableSchema {
    fn default() -> Self {
        Self {
            type_name: String::new(),
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            translated_attributes: Vec::new(),
            fallback_attributes: Vec::new(),
            hidden_attributes: Vec::new(),
            locale_key: None,
            translation_model: None,
            translation_foreign_key: None,
        }
    }
}

impl TranslatableSchema {
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), ..Self::default() }
    }

    #[must_use]
    pub fn translated<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translated_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn fallback<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn hidden<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden_attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }

    #[must_use]
    pub fn with_locale_key(mut self, locale_key: impl Into<String>) -> Self {
        self.locale_key = Some(locale_key.into());
        self
    }

    #[must_use]
    pub fn with_translation_model(mut self, table: impl Into<String>) -> Self {
        self.translation_model = Some(table.into());
        self
    }

    #[must_use]
    pub fn with_translation_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.translation_foreign_key = Some(foreign_key.into());
        self
    }

    /// 翻訳対象の属性か
    #[must_use]
    pub fn is_translated_attribute(&self, attribute: &str) -> bool {
        self.translated_attributes.iter().any(|name| name == attribute)
    }

    #[must_use]
    pub fn is_fallback_attribute(&self, attribute: &str) -> bool {
        self.fallback_attributes.iter().any(|name| name == attribute)
    }

    #[must_use]
    pub fn is_hidden(&self, attribute: &str) -> bool {
        self.hidden_attributes.iter().any(|name| name == attribute)
    }

    /// この型の翻訳行でロケールを持つフィールド名
    #[must_use]
    pub fn locale_field<'a>(&'a self, configured: &'a str) -> &'a str {
        self.locale_key.as_deref().unwrap_or(configured)
    }

    /// 名前空間を除いた型名（`App\Models\Article` -> `Article`）
    #[must_use]
    pub fn base_type_name(&self) -> &str {
        self.type_name.rsplit(['\\', ':', '.']).next().unwrap_or(&self.type_name)
    }
}
