//! Configuration types and settings.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::types::LocaleKey;

/// 設定項目 1 つ分の検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// フィールドのパス（例: "language_array.fr.language_id"）
    pub field_path: String,
    /// 修正方法を含むメッセージ
    pub message: String,
}

impl ValidationError {
    /// 新しい検証エラーを作成
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// 設定の読み込み・検証で発生するエラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 検証エラー（すべての項目をまとめて報告）
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// 設定ファイルの読み込みエラー
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// 設定ファイルのパースエラー
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// 検証エラーを番号付きの行に整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `use_db` が無効なときの静的言語表のエントリ
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageEntry {
    /// 表示名
    #[serde(default)]
    pub name: String,

    /// 識別子などその他のフィールド（通常は `language_id` のみ）
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl LanguageEntry {
    /// `locale_key` に識別子 `id` を持つエントリを作成
    #[must_use]
    pub fn new(name: impl Into<String>, locale_key: impl Into<String>, id: LocaleKey) -> Self {
        let mut fields = Map::new();
        fields.insert(locale_key.into(), id.to_value());
        Self { name: name.into(), fields }
    }

    /// `locale_key` フィールドの識別子。文字列・数値以外は識別子とみなさない
    #[must_use]
    pub fn identifier(&self, locale_key: &str) -> Option<LocaleKey> {
        self.fields.get(locale_key).and_then(LocaleKey::from_value)
    }
}

/// `.translatabledb.json` の設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatableSettings {
    /// 言語を言語テーブル（数値 ID）で管理する。無効なら `language_array` を使う
    pub use_db: bool,

    /// `use_db` が有効なときに参照する言語ストアの名前
    pub language_model: String,

    /// `use_db` が無効なときのロケールコード -> 言語エントリ
    pub language_array: BTreeMap<String, LanguageEntry>,

    /// 翻訳がないときフォールバックするか
    pub use_fallback: bool,

    /// `use_db` が無効なときのフォールバックロケール。`null` で無効
    ///
    /// `language_array` のエントリを指し、行の照合にはその識別子を使う。
    pub fallback_locale: Option<String>,

    /// `use_db` が有効なときのフォールバック言語 ID。`null` で無効
    pub fallback_locale_id: Option<LocaleKey>,

    /// フォールバック値を翻訳行ではなくレコード自身から取る
    pub native_mode: bool,

    /// 翻訳行のロケールフィールド名。リクエストに付与する属性名でもある
    pub locale_key: String,

    /// 言語テーブルのロケールコード列
    pub locale_column: String,

    /// 一括シリアライズ時、未読み込みの翻訳行も取得する
    pub to_array_always_loads_translations: bool,

    /// ロケールの付与を全リクエストで行う。無効ならオプトインしたルートのみ
    pub middleware_default: bool,

    /// 全レコード型の翻訳行を型と ID で区別する 1 テーブルに置く
    pub polymorphic: bool,
}

impl TranslatableSettings {
    /// 設定を検証する
    ///
    /// # Errors
    /// - 必須項目が空
    /// - フォールバックが有効なのに現在のモードのフォールバック先がない
    /// - 静的言語表のエントリに `locale_key` の識別子がない
    /// - `fallback_locale` が静的言語表にない
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.locale_key.is_empty() {
            errors.push(ValidationError::new(
                "locale_key",
                "The locale key cannot be empty. Example: \"language_id\"",
            ));
        }

        if self.locale_column.is_empty() {
            errors.push(ValidationError::new(
                "locale_column",
                "The locale column cannot be empty. Example: \"locale\"",
            ));
        }

        if let Some(locale) = &self.fallback_locale
            && locale.is_empty()
        {
            errors.push(ValidationError::new(
                "fallback_locale",
                "The fallback locale cannot be empty. Set it to null to disable it",
            ));
        }

        if self.use_db {
            if self.language_model.is_empty() {
                errors.push(ValidationError::new(
                    "language_model",
                    "A language model is required when use_db is enabled",
                ));
            }

            if self.use_fallback && self.fallback_locale_id.is_none() {
                errors.push(ValidationError::new(
                    "fallback_locale_id",
                    "A fallback language id is required when use_fallback is enabled",
                ));
            }
        } else {
            self.validate_language_array(&mut errors);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// 静的言語表まわりの検証
    fn validate_language_array(&self, errors: &mut Vec<ValidationError>) {
        if self.language_array.is_empty() {
            errors.push(ValidationError::new(
                "language_array",
                "At least one language is required when use_db is disabled. Example: {\"en\": {\"name\": \"English\", \"language_id\": 1}}",
            ));
            return;
        }

        for (locale, entry) in &self.language_array {
            if !self.locale_key.is_empty() && entry.identifier(&self.locale_key).is_none() {
                errors.push(ValidationError::new(
                    format!("language_array.{locale}.{}", self.locale_key),
                    format!("Language '{locale}' has no '{}' identifier", self.locale_key),
                ));
            }
        }

        match self.fallback_locale.as_deref() {
            Some(locale) if !locale.is_empty() && !self.language_array.contains_key(locale) => {
                errors.push(ValidationError::new(
                    "fallback_locale",
                    format!("Fallback locale '{locale}' is not defined in language_array"),
                ));
            }
            None if self.use_fallback => {
                errors.push(ValidationError::new(
                    "fallback_locale",
                    "A fallback locale is required when use_fallback is enabled",
                ));
            }
            _ => {}
        }
    }

    /// 静的言語表でロケールコードに対応する行キー
    #[must_use]
    pub fn static_locale_key(&self, locale: &str) -> Option<LocaleKey> {
        self.language_array.get(locale).and_then(|entry| entry.identifier(&self.locale_key))
    }

    /// 静的言語表のロケールコード -> 行キー
    #[must_use]
    pub fn locale_codes(&self) -> BTreeMap<String, LocaleKey> {
        self.language_array
            .iter()
            .filter_map(|(locale, entry)| {
                entry.identifier(&self.locale_key).map(|key| (locale.clone(), key))
            })
            .collect()
    }

    /// 現在のモードでのフォールバック先の行キー
    ///
    /// 静的モードでは `fallback_locale` を言語表の識別子に変換するため、
    /// 要求ロケールと同じキー空間になる。
    #[must_use]
    pub fn fallback_key(&self) -> Option<LocaleKey> {
        if self.use_db {
            self.fallback_locale_id.clone()
        } else {
            self.fallback_locale.as_deref().and_then(|locale| self.static_locale_key(locale))
        }
    }

    /// 解決処理が読む設定のスナップショット
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            use_fallback: self.use_fallback,
            native_mode: self.native_mode,
            fallback: self.fallback_key(),
            locale_codes: if self.use_db { BTreeMap::new() } else { self.locale_codes() },
            locale_key: self.locale_key.clone(),
            to_array_always_loads_translations: self.to_array_always_loads_translations,
            polymorphic: self.polymorphic,
        }
    }
}

impl Default for TranslatableSettings {
    fn default() -> Self {
        Self {
            use_db: true,
            language_model: "App\\Language".to_string(),
            language_array: BTreeMap::from([
                ("de".to_string(), LanguageEntry::new("Deutsch", "language_id", LocaleKey::Id(1))),
                ("en".to_string(), LanguageEntry::new("English", "language_id", LocaleKey::Id(2))),
                (
                    "fr".to_string(),
                    LanguageEntry::new("Français", "language_id", LocaleKey::Id(3)),
                ),
            ]),
            use_fallback: true,
            fallback_locale: Some("de".to_string()),
            fallback_locale_id: Some(LocaleKey::Id(1)),
            native_mode: false,
            locale_key: "language_id".to_string(),
            locale_column: "locale".to_string(),
            to_array_always_loads_translations: true,
            middleware_default: true,
            polymorphic: false,
        }
    }
}

/// 1 回の解決に渡す不変の設定スナップショット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// 翻訳がないときフォールバックするか
    pub use_fallback: bool,
    /// フォールバック値をレコード自身から取る
    pub native_mode: bool,
    /// フォールバック先の行キー（要求ロケールと同じキー空間）
    pub fallback: Option<LocaleKey>,
    /// 静的モードのロケールコード -> 行キー。`attribute:locale` の変換に使う
    pub locale_codes: BTreeMap<String, LocaleKey>,
    /// 翻訳行のロケールフィールド名
    pub locale_key: String,
    /// 一括シリアライズ時、未読み込みの翻訳行も取得する
    pub to_array_always_loads_translations: bool,
    /// ポリモーフィックな翻訳テーブル
    pub polymorphic: bool,
}

impl ResolverConfig {
    /// フォールバック先の行キー
    #[must_use]
    pub const fn fallback_key(&self) -> Option<&LocaleKey> {
        self.fallback.as_ref()
    }

    /// `attribute:locale` で明示されたロケールの行キー
    ///
    /// 静的言語表にあるコードは識別子に変換し、それ以外はそのまま照合する。
    #[must_use]
    pub fn explicit_locale(&self, locale: &str) -> LocaleKey {
        self.locale_codes.get(locale).cloned().unwrap_or_else(|| LocaleKey::from(locale))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        TranslatableSettings::default().resolver_config()
    }
}
