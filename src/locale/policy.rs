//! Mapping of the raw request locale to the locale key stored on translation rows.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{
    Map,
    Value,
};

use crate::config::{
    ConfigError,
    TranslatableSettings,
    ValidationError,
};
use crate::types::LocaleKey;

/// 言語テーブルの識別子列
pub const LANGUAGE_ID_COLUMN: &str = "id";

/// `use_db` が有効なときに参照する言語ストア
pub trait LanguageLookup {
    /// 登録名。設定の `language_model` と一致する必要がある
    fn model_name(&self) -> &str;

    /// `locale_column` が `locale` と等しい最初の言語の識別子
    fn find_by_locale(&self, locale_column: &str, locale: &str) -> Option<LocaleKey>;
}

/// メモリ上の言語テーブル
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    /// 登録名
    model_name: String,
    /// 言語の行（`id` とロケールコード列を持つ）
    rows: Vec<Map<String, Value>>,
}

impl LanguageTable {
    /// 空のテーブルを作成
    #[must_use]
    pub fn new(model_name: impl Into<String>) -> Self {
        Self { model_name: model_name.into(), rows: Vec::new() }
    }

    /// 行を追加する
    #[must_use]
    pub fn with_row(mut self, row: Map<String, Value>) -> Self {
        self.rows.push(row);
        self
    }

    /// `{id, <locale_column>}` の行を追加する
    #[must_use]
    pub fn with_language(self, locale_column: &str, locale: &str, id: i64) -> Self {
        let mut row = Map::new();
        row.insert(LANGUAGE_ID_COLUMN.to_string(), Value::from(id));
        row.insert(locale_column.to_string(), Value::from(locale));
        self.with_row(row)
    }
}

impl LanguageLookup for LanguageTable {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn find_by_locale(&self, locale_column: &str, locale: &str) -> Option<LocaleKey> {
        let wanted = LocaleKey::from(locale);
        self.rows
            .iter()
            .find(|row| row.get(locale_column).is_some_and(|value| wanted.matches_value(value)))
            .and_then(|row| row.get(LANGUAGE_ID_COLUMN))
            .and_then(LocaleKey::from_value)
    }
}

/// ロケールの解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleResolution {
    /// 既知のロケール。そのキー
    Matched(LocaleKey),
    /// 未知のロケール。代わりに設定のフォールバックキーを使う
    Fallback(LocaleKey),
    /// 未知のロケールで、フォールバックもない
    NotFound,
}

impl LocaleResolution {
    /// 解決されたキー
    #[must_use]
    pub const fn key(&self) -> Option<&LocaleKey> {
        match self {
            Self::Matched(key) | Self::Fallback(key) => Some(key),
            Self::NotFound => None,
        }
    }

    /// 解決されたキー（所有権を移す）
    #[must_use]
    pub fn into_key(self) -> Option<LocaleKey> {
        match self {
            Self::Matched(key) | Self::Fallback(key) => Some(key),
            Self::NotFound => None,
        }
    }
}

/// 検索方式。デプロイごとに固定
enum LookupMode {
    /// 言語テーブル（数値 ID）
    Database {
        /// 言語ストア
        languages: Arc<dyn LanguageLookup + Send + Sync>,
        /// 言語ストアのロケールコード列
        locale_column: String,
        /// フォールバック ID（フォールバック有効時のみ）
        fallback: Option<LocaleKey>,
    },
    /// 設定の `language_array`
    Static {
        /// ロケールコード -> 行キー
        codes: BTreeMap<String, LocaleKey>,
        /// 未知のロケールに返す行キー
        fallback: Option<LocaleKey>,
    },
}

impl fmt::Debug for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database { languages, locale_column, fallback } => f
                .debug_struct("Database")
                .field("language_model", &languages.model_name())
                .field("locale_column", locale_column)
                .field("fallback", fallback)
                .finish(),
            Self::Static { codes, fallback } => f
                .debug_struct("Static")
                .field("codes", codes)
                .field("fallback", fallback)
                .finish(),
        }
    }
}

/// 生のロケール（`"en"`）を翻訳行のキー（`2` など）に変換する
///
/// どちらのモードでも、要求ロケールとフォールバックは同じキー空間に解決される。
#[derive(Debug)]
pub struct LocaleResolutionPolicy {
    /// 選択された検索方式
    mode: LookupMode,
}

impl LocaleResolutionPolicy {
    /// 設定が選ぶポリシーを作成
    ///
    /// `languages` は `use_db` が有効なときだけ参照し、その名前は `language_model` と
    /// 一致する必要がある。
    ///
    /// # Errors
    /// - `use_db` が有効なのに言語ストアがない
    /// - 言語ストアの名前が設定と異なる
    pub fn from_settings(
        settings: &TranslatableSettings,
        languages: Option<Arc<dyn LanguageLookup + Send + Sync>>,
    ) -> Result<Self, ConfigError> {
        let mode = if settings.use_db {
            let Some(languages) = languages else {
                return Err(ConfigError::ValidationErrors(vec![ValidationError::new(
                    "language_model",
                    format!("No language store is bound for '{}'", settings.language_model),
                )]));
            };
            if languages.model_name() != settings.language_model {
                return Err(ConfigError::ValidationErrors(vec![ValidationError::new(
                    "language_model",
                    format!(
                        "Language store '{}' does not match the configured model '{}'",
                        languages.model_name(),
                        settings.language_model
                    ),
                )]));
            }
            LookupMode::Database {
                languages,
                locale_column: settings.locale_column.clone(),
                fallback: settings.use_fallback.then(|| settings.fallback_key()).flatten(),
            }
        } else {
            // 静的モードは use_fallback に関係なく fallback_locale を返す
            LookupMode::Static { codes: settings.locale_codes(), fallback: settings.fallback_key() }
        };

        tracing::debug!("Locale resolution policy: {:?}", mode);
        Ok(Self { mode })
    }

    /// 生のロケールをキーに変換する。見つからなければフォールバックを適用
    #[must_use]
    pub fn resolve(&self, raw_locale: &str) -> LocaleResolution {
        let (matched, fallback) = match &self.mode {
            LookupMode::Database { languages, locale_column, fallback } => {
                (languages.find_by_locale(locale_column, raw_locale), fallback)
            }
            LookupMode::Static { codes, fallback } => (codes.get(raw_locale).cloned(), fallback),
        };
        let resolution = match matched {
            Some(key) => LocaleResolution::Matched(key),
            None => {
                fallback.clone().map_or(LocaleResolution::NotFound, LocaleResolution::Fallback)
            }
        };

        tracing::debug!("Resolved locale '{}' to {:?}", raw_locale, resolution);
        resolution
    }
}
