//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use std::sync::Arc;

use crate::config::{
    ResolverConfig,
    TranslatableSettings,
};
use crate::model::{
    Record,
    TranslatableSchema,
    TranslationRow,
};
use crate::types::LocaleKey;

/// テスト用の記事スキーマ
///
/// `title` と `body` が翻訳対象で、`title` のみフォールバック可能
pub(crate) fn article_schema() -> Arc<TranslatableSchema> {
    Arc::new(TranslatableSchema::new("Article").translated(["title", "body"]).fallback(["title"]))
}

/// 翻訳行を読み込み済みの記事を作成する
///
/// # Arguments
/// * `rows` - 翻訳行
pub(crate) fn article(rows: Vec<TranslationRow>) -> Record {
    Record::new(article_schema()).with_translations(rows)
}

/// 既定の `language_array` でロケールコードを行キーに変換する
///
/// de = 1, en = 2, fr = 3。未定義のコードはそのままコードとして扱う
pub(crate) fn lang(code: &str) -> LocaleKey {
    TranslatableSettings::default().static_locale_key(code).unwrap_or_else(|| LocaleKey::from(code))
}

/// `language_id` にロケールの行キーを持つ翻訳行を作成する
///
/// # Arguments
/// * `locale` - ロケールコード（例: "en", "de"）。[`lang`] で変換する
/// * `title` - `title` の値
pub(crate) fn row(locale: &str, title: &str) -> TranslationRow {
    TranslationRow::for_locale("language_id", lang(locale)).with("title", title)
}

/// 静的言語テーブル（`use_db = false`）の設定スナップショット
///
/// フォールバックは "de"（行キー 1）
pub(crate) fn static_config() -> ResolverConfig {
    TranslatableSettings { use_db: false, ..TranslatableSettings::default() }.resolver_config()
}
