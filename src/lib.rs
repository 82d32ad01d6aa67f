//! translatable-db
//!
//! レコードの翻訳属性を翻訳テーブルから解決するライブラリ。
//! ロケールが見つからない場合のフォールバック（フォールバック行・ネイティブ値）を設定で切り替える。

pub mod config;
pub mod locale;
pub mod model;
pub mod request;
pub mod resolver;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use resolver::{
    ResolutionResult,
    Translator,
    resolve,
};
