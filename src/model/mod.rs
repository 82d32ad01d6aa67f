//! Translatable records and their translation rows
/// レコード型ごとの翻訳属性の宣言
mod schema;
/// 翻訳可能レコードのトレイトとデータ駆動のレコード
mod record;
/// 1 ロケール分の翻訳行
mod translation;

pub use record::{
    Record,
    Translatable,
};
pub use schema::{
    DEFAULT_PRIMARY_KEY,
    TranslatableSchema,
};
pub use translation::TranslationRow;
