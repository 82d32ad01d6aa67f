//! Request locale resolution and binding
/// リクエスト境界でのロケール付与とプロバイダー
mod binder;
/// 生ロケール -> ロケールキーの変換
mod policy;

pub use binder::{
    LocaleBinder,
    LocaleProvider,
    RequestContext,
    RequestLocale,
};
pub use policy::{
    LANGUAGE_ID_COLUMN,
    LanguageLookup,
    LanguageTable,
    LocaleResolution,
    LocaleResolutionPolicy,
};
