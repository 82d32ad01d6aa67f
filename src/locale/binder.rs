//! Request-boundary locale binding.

use std::cell::OnceCell;

use serde_json::{
    Map,
    Value,
};

use super::{
    LocaleResolution,
    LocaleResolutionPolicy,
};
use crate::config::TranslatableSettings;
use crate::types::LocaleKey;

/// 現在のリクエストのロケールキーを提供する
pub trait LocaleProvider {
    /// ロケールが解決できなかった場合は `None`
    fn current_locale(&self) -> Option<LocaleKey>;
}

impl LocaleProvider for LocaleKey {
    fn current_locale(&self) -> Option<LocaleKey> {
        Some(self.clone())
    }
}

impl LocaleProvider for Option<LocaleKey> {
    fn current_locale(&self) -> Option<LocaleKey> {
        self.clone()
    }
}

/// リクエスト単位のプロバイダー。ポリシーの実行は高々 1 回
#[derive(Debug)]
pub struct RequestLocale<'p> {
    /// デプロイ共通のポリシー
    policy: &'p LocaleResolutionPolicy,
    /// リクエストの生ロケール（`"en"` など）
    raw_locale: String,
    /// ポリシーの結果（初回参照時に確定）
    resolved: OnceCell<LocaleResolution>,
}

impl<'p> RequestLocale<'p> {
    /// 生ロケールからプロバイダーを作成
    #[must_use]
    pub fn new(policy: &'p LocaleResolutionPolicy, raw_locale: impl Into<String>) -> Self {
        Self { policy, raw_locale: raw_locale.into(), resolved: OnceCell::new() }
    }

    /// リクエストの生ロケール
    #[must_use]
    pub fn raw_locale(&self) -> &str {
        &self.raw_locale
    }

    /// ポリシーの結果
    pub fn resolution(&self) -> &LocaleResolution {
        self.resolved.get_or_init(|| self.policy.resolve(&self.raw_locale))
    }
}

impl LocaleProvider for RequestLocale<'_> {
    fn current_locale(&self) -> Option<LocaleKey> {
        self.resolution().key().cloned()
    }
}

/// 1 リクエストに付随する属性
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// 属性名 -> 値
    attributes: Map<String, Value>,
    /// ロケールを格納した属性名
    locale_attribute: Option<String>,
}

impl RequestContext {
    /// 空のコンテキスト
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 属性を取得
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// 属性を設定
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }
}

impl LocaleProvider for RequestContext {
    fn current_locale(&self) -> Option<LocaleKey> {
        self.locale_attribute
            .as_deref()
            .and_then(|name| self.attribute(name))
            .and_then(LocaleKey::from_value)
    }
}

/// リクエストのロケールを解決し、そのキーをコンテキストに付与する
#[derive(Debug)]
pub struct LocaleBinder {
    /// ロケール解決ポリシー
    policy: LocaleResolutionPolicy,
    /// 付与先の属性名（`locale_key`）
    locale_key: String,
    /// 全リクエストで実行する
    middleware_default: bool,
}

impl LocaleBinder {
    /// ポリシーと設定から作成
    #[must_use]
    pub fn new(policy: LocaleResolutionPolicy, settings: &TranslatableSettings) -> Self {
        Self {
            policy,
            locale_key: settings.locale_key.clone(),
            middleware_default: settings.middleware_default,
        }
    }

    /// ロケール解決ポリシー
    #[must_use]
    pub const fn policy(&self) -> &LocaleResolutionPolicy {
        &self.policy
    }

    /// ルートで付与を行うか。既定でない場合はルート側で明示的に有効にする
    #[must_use]
    pub const fn applies_to(&self, route_opted_in: bool) -> bool {
        self.middleware_default || route_opted_in
    }

    /// 解決したキーを `locale_key` に付与する。`NotFound` の場合は何もしない
    pub fn bind(&self, context: &mut RequestContext, raw_locale: &str) -> LocaleResolution {
        let resolution = self.policy.resolve(raw_locale);

        if let Some(key) = resolution.key() {
            tracing::debug!("Binding {} = {} to request", self.locale_key, key);
            context.insert(self.locale_key.clone(), key.to_value());
        } else {
            tracing::debug!("No language for locale '{}', nothing bound", raw_locale);
        }
        context.locale_attribute = Some(self.locale_key.clone());

        resolution
    }
}
