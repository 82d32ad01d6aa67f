//! Validated settings and the deployment-wide objects built from them.

use std::path::Path;
use std::sync::Arc;

use super::{
    ConfigError,
    ResolverConfig,
    TranslatableSettings,
    loader,
};
use crate::locale::{
    LanguageLookup,
    LocaleBinder,
    LocaleResolutionPolicy,
};

/// 検証済みの設定と、そこから作った解決用スナップショットを保持する
///
/// ロケール解決方式（DB／静的）はデプロイごとに 1 度だけ決まるので、
/// ポリシーとバインダーも必ずここから作る。
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 検証済みの設定
    settings: TranslatableSettings,

    /// `settings` から作ったスナップショット
    resolver_config: ResolverConfig,
}

impl ConfigManager {
    /// 設定を検証して作成
    ///
    /// # Errors
    /// - バリデーションエラー
    pub fn from_settings(settings: TranslatableSettings) -> Result<Self, ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        Ok(Self::validated(settings))
    }

    /// ワークスペースの設定を読み込む
    ///
    /// 起動時に一度だけ呼び出し、設定ミスはここでまとめて報告する。
    ///
    /// # Arguments
    /// * `workspace_root` - ワークスペースのルートパス。`None` なら既定値
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load(workspace_root: Option<&Path>) -> Result<Self, ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let Some(root) = workspace_root else {
            return Self::from_settings(TranslatableSettings::default());
        };
        let settings = loader::load_from_workspace(root)?;
        tracing::debug!("Settings loaded successfully: {:?}", settings);

        Ok(Self::validated(settings))
    }

    /// 検証済みの設定から作成
    fn validated(settings: TranslatableSettings) -> Self {
        let resolver_config = settings.resolver_config();
        Self { settings, resolver_config }
    }

    /// 現在の設定
    #[must_use]
    pub const fn settings(&self) -> &TranslatableSettings {
        &self.settings
    }

    /// 解決処理に渡す設定スナップショット
    #[must_use]
    pub const fn resolver_config(&self) -> &ResolverConfig {
        &self.resolver_config
    }

    /// 設定が選ぶロケール解決ポリシーを作成
    ///
    /// `languages` は `use_db` が有効なときだけ参照する。
    ///
    /// # Errors
    /// - `use_db` が有効なのに言語ストアがない、または名前が `language_model` と異なる
    pub fn locale_policy(
        &self,
        languages: Option<Arc<dyn LanguageLookup + Send + Sync>>,
    ) -> Result<LocaleResolutionPolicy, ConfigError> {
        LocaleResolutionPolicy::from_settings(&self.settings, languages)
    }

    /// リクエストにロケールキーを付与するバインダーを作成
    ///
    /// # Errors
    /// - [`Self::locale_policy`] と同じ
    pub fn locale_binder(
        &self,
        languages: Option<Arc<dyn LanguageLookup + Send + Sync>>,
    ) -> Result<LocaleBinder, ConfigError> {
        Ok(LocaleBinder::new(self.locale_policy(languages)?, &self.settings))
    }
}
