//! Settings file loading.

use std::io::ErrorKind;
use std::path::Path;

use super::{
    ConfigError,
    TranslatableSettings,
};

/// ワークスペースルートに置く設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".translatabledb.json";

/// ワークスペースの設定を読み込んで検証する
///
/// 設定ファイルがなければ既定値を使う。返す設定は常に検証済み。
///
/// # Errors
/// - 設定ファイルの読み込みエラー（ファイルが存在しない場合を除く）
/// - JSON パースエラー
/// - バリデーションエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<TranslatableSettings, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    let settings = match std::fs::read_to_string(&config_path) {
        Ok(content) => {
            tracing::debug!(path = %config_path.display(), "Loading configuration");
            serde_json::from_str(&content)?
        }
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(
                path = %config_path.display(),
                "Configuration file not found, using defaults"
            );
            TranslatableSettings::default()
        }
        Err(error) => return Err(error.into()),
    };

    settings.validate().map_err(ConfigError::ValidationErrors)?;
    Ok(settings)
}
