//! Entry point: resolves translated attributes for records read from stdin.
//!
//! Usage: `translatable-db [workspace_root]`. Settings come from
//! `<workspace_root>/.translatabledb.json`; the request is a JSON document on stdin.

use std::io::{
    self,
    Read,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use translatable_db::config::{
    ConfigError,
    ConfigManager,
};
use translatable_db::request::{
    self,
    ResolveRequest,
};

/// コマンドラインで報告するエラー
#[derive(Error, Debug)]
enum CliError {
    /// 設定の読み込み・検証エラー
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// 標準入出力のエラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// リクエスト・レスポンスの (デ)シリアライズエラー
    #[error("Invalid request: {0}")]
    Request(#[from] serde_json::Error),
}

/// ログを初期化して実行し、失敗したら終了コード 1 を返す
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// 設定を読み込み、標準入力のリクエストを解決して標準出力に書く
fn run() -> Result<(), CliError> {
    let workspace_root =
        std::env::args_os().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);
    let config_manager = ConfigManager::load(Some(&workspace_root))?;

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let resolve_request: ResolveRequest = serde_json::from_str(&input)?;

    let outputs = request::handle(resolve_request, &config_manager)?;

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &outputs)?;
    writeln!(stdout)?;

    Ok(())
}
