//! Core types used throughout the project.

use std::fmt;
use std::hash::{
    Hash,
    Hasher,
};

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// 言語を識別するキー。ロケールコード（`"de"`）または数値の言語 ID
///
/// 等価性は保存方式に依存しない。数字だけのコードはその整数と等しく（`"1" == 1`）、
/// それ以外のコードは文字列として比較する。
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum LocaleKey {
    /// 言語テーブルの数値 ID
    Id(i64),
    /// `"en"` や `"pt-BR"` などのロケールコード
    Code(String),
}

/// 比較とハッシュに使う正規化形
#[derive(PartialEq, Eq, Hash)]
enum Canonical<'a> {
    /// 整数値（数字だけのコードを含む）
    Id(i64),
    /// 数値でないコード
    Code(&'a str),
}

impl LocaleKey {
    /// JSON の属性値からキーを読み取る
    ///
    /// null・真偽値・配列・オブジェクトは `None`
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => {
                Some(number.as_i64().map_or_else(|| Self::Code(number.to_string()), Self::Id))
            }
            Value::String(code) => Some(Self::Code(code.clone())),
            _ => None,
        }
    }

    /// 翻訳行やリクエストに格納する JSON 値へ変換する
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Id(id) => Value::from(*id),
            Self::Code(code) => Value::from(code.as_str()),
        }
    }

    /// 数値 ID の場合はその値
    #[must_use]
    pub const fn as_id(&self) -> Option<i64> {
        match self {
            Self::Id(id) => Some(*id),
            Self::Code(_) => None,
        }
    }

    /// コードの場合はその文字列
    #[must_use]
    pub fn as_code(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Code(code) => Some(code),
        }
    }

    /// JSON 値がこのキーと等しいキーを持つか
    #[must_use]
    pub fn matches_value(&self, value: &Value) -> bool {
        Self::from_value(value).is_some_and(|other| other == *self)
    }

    /// 正規化形
    fn canonical(&self) -> Canonical<'_> {
        match self {
            Self::Id(id) => Canonical::Id(*id),
            Self::Code(code) => code.parse::<i64>().map_or(Canonical::Code(code), Canonical::Id),
        }
    }
}

impl PartialEq for LocaleKey {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for LocaleKey {}

impl Hash for LocaleKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Code(code) => f.write_str(code),
        }
    }
}

impl From<&str> for LocaleKey {
    fn from(code: &str) -> Self {
        Self::Code(code.to_string())
    }
}

impl From<String> for LocaleKey {
    fn from(code: String) -> Self {
        Self::Code(code)
    }
}

impl From<i64> for LocaleKey {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

/// キー列（外部キー・所有者 ID）の緩い比較
///
/// 文字列と数値は [`LocaleKey`] として比較し、それ以外は構造で比較する。
#[must_use]
pub fn same_key(left: &Value, right: &Value) -> bool {
    match (LocaleKey::from_value(left), LocaleKey::from_value(right)) {
        (Some(left), Some(right)) => left == right,
        _ => left == right,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case::same_code(LocaleKey::from("de"), LocaleKey::from("de"), true)]
    #[case::different_code(LocaleKey::from("de"), LocaleKey::from("en"), false)]
    #[case::same_id(LocaleKey::Id(1), LocaleKey::Id(1), true)]
    #[case::numeric_code_and_id(LocaleKey::from("1"), LocaleKey::Id(1), true)]
    #[case::id_and_numeric_code(LocaleKey::Id(2), LocaleKey::from("2"), true)]
    #[case::numeric_codes(LocaleKey::from("01"), LocaleKey::from("1"), true)]
    #[case::code_and_id(LocaleKey::from("de"), LocaleKey::Id(1), false)]
    #[case::case_sensitive(LocaleKey::from("DE"), LocaleKey::from("de"), false)]
    fn test_equality(#[case] left: LocaleKey, #[case] right: LocaleKey, #[case] expected: bool) {
        assert_that!(left == right, eq(expected));
    }

    #[rstest]
    fn hash_agrees_with_equality() {
        let keys: HashSet<LocaleKey> =
            [LocaleKey::from("1"), LocaleKey::Id(1), LocaleKey::from("en")].into_iter().collect();

        assert_that!(keys.len(), eq(2));
        assert_that!(keys.contains(&LocaleKey::from("01")), eq(true));
    }

    #[rstest]
    #[case::integer(json!(3), Some(LocaleKey::Id(3)))]
    #[case::string(json!("fr"), Some(LocaleKey::from("fr")))]
    #[case::null(json!(null), None)]
    #[case::boolean(json!(true), None)]
    #[case::object(json!({"id": 1}), None)]
    fn test_from_value(#[case] value: Value, #[case] expected: Option<LocaleKey>) {
        assert_eq!(LocaleKey::from_value(&value), expected);
    }

    #[rstest]
    fn deserialize_untagged() {
        let keys: Vec<LocaleKey> = serde_json::from_str(r#"[1, "en", "2"]"#).unwrap();

        assert_eq!(keys, vec![LocaleKey::Id(1), LocaleKey::from("en"), LocaleKey::Id(2)]);
        assert_that!(keys[2].as_code(), some(eq("2")));
        assert_that!(keys[0].as_id(), some(eq(1)));
    }

    #[rstest]
    fn display_and_to_value() {
        assert_that!(LocaleKey::Id(7).to_string(), eq("7"));
        assert_that!(LocaleKey::from("en").to_string(), eq("en"));
        assert_eq!(LocaleKey::Id(7).to_value(), json!(7));
        assert_eq!(LocaleKey::from("en").to_value(), json!("en"));
    }

    #[rstest]
    #[case::string_and_number(json!("5"), json!(5), true)]
    #[case::different_numbers(json!(5), json!(6), false)]
    #[case::nulls(json!(null), json!(null), true)]
    #[case::null_and_number(json!(null), json!(0), false)]
    fn test_same_key(#[case] left: Value, #[case] right: Value, #[case] expected: bool) {
        assert_that!(same_key(&left, &right), eq(expected));
    }
}
