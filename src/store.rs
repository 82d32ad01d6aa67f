//! Translation row storage and record/translation relations.

use std::collections::HashMap;

use serde_json::Value;

use crate::config::ResolverConfig;
use crate::model::{
    DEFAULT_PRIMARY_KEY,
    Record,
    Translatable,
    TranslatableSchema,
    TranslationRow,
};
use crate::types::same_key;

/// ポリモーフィックモードで全型が共有する翻訳テーブル
pub const POLYMORPHIC_TABLE: &str = "Translation";
/// ポリモーフィックモードの所有者型の列
pub const POLYMORPHIC_TYPE_COLUMN: &str = "translatable_type";
/// ポリモーフィックモードの所有者 ID の列
pub const POLYMORPHIC_ID_COLUMN: &str = "translatable_id";

/// レコード型の翻訳行がどのテーブルにあり、どの列で所有者を指すか
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRelation {
    /// 翻訳テーブル名
    pub table: String,
    /// 所有者を指す列
    pub foreign_key: String,
    /// 所有者の型（ポリモーフィックモードのみ）
    pub owner_type: Option<String>,
}

impl TranslationRelation {
    /// レコード型のリレーションを導出する
    ///
    /// 非ポリモーフィックの場合、テーブルは既定で `<TypeName>Translation`。
    /// 外部キーは上書き指定、`id` 以外の主キー、`<type_name>_id` の順に決まる。
    #[must_use]
    pub fn for_schema(schema: &TranslatableSchema, polymorphic: bool) -> Self {
        if polymorphic {
            return Self {
                table: schema
                    .translation_model
                    .clone()
                    .unwrap_or_else(|| POLYMORPHIC_TABLE.to_string()),
                foreign_key: POLYMORPHIC_ID_COLUMN.to_string(),
                owner_type: Some(schema.type_name.clone()),
            };
        }

        let table = schema
            .translation_model
            .clone()
            .unwrap_or_else(|| format!("{}Translation", schema.base_type_name()));
        let foreign_key = schema.translation_foreign_key.clone().unwrap_or_else(|| {
            if schema.primary_key == DEFAULT_PRIMARY_KEY {
                format!("{}_id", snake_case(schema.base_type_name()))
            } else {
                schema.primary_key.clone()
            }
        });

        Self { table, foreign_key, owner_type: None }
    }

    /// `row` が ID `owner_id` の所有者に属するか
    #[must_use]
    pub fn owns(&self, row: &TranslationRow, owner_id: &Value) -> bool {
        let id_matches = row.get(&self.foreign_key).is_some_and(|id| same_key(id, owner_id));
        let type_matches = self.owner_type.as_deref().is_none_or(|owner_type| {
            row.get(POLYMORPHIC_TYPE_COLUMN).and_then(Value::as_str) == Some(owner_type)
        });
        id_matches && type_matches
    }
}

/// `BlogPost` -> `blog_post`
fn snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (index, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if index > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// 親レコードに紐づく翻訳行を供給する。呼び出しはブロックしてよい
pub trait TranslationStore {
    /// `relation` 上で `owner_id` に属する行
    fn translations_for(
        &self,
        relation: &TranslationRelation,
        owner_id: &Value,
    ) -> Vec<TranslationRow>;
}

/// メモリ上の翻訳テーブル
#[derive(Debug, Clone, Default)]
pub struct InMemoryTranslationStore {
    /// テーブル名 -> 行
    tables: HashMap<String, Vec<TranslationRow>>,
}

impl InMemoryTranslationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// テーブルに行を追加する（既存の行は残す）
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>, rows: Vec<TranslationRow>) -> Self {
        self.tables.entry(table.into()).or_default().extend(rows);
        self
    }

    pub fn insert(&mut self, table: impl Into<String>, row: TranslationRow) {
        self.tables.entry(table.into()).or_default().push(row);
    }
}

impl TranslationStore for InMemoryTranslationStore {
    fn translations_for(
        &self,
        relation: &TranslationRelation,
        owner_id: &Value,
    ) -> Vec<TranslationRow> {
        self.tables
            .get(&relation.table)
            .map(|rows| rows.iter().filter(|row| relation.owns(row, owner_id)).cloned().collect())
            .unwrap_or_default()
    }
}

/// レコードを変更せずに `store` から翻訳行を取得する
///
/// 主キーの値がないレコードには行がない。
#[must_use]
pub fn fetch_translations<S, R>(store: &S, record: &R, polymorphic: bool) -> Vec<TranslationRow>
where
    S: TranslationStore + ?Sized,
    R: Translatable + ?Sized,
{
    let Some(owner_id) = record.key() else {
        tracing::debug!("Record '{}' has no key, no translations", record.schema().type_name);
        return Vec::new();
    };

    let relation = TranslationRelation::for_schema(record.schema(), polymorphic);
    let rows = store.translations_for(&relation, owner_id);
    tracing::debug!("Loaded {} rows from '{}' for {}", rows.len(), relation.table, owner_id);
    rows
}

/// レコードに翻訳行を読み込む
pub fn load_translations<S>(record: &mut Record, store: &S, config: &ResolverConfig)
where
    S: TranslationStore + ?Sized,
{
    let rows = fetch_translations(store, record, config.polymorphic);
    record.set_translations(rows);
}
