use std::collections::HashMap;
use serde::Deserialize;
use super::errors::{Result, UploadError};
use super::store::RecordStore;

/// 服务端返回的分类对象
#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub title: String,
}

/// 分类名到 category_id 的映射表。
/// name 和 title 都可以匹配，大小写不敏感；
/// 未知名称直接报错，不回退到原始字符串
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    by_name: HashMap<String, String>,
}

impl CategoryMap {
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut by_name = HashMap::new();
        for category in categories {
            by_name.insert(category.name.to_lowercase(), category.id.clone());
            by_name.insert(category.title.to_lowercase(), category.id.clone());
        }

        Self { by_name }
    }

    pub async fn fetch<S: RecordStore + ?Sized>(store: &S) -> Result<Self> {
        let categories = store.list_categories().await?;
        Ok(Self::from_categories(&categories))
    }

    pub fn resolve(&self, name: &str) -> Result<&str> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(String::as_str)
            .ok_or_else(|| UploadError::UnknownCategory(name.to_string()))
    }
}
