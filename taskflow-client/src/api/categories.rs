//! Category endpoints

use shared::{Category, CategoryCreate, CategoryListResponse, CategoryUpdate};
use validator::Validate;

use crate::cache::SharedListCache;
use crate::error::ClientResult;
use crate::http::HttpClient;

/// Typed access to `/categories`
#[derive(Debug, Clone)]
pub struct CategoryApi<H> {
    http: H,
    cache: Option<SharedListCache>,
}

impl<H: HttpClient> CategoryApi<H> {
    pub fn new(http: H) -> Self {
        Self { http, cache: None }
    }

    pub fn with_cache(mut self, cache: SharedListCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn list(&self) -> ClientResult<Vec<Category>> {
        if let Some(categories) = self.cache.as_ref().and_then(|c| c.get_categories()) {
            return Ok(categories);
        }
        let response: CategoryListResponse = self.http.get("categories/").await?;
        if let Some(cache) = &self.cache {
            cache.store_categories(response.categories.clone());
        }
        Ok(response.categories)
    }

    pub async fn get(&self, id: i64) -> ClientResult<Category> {
        self.http.get(&format!("categories/{id}")).await
    }

    pub async fn create(&self, payload: &CategoryCreate) -> ClientResult<Category> {
        payload.validate()?;
        let category: Category = self.http.post("categories/", payload).await?;
        if let Some(cache) = &self.cache {
            cache.upsert_category(category.clone());
        }
        Ok(category)
    }

    pub async fn update(&self, id: i64, payload: &CategoryUpdate) -> ClientResult<Category> {
        payload.validate()?;
        let category: Category = self.http.put(&format!("categories/{id}"), payload).await?;
        if let Some(cache) = &self.cache {
            cache.upsert_category(category.clone());
        }
        Ok(category)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http.delete(&format!("categories/{id}")).await?;
        if let Some(cache) = &self.cache {
            cache.remove_category(id);
        }
        Ok(())
    }
}
