use crate::api::{resource_path, ApiClient, ApiResponse};
use crate::models::category::{Category, CategoryCreate, CategoryUpdate};

#[derive(Clone)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Global categories plus the caller's personal ones.
    pub async fn list(&self) -> ApiResponse<Vec<Category>> {
        self.api.get("/categories", &[]).await
    }

    pub async fn create(&self, category: &CategoryCreate) -> ApiResponse<Category> {
        self.api.post("/categories", category).await
    }

    pub async fn update(&self, id: &str, update: &CategoryUpdate) -> ApiResponse<Category> {
        self.api.put(&resource_path(&["categories", id]), update).await
    }

    pub async fn delete(&self, id: &str) -> ApiResponse<()> {
        self.api.delete(&resource_path(&["categories", id])).await
    }
}
