use tokio::sync::watch;

use crate::api::ApiClient;
use crate::models::category::{partition_by_scope, Category, CategoryCreate, CategoryUpdate};
use crate::providers::store::{ProviderState, Store};
use crate::services::CategoryService;
use crate::validation::{
    collect_errors, validate_category_form, validate_category_name, validate_color_hex,
    validate_required,
};

#[derive(Clone)]
pub struct CategoryProvider {
    service: CategoryService,
    store: Store<Vec<Category>>,
}

impl CategoryProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            service: CategoryService::new(api),
            store: Store::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ProviderState<Vec<Category>>> {
        self.store.subscribe()
    }

    pub fn state(&self) -> ProviderState<Vec<Category>> {
        self.store.snapshot()
    }

    pub fn find(&self, id: &str) -> Option<Category> {
        self.store
            .read(|categories| categories.iter().find(|c| c.id == id).cloned())
    }

    /// (global, personal)
    pub fn by_scope(&self) -> (Vec<Category>, Vec<Category>) {
        self.store.read(|categories| partition_by_scope(categories))
    }

    pub async fn load(&self) -> Result<(), String> {
        self.store.start_loading();
        let response = self.service.list().await;
        self.store
            .settle(response, |categories, loaded| *categories = loaded.clone())
            .map(|_| ())
    }

    pub async fn create(&self, category: CategoryCreate) -> Result<Category, String> {
        self.store.check_form(validate_category_form(&category))?;
        self.store.start_loading();
        let response = self.service.create(&category).await;
        self.store
            .settle(response, |categories, created| categories.push(created.clone()))
    }

    /// Only personal categories owned by `user_id` may be edited, unless
    /// the caller is an administrator editing a global one.
    pub async fn update(
        &self,
        id: &str,
        update: CategoryUpdate,
        user_id: &str,
        is_admin: bool,
    ) -> Result<Category, String> {
        self.ensure_editable(id, user_id, is_admin)?;
        self.store.check_form(collect_errors([
            update.name.as_deref().map_or(Ok(()), validate_category_name),
            update
                .icon
                .as_deref()
                .map_or(Ok(()), |icon| validate_required("icon", "Ikon", icon)),
            update.color.as_deref().map_or(Ok(()), validate_color_hex),
        ]))?;

        self.store.start_loading();
        let response = self.service.update(id, &update).await;
        self.store.settle(response, |categories, updated| {
            if let Some(slot) = categories.iter_mut().find(|c| c.id == updated.id) {
                *slot = updated.clone();
            }
        })
    }

    pub async fn delete(&self, id: &str, user_id: &str, is_admin: bool) -> Result<(), String> {
        self.ensure_editable(id, user_id, is_admin)?;
        self.store.start_loading();
        let response = self.service.delete(id).await;
        self.store
            .settle(response, |categories, _| categories.retain(|c| c.id != id))
    }

    fn ensure_editable(&self, id: &str, user_id: &str, is_admin: bool) -> Result<(), String> {
        match self.find(id) {
            Some(category) if !category.is_editable_by(user_id, is_admin) => {
                let message = if category.is_global {
                    "Kategori global hanya dapat diubah oleh admin"
                } else {
                    "Anda tidak dapat mengubah kategori milik pengguna lain"
                };
                self.store.fail(message);
                Err(message.to_string())
            }
            _ => Ok(()),
        }
    }
}
