//! Category Repository

use chrono::Utc;
use shared::models::{Category, CategoryCreate, CategoryUpdate, NO_CATEGORY, UNCATEGORIZED};
use shared::util::new_record_id;

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, CATEGORY_NAMES_TABLE, DbService};

/// Image used when a category is created without one
pub const DEFAULT_CATEGORY_IMAGE: &str =
    "https://res.cloudinary.com/dhlfg6dpw/image/upload/v1709720000/cravebites/default-category.png";

const DUPLICATE_NAME: &str = "Category with this name already exists";

/// Report labels cannot be taken by real categories
fn check_reserved(name: &str) -> RepoResult<()> {
    if [UNCATEGORIZED, NO_CATEGORY]
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return Err(RepoError::Validation(format!(
            "Category name '{name}' is reserved"
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct CategoryRepository {
    db: DbService,
}

impl CategoryRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Active categories, by display order then name
    pub fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .db
            .list_docs::<Category>(CATEGORIES_TABLE)?
            .into_iter()
            .filter(|c| c.active)
            .collect();
        categories.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    /// Every category including soft-deleted ones
    pub fn find_all_including_inactive(&self) -> RepoResult<Vec<Category>> {
        Ok(self.db.list_docs(CATEGORIES_TABLE)?)
    }

    pub fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        Ok(self.db.get_doc(CATEGORIES_TABLE, id)?)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        match self.db.lookup_index(CATEGORY_NAMES_TABLE, name.trim())? {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    pub fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let name = data
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| RepoError::Validation("Category name is required".into()))?
            .to_string();
        check_reserved(&name)?;

        let now = Utc::now();
        let category = Category {
            id: new_record_id(),
            name,
            description: data.description.map(|d| d.trim().to_string()).unwrap_or_default(),
            image: data
                .image
                .filter(|i| !i.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY_IMAGE.to_string()),
            featured: data.featured.unwrap_or(false),
            order: data.order.unwrap_or(0),
            active: true,
            created_at: now,
            updated_at: now,
        };

        let txn = self.db.begin_write()?;
        if self
            .db
            .lookup_index_txn(&txn, CATEGORY_NAMES_TABLE, &category.name)?
            .is_some()
        {
            return Err(RepoError::Duplicate(DUPLICATE_NAME.into()));
        }
        self.db.put_doc(&txn, CATEGORIES_TABLE, &category.id, &category)?;
        self.db
            .set_index(&txn, CATEGORY_NAMES_TABLE, &category.name, &category.id)?;
        txn.commit().map_err(crate::db::StorageError::from)?;

        tracing::info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let txn = self.db.begin_write()?;
        let mut category: Category = self
            .db
            .get_doc_txn(&txn, CATEGORIES_TABLE, id)?
            .ok_or_else(|| RepoError::NotFound("Category".into()))?;

        if let Some(name) = data.name.as_deref().map(str::trim) {
            if name.is_empty() {
                return Err(RepoError::Validation("Category name is required".into()));
            }
            check_reserved(name)?;
            if name != category.name {
                if let Some(owner) = self.db.lookup_index_txn(&txn, CATEGORY_NAMES_TABLE, name)?
                    && owner != category.id
                {
                    return Err(RepoError::Duplicate(DUPLICATE_NAME.into()));
                }
                self.db
                    .remove_index(&txn, CATEGORY_NAMES_TABLE, &category.name)?;
                self.db.set_index(&txn, CATEGORY_NAMES_TABLE, name, &category.id)?;
                category.name = name.to_string();
            }
        }
        if let Some(description) = data.description {
            category.description = description.trim().to_string();
        }
        if let Some(image) = data.image.filter(|i| !i.trim().is_empty()) {
            category.image = image;
        }
        if let Some(featured) = data.featured {
            category.featured = featured;
        }
        if let Some(order) = data.order {
            category.order = order;
        }
        if let Some(active) = data.active {
            category.active = active;
        }
        category.updated_at = Utc::now();

        self.db.put_doc(&txn, CATEGORIES_TABLE, &category.id, &category)?;
        txn.commit().map_err(crate::db::StorageError::from)?;
        Ok(category)
    }

    /// Soft delete: the category stays referenced by products and reports
    pub fn delete(&self, id: &str) -> RepoResult<bool> {
        let txn = self.db.begin_write()?;
        let Some(mut category) = self.db.get_doc_txn::<Category>(&txn, CATEGORIES_TABLE, id)? else {
            return Ok(false);
        };
        category.active = false;
        category.updated_at = Utc::now();
        self.db.put_doc(&txn, CATEGORIES_TABLE, &category.id, &category)?;
        txn.commit().map_err(crate::db::StorageError::from)?;

        tracing::info!(id = %id, "Category deactivated");
        Ok(true)
    }
}
