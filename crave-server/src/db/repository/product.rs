//! Product Repository

use std::collections::HashMap;

use chrono::Utc;
use shared::models::{Category, CategoryRef, Product, ProductCreate, ProductUpdate, ProductView};
use shared::util::new_record_id;

use super::{RepoError, RepoResult};
use crate::db::{CATEGORIES_TABLE, DbService, PRODUCT_NAMES_TABLE, PRODUCTS_TABLE, StorageError};
use crate::reports::CatalogSnapshot;

const DUPLICATE_NAME: &str = "Product with this name already exists";
const INVALID_CATEGORY: &str = "Invalid category";

#[derive(Clone)]
pub struct ProductRepository {
    db: DbService,
}

impl ProductRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// All products, newest first
    pub fn find_all(&self) -> RepoResult<Vec<Product>> {
        let mut products: Vec<Product> = self.db.list_docs(PRODUCTS_TABLE)?;
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    /// Products of one category, newest first
    pub fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<Product>> {
        let mut products = self.find_all()?;
        products.retain(|p| p.category_id == category_id);
        Ok(products)
    }

    pub fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        Ok(self.db.get_doc(PRODUCTS_TABLE, id)?)
    }

    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<Product>> {
        match self.db.lookup_index(PRODUCT_NAMES_TABLE, name.trim())? {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    /// Attach `{id, name}` of each product's category
    pub fn populate(&self, products: Vec<Product>) -> RepoResult<Vec<ProductView>> {
        let categories: HashMap<String, Category> = self
            .db
            .list_docs::<Category>(CATEGORIES_TABLE)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let category = categories.get(&product.category_id).map(|c| CategoryRef {
                    id: c.id.clone(),
                    name: c.name.clone(),
                });
                ProductView { product, category }
            })
            .collect())
    }

    /// Every product and category, indexed by id, for reports and order joins
    pub fn snapshot(&self) -> RepoResult<CatalogSnapshot> {
        Ok(CatalogSnapshot::new(
            self.db.list_docs::<Product>(PRODUCTS_TABLE)?,
            self.db.list_docs::<Category>(CATEGORIES_TABLE)?,
        ))
    }

    pub fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let name = required_name(data.name.as_deref())?;
        let category_id = data
            .category_id
            .ok_or_else(|| RepoError::Validation(INVALID_CATEGORY.into()))?;
        let price = data
            .price
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| RepoError::Validation("Price cannot be negative".into()))?;

        let now = Utc::now();
        let product = Product {
            id: new_record_id(),
            name,
            description: data.description.map(|d| d.trim().to_string()).unwrap_or_default(),
            price,
            image: data.image.unwrap_or_default(),
            category_id,
            is_veg: data.is_veg.unwrap_or(false),
            is_hot_deal: data.is_hot_deal.unwrap_or(false),
            is_favorite: data.is_favorite.unwrap_or(false),
            is_addon: data.is_addon.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let txn = self.db.begin_write()?;
        if self
            .db
            .get_doc_txn::<Category>(&txn, CATEGORIES_TABLE, &product.category_id)?
            .is_none()
        {
            return Err(RepoError::Validation(INVALID_CATEGORY.into()));
        }
        if self
            .db
            .lookup_index_txn(&txn, PRODUCT_NAMES_TABLE, &product.name)?
            .is_some()
        {
            return Err(RepoError::Duplicate(DUPLICATE_NAME.into()));
        }
        self.db.put_doc(&txn, PRODUCTS_TABLE, &product.id, &product)?;
        self.db
            .set_index(&txn, PRODUCT_NAMES_TABLE, &product.name, &product.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let txn = self.db.begin_write()?;
        let mut product: Product = self
            .db
            .get_doc_txn(&txn, PRODUCTS_TABLE, id)?
            .ok_or_else(|| RepoError::NotFound("Product".into()))?;

        if let Some(category_id) = data.category_id.filter(|c| !c.is_empty()) {
            if self
                .db
                .get_doc_txn::<Category>(&txn, CATEGORIES_TABLE, &category_id)?
                .is_none()
            {
                return Err(RepoError::Validation(INVALID_CATEGORY.into()));
            }
            product.category_id = category_id;
        }
        if data.name.is_some() {
            let name = required_name(data.name.as_deref())?;
            if name != product.name {
                if let Some(owner) = self.db.lookup_index_txn(&txn, PRODUCT_NAMES_TABLE, &name)?
                    && owner != product.id
                {
                    return Err(RepoError::Duplicate(DUPLICATE_NAME.into()));
                }
                self.db
                    .remove_index(&txn, PRODUCT_NAMES_TABLE, &product.name)?;
                self.db.set_index(&txn, PRODUCT_NAMES_TABLE, &name, &product.id)?;
                product.name = name;
            }
        }
        if let Some(description) = data.description {
            product.description = description.trim().to_string();
        }
        if let Some(price) = data.price {
            if !price.is_finite() || price < 0.0 {
                return Err(RepoError::Validation("Price cannot be negative".into()));
            }
            product.price = price;
        }
        if let Some(image) = data.image {
            product.image = image;
        }
        if let Some(v) = data.is_veg {
            product.is_veg = v;
        }
        if let Some(v) = data.is_hot_deal {
            product.is_hot_deal = v;
        }
        if let Some(v) = data.is_favorite {
            product.is_favorite = v;
        }
        if let Some(v) = data.is_addon {
            product.is_addon = v;
        }
        product.updated_at = Utc::now();

        self.db.put_doc(&txn, PRODUCTS_TABLE, &product.id, &product)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(product)
    }

    /// Hard delete. Orders keep their stored item name and price.
    pub fn delete(&self, id: &str) -> RepoResult<bool> {
        let txn = self.db.begin_write()?;
        let Some(product) = self.db.get_doc_txn::<Product>(&txn, PRODUCTS_TABLE, id)? else {
            return Ok(false);
        };
        self.db.remove_doc(&txn, PRODUCTS_TABLE, id)?;
        self.db
            .remove_index(&txn, PRODUCT_NAMES_TABLE, &product.name)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(id = %id, name = %product.name, "Product deleted");
        Ok(true)
    }
}

fn required_name(name: Option<&str>) -> RepoResult<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| RepoError::Validation("Product name is required".into()))
}
