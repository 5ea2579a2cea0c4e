//! Order Repository
//!
//! Order numbers come from the persistent counter in `sequence_counter`.
//! The counter bump, the uniqueness check and the document insert share one
//! write transaction, so two concurrent creates never get the same number.

use chrono::Utc;
use shared::models::{Order, OrderStatus, PaymentResult};
use shared::util::{is_record_id, new_record_id};

use super::{RepoError, RepoResult};
use crate::db::{DbService, ORDER_NUMBERS_TABLE, ORDERS_TABLE, StorageError};
use crate::orders::normalizer::NewOrder;
use crate::orders::number::{format_order_number, parse_order_sequence};

#[derive(Clone)]
pub struct OrderRepository {
    db: DbService,
}

impl OrderRepository {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Persist a validated order with the next order number
    pub fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let txn = self.db.begin_write()?;
        let count = self.db.next_order_count(&txn)?;
        let order_number = format_order_number(count);

        if self
            .db
            .lookup_index_txn(&txn, ORDER_NUMBERS_TABLE, &order_number)?
            .is_some()
        {
            // Dropping the transaction discards the counter bump
            return Err(RepoError::Duplicate(format!(
                "Order number {order_number} already exists"
            )));
        }

        let now = Utc::now();
        let order = Order {
            id: new_record_id(),
            order_number,
            customer: data.customer,
            order_items: data.order_items,
            payment_method: data.payment_method,
            subtotal: data.subtotal,
            cgst: data.cgst,
            sgst: data.sgst,
            delivery_charge: data.delivery_charge,
            total_amount: data.total_amount,
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            created_at: now,
            updated_at: now,
        };

        self.db.put_doc(&txn, ORDERS_TABLE, &order.id, &order)?;
        self.db
            .set_index(&txn, ORDER_NUMBERS_TABLE, &order.order_number, &order.id)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            id = %order.id,
            order_number = %order.order_number,
            total = order.total_amount,
            items = order.order_items.len(),
            "Order created"
        );
        Ok(order)
    }

    /// Ids that are not well-formed are reported as not found
    pub fn find_by_id(&self, id: &str) -> RepoResult<Order> {
        if !is_record_id(id) {
            return Err(RepoError::NotFound("Order".into()));
        }
        self.db
            .get_doc(ORDERS_TABLE, id)?
            .ok_or_else(|| RepoError::NotFound("Order".into()))
    }

    /// All orders, newest first; equal timestamps fall back to the order number
    pub fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.db.list_docs(ORDERS_TABLE)?;
        orders.sort_by(|a, b| {
            b.created_at.cmp(&a.created_at).then_with(|| {
                parse_order_sequence(&b.order_number)
                    .cmp(&parse_order_sequence(&a.order_number))
                    .then_with(|| b.order_number.cmp(&a.order_number))
            })
        });
        Ok(orders)
    }

    /// Set the status. Any status may follow any other.
    pub fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let order = self.modify(id, |order| order.status = status)?;
        tracing::info!(id = %order.id, order_number = %order.order_number, status = %status, "Order status updated");
        Ok(order)
    }

    /// Mark paid; a repeated call overwrites the previous payment result
    pub fn mark_paid(&self, id: &str, payment: PaymentResult) -> RepoResult<Order> {
        let order = self.modify(id, |order| {
            order.is_paid = true;
            order.paid_at = Some(Utc::now());
            order.payment_result = Some(payment);
        })?;
        tracing::info!(id = %order.id, order_number = %order.order_number, "Order marked paid");
        Ok(order)
    }

    fn modify(&self, id: &str, apply: impl FnOnce(&mut Order)) -> RepoResult<Order> {
        if !is_record_id(id) {
            return Err(RepoError::NotFound("Order".into()));
        }
        let txn = self.db.begin_write()?;
        let mut order: Order = self
            .db
            .get_doc_txn(&txn, ORDERS_TABLE, id)?
            .ok_or_else(|| RepoError::NotFound("Order".into()))?;
        apply(&mut order);
        order.updated_at = Utc::now();
        self.db.put_doc(&txn, ORDERS_TABLE, &order.id, &order)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(order)
    }
}
