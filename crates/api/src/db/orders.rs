//! Order repository.
//!
//! Placement, cancellation, and admin status changes each run inside a single
//! transaction. Stock moves through guarded single-statement UPDATEs so
//! Postgres row locks serialize concurrent writers; two placements racing for
//! the last unit cannot both commit.

use atelier_core::{ArtworkId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, UserId};
use rust_decimal::Decimal;
use sqlx::{Acquire, PgPool, Postgres, QueryBuilder, Transaction};

use super::{Page, RepositoryError};
use crate::models::{Order, OrderItem, OrderItemDetail, ShippingAddress};

const ORDER_COLUMNS: &str = "id, order_number, user_id, status, payment_method, payment_status, \
     total_amount, street, city, state, zip_code, country, created_at, updated_at";

/// Order-number suffixes draw from uppercase alphanumerics.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 5;

/// Attempts before giving up on a colliding order number.
const ORDER_NUMBER_ATTEMPTS: u32 = 5;

/// A freshly placed order with the fields the confirmation response needs.
#[derive(Debug)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub delivery_fee: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order atomically.
    ///
    /// When `explicit_items` is non-empty they are used as-is (guest
    /// checkout; the client already holds title and price, and stock is not
    /// decremented on this path). Otherwise the authenticated user's cart is
    /// resolved against live artwork data, stock is decremented with a
    /// guarded UPDATE per item, and the cart is cleared. Everything happens
    /// in one transaction; any failure rolls the whole placement back.
    ///
    /// `cod_fee` is added to the total iff the payment method carries a
    /// delivery fee.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyOrder` if no items resolve and
    /// `RepositoryError::InsufficientStock` if a guarded decrement affects
    /// zero rows.
    pub async fn place_order(
        &self,
        user_id: Option<UserId>,
        address: &ShippingAddress,
        payment_method: PaymentMethod,
        explicit_items: Option<Vec<OrderItem>>,
        cod_fee: Decimal,
    ) -> Result<PlacedOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (items, from_cart) = match explicit_items {
            Some(items) if !items.is_empty() => (items, false),
            _ => {
                let Some(user_id) = user_id else {
                    return Err(RepositoryError::EmptyOrder);
                };
                let items = sqlx::query_as::<_, OrderItem>(
                    r"
                    SELECT a.id AS artwork_id, a.title, a.price, c.quantity
                    FROM cart_lines c
                    JOIN artworks a ON c.artwork_id = a.id
                    WHERE c.user_id = $1 AND a.is_active = TRUE
                    ",
                )
                .bind(user_id)
                .fetch_all(&mut *tx)
                .await?;
                (items, true)
            }
        };

        if items.is_empty() {
            return Err(RepositoryError::EmptyOrder);
        }

        let subtotal: Decimal = items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum();
        let delivery_fee = if payment_method.has_delivery_fee() {
            cod_fee
        } else {
            Decimal::ZERO
        };
        let total = subtotal + delivery_fee;

        let order = insert_order_with_fresh_number(
            &mut tx,
            user_id,
            address,
            payment_method,
            total,
            from_cart,
        )
        .await?;

        for item in &items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, artwork_id, title, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order.id)
            .bind(item.artwork_id)
            .bind(&item.title)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;

            if from_cart {
                decrement_stock(&mut tx, item.artwork_id, item.quantity).await?;
            }
        }

        if from_cart {
            // user_id is always present on the cart path
            sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(PlacedOrder {
            order,
            items,
            delivery_fee,
        })
    }

    /// A user's orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
        status: Option<OrderStatus>,
        page: Page,
    ) -> Result<(Vec<Order>, i64), RepositoryError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE "));
        push_owner_filter(&mut qb, user_id, status);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(page.limit());
        qb.push(" OFFSET ");
        qb.push_bind(page.offset());

        let orders = qb.build_query_as::<Order>().fetch_all(self.pool).await?;

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders WHERE ");
        push_owner_filter(&mut count_qb, user_id, status);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        Ok((orders, total))
    }

    /// One order with its items, visible only to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the order is absent or owned
    /// by someone else.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<(Order, Vec<OrderItemDetail>), RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let items = sqlx::query_as::<_, OrderItemDetail>(
            r"
            SELECT oi.artwork_id, oi.title, oi.price, oi.quantity,
                   a.artist, a.category, a.image_url
            FROM order_items oi
            JOIN artworks a ON oi.artwork_id = a.id
            WHERE oi.order_id = $1
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok((order, items))
    }

    /// Move an order to a new status, enforcing the lifecycle.
    ///
    /// Moving into `Cancelled` restores stock exactly like [`Self::cancel`],
    /// but only for orders that decremented it at placement. Explicit-item
    /// orders never touched stock, so there is nothing to return.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidTransition` for an illegal move and
    /// `RepositoryError::NotFound` for an unknown order.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, StatusRow>(
            "SELECT status, stock_adjusted FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if !row.status.can_transition_to(new_status) {
            return Err(RepositoryError::InvalidTransition {
                current: row.status,
            });
        }

        if new_status == OrderStatus::Cancelled && row.stock_adjusted {
            restore_stock(&mut tx, order_id).await?;
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(new_status)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Cancel a pending order, restoring stock for every item the placement
    /// decremented.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` when the order is absent or not
    /// owned by `user_id`, and `RepositoryError::InvalidTransition` when the
    /// order has already progressed past `Pending`.
    pub async fn cancel(&self, order_id: OrderId, user_id: UserId) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, StatusRow>(
            "SELECT status, stock_adjusted FROM orders WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if row.status != OrderStatus::Pending {
            return Err(RepositoryError::InvalidTransition {
                current: row.status,
            });
        }

        if row.stock_adjusted {
            restore_stock(&mut tx, order_id).await?;
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(OrderStatus::Cancelled)
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(order)
    }
}

fn push_owner_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    user_id: UserId,
    status: Option<OrderStatus>,
) {
    qb.push("user_id = ");
    qb.push_bind(user_id);
    if let Some(status) = status {
        qb.push(" AND status = ");
        qb.push_bind(status);
    }
}

/// Insert the order row, retrying with a fresh number on a unique collision.
///
/// Each attempt runs in a savepoint so a collision doesn't poison the outer
/// transaction.
async fn insert_order_with_fresh_number(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Option<UserId>,
    address: &ShippingAddress,
    payment_method: PaymentMethod,
    total: Decimal,
    stock_adjusted: bool,
) -> Result<Order, RepositoryError> {
    for attempt in 0..ORDER_NUMBER_ATTEMPTS {
        let order_number = generate_order_number();
        let mut savepoint = tx.begin().await?;

        let result = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO orders
                (user_id, order_number, status, payment_method, payment_status,
                 total_amount, stock_adjusted, street, city, state, zip_code, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(&order_number)
        .bind(OrderStatus::Pending)
        .bind(payment_method)
        .bind(PaymentStatus::Pending)
        .bind(total)
        .bind(stock_adjusted)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .fetch_one(&mut *savepoint)
        .await;

        match result {
            Ok(order) => {
                savepoint.commit().await?;
                return Ok(order);
            }
            Err(err) => {
                savepoint.rollback().await?;
                let is_collision = matches!(
                    &err,
                    sqlx::Error::Database(db_err) if db_err.is_unique_violation()
                );
                if !is_collision {
                    return Err(err.into());
                }
                tracing::warn!(attempt, "order number collision, regenerating");
            }
        }
    }

    Err(RepositoryError::Conflict(
        "order number space exhausted".to_owned(),
    ))
}

/// Guarded decrement. Zero rows affected means stock dropped below the
/// requested quantity since the cart was read.
async fn decrement_stock(
    tx: &mut Transaction<'_, Postgres>,
    artwork_id: ArtworkId,
    quantity: i32,
) -> Result<(), RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE artworks
        SET stock_quantity = stock_quantity - $1, updated_at = NOW()
        WHERE id = $2 AND stock_quantity >= $1
        ",
    )
    .bind(quantity)
    .bind(artwork_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        let row = sqlx::query_as::<_, AvailableRow>(
            "SELECT title, stock_quantity FROM artworks WHERE id = $1",
        )
        .bind(artwork_id)
        .fetch_optional(&mut **tx)
        .await?;

        let (title, available) =
            row.map_or_else(|| ("unknown artwork".to_owned(), 0), |r| (r.title, r.stock_quantity));
        return Err(RepositoryError::InsufficientStock {
            available,
            message: format!("Only {available} items available for \"{title}\""),
        });
    }

    Ok(())
}

/// Return each item's quantity to its artwork.
async fn restore_stock(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
) -> Result<(), RepositoryError> {
    let items = sqlx::query_as::<_, RestoreRow>(
        "SELECT artwork_id, quantity FROM order_items WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_all(&mut **tx)
    .await?;

    for item in items {
        sqlx::query(
            r"
            UPDATE artworks
            SET stock_quantity = stock_quantity + $1, updated_at = NOW()
            WHERE id = $2
            ",
        )
        .bind(item.quantity)
        .bind(item.artwork_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// `ART-{unix millis}-{5 uppercase alphanumerics}`.
fn generate_order_number() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!("ART-{}-{suffix}", chrono::Utc::now().timestamp_millis())
}

#[derive(sqlx::FromRow)]
struct AvailableRow {
    title: String,
    stock_quantity: i32,
}

#[derive(sqlx::FromRow)]
struct StatusRow {
    status: OrderStatus,
    stock_adjusted: bool,
}

#[derive(sqlx::FromRow)]
struct RestoreRow {
    artwork_id: ArtworkId,
    quantity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_shape() {
        let number = generate_order_number();
        let parts: Vec<&str> = number.splitn(3, '-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ART");
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(
            parts[2]
                .bytes()
                .all(|b| SUFFIX_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn test_order_numbers_vary() {
        let numbers: std::collections::HashSet<String> =
            (0..32).map(|_| generate_order_number()).collect();
        // With a 36^5 suffix space, 32 draws colliding would indicate a
        // broken generator rather than bad luck.
        assert!(numbers.len() > 1);
    }
}
