//! Status enums and closed sets for catalog, order, and user records.
//!
//! All of these are stored as lowercase text in Postgres. The `text_enum!`
//! macro wires up `Display`, `FromStr`, and (with the `postgres` feature)
//! sqlx text encoding so the database and wire representations stay in sync.

use serde::{Deserialize, Serialize};

/// Implements `Display`, `FromStr`, and sqlx text codecs for a status enum.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                let s = match self {
                    $(Self::$variant => $text,)+
                };
                write!(f, "{s}")
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(format!(concat!("invalid ", stringify!($name), ": {}"), other)),
                }
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let s = <&str as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                s.parse().map_err(Into::into)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(
                    &self.to_string(),
                    buf,
                )
            }
        }
    };
}

pub(crate) use text_enum;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    /// Whether this role grants access to catalog and user administration.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

text_enum!(Role {
    Customer => "customer",
    Admin => "admin",
});

/// Catalog item category. Closed set; anything else is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtworkCategory {
    Painting,
    Sketch,
}

text_enum!(ArtworkCategory {
    Painting => "painting",
    Sketch => "sketch",
});

/// Order fulfillment status.
///
/// The only legal transitions are the linear
/// `pending -> confirmed -> shipped -> delivered` chain plus
/// `pending -> cancelled`. Both terminal states are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether moving from `self` to `next` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
        )
    }
}

text_enum!(OrderStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Shipped => "shipped",
    Delivered => "delivered",
    Cancelled => "cancelled",
});

/// Order payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

text_enum!(PaymentStatus {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
    Refunded => "refunded",
});

/// Accepted payment methods.
///
/// `cod` is accepted as a wire alias for `cash_on_delivery` (legacy clients).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    #[serde(alias = "cod")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Whether this method carries the cash-on-delivery surcharge.
    #[must_use]
    pub const fn has_delivery_fee(self) -> bool {
        matches!(self, Self::CashOnDelivery)
    }
}

text_enum!(PaymentMethod {
    CreditCard => "credit_card",
    DebitCard => "debit_card",
    Paypal => "paypal",
    CashOnDelivery => "cash_on_delivery",
});

/// Status of a custom-art request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Completed,
    Declined,
}

text_enum!(RequestStatus {
    Pending => "pending",
    Accepted => "accepted",
    Completed => "completed",
    Declined => "declined",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_happy_path() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_order_status_cancellation_only_from_pending() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_order_status_no_skips_or_reversals() {
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_order_status_text_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("paid".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_payment_method_fee_flag() {
        assert!(PaymentMethod::CashOnDelivery.has_delivery_fee());
        assert!(!PaymentMethod::CreditCard.has_delivery_fee());
        assert!(!PaymentMethod::DebitCard.has_delivery_fee());
        assert!(!PaymentMethod::Paypal.has_delivery_fee());
    }

    #[test]
    fn test_payment_method_cod_alias() {
        let method: PaymentMethod = serde_json::from_str("\"cod\"").unwrap();
        assert_eq!(method, PaymentMethod::CashOnDelivery);
        let method: PaymentMethod = serde_json::from_str("\"cash_on_delivery\"").unwrap();
        assert_eq!(method, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_category_closed_set() {
        assert!("painting".parse::<ArtworkCategory>().is_ok());
        assert!("sketch".parse::<ArtworkCategory>().is_ok());
        assert!("sculpture".parse::<ArtworkCategory>().is_err());
    }

    #[test]
    fn test_role_parse() {
        assert!("admin".parse::<Role>().unwrap().is_admin());
        assert!(!"customer".parse::<Role>().unwrap().is_admin());
    }
}
