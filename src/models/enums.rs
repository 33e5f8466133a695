//! Shared domain enums
//!
//! Every enum here is stored as a plain TEXT column and travels as a
//! snake_case string in JSON.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
                <&str as Encode<Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

text_enum! {
    /// Bookable program types
    ProgramKind {
        Homeschooling => "homeschooling",
        HolidayCamp => "holiday_camp",
        DayCamp => "day_camp",
        LittleForest => "little_forest",
        SchoolTrip => "school_trip",
        TeamBuilding => "team_building",
    }
}

text_enum! {
    /// Payment state of a registration
    PaymentStatus {
        Pending => "pending",
        Partial => "partial",
        Paid => "paid",
        Refunded => "refunded",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// How the parent intends to pay
    PaymentMethod {
        Mpesa => "mpesa",
        Card => "card",
        BankTransfer => "bank_transfer",
        Cash => "cash",
    }
}

text_enum! {
    LeadStatus {
        New => "new",
        Contacted => "contacted",
        Converted => "converted",
        Lost => "lost",
    }
}

text_enum! {
    InvoiceStatus {
        Draft => "draft",
        Sent => "sent",
        Paid => "paid",
        Overdue => "overdue",
        Cancelled => "cancelled",
    }
}

text_enum! {
    /// Status of a recorded payment
    TransactionStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Refunded => "refunded",
    }
}

text_enum! {
    ExpenseStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Paid => "paid",
    }
}

text_enum! {
    BudgetStatus {
        Active => "active",
        Closed => "closed",
    }
}

text_enum! {
    /// Status of a pending collection (action item)
    CollectionStatus {
        Pending => "pending",
        Partial => "partial",
        Settled => "settled",
    }
}

text_enum! {
    VendorStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

text_enum! {
    BillStatus {
        Pending => "pending",
        Approved => "approved",
        Paid => "paid",
        Rejected => "rejected",
    }
}

text_enum! {
    /// Staff role attached to a profile
    Role {
        Admin => "admin",
        Accounts => "accounts",
        Procurement => "procurement",
        Staff => "staff",
    }
}

impl InvoiceStatus {
    /// Invoices still expecting money
    pub fn is_outstanding(&self) -> bool {
        matches!(self, InvoiceStatus::Sent | InvoiceStatus::Overdue)
    }
}

impl ExpenseStatus {
    /// Expenses that count toward monthly spend
    pub fn counts_as_spend(&self) -> bool {
        matches!(self, ExpenseStatus::Approved | ExpenseStatus::Paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_text() {
        for kind in ProgramKind::ALL {
            assert_eq!(kind.as_str().parse::<ProgramKind>().unwrap(), *kind);
        }
        assert_eq!("Bank_Transfer".parse::<PaymentMethod>().unwrap(), PaymentMethod::BankTransfer);
        assert!("weekly".parse::<BudgetStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_text() {
        let json = serde_json::to_string(&ProgramKind::HolidayCamp).unwrap();
        assert_eq!(json, "\"holiday_camp\"");
        let status: InvoiceStatus = serde_json::from_str("\"overdue\"").unwrap();
        assert!(status.is_outstanding());
    }
}
