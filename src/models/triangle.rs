use alloy::primitives::Address;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::sql_types::Text;
use diesel::{
    serialize::{self, IsNull, Output, ToSql},
    Queryable, Selectable,
};
use std::io::Write;
use std::str::FromStr;

use crate::arb::triangle::{Leg, Triangle};

/// A candidate triangle row
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schemas::triangles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TriangleRow {
    /// The ID of the triangle
    pub id: i64,
    /// Token sold into leg 0
    pub token0: DBAddress,
    /// Router leg 0 trades through
    pub router0: DBAddress,
    /// Pool backing leg 0
    pub pair0: DBAddress,
    /// Token sold into leg 1
    pub token1: DBAddress,
    /// Router leg 1 trades through
    pub router1: DBAddress,
    /// Pool backing leg 1
    pub pair1: DBAddress,
    /// Token sold into leg 2
    pub token2: DBAddress,
    /// Router leg 2 trades through
    pub router2: DBAddress,
    /// Pool backing leg 2
    pub pair2: DBAddress,
}

impl TriangleRow {
    /// Converts the row into the domain triangle.
    #[must_use]
    pub fn into_triangle(self) -> Triangle {
        Triangle::new(
            self.id,
            [
                Leg {
                    token: self.token0.value,
                    router: self.router0.value,
                    pair: self.pair0.value,
                },
                Leg {
                    token: self.token1.value,
                    router: self.router1.value,
                    pair: self.pair1.value,
                },
                Leg {
                    token: self.token2.value,
                    router: self.router2.value,
                    pair: self.pair2.value,
                },
            ],
        )
    }
}

/// A database address type
/// Wrap Alloy's Address for strict typing
#[derive(Debug, FromSqlRow, AsExpression, Clone)]
#[diesel(sql_type = Text)]
pub struct DBAddress {
    /// The address
    pub value: Address,
}

impl DBAddress {
    /// Create a new database address
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self { value: address }
    }
}

impl FromStr for DBAddress {
    type Err = eyre::Error;

    // Upstream rows are not reliably checksummed; accept any casing and
    // normalize on write.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let address = Address::from_str(s)?;
        Ok(Self { value: address })
    }
}

impl ToSql<Text, diesel::pg::Pg> for DBAddress {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, diesel::pg::Pg>) -> serialize::Result {
        let address = format!("{}", self.value);
        out.write_all(address.as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for DBAddress {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let bytes = bytes.as_bytes();
        let addr = std::str::from_utf8(bytes)?.parse::<DBAddress>()?;
        Ok(addr)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_db_address_accepts_any_casing() {
        let lower: DBAddress = "0xcdecf7ab7c6654139f65c6c1c7ecbad653f0dfb0".parse().unwrap();
        let check: DBAddress = "0xcdecF7Ab7c6654139F65c6C1C7Ecbad653F0dfB0".parse().unwrap();
        assert_eq!(lower.value, check.value);
    }

    #[test]
    fn test_db_address_rejects_garbage() {
        assert!("not-an-address".parse::<DBAddress>().is_err());
        assert!("0x1234".parse::<DBAddress>().is_err());
    }
}
