use crate::entities::sock::{self, Entity as Socks};
use crate::errors::ServiceError;
use crate::filters::{ComparisonOperator, SortKey};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// An inventory movement: an arrival or a departure of socks for one
/// (color, cotton percentage) pair.
#[derive(Debug, Clone)]
pub struct StockMovement {
    pub color: String,
    pub cotton_percentage: i32,
    pub amount: i32,
}

/// Partial update of a stored sock record. Unset fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct SockPatch {
    pub color: Option<String>,
    pub cotton_percentage: Option<i32>,
    pub amount: Option<i32>,
}

/// Service for sock inventory mutations and queries
#[derive(Clone)]
pub struct SockService {
    db: Arc<DatabaseConnection>,
}

impl SockService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Registers an arrival. Merges into the existing record for the pair,
    /// or creates a new one. Runs in a single transaction so the
    /// read-modify-write cannot lose concurrent updates.
    #[instrument(skip(self))]
    pub async fn register_arrival(
        &self,
        movement: StockMovement,
    ) -> Result<sock::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let existing = find_by_pair(&txn, &movement.color, movement.cotton_percentage).await?;
        let saved = match existing {
            Some(model) => {
                let new_amount = model.amount + movement.amount;
                let mut active: sock::ActiveModel = model.into();
                active.amount = Set(new_amount);
                active.update(&txn).await?
            }
            None => sock::ActiveModel {
                id: NotSet,
                color: Set(movement.color.clone()),
                cotton_percentage: Set(movement.cotton_percentage),
                amount: Set(movement.amount),
            }
            .insert(&txn)
            .await
            .map_err(map_unique_violation)?,
        };
        txn.commit().await?;

        info!(id = saved.id, amount = saved.amount, "registered sock arrival");
        Ok(saved)
    }

    /// Registers a departure. Fails when the pair is unknown or stock is
    /// insufficient; deletes the record when the departure exhausts it.
    #[instrument(skip(self))]
    pub async fn register_departure(
        &self,
        movement: StockMovement,
    ) -> Result<sock::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let Some(model) =
            find_by_pair(&txn, &movement.color, movement.cotton_percentage).await?
        else {
            warn!(
                color = %movement.color,
                cotton_percentage = movement.cotton_percentage,
                "departure for unknown sock pair"
            );
            return Err(ServiceError::NotFound(format!(
                "no socks with color {} and cotton percentage {}",
                movement.color, movement.cotton_percentage
            )));
        };

        if model.amount < movement.amount {
            warn!(
                requested = movement.amount,
                available = model.amount,
                "departure exceeds stock"
            );
            return Err(ServiceError::IllegalAmount {
                requested: movement.amount,
                available: model.amount,
            });
        }

        let departed = if model.amount == movement.amount {
            let drained = sock::Model {
                amount: 0,
                ..model.clone()
            };
            Socks::delete_by_id(model.id).exec(&txn).await?;
            drained
        } else {
            let new_amount = model.amount - movement.amount;
            let mut active: sock::ActiveModel = model.into();
            active.amount = Set(new_amount);
            active.update(&txn).await?
        };
        txn.commit().await?;

        info!(
            id = departed.id,
            remaining = departed.amount,
            "registered sock departure"
        );
        Ok(departed)
    }

    /// Applies a partial update to the record with the given id.
    /// A resulting duplicate (color, cotton percentage) pair is rejected by
    /// the unique index and surfaces as a conflict.
    #[instrument(skip(self))]
    pub async fn update_sock(&self, id: i64, patch: SockPatch) -> Result<sock::Model, ServiceError> {
        let Some(model) = Socks::find_by_id(id).one(&*self.db).await? else {
            return Err(ServiceError::NotFound(format!("no socks with id {}", id)));
        };

        // An all-empty patch would produce an UPDATE with no values.
        if patch.color.is_none() && patch.cotton_percentage.is_none() && patch.amount.is_none() {
            return Ok(model);
        }

        let mut active: sock::ActiveModel = model.into();
        if let Some(color) = patch.color {
            active.color = Set(color);
        }
        if let Some(cotton_percentage) = patch.cotton_percentage {
            active.cotton_percentage = Set(cotton_percentage);
        }
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }

        let updated = active
            .update(&*self.db)
            .await
            .map_err(map_unique_violation)?;

        info!(id = updated.id, "updated sock record");
        Ok(updated)
    }

    /// Sums stored amounts over records matching the color exactly and the
    /// operator against the threshold. Returns 0 when nothing matches.
    #[instrument(skip(self))]
    pub async fn socks_amount(
        &self,
        color: &str,
        operator: ComparisonOperator,
        cotton_percentage: i32,
    ) -> Result<i64, ServiceError> {
        let matches = Socks::find()
            .filter(sock::Column::Color.eq(color))
            .filter(operator.cotton_condition(cotton_percentage))
            .all(&*self.db)
            .await?;

        let total: i64 = matches.iter().map(|s| i64::from(s.amount)).sum();
        info!(color, total, "computed aggregate sock amount");
        Ok(total)
    }

    /// Lists records whose cotton percentage lies within [from, to],
    /// ascending by the sort key when one is given.
    #[instrument(skip(self))]
    pub async fn socks_by_cotton_range(
        &self,
        from: i32,
        to: i32,
        sort: Option<SortKey>,
    ) -> Result<Vec<sock::Model>, ServiceError> {
        let mut query = Socks::find().filter(sock::Column::CottonPercentage.between(from, to));
        if let Some(key) = sort {
            query = query.order_by_asc(key.column());
        }

        let socks = query.all(&*self.db).await?;
        info!(from, to, found = socks.len(), "listed socks by cotton range");
        Ok(socks)
    }
}

async fn find_by_pair<C: sea_orm::ConnectionTrait>(
    conn: &C,
    color: &str,
    cotton_percentage: i32,
) -> Result<Option<sock::Model>, DbErr> {
    Socks::find()
        .filter(sock::Column::Color.eq(color))
        .filter(sock::Column::CottonPercentage.eq(cotton_percentage))
        .one(conn)
        .await
}

fn map_unique_violation(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::Conflict(
            "socks with this color and cotton percentage already exist".to_string(),
        ),
        _ => ServiceError::DatabaseError(err),
    }
}
