//! PostgreSQL-backed claim store.
//!
//! Per-claim atomicity comes from `SELECT ... FOR UPDATE` inside a
//! transaction: concurrent `modify` calls on one id queue on the row lock,
//! calls on different ids do not contend.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::claims::ids::ClaimId;
use crate::claims::store::{ClaimStore, Modified, Mutation};
use crate::claims::ClaimError;
use crate::models::claim::{ClaimPatch, ClaimRecord, ClaimRow};

#[derive(Clone)]
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClaimStore for PgClaimStore {
    async fn get(&self, id: &ClaimId) -> Result<Option<ClaimRecord>, ClaimError> {
        sqlx::query_as::<_, ClaimRow>("SELECT * FROM claims WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(ClaimRecord::try_from)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<ClaimRecord>, ClaimError> {
        sqlx::query_as::<_, ClaimRow>("SELECT * FROM claims ORDER BY submitted_at DESC")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ClaimRecord::try_from)
            .collect()
    }

    async fn create(&self, record: ClaimRecord) -> Result<ClaimRecord, ClaimError> {
        let result = sqlx::query(
            r#"
            INSERT INTO claims
                (id, first_name, last_name, submitted_at, step,
                 estimated_completion, week, notifications, work_log)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(record.id.as_str())
        .bind(&record.first_name)
        .bind(&record.last_name)
        .bind(record.submitted_at)
        .bind(i16::from(record.step.index()))
        .bind(&record.estimated_completion)
        .bind(&record.week)
        .bind(Json(&record.notifications))
        .bind(Json(&record.work_log))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ClaimError::DuplicateId(record.id));
        }
        Ok(record)
    }

    async fn update(
        &self,
        id: &ClaimId,
        patch: ClaimPatch,
    ) -> Result<Option<ClaimRecord>, ClaimError> {
        let modified = self
            .modify(id, Box::new(move |record: &mut ClaimRecord| patch.apply(record)))
            .await?;
        Ok(modified.map(|m| m.record))
    }

    async fn modify(
        &self,
        id: &ClaimId,
        mutation: Mutation,
    ) -> Result<Option<Modified>, ClaimError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ClaimRow>("SELECT * FROM claims WHERE id = $1 FOR UPDATE")
            .bind(id.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        // Dropping `tx` uncommitted rolls it back.
        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = ClaimRecord::try_from(row)?;
        let changed = mutation(&mut record);

        if changed {
            sqlx::query(
                r#"
                UPDATE claims
                SET step = $2,
                    estimated_completion = $3,
                    week = $4,
                    notifications = $5,
                    work_log = $6
                WHERE id = $1
                "#,
            )
            .bind(id.as_str())
            .bind(i16::from(record.step.index()))
            .bind(&record.estimated_completion)
            .bind(&record.week)
            .bind(Json(&record.notifications))
            .bind(Json(&record.work_log))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(Modified { record, changed }))
    }

    async fn next_claim_number(&self) -> Result<u64, ClaimError> {
        let next: i64 = sqlx::query_scalar("SELECT nextval('claim_number_seq')")
            .fetch_one(&self.pool)
            .await?;
        u64::try_from(next)
            .map_err(|_| ClaimError::Storage(format!("claim_number_seq returned {next}")))
    }
}
