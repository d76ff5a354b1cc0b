//! PostgreSQL store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{ALREADY_APPLIED, EMAIL_TAKEN, Store, StoreError, StoreResult};
use crate::models::{
    Account, Application, ApplicationStatus, Job, JobChanges, NewAccount, NewJob, ParseEnumError,
};
use crate::search::{JobClause, JobPredicate, JobQuery};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, role, created_at, updated_at";
const JOB_COLUMNS: &str = "id, recruiter_id, title, description, salary, location, \
                           type AS job_type, status, created_at, updated_at";
const APPLICATION_COLUMNS: &str = "id, job_id, candidate_id, status, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = ParseEnumError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    recruiter_id: Uuid,
    title: String,
    description: String,
    salary: Option<f64>,
    location: String,
    job_type: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = ParseEnumError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            recruiter_id: row.recruiter_id,
            title: row.title,
            description: row.description,
            salary: row.salary,
            location: row.location,
            job_type: row.job_type.parse()?,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ApplicationRow {
    id: Uuid,
    job_id: Uuid,
    candidate_id: Uuid,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = ParseEnumError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn convert<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = ParseEnumError>,
{
    rows.into_iter()
        .map(T::try_from)
        .collect::<Result<_, _>>()
        .map_err(StoreError::from)
}

fn convert_opt<R, T>(row: Option<R>) -> StoreResult<Option<T>>
where
    T: TryFrom<R, Error = ParseEnumError>,
{
    Ok(row.map(T::try_from).transpose()?)
}

/// Map a unique-index violation to `Conflict`, pass everything else through.
fn conflict_on_unique(err: sqlx::Error, message: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(message.to_string())
        }
        _ => StoreError::Database(err),
    }
}

/// Append `AND <clause>` for every clause of the predicate.
///
/// Text needles are normalized, so they only contain `[a-z0-9 ]` and never
/// need LIKE escaping.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, predicate: &JobPredicate) {
    qb.push(" WHERE NOT deleted");
    for clause in predicate.clauses() {
        qb.push(" AND ");
        match clause {
            JobClause::Keyword(word) => {
                let pattern = format!("%{word}%");
                qb.push("(search_normalize(title) LIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" OR search_normalize(description) LIKE ");
                qb.push_bind(pattern);
                qb.push(")");
            }
            JobClause::LocationContains(needle) => {
                qb.push("search_normalize(location) LIKE ");
                qb.push_bind(format!("%{needle}%"));
            }
            JobClause::TypeIs(job_type) => {
                qb.push("type = ");
                qb.push_bind(job_type.as_str());
            }
            JobClause::StatusIs(status) => {
                qb.push("status = ");
                qb.push_bind(status.as_str());
            }
            JobClause::SalaryAtLeast(min) => {
                qb.push("salary >= ");
                qb.push_bind(*min);
            }
            JobClause::SalaryAtMost(max) => {
                qb.push("salary <= ");
                qb.push_bind(*max);
            }
            JobClause::RecruiterIs(id) => {
                qb.push("recruiter_id = ");
                qb.push_bind(*id);
            }
        }
    }
}

/// PostgreSQL-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending embedded migrations.
    pub async fn migrate(&self) -> StoreResult<()> {
        crate::migrate::migrate(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let sql = format!(
            "INSERT INTO accounts (id, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {ACCOUNT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))?;
        Ok(row.try_into()?)
    }

    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1 AND NOT deleted");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        convert_opt(row)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let sql =
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1 AND NOT deleted");
        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        convert_opt(row)
    }

    async fn find_accounts(&self, ids: &[Uuid]) -> StoreResult<Vec<Account>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql =
            format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1) AND NOT deleted");
        let rows = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let sql = format!(
            "INSERT INTO jobs (id, recruiter_id, title, description, salary, location, type) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(job.recruiter_id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(job.salary)
            .bind(&job.location)
            .bind(job.job_type.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_into()?)
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 AND NOT deleted");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        convert_opt(row)
    }

    async fn find_jobs(&self, ids: &[Uuid]) -> StoreResult<Vec<Job>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ANY($1) AND NOT deleted");
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<(Vec<Job>, i64)> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_predicate(&mut count, &query.predicate);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
        push_predicate(&mut select, &query.predicate);

        // Text columns sort bytewise so both stores agree on the order.
        let column = match query.sort.column() {
            c @ ("title" | "location") => format!("{c} COLLATE \"C\""),
            c => c.to_string(),
        };
        let dir = query.order.keyword();
        select.push(format!(" ORDER BY {column} {dir} NULLS LAST, id {dir}"));
        select.push(" LIMIT ");
        select.push_bind(query.pagination.limit());
        select.push(" OFFSET ");
        select.push_bind(query.pagination.offset());

        debug!(sql = select.sql(), total, "job search");
        let rows: Vec<JobRow> = select.build_query_as().fetch_all(&self.pool).await?;
        Ok((convert(rows)?, total))
    }

    async fn jobs_by_recruiter(&self, recruiter_id: Uuid) -> StoreResult<Vec<Job>> {
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE recruiter_id = $1 AND NOT deleted \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, JobRow>(&sql)
            .bind(recruiter_id)
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    async fn update_job(&self, id: Uuid, changes: JobChanges) -> StoreResult<Job> {
        let sql = format!(
            "UPDATE jobs SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 salary = COALESCE($4, salary), \
                 location = COALESCE($5, location), \
                 type = COALESCE($6, type), \
                 status = COALESCE($7, status), \
                 updated_at = now() \
             WHERE id = $1 AND NOT deleted \
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.description)
            .bind(changes.salary)
            .bind(changes.location)
            .bind(changes.job_type.map(|t| t.as_str()))
            .bind(changes.status.map(|s| s.as_str()))
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("job"))?;
        Ok(row.try_into()?)
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE jobs SET deleted = TRUE, deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND NOT deleted",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("job"));
        }
        Ok(())
    }

    async fn create_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Application> {
        let sql = format!(
            "INSERT INTO applications (id, job_id, candidate_id, status) \
             VALUES ($1, $2, $3, $4) RETURNING {APPLICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(job_id)
            .bind(candidate_id)
            .bind(ApplicationStatus::Pending.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_unique(e, ALREADY_APPLIED))?;
        Ok(row.try_into()?)
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 AND NOT deleted"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        convert_opt(row)
    }

    async fn application_exists(&self, job_id: Uuid, candidate_id: Uuid) -> StoreResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM applications \
             WHERE job_id = $1 AND candidate_id = $2 AND NOT deleted)",
        )
        .bind(job_id)
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn applications_by_candidate(
        &self,
        candidate_id: Uuid,
    ) -> StoreResult<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE candidate_id = $1 AND NOT deleted ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    async fn applications_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE job_id = $1 AND NOT deleted ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        convert(rows)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Application> {
        let sql = format!(
            "UPDATE applications SET status = $2, updated_at = now() \
             WHERE id = $1 AND NOT deleted RETURNING {APPLICATION_COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("application"))?;
        Ok(row.try_into()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStatus, JobType};
    use crate::search::{JobFilter, SortField, SortOrder};

    fn rendered(filter: &JobFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
        push_predicate(&mut qb, &filter.predicate());
        qb.sql().to_string()
    }

    #[test]
    fn default_filter_renders_status_only() {
        assert_eq!(
            rendered(&JobFilter::default()),
            "SELECT COUNT(*) FROM jobs WHERE NOT deleted AND status = $1"
        );
    }

    #[test]
    fn every_clause_binds_its_value() {
        let filter = JobFilter {
            search: Some("backend go".into()),
            location: Some("São Paulo".into()),
            job_type: Some(JobType::Remote),
            salary_min: Some(1.0),
            salary_max: Some(2.0),
            status: Some(JobStatus::Open),
            sort: SortField::Salary,
            order: SortOrder::Asc,
            page: 1,
            page_size: 10,
        };
        let sql = rendered(&filter);
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM jobs WHERE NOT deleted \
             AND (search_normalize(title) LIKE $1 OR search_normalize(description) LIKE $2) \
             AND (search_normalize(title) LIKE $3 OR search_normalize(description) LIKE $4) \
             AND search_normalize(location) LIKE $5 \
             AND type = $6 AND salary >= $7 AND salary <= $8 AND status = $9"
        );
    }

    #[test]
    fn unfiltered_status_renders_tombstone_check_only() {
        let filter = JobFilter {
            status: None,
            ..Default::default()
        };
        assert_eq!(rendered(&filter), "SELECT COUNT(*) FROM jobs WHERE NOT deleted");
    }
}
