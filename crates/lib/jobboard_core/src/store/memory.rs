//! In-process store for tests and `--in-memory` runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ALREADY_APPLIED, EMAIL_TAKEN, Store, StoreError, StoreResult};
use crate::models::{
    Account, Application, ApplicationStatus, Job, JobChanges, JobStatus, NewAccount, NewJob,
};
use crate::search::JobQuery;

/// A stored record plus its tombstone.
#[derive(Debug, Clone)]
struct Row<T> {
    value: T,
    deleted_at: Option<DateTime<Utc>>,
}

impl<T> Row<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            deleted_at: None,
        }
    }

    fn live(&self) -> Option<&T> {
        match self.deleted_at {
            None => Some(&self.value),
            Some(_) => None,
        }
    }

    fn live_mut(&mut self) -> Option<&mut T> {
        match self.deleted_at {
            None => Some(&mut self.value),
            Some(_) => None,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<Uuid, Row<Account>>,
    jobs: BTreeMap<Uuid, Row<Job>>,
    applications: BTreeMap<Uuid, Row<Application>>,
    clock: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing timestamps at microsecond precision, so insertion
    /// order is also `created_at` order.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now().trunc_subsecs(6);
        let next = match self.clock {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.clock = Some(next);
        next
    }

    fn live_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values().filter_map(Row::live)
    }

    fn live_applications(&self) -> impl Iterator<Item = &Application> {
        self.applications.values().filter_map(Row::live)
    }
}

fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

/// [`Store`] kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|r| r.value.email == account.email) {
            return Err(StoreError::Conflict(EMAIL_TAKEN.to_string()));
        }
        let now = tables.tick();
        let created = Account {
            id: Uuid::now_v7(),
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(created.id, Row::new(created.clone()));
        Ok(created)
    }

    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&id).and_then(Row::live).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter_map(Row::live)
            .find(|a| a.email == email)
            .cloned())
    }

    async fn find_accounts(&self, ids: &[Uuid]) -> StoreResult<Vec<Account>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.accounts.get(id).and_then(Row::live).cloned())
            .collect())
    }

    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().any(|r| r.value.email == email))
    }

    async fn create_job(&self, job: NewJob) -> StoreResult<Job> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let created = Job {
            id: Uuid::now_v7(),
            recruiter_id: job.recruiter_id,
            title: job.title,
            description: job.description,
            salary: job.salary,
            location: job.location,
            job_type: job.job_type,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        };
        tables.jobs.insert(created.id, Row::new(created.clone()));
        Ok(created)
    }

    async fn find_job(&self, id: Uuid) -> StoreResult<Option<Job>> {
        let tables = self.tables.read().await;
        Ok(tables.jobs.get(&id).and_then(Row::live).cloned())
    }

    async fn find_jobs(&self, ids: &[Uuid]) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.jobs.get(id).and_then(Row::live).cloned())
            .collect())
    }

    async fn search_jobs(&self, query: &JobQuery) -> StoreResult<(Vec<Job>, i64)> {
        let tables = self.tables.read().await;
        Ok(query.run(tables.live_jobs()))
    }

    async fn jobs_by_recruiter(&self, recruiter_id: Uuid) -> StoreResult<Vec<Job>> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<Job> = tables
            .live_jobs()
            .filter(|j| j.recruiter_id == recruiter_id)
            .cloned()
            .collect();
        newest_first(&mut jobs, |j| (j.created_at, j.id));
        Ok(jobs)
    }

    async fn update_job(&self, id: Uuid, changes: JobChanges) -> StoreResult<Job> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let job = tables
            .jobs
            .get_mut(&id)
            .and_then(Row::live_mut)
            .ok_or(StoreError::NotFound("job"))?;
        job.apply(changes);
        job.updated_at = now;
        Ok(job.clone())
    }

    async fn delete_job(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let row = tables
            .jobs
            .get_mut(&id)
            .filter(|r| r.deleted_at.is_none())
            .ok_or(StoreError::NotFound("job"))?;
        row.deleted_at = Some(now);
        row.value.updated_at = now;
        Ok(())
    }

    async fn create_application(
        &self,
        job_id: Uuid,
        candidate_id: Uuid,
    ) -> StoreResult<Application> {
        let mut tables = self.tables.write().await;
        if tables
            .live_applications()
            .any(|a| a.job_id == job_id && a.candidate_id == candidate_id)
        {
            return Err(StoreError::Conflict(ALREADY_APPLIED.to_string()));
        }
        let now = tables.tick();
        let created = Application {
            id: Uuid::now_v7(),
            job_id,
            candidate_id,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        tables
            .applications
            .insert(created.id, Row::new(created.clone()));
        Ok(created)
    }

    async fn find_application(&self, id: Uuid) -> StoreResult<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables.applications.get(&id).and_then(Row::live).cloned())
    }

    async fn application_exists(&self, job_id: Uuid, candidate_id: Uuid) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_applications()
            .any(|a| a.job_id == job_id && a.candidate_id == candidate_id))
    }

    async fn applications_by_candidate(
        &self,
        candidate_id: Uuid,
    ) -> StoreResult<Vec<Application>> {
        let tables = self.tables.read().await;
        let mut apps: Vec<Application> = tables
            .live_applications()
            .filter(|a| a.candidate_id == candidate_id)
            .cloned()
            .collect();
        newest_first(&mut apps, |a| (a.created_at, a.id));
        Ok(apps)
    }

    async fn applications_by_job(&self, job_id: Uuid) -> StoreResult<Vec<Application>> {
        let tables = self.tables.read().await;
        let mut apps: Vec<Application> = tables
            .live_applications()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        newest_first(&mut apps, |a| (a.created_at, a.id));
        Ok(apps)
    }

    async fn update_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> StoreResult<Application> {
        let mut tables = self.tables.write().await;
        let now = tables.tick();
        let app = tables
            .applications
            .get_mut(&id)
            .and_then(Row::live_mut)
            .ok_or(StoreError::NotFound("application"))?;
        app.status = status;
        app.updated_at = now;
        Ok(app.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{JobType, Role};
    use crate::search::JobFilter;

    async fn account(store: &MemoryStore, email: &str, role: Role) -> Account {
        store
            .create_account(NewAccount {
                email: email.into(),
                password_hash: "x".into(),
                role,
            })
            .await
            .unwrap()
    }

    async fn job(store: &MemoryStore, recruiter: Uuid, title: &str) -> Job {
        store
            .create_job(NewJob {
                recruiter_id: recruiter,
                title: title.into(),
                description: "desc".into(),
                salary: Some(5_000.0),
                location: "São Paulo, SP".into(),
                job_type: JobType::Remote,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        account(&store, "a@example.com", Role::Candidate).await;
        let err = store
            .create_account(NewAccount {
                email: "a@example.com".into(),
                password_hash: "y".into(),
                role: Role::Recruiter,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert!(store.email_exists("a@example.com").await.unwrap());
        assert!(!store.email_exists("b@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_application_conflicts_but_other_pairs_succeed() {
        let store = MemoryStore::new();
        let recruiter = account(&store, "r@example.com", Role::Recruiter).await;
        let c1 = account(&store, "c1@example.com", Role::Candidate).await;
        let c2 = account(&store, "c2@example.com", Role::Candidate).await;
        let j1 = job(&store, recruiter.id, "Frontend").await;
        let j2 = job(&store, recruiter.id, "Backend").await;

        let app = store.create_application(j1.id, c1.id).await.unwrap();
        assert_eq!(app.status, ApplicationStatus::Pending);
        assert!(matches!(
            store.create_application(j1.id, c1.id).await,
            Err(StoreError::Conflict(_))
        ));
        store.create_application(j1.id, c2.id).await.unwrap();
        store.create_application(j2.id, c1.id).await.unwrap();

        assert!(store.application_exists(j1.id, c1.id).await.unwrap());
        assert_eq!(store.applications_by_job(j1.id).await.unwrap().len(), 2);
        assert_eq!(store.applications_by_candidate(c1.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn racing_applications_have_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let recruiter = account(&store, "r@example.com", Role::Recruiter).await;
        let candidate = account(&store, "c@example.com", Role::Candidate).await;
        let posting = job(&store, recruiter.id, "DevOps").await;
        let (job_id, candidate_id) = (posting.id, candidate.id);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create_application(job_id, candidate_id).await })
            })
            .collect();

        let mut won = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => won += 1,
                Err(StoreError::Conflict(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!((won, conflicts), (1, 7));
    }

    #[tokio::test]
    async fn deleted_jobs_disappear_from_every_read() {
        let store = MemoryStore::new();
        let recruiter = account(&store, "r@example.com", Role::Recruiter).await;
        let posting = job(&store, recruiter.id, "Mobile").await;

        store.delete_job(posting.id).await.unwrap();

        assert!(store.find_job(posting.id).await.unwrap().is_none());
        assert!(store.find_jobs(&[posting.id]).await.unwrap().is_empty());
        assert!(store.jobs_by_recruiter(recruiter.id).await.unwrap().is_empty());
        let (jobs, total) = store
            .search_jobs(&JobFilter::default().query())
            .await
            .unwrap();
        assert!(jobs.is_empty());
        assert_eq!(total, 0);
        assert!(matches!(
            store.delete_job(posting.id).await,
            Err(StoreError::NotFound("job"))
        ));
        assert!(matches!(
            store.update_job(posting.id, JobChanges::default()).await,
            Err(StoreError::NotFound("job"))
        ));
    }

    #[tokio::test]
    async fn update_job_bumps_updated_at() {
        let store = MemoryStore::new();
        let recruiter = account(&store, "r@example.com", Role::Recruiter).await;
        let posting = job(&store, recruiter.id, "Tech Lead").await;

        let updated = store
            .update_job(
                posting.id,
                JobChanges {
                    status: Some(JobStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, JobStatus::Closed);
        assert_eq!(updated.title, "Tech Lead");
        assert!(updated.updated_at > posting.updated_at);
        assert_eq!(updated.created_at, posting.created_at);
    }

    #[tokio::test]
    async fn search_pages_newest_first() {
        let store = MemoryStore::new();
        let recruiter = account(&store, "r@example.com", Role::Recruiter).await;
        let mut created = Vec::new();
        for i in 1..=12 {
            created.push(job(&store, recruiter.id, &format!("Vaga {i}")).await);
        }

        let filter = JobFilter {
            page: 2,
            page_size: 5,
            ..Default::default()
        };
        let (jobs, total) = store.search_jobs(&filter.query()).await.unwrap();
        assert_eq!(total, 12);
        let titles: Vec<_> = jobs.iter().map(|j| j.title.as_str()).collect();
        // Records 6-10 of the newest-first listing.
        assert_eq!(titles, ["Vaga 7", "Vaga 6", "Vaga 5", "Vaga 4", "Vaga 3"]);
    }

    #[tokio::test]
    async fn application_status_updates() {
        let store = MemoryStore::new();
        let recruiter = account(&store, "r@example.com", Role::Recruiter).await;
        let candidate = account(&store, "c@example.com", Role::Candidate).await;
        let posting = job(&store, recruiter.id, "Full Stack").await;
        let app = store.create_application(posting.id, candidate.id).await.unwrap();

        let updated = store
            .update_application_status(app.id, ApplicationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Approved);
        assert!(matches!(
            store
                .update_application_status(Uuid::now_v7(), ApplicationStatus::Rejected)
                .await,
            Err(StoreError::NotFound("application"))
        ));
    }
}
