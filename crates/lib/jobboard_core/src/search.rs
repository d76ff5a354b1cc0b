//! Job search: filter parameters → composable predicate + sort + page.
//!
//! A [`JobFilter`] is what a client asks for. [`JobFilter::query`] turns it
//! into a [`JobQuery`]: a conjunction of [`JobClause`]s plus ordering and
//! pagination. Stores interpret the clauses (SQL for Postgres,
//! [`JobClause::matches`] in memory); both must agree on the semantics
//! documented on each clause.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::models::{Job, JobStatus, JobType, ParseEnumError};
use crate::text;

/// Page size used when none (or a non-positive one) is requested.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on the page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sortable job columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    Salary,
    Location,
}

impl SortField {
    /// Column name, safe to splice into SQL.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
            SortField::Title => "title",
            SortField::Salary => "salary",
            SortField::Location => "location",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SortField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            "title" => Ok(SortField::Title),
            "salary" => Ok(SortField::Salary),
            "location" => Ok(SortField::Location),
            _ => Err(ParseEnumError {
                kind: "sort field",
                value: s.to_string(),
                expected: "created_at, updated_at, title, salary, location",
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ParseEnumError {
                kind: "sort order",
                value: s.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

/// Client-facing search parameters. Every filter is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct JobFilter {
    /// Free text; every word must occur in the title or the description.
    pub search: Option<String>,
    /// Substring of the location.
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    /// Inclusive lower salary bound.
    pub salary_min: Option<f64>,
    /// Inclusive upper salary bound.
    pub salary_max: Option<f64>,
    /// `None` means any status.
    pub status: Option<JobStatus>,
    pub sort: SortField,
    pub order: SortOrder,
    /// 1-based; values below 1 act as 1.
    pub page: i64,
    /// Non-positive values fall back to [`DEFAULT_PAGE_SIZE`].
    pub page_size: i64,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            search: None,
            location: None,
            job_type: None,
            salary_min: None,
            salary_max: None,
            status: Some(JobStatus::Open),
            sort: SortField::default(),
            order: SortOrder::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl JobFilter {
    /// Build the predicate for this filter.
    pub fn predicate(&self) -> JobPredicate {
        let mut predicate = JobPredicate::default();

        if let Some(search) = &self.search {
            for word in text::words(search) {
                predicate = predicate.and(JobClause::Keyword(word));
            }
        }
        if let Some(location) = &self.location {
            let needle = text::normalize(location);
            if !needle.is_empty() {
                predicate = predicate.and(JobClause::LocationContains(needle));
            }
        }
        if let Some(job_type) = self.job_type {
            predicate = predicate.and(JobClause::TypeIs(job_type));
        }
        if let Some(min) = self.salary_min {
            predicate = predicate.and(JobClause::SalaryAtLeast(min));
        }
        if let Some(max) = self.salary_max {
            predicate = predicate.and(JobClause::SalaryAtMost(max));
        }
        if let Some(status) = self.status {
            predicate = predicate.and(JobClause::StatusIs(status));
        }
        predicate
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.page_size)
    }

    /// Full query: predicate, ordering and page window.
    pub fn query(&self) -> JobQuery {
        JobQuery {
            predicate: self.predicate(),
            sort: self.sort,
            order: self.order,
            pagination: self.pagination(),
        }
    }
}

/// One condition on a job. Text clauses hold already-normalized needles and
/// compare against normalized columns.
#[derive(Debug, Clone, PartialEq)]
pub enum JobClause {
    /// Word occurs in the title or in the description.
    Keyword(String),
    LocationContains(String),
    TypeIs(JobType),
    StatusIs(JobStatus),
    /// `salary >= bound`; jobs without salary never match.
    SalaryAtLeast(f64),
    /// `salary <= bound`; jobs without salary never match.
    SalaryAtMost(f64),
    RecruiterIs(Uuid),
}

impl JobClause {
    pub fn matches(&self, job: &Job) -> bool {
        match self {
            JobClause::Keyword(word) => {
                text::normalize(&job.title).contains(word.as_str())
                    || text::normalize(&job.description).contains(word.as_str())
            }
            JobClause::LocationContains(needle) => {
                text::normalize(&job.location).contains(needle.as_str())
            }
            JobClause::TypeIs(t) => job.job_type == *t,
            JobClause::StatusIs(s) => job.status == *s,
            JobClause::SalaryAtLeast(min) => job.salary.is_some_and(|s| s >= *min),
            JobClause::SalaryAtMost(max) => job.salary.is_some_and(|s| s <= *max),
            JobClause::RecruiterIs(id) => job.recruiter_id == *id,
        }
    }
}

/// Conjunction of clauses. The empty predicate matches every job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPredicate {
    clauses: Vec<JobClause>,
}

impl JobPredicate {
    /// Add a clause (logical AND).
    pub fn and(mut self, clause: JobClause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn clauses(&self) -> &[JobClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, job: &Job) -> bool {
        self.clauses.iter().all(|c| c.matches(job))
    }
}

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Effective 1-based page number.
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64) -> Self {
        let page_size = if page_size <= 0 {
            DEFAULT_PAGE_SIZE
        } else {
            page_size.min(MAX_PAGE_SIZE)
        };
        Self {
            page: page.max(1),
            page_size,
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// A compiled search.
#[derive(Debug, Clone, PartialEq)]
pub struct JobQuery {
    pub predicate: JobPredicate,
    pub sort: SortField,
    pub order: SortOrder,
    pub pagination: Pagination,
}

impl JobQuery {
    /// Total order used by in-memory evaluation; mirrors the SQL
    /// `ORDER BY <field> <dir> NULLS LAST, id <dir>`.
    pub fn compare(&self, a: &Job, b: &Job) -> Ordering {
        let primary = match self.sort {
            SortField::CreatedAt => directed(a.created_at.cmp(&b.created_at), self.order),
            SortField::UpdatedAt => directed(a.updated_at.cmp(&b.updated_at), self.order),
            SortField::Title => directed(a.title.cmp(&b.title), self.order),
            SortField::Location => directed(a.location.cmp(&b.location), self.order),
            SortField::Salary => match (a.salary, b.salary) {
                (Some(x), Some(y)) => directed(x.total_cmp(&y), self.order),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        primary.then_with(|| directed(a.id.cmp(&b.id), self.order))
    }

    /// Evaluate against an in-memory collection: returns the requested page
    /// and the total number of matches.
    pub fn run<'a, I>(&self, jobs: I) -> (Vec<Job>, i64)
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let mut matched: Vec<&Job> = jobs
            .into_iter()
            .filter(|job| self.predicate.matches(job))
            .collect();
        let total = matched.len() as i64;

        matched.sort_by(|a, b| self.compare(a, b));
        let page = matched
            .into_iter()
            .skip(usize::try_from(self.pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(self.pagination.limit()).unwrap_or(0))
            .cloned()
            .collect();
        (page, total)
    }
}

fn directed(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    /// Matches across all pages.
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn job(title: &str, description: &str, location: &str) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::now_v7(),
            recruiter_id: Uuid::nil(),
            title: title.into(),
            description: description.into(),
            salary: None,
            location: location.into(),
            job_type: JobType::Remote,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    fn search(text: &str) -> JobFilter {
        JobFilter {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    #[test]
    fn default_filter_is_open_newest_first_page_one() {
        let f = JobFilter::default();
        assert_eq!(f.status, Some(JobStatus::Open));
        let q = f.query();
        assert_eq!(q.predicate.clauses(), &[JobClause::StatusIs(JobStatus::Open)]);
        assert_eq!(q.sort, SortField::CreatedAt);
        assert_eq!(q.order, SortOrder::Desc);
        assert_eq!(q.pagination, Pagination { page: 1, page_size: 20 });
    }

    #[test]
    fn words_are_anded_across_title_and_description() {
        let go = job("Desenvolvedor Backend Go", "Sistemas de alta performance", "Rio de Janeiro, RJ");
        assert!(search("backend go").predicate().matches(&go));
        assert!(search("BACKEND performance").predicate().matches(&go));
        assert!(!search("backend java").predicate().matches(&go));
    }

    #[test]
    fn search_is_accent_and_punctuation_insensitive() {
        let intern = job("Estágio em Desenvolvimento Web", "HTML, CSS", "Florianópolis, SC");
        assert!(search("estagio").predicate().matches(&intern));
        assert!(search("Estágio!").predicate().matches(&intern));
        assert!(search("html css").predicate().matches(&intern));

        let by_location = JobFilter {
            location: Some("florianopolis".into()),
            ..Default::default()
        };
        assert!(by_location.predicate().matches(&intern));
        let by_location = JobFilter {
            location: Some("Florianópolis, SC".into()),
            ..Default::default()
        };
        assert!(by_location.predicate().matches(&intern));
    }

    #[test]
    fn blank_text_filters_add_no_clauses() {
        let f = JobFilter {
            search: Some("  ?! ".into()),
            location: Some("--".into()),
            status: None,
            ..Default::default()
        };
        assert!(f.predicate().is_empty());
    }

    #[test]
    fn salary_bounds_are_inclusive_and_skip_unsalaried_jobs() {
        let mut paid = job("Full Stack", "", "BH");
        paid.salary = Some(10_000.0);
        let unpaid = job("Tech Lead", "", "SP");

        let f = JobFilter {
            salary_min: Some(10_000.0),
            salary_max: Some(10_000.0),
            ..Default::default()
        };
        assert!(f.predicate().matches(&paid));
        assert!(!f.predicate().matches(&unpaid));

        let f = JobFilter {
            salary_min: Some(10_000.01),
            ..Default::default()
        };
        assert!(!f.predicate().matches(&paid));
    }

    #[test]
    fn type_and_status_are_exact() {
        let mut closed = job("DevOps", "", "SP");
        closed.status = JobStatus::Closed;
        closed.job_type = JobType::Onsite;

        assert!(!JobFilter::default().predicate().matches(&closed));
        let f = JobFilter {
            status: Some(JobStatus::Closed),
            job_type: Some(JobType::Onsite),
            ..Default::default()
        };
        assert!(f.predicate().matches(&closed));
        let f = JobFilter {
            status: None,
            job_type: Some(JobType::Hybrid),
            ..Default::default()
        };
        assert!(!f.predicate().matches(&closed));
    }

    #[test]
    fn pagination_arithmetic() {
        assert_eq!(Pagination::new(1, 20).offset(), 0);
        assert_eq!(Pagination::new(2, 5).offset(), 5);
        assert_eq!(Pagination::new(0, 5).offset(), 0);
        assert_eq!(Pagination::new(-3, 5).offset(), 0);
        assert_eq!(Pagination::new(-3, 5).page, 1);
        assert_eq!(Pagination::new(1, 0).limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::new(1, -1).limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(Pagination::new(1, 1_000).limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn run_counts_before_paging() {
        let base = Utc::now();
        let jobs: Vec<Job> = (0..12)
            .map(|i| {
                let mut j = job(&format!("Vaga {i}"), "", "SP");
                j.created_at = base + Duration::seconds(i);
                j
            })
            .collect();

        let f = JobFilter {
            page: 2,
            page_size: 5,
            ..Default::default()
        };
        let (page, total) = f.query().run(&jobs);
        assert_eq!(total, 12);
        // Newest first: Vaga 11 .. Vaga 0; page two holds Vaga 6 .. Vaga 2.
        let titles: Vec<_> = page.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, ["Vaga 6", "Vaga 5", "Vaga 4", "Vaga 3", "Vaga 2"]);

        let f = JobFilter {
            page: 3,
            page_size: 5,
            order: SortOrder::Asc,
            ..Default::default()
        };
        let (page, total) = f.query().run(&jobs);
        assert_eq!(total, 12);
        let titles: Vec<_> = page.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, ["Vaga 10", "Vaga 11"]);
    }

    #[test]
    fn salary_sort_puts_missing_salaries_last() {
        let mut a = job("A", "", "SP");
        a.salary = Some(8_000.0);
        let mut b = job("B", "", "SP");
        b.salary = Some(11_000.0);
        let c = job("C", "", "SP");
        let jobs = vec![c, a, b];

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let f = JobFilter {
                sort: SortField::Salary,
                order,
                ..Default::default()
            };
            let (page, _) = f.query().run(&jobs);
            assert_eq!(page.last().map(|j| j.title.as_str()), Some("C"));
        }
    }

    #[test]
    fn sort_parsing() {
        assert_eq!("created_at".parse::<SortField>(), Ok(SortField::CreatedAt));
        assert_eq!("Salary".parse::<SortField>(), Ok(SortField::Salary));
        assert!("id; DROP TABLE jobs".parse::<SortField>().is_err());
        assert_eq!("ASC".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert_eq!("desc".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
