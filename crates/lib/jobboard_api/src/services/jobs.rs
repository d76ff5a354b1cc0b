//! Job posting service: search, CRUD and ownership checks.

use std::collections::{BTreeSet, HashMap};

use jobboard_core::auth::{Claims, ensure_owner};
use jobboard_core::models::{Account, Job, JobChanges, JobStatus, JobType, NewJob};
use jobboard_core::search::{JobFilter, SortField, SortOrder};
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateJobRequest, JobListResponse, JobResponse, ListJobsParams, MessageResponse,
    UpdateJobRequest,
};
use crate::services::validation;

/// `status` value that disables the status filter.
const ANY_STATUS: &str = "all";

/// Translate raw query parameters into a search filter.
pub fn filter_from_params(params: &ListJobsParams) -> AppResult<JobFilter> {
    let defaults = JobFilter::default();

    let status = match params.status.as_deref().map(str::trim) {
        None => defaults.status,
        Some("") => None,
        Some(s) if s.eq_ignore_ascii_case(ANY_STATUS) => None,
        Some(s) => Some(validation::parse::<JobStatus>("status", s)?),
    };

    let salary_min = bound("salary_min", params.salary_min.as_deref())?;
    let salary_max = bound("salary_max", params.salary_max.as_deref())?;

    let page_size = validation::parse_opt::<i64>(
        "page_size",
        params.page_size.as_deref().or(params.limit.as_deref()),
    )?;

    Ok(JobFilter {
        search: params.search.clone(),
        location: params.location.clone(),
        job_type: validation::parse_opt::<JobType>("type", params.job_type.as_deref())?,
        salary_min,
        salary_max,
        status,
        sort: validation::parse_opt::<SortField>("sort_by", params.sort_by.as_deref())?
            .unwrap_or(defaults.sort),
        order: validation::parse_opt::<SortOrder>("order", params.order.as_deref())?
            .unwrap_or(defaults.order),
        page: validation::parse_opt::<i64>("page", params.page.as_deref())?
            .unwrap_or(defaults.page),
        page_size: page_size.unwrap_or(defaults.page_size),
    })
}

fn bound(field: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    match validation::parse_opt::<f64>(field, raw)? {
        Some(v) if !v.is_finite() => Err(AppError::Validation(format!("invalid {field} '{v}'"))),
        other => Ok(other),
    }
}

/// Attach recruiter summaries, fetching each recruiter once.
async fn with_recruiters(state: &AppState, jobs: &[Job]) -> AppResult<Vec<JobResponse>> {
    let ids: Vec<Uuid> = jobs
        .iter()
        .map(|j| j.recruiter_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let recruiters: HashMap<Uuid, Account> = state
        .store
        .find_accounts(&ids)
        .await?
        .into_iter()
        .map(|a| (a.id, a))
        .collect();

    Ok(jobs
        .iter()
        .map(|j| JobResponse::new(j, recruiters.get(&j.recruiter_id)))
        .collect())
}

/// Fetch a live posting or fail with `NotFound`.
pub(crate) async fn find_job(state: &AppState, id: Uuid) -> AppResult<Job> {
    state
        .store
        .find_job(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".into()))
}

/// Fetch a posting and require that `claims` owns it.
pub(crate) async fn owned_job(
    state: &AppState,
    claims: &Claims,
    id: Uuid,
    denied: &str,
) -> AppResult<Job> {
    let job = find_job(state, id).await?;
    ensure_owner(&job, claims).map_err(|_| AppError::Forbidden(denied.into()))?;
    Ok(job)
}

/// `GET /jobs`: one page of matching postings.
pub async fn list(state: &AppState, params: &ListJobsParams) -> AppResult<JobListResponse> {
    let query = filter_from_params(params)?.query();
    let (jobs, total) = state.store.search_jobs(&query).await?;
    Ok(JobListResponse {
        jobs: with_recruiters(state, &jobs).await?,
        total,
        page: query.pagination.page,
        page_size: query.pagination.page_size,
    })
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<JobResponse> {
    let job = find_job(state, id).await?;
    let recruiter = state.store.find_account(job.recruiter_id).await?;
    Ok(JobResponse::new(&job, recruiter.as_ref()))
}

pub async fn create(
    state: &AppState,
    claims: &Claims,
    req: CreateJobRequest,
) -> AppResult<JobResponse> {
    let job_type = match req.job_type.as_deref() {
        Some(raw) if !raw.trim().is_empty() => validation::parse::<JobType>("type", raw)?,
        _ => return Err(AppError::Validation("type is required".into())),
    };
    let new = NewJob {
        recruiter_id: claims.sub,
        title: validation::required("title", &req.title)?,
        description: validation::required("description", &req.description)?,
        salary: validation::salary(req.salary)?,
        location: validation::required("location", &req.location)?,
        job_type,
    };

    let job = state.store.create_job(new).await?;
    info!(job_id = %job.id, recruiter_id = %job.recruiter_id, "job created");
    Ok(JobResponse::new(&job, None))
}

pub async fn update(
    state: &AppState,
    claims: &Claims,
    id: Uuid,
    req: UpdateJobRequest,
) -> AppResult<JobResponse> {
    // Input errors win over ownership errors.
    let changes = JobChanges {
        title: validation::optional(req.title),
        description: validation::optional(req.description),
        salary: validation::salary(req.salary)?,
        location: validation::optional(req.location),
        job_type: validation::parse_opt("type", req.job_type.as_deref())?,
        status: validation::parse_opt("status", req.status.as_deref())?,
    };

    owned_job(state, claims, id, "You can only update your own jobs").await?;
    let job = state.store.update_job(id, changes).await?;
    info!(job_id = %job.id, status = %job.status, "job updated");
    Ok(JobResponse::new(&job, None))
}

pub async fn delete(state: &AppState, claims: &Claims, id: Uuid) -> AppResult<MessageResponse> {
    owned_job(state, claims, id, "You can only delete your own jobs").await?;
    state.store.delete_job(id).await?;
    info!(job_id = %id, "job deleted");
    Ok(MessageResponse {
        message: "Job deleted successfully".into(),
    })
}

/// The caller's own postings, any status, newest first.
pub async fn my_jobs(state: &AppState, claims: &Claims) -> AppResult<Vec<JobResponse>> {
    let jobs = state.store.jobs_by_recruiter(claims.sub).await?;
    Ok(jobs.iter().map(|j| JobResponse::new(j, None)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ListJobsParams {
        ListJobsParams::default()
    }

    #[test]
    fn empty_params_give_default_filter() {
        assert_eq!(filter_from_params(&params()).unwrap(), JobFilter::default());
    }

    #[test]
    fn status_all_or_blank_disables_status_filter() {
        for raw in ["all", "ALL", ""] {
            let p = ListJobsParams {
                status: Some(raw.into()),
                ..params()
            };
            assert_eq!(filter_from_params(&p).unwrap().status, None, "{raw:?}");
        }
        let p = ListJobsParams {
            status: Some("closed".into()),
            ..params()
        };
        assert_eq!(filter_from_params(&p).unwrap().status, Some(JobStatus::Closed));
    }

    #[test]
    fn limit_is_an_alias_for_page_size() {
        let p = ListJobsParams {
            limit: Some("5".into()),
            ..params()
        };
        assert_eq!(filter_from_params(&p).unwrap().page_size, 5);

        let p = ListJobsParams {
            limit: Some("5".into()),
            page_size: Some("7".into()),
            ..params()
        };
        assert_eq!(filter_from_params(&p).unwrap().page_size, 7);
    }

    #[test]
    fn bad_values_are_validation_errors() {
        let cases = [
            ListJobsParams {
                job_type: Some("spaceship".into()),
                ..params()
            },
            ListJobsParams {
                sort_by: Some("password_hash".into()),
                ..params()
            },
            ListJobsParams {
                order: Some("up".into()),
                ..params()
            },
            ListJobsParams {
                page: Some("two".into()),
                ..params()
            },
            ListJobsParams {
                salary_min: Some("NaN".into()),
                ..params()
            },
            ListJobsParams {
                status: Some("draft".into()),
                ..params()
            },
        ];
        for p in cases {
            assert!(
                matches!(filter_from_params(&p), Err(AppError::Validation(_))),
                "{p:?}"
            );
        }
    }

    #[test]
    fn full_parameter_set() {
        let p = ListJobsParams {
            search: Some("react".into()),
            location: Some("são paulo".into()),
            job_type: Some("remote".into()),
            salary_min: Some("5000".into()),
            salary_max: Some("9000.5".into()),
            status: Some("open".into()),
            sort_by: Some("salary".into()),
            order: Some("asc".into()),
            page: Some("2".into()),
            page_size: Some("10".into()),
            limit: None,
        };
        let f = filter_from_params(&p).unwrap();
        assert_eq!(f.search.as_deref(), Some("react"));
        assert_eq!(f.job_type, Some(JobType::Remote));
        assert_eq!(f.salary_min, Some(5000.0));
        assert_eq!(f.salary_max, Some(9000.5));
        assert_eq!(f.sort, SortField::Salary);
        assert_eq!(f.order, SortOrder::Asc);
        assert_eq!((f.page, f.page_size), (2, 10));
    }
}
