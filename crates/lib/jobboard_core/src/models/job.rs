//! Job postings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ParseEnumError;

/// Where the work happens.
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Remote,
    Onsite,
    Hybrid,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Remote => "remote",
            JobType::Onsite => "onsite",
            JobType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(JobType::Remote),
            "onsite" => Ok(JobType::Onsite),
            "hybrid" => Ok(JobType::Hybrid),
            _ => Err(ParseEnumError {
                kind: "job type",
                value: s.to_string(),
                expected: "remote, onsite, hybrid",
            }),
        }
    }
}

/// Publication state of a posting. Only `Open` postings accept applications.
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Open,
    Closed,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(JobStatus::Open),
            "closed" => Ok(JobStatus::Closed),
            "archived" => Ok(JobStatus::Archived),
            _ => Err(ParseEnumError {
                kind: "job status",
                value: s.to_string(),
                expected: "open, closed, archived",
            }),
        }
    }
}

/// A job posting, owned by the recruiter who created it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: Option<f64>,
    pub location: String,
    pub job_type: JobType,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether candidates may currently apply.
    pub fn accepts_applications(&self) -> bool {
        self.status == JobStatus::Open
    }

    /// Apply a partial update in place. Absent fields are left untouched.
    pub fn apply(&mut self, changes: JobChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(salary) = changes.salary {
            self.salary = Some(salary);
        }
        if let Some(location) = changes.location {
            self.location = location;
        }
        if let Some(job_type) = changes.job_type {
            self.job_type = job_type;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
    }
}

/// Input for creating a posting. New postings always start `Open`.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub salary: Option<f64>,
    pub location: String,
    pub job_type: JobType,
}

/// Partial update of a posting.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub salary: Option<f64>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub status: Option<JobStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::now_v7(),
            recruiter_id: Uuid::now_v7(),
            title: "Desenvolvedor Backend Go".into(),
            description: "APIs RESTful".into(),
            salary: Some(9000.0),
            location: "Rio de Janeiro, RJ".into(),
            job_type: JobType::Hybrid,
            status: JobStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut job = sample();
        job.apply(JobChanges {
            title: Some("Tech Lead".into()),
            status: Some(JobStatus::Closed),
            ..Default::default()
        });
        assert_eq!(job.title, "Tech Lead");
        assert_eq!(job.status, JobStatus::Closed);
        assert_eq!(job.location, "Rio de Janeiro, RJ");
        assert_eq!(job.salary, Some(9000.0));
        assert!(!job.accepts_applications());
    }

    #[test]
    fn enums_parse_and_display() {
        assert_eq!("Hybrid".parse::<JobType>(), Ok(JobType::Hybrid));
        assert_eq!(JobType::Onsite.to_string(), "onsite");
        assert_eq!("archived".parse::<JobStatus>(), Ok(JobStatus::Archived));
        assert!("paused".parse::<JobStatus>().is_err());
        assert_eq!(JobStatus::default(), JobStatus::Open);
    }
}
