//! Demo data: one recruiter, two candidates and seven postings.
//!
//! Seeding is idempotent. Accounts whose email already exists and postings
//! whose title the recruiter already uses are skipped with a warning.

use thiserror::Error;
use tracing::{info, warn};

use crate::auth::{PasswordError, PasswordHasher};
use crate::models::{JobType, NewAccount, NewJob, Role};
use crate::store::{Store, StoreError};

/// Seed failures. "Already exists" is not one of them.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// The recruiter email is reserved by a deleted account.
    #[error("recruiter account {0} is unavailable")]
    RecruiterUnavailable(&'static str),
}

/// What a seed run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub accounts_created: usize,
    pub accounts_skipped: usize,
    pub jobs_created: usize,
    pub jobs_skipped: usize,
}

pub const RECRUITER_EMAIL: &str = "admin@recruitment.com";
pub const RECRUITER_PASSWORD: &str = "admin123";
pub const CANDIDATE_PASSWORD: &str = "candidate123";
pub const CANDIDATE_EMAILS: [&str; 2] = ["joao.silva@email.com", "maria.santos@email.com"];

struct SeedJob {
    title: &'static str,
    description: &'static str,
    salary: Option<f64>,
    location: &'static str,
    job_type: JobType,
}

const JOBS: &[SeedJob] = &[
    SeedJob {
        title: "Desenvolvedor Frontend React",
        description: "Desenvolvedor Frontend experiente com React, TypeScript e Tailwind CSS \
                      para construir interfaces modernas e responsivas.\n\n\
                      Requisitos: 2+ anos com React, TypeScript, HTML5, CSS3, Git, APIs REST.\n\
                      Diferenciais: Next.js, testes automatizados, UI/UX.",
        salary: Some(8000.0),
        location: "São Paulo, SP",
        job_type: JobType::Remote,
    },
    SeedJob {
        title: "Desenvolvedor Backend Go",
        description: "Desenvolvedor Backend com experiência em Go para sistemas de alta \
                      performance e escalabilidade.\n\n\
                      Requisitos: 3+ anos com Go, APIs RESTful, PostgreSQL ou MySQL, Docker, \
                      microsserviços.\n\
                      Diferenciais: Kubernetes, Redis, RabbitMQ ou Kafka, Clean Architecture.",
        salary: Some(9000.0),
        location: "Rio de Janeiro, RJ",
        job_type: JobType::Hybrid,
    },
    SeedJob {
        title: "Desenvolvedor Full Stack",
        description: "Desenvolvedor Full Stack para projetos completos, do backend ao frontend.\n\n\
                      Requisitos: React ou Vue.js, Node.js ou Go, bancos SQL, Git e \
                      metodologias ágeis.\n\
                      Oferecemos: ambiente colaborativo, horários flexíveis, vale refeição.",
        salary: Some(10000.0),
        location: "Belo Horizonte, MG",
        job_type: JobType::Remote,
    },
    SeedJob {
        title: "DevOps Engineer",
        description: "DevOps Engineer para evoluir nossa infraestrutura e processos de deploy.\n\n\
                      Requisitos: AWS, GCP ou Azure, Kubernetes, Docker, CI/CD, Terraform ou \
                      Ansible, Prometheus e Grafana.\n\
                      Diferenciais: certificações cloud, shell scripting.",
        salary: Some(11000.0),
        location: "São Paulo, SP",
        job_type: JobType::Onsite,
    },
    SeedJob {
        title: "Desenvolvedor Mobile React Native",
        description: "Desenvolvedor Mobile para aplicativos iOS e Android com React Native.\n\n\
                      Requisitos: 2+ anos com React Native, JavaScript/TypeScript, integração \
                      com APIs, publicação na App Store e Play Store.\n\
                      Diferenciais: Expo, Redux, Firebase, push notifications.",
        salary: Some(8500.0),
        location: "Curitiba, PR",
        job_type: JobType::Remote,
    },
    SeedJob {
        title: "Tech Lead - Desenvolvimento",
        description: "Tech Lead para liderar o time de desenvolvimento e definir a arquitetura \
                      das soluções.\n\n\
                      Requisitos: 5+ anos em desenvolvimento, liderança de times, arquitetura \
                      de software, metodologias ágeis.\n\
                      Responsabilidades: code review, mentoria técnica, planejamento.",
        salary: None,
        location: "São Paulo, SP",
        job_type: JobType::Hybrid,
    },
    SeedJob {
        title: "Estágio em Desenvolvimento Web",
        description: "Estágio para estudantes de tecnologia que desejam iniciar carreira em \
                      desenvolvimento web.\n\n\
                      Requisitos: cursando TI ou Ciência da Computação, HTML, CSS, JavaScript \
                      e Git básicos.\n\
                      Oferecemos: mentoria técnica, bolsa auxílio, vale transporte.",
        salary: None,
        location: "Florianópolis, SC",
        job_type: JobType::Onsite,
    },
];

/// Number of postings the seeder knows about.
pub fn job_count() -> usize {
    JOBS.len()
}

/// Load the demo data into `store`.
pub async fn seed(store: &dyn Store, hasher: &PasswordHasher) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    let accounts = std::iter::once((RECRUITER_EMAIL, RECRUITER_PASSWORD, Role::Recruiter)).chain(
        CANDIDATE_EMAILS
            .iter()
            .map(|email| (*email, CANDIDATE_PASSWORD, Role::Candidate)),
    );
    for (email, password, role) in accounts {
        if store.email_exists(email).await? {
            warn!(email, "account already exists, skipping");
            report.accounts_skipped += 1;
            continue;
        }
        store
            .create_account(NewAccount {
                email: email.to_string(),
                password_hash: hasher.hash(password)?,
                role,
            })
            .await?;
        info!(email, %role, "account created");
        report.accounts_created += 1;
    }

    let recruiter = store
        .find_account_by_email(RECRUITER_EMAIL)
        .await?
        .ok_or(SeedError::RecruiterUnavailable(RECRUITER_EMAIL))?;
    let existing = store.jobs_by_recruiter(recruiter.id).await?;

    for job in JOBS {
        if existing.iter().any(|j| j.title == job.title) {
            warn!(title = job.title, "job already exists, skipping");
            report.jobs_skipped += 1;
            continue;
        }
        store
            .create_job(NewJob {
                recruiter_id: recruiter.id,
                title: job.title.to_string(),
                description: job.description.to_string(),
                salary: job.salary,
                location: job.location.to_string(),
                job_type: job.job_type,
            })
            .await?;
        info!(title = job.title, "job created");
        report.jobs_created += 1;
    }

    Ok(report)
}
