pub mod credentials;
pub mod job;

pub use credentials::{CredentialBundle, load_credentials};
pub use job::{JobConfig, ResolvedJobConfig, load_job_config};
