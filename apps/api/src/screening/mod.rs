//! Recruiter side: job descriptions, the batch scoring run, analysis review.

pub mod batch;
pub mod handlers;
pub mod job_descriptions;
pub mod on_demand;
