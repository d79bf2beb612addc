//! Student-facing intake plus the recruiter's applicant listing and shortlist.

pub mod criteria;
pub mod handlers;
pub mod intake;
