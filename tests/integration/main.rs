//! Integration tests against a live PostgreSQL instance.
//!
//! Set `QUILL_TEST_DATABASE_URL` to run these; without it every test
//! skips with a notice so the suite stays green on machines with no
//! database.

mod helpers;

mod auth_test;
mod vote_test;
