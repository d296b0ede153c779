mod eviction_case1;
mod media_failure_case1;
mod write_through_case1;
