// Library for tests to access modules

pub mod config;
pub mod housekeeping;
pub mod housekeeping_worker;
pub mod models;
pub mod rollup;
pub mod usage_repo;
