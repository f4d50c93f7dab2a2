mod archive_tests;
mod bulk_tests;
mod lazy_tests;
