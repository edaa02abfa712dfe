mod budget_tests;
mod crawl_tests;
