/// HTTP probe tests against the local mock server
pub mod http_tests;
