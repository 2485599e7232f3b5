mod parse_tests;
mod payload_tests;
