pub mod hogql_parser;
pub mod parser_methods;
