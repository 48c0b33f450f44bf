pub mod repair_request;
