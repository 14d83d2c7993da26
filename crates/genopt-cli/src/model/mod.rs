pub mod run_record;
