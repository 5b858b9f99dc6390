pub mod intake_reader;
