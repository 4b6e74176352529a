pub mod match_results;
