pub mod market_data_service;
