pub mod data_service;
