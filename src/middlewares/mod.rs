pub mod owner_middleware;
