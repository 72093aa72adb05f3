pub mod auth_service;
pub mod chirp_service;
pub mod jwt_service;
pub mod refresh_token_service;
