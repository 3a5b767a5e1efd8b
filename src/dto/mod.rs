pub mod detection_dto;
pub mod profile_dto;
pub mod quote_dto;
