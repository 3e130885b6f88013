pub mod item_service;
pub mod normalize;
pub mod patch;
