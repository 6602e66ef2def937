//! Service layer: authentication primitives and the image host client.

pub mod auth;
pub mod cloudinary;
