// Application submission pipeline, server side:
// wire DTOs, the transactional submission service, and HTTP handlers.

pub mod dto;
pub mod handlers;
pub mod service;
