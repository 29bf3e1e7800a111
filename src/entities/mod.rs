pub mod external_provider;
pub mod external_provider_id;
pub mod movie;
