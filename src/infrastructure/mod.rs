pub mod assets;
pub mod http_client_factory;
pub mod i18n;
pub mod kronos;
pub mod mock;
