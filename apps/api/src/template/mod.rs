// Template store: presentation preferences, persisted under `template`.

pub mod handlers;
pub mod store;

pub use store::TemplateStore;
