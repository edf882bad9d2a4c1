pub mod journal;
pub mod resume;
pub mod template;
