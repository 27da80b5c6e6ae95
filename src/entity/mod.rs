pub mod project;

pub use project::Entity as Project;
